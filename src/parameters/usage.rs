//! Parameter-usage detection
//!
//! Callers may declare parameters that the expression never reads, for example
//! when a combined name list carries names that only matter to one operand.
//! Detection runs the expression once against a [`UsageTracker`] and keeps the
//! names it asked for, so refinement and estimation only ever see parameters
//! that influence the result.

use crate::error::Result;
use crate::parameters::source::{ParamSource, UsageTracker};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::debug;

/// Value handed out for every parameter read during detection.
pub const PLACEHOLDER_VALUE: f64 = 1.0;

/// Determine which of `declared` (or any other name) `expr` reads.
///
/// The expression is evaluated exactly once. An error or a panic during that
/// evaluation is discarded: the names observed before the failure are still
/// returned, and an expression that fails before any lookup yields an empty list.
pub fn detect_used_params<T, F>(declared: &[String], expr: F) -> Vec<String>
where
    F: FnOnce(&dyn ParamSource) -> Result<T>,
{
    let tracker = UsageTracker::new(declared.iter().cloned(), PLACEHOLDER_VALUE);

    match panic::catch_unwind(AssertUnwindSafe(|| expr(&tracker))) {
        Ok(Ok(_)) => {}
        Ok(Err(err)) => {
            debug!(error = %err, "dry run failed, keeping names observed so far");
        }
        Err(payload) => {
            debug!(
                panic = panic_message(payload.as_ref()),
                "dry run panicked, keeping names observed so far"
            );
        }
    }

    let used = tracker.used();
    debug!(?declared, ?used, "detected parameter usage");
    used
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}
