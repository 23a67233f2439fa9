//! # Parameter System
//!
//! Named scalar parameters as seen by distribution families.
//!
//! ## Core Components
//!
//! - [`ParamSource`]: read access to parameter values, implemented by [`Params`],
//!   `HashMap<String, f64>` and the [`UsageTracker`]
//! - [`detect_used_params`]: finds the names an expression actually reads
//! - [`Bounds`] and [`BoundsTransform`]: box constraints used while fitting
//!
//! ## Example Usage
//!
//! ```rust
//! use distr_family::parameters::{detect_used_params, params, ParamSource};
//!
//! let declared = vec!["mu".to_string(), "sigma".to_string(), "unused".to_string()];
//! let used = detect_used_params(&declared, |p| Ok(p.value("mu")? * p.value("sigma")?));
//! assert_eq!(used, vec!["mu".to_string(), "sigma".to_string()]);
//!
//! let values = params(&[("mu", 0.5)]);
//! assert_eq!(values.value("mu").unwrap(), 0.5);
//! ```

pub mod bounds;
pub mod source;
pub mod usage;

pub use bounds::{Bounds, BoundsError, BoundsTransform};
pub use source::{params, ParamSource, Params, UsageTracker};
pub use usage::{detect_used_params, PLACEHOLDER_VALUE};
