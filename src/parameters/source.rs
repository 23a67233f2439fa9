//! Parameter mappings
//!
//! Expression functions read parameter values through the [`ParamSource`]
//! trait rather than through a concrete map type. That keeps the read side
//! pluggable: ordinary maps, the refinement overlay and the usage tracker all
//! answer the same lookups.

use crate::error::{DistrError, Result};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

/// Owned parameter assignment, ordered by name.
pub type Params = BTreeMap<String, f64>;

/// Build a [`Params`] from `(name, value)` pairs.
///
/// ```
/// use distr_family::parameters::params;
///
/// let p = params(&[("mu", 0.0), ("sigma", 2.0)]);
/// assert_eq!(p["sigma"], 2.0);
/// ```
pub fn params(pairs: &[(&str, f64)]) -> Params {
    pairs
        .iter()
        .map(|&(name, value)| (name.to_string(), value))
        .collect()
}

/// Read access to named parameter values.
pub trait ParamSource {
    /// Look up a value, returning `None` if the name is absent.
    fn lookup(&self, name: &str) -> Option<f64>;

    /// Look up a value, failing with [`DistrError::MissingParameter`] if absent.
    fn value(&self, name: &str) -> Result<f64> {
        self.lookup(name)
            .ok_or_else(|| DistrError::MissingParameter(name.to_string()))
    }
}

impl ParamSource for BTreeMap<String, f64> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl ParamSource for HashMap<String, f64> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl<S: ParamSource + ?Sized> ParamSource for &S {
    fn lookup(&self, name: &str) -> Option<f64> {
        (**self).lookup(name)
    }
}

/// Values bound by refinement layered over a caller mapping.
///
/// Bound values shadow caller values of the same name.
pub(crate) struct Overlay<'a> {
    pub(crate) fixed: &'a Params,
    pub(crate) free: &'a dyn ParamSource,
}

impl ParamSource for Overlay<'_> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.fixed
            .get(name)
            .copied()
            .or_else(|| self.free.lookup(name))
    }
}

/// Instrumented mapping that logs every key it is asked for.
///
/// Every lookup succeeds: declared names answer with their placeholder, any
/// other name answers with the default placeholder. The log keeps duplicates
/// and request order; [`UsageTracker::used`] sorts and deduplicates.
#[derive(Debug)]
pub struct UsageTracker {
    placeholders: Params,
    default_value: f64,
    log: RefCell<Vec<String>>,
}

impl UsageTracker {
    /// Tracker whose declared names all map to `placeholder`.
    pub fn new<I, S>(declared: I, placeholder: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            placeholders: declared
                .into_iter()
                .map(|name| (name.into(), placeholder))
                .collect(),
            default_value: placeholder,
            log: RefCell::new(Vec::new()),
        }
    }

    /// Raw lookup log.
    pub fn requests(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    /// Sorted, deduplicated names requested so far.
    pub fn used(&self) -> Vec<String> {
        let mut used = self.log.borrow().clone();
        used.sort();
        used.dedup();
        used
    }
}

impl ParamSource for UsageTracker {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.log.borrow_mut().push(name.to_string());
        Some(
            self.placeholders
                .get(name)
                .copied()
                .unwrap_or(self.default_value),
        )
    }
}
