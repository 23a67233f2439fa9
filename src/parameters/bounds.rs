//! Parameter bounds for maximum-likelihood fitting
//!
//! Every free parameter of a family may carry a `(low, high)` box constraint.
//! Minimizers work in an unbounded internal space and map back through the
//! Minuit-style transform in [`BoundsTransform`], so every objective evaluation
//! sees a parameter vector that lies inside the requested box.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when working with parameter bounds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundsError {
    #[error("Invalid bounds: min ({min}) must not exceed max ({max})")]
    InvalidBounds { min: f64, max: f64 },

    #[error("Parameter value {value} is outside bounds: [{min}, {max}]")]
    ValueOutsideBounds { value: f64, min: f64, max: f64 },

    #[error("Non-finite parameter value is not allowed")]
    InfiniteValue,

    #[error("Got {given} bounds for {expected} parameters")]
    TooManyBounds { given: usize, expected: usize },
}

/// Box constraint on a single parameter axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Lowest allowed value
    pub min: f64,

    /// Highest allowed value
    pub max: f64,
}

// Infinite ends are written as `null` so the JSON stays valid.
impl Serialize for Bounds {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Bounds", 2)?;
        let min = self.has_lower_bound().then_some(self.min);
        let max = self.has_upper_bound().then_some(self.max);
        state.serialize_field("min", &min)?;
        state.serialize_field("max", &max)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Bounds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct BoundsHelper {
            #[serde(default)]
            min: Option<f64>,

            #[serde(default)]
            max: Option<f64>,
        }

        let helper = BoundsHelper::deserialize(deserializer)?;

        Ok(Bounds {
            min: helper.min.unwrap_or(f64::NEG_INFINITY),
            max: helper.max.unwrap_or(f64::INFINITY),
        })
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }
}

impl Bounds {
    /// Create a box constraint `[min, max]`
    ///
    /// # Examples
    ///
    /// ```
    /// use distr_family::parameters::Bounds;
    ///
    /// let bounds = Bounds::new(0.1, 5.0).unwrap();
    /// assert_eq!(bounds.min, 0.1);
    /// assert!(Bounds::new(5.0, 0.1).is_err());
    /// ```
    pub fn new(min: f64, max: f64) -> Result<Self, BoundsError> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(BoundsError::InvalidBounds { min, max });
        }

        Ok(Self { min, max })
    }

    /// An unconstrained axis
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Bounded from below only
    pub fn min_only(min: f64) -> Self {
        Self {
            min,
            max: f64::INFINITY,
        }
    }

    /// Bounded from above only
    pub fn max_only(max: f64) -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max,
        }
    }

    /// Check if a value is within the bounds
    pub fn is_within_bounds(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn has_lower_bound(&self) -> bool {
        self.min.is_finite()
    }

    pub fn has_upper_bound(&self) -> bool {
        self.max.is_finite()
    }

    /// Clamp a value to be within the bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Build one `Bounds` per parameter from `(low, high)` pairs.
    ///
    /// Pairs are matched to parameters by position. A list shorter than
    /// `n_params` leaves the trailing parameters unconstrained.
    pub fn from_pairs(pairs: &[(f64, f64)], n_params: usize) -> Result<Vec<Self>, BoundsError> {
        let bounds = pairs
            .iter()
            .map(|&(min, max)| Self::new(min, max))
            .collect::<Result<Vec<_>, _>>()?;
        Self::pad(bounds, n_params)
    }

    /// Pad a per-parameter list with unconstrained axes up to `n_params`.
    pub fn pad(mut bounds: Vec<Self>, n_params: usize) -> Result<Vec<Self>, BoundsError> {
        if bounds.len() > n_params {
            return Err(BoundsError::TooManyBounds {
                given: bounds.len(),
                expected: n_params,
            });
        }
        bounds.resize(n_params, Self::unbounded());
        Ok(bounds)
    }
}

/// Minuit-style mapping between a bounded external value and an unbounded
/// internal value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsTransform {
    bounds: Bounds,
}

impl BoundsTransform {
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Map an internal (optimizer) value to the external (parameter) value.
    ///
    /// The result always lies within the bounds.
    pub fn to_external(&self, internal_value: f64) -> f64 {
        match (self.bounds.has_lower_bound(), self.bounds.has_upper_bound()) {
            (false, false) => internal_value,
            (true, false) => self.bounds.min - 1.0 + (internal_value * internal_value + 1.0).sqrt(),
            (false, true) => self.bounds.max + 1.0 - (internal_value * internal_value + 1.0).sqrt(),
            (true, true) => {
                let bound_range = self.bounds.max - self.bounds.min;
                self.bounds.min + (internal_value.sin() + 1.0) * bound_range / 2.0
            }
        }
    }

    /// Map an external value to its internal representation.
    ///
    /// Fails if the value is not finite or lies outside the bounds.
    pub fn to_internal(&self, external_value: f64) -> Result<f64, BoundsError> {
        if !external_value.is_finite() {
            return Err(BoundsError::InfiniteValue);
        }

        if !self.bounds.is_within_bounds(external_value) {
            return Err(BoundsError::ValueOutsideBounds {
                value: external_value,
                min: self.bounds.min,
                max: self.bounds.max,
            });
        }

        let internal = match (self.bounds.has_lower_bound(), self.bounds.has_upper_bound()) {
            (false, false) => external_value,
            (true, false) => ((external_value - self.bounds.min + 1.0).powi(2) - 1.0).sqrt(),
            (false, true) => ((self.bounds.max - external_value + 1.0).powi(2) - 1.0).sqrt(),
            (true, true) => {
                let bound_range = self.bounds.max - self.bounds.min;
                if bound_range == 0.0 {
                    return Ok(0.0);
                }
                let scaled = 2.0 * (external_value - self.bounds.min) / bound_range - 1.0;
                scaled.clamp(-1.0, 1.0).asin()
            }
        };

        Ok(internal)
    }
}
