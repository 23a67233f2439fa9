//! Finite mixtures.

use super::{Distr, Distribution};
use crate::error::{DistrError, Result};
use rand::distributions::{Distribution as _, WeightedIndex};
use rand::RngCore;

/// Validate mixture weights and return their sum.
///
/// Weights must be finite and non-negative with a positive sum.
pub(crate) fn check_weights(weights: &[f64]) -> Result<f64> {
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(DistrError::InvalidInput(format!(
            "mixture weights must be finite and non-negative, got {:?}",
            weights
        )));
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(DistrError::InvalidInput(
            "mixture weights sum to zero".to_string(),
        ));
    }
    Ok(total)
}

/// Weighted mixture of component distributions.
#[derive(Debug, Clone)]
pub struct Mixture {
    weights: Vec<f64>,
    components: Vec<Distr>,
    index: WeightedIndex<f64>,
}

impl Mixture {
    /// Build a mixture; `weights` are normalized to sum to one.
    pub fn new(weights: &[f64], components: Vec<Distr>) -> Result<Self> {
        if components.is_empty() {
            return Err(DistrError::InvalidInput(
                "a mixture needs at least one component".to_string(),
            ));
        }
        if weights.len() != components.len() {
            return Err(DistrError::InvalidInput(format!(
                "got {} weights for {} mixture components",
                weights.len(),
                components.len()
            )));
        }
        let total = check_weights(weights)?;

        let weights: Vec<f64> = weights.iter().map(|w| w / total).collect();
        let index = WeightedIndex::new(&weights)
            .map_err(|e| DistrError::InvalidInput(format!("mixture weights: {}", e)))?;

        Ok(Self {
            weights,
            components,
            index,
        })
    }

    /// Normalized weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn components(&self) -> &[Distr] {
        &self.components
    }
}

impl Distribution for Mixture {
    fn name(&self) -> &'static str {
        "Mixture"
    }

    fn pdf(&self, x: f64) -> f64 {
        self.weights
            .iter()
            .zip(&self.components)
            .map(|(w, d)| w * d.pdf(x))
            .sum()
    }

    fn cdf(&self, x: f64) -> f64 {
        self.weights
            .iter()
            .zip(&self.components)
            .map(|(w, d)| w * d.cdf(x))
            .sum::<f64>()
            .clamp(0.0, 1.0)
    }

    fn range(&self) -> (f64, f64) {
        self.components
            .iter()
            .zip(&self.weights)
            .filter(|(_, w)| **w > 0.0)
            .map(|(d, _)| d.range())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| {
                (lo.min(a), hi.max(b))
            })
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        let k = self.index.sample(rng);
        self.components[k].inner().sample(rng)
    }
}
