//! # Maximum-Likelihood Estimation
//!
//! Fits the free parameters of a [`DistrFamily`] to observed samples by
//! minimizing a [`Loss`], by default the negative log-likelihood.
//!
//! The search vector is ordered like [`DistrFamily::param_names`]. Every
//! objective evaluation zips it with those names, instantiates the family and
//! scores the resulting distribution against the samples.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use distr_family::distr::Distr;
//! use distr_family::estimate::Estimator;
//! use distr_family::family::DistrFamily;
//! use distr_family::parameters::ParamSource;
//! use ndarray::Array1;
//!
//! let family = DistrFamily::new(["sigma"], |p: &dyn ParamSource| {
//!     Distr::normal(0.0, p.value("sigma")?)
//! });
//! let samples = Array1::from_vec(vec![-1.2, 0.3, 2.1, -0.4, 0.9]);
//!
//! let estimate = Estimator::new(&family)
//!     .with_bounds(&[(0.1, 5.0)])
//!     .fit(&samples, &[1.0])
//!     .unwrap();
//! println!("sigma = {}", estimate.params["sigma"]);
//! ```

use crate::distr::Distr;
use crate::error::{DistrError, Result};
use crate::family::DistrFamily;
use crate::optimize::{evaluate_point, Minimizer, NelderMead, Objective};
use crate::parameters::bounds::Bounds;
use crate::parameters::source::Params;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, debug_span};

/// Smallest density the default likelihood will take the logarithm of.
pub const DENSITY_FLOOR: f64 = 1e-300;

/// Scores a candidate distribution against the samples; lower is better.
pub trait Loss: Send + Sync {
    fn evaluate(&self, distr: &Distr, samples: &Array1<f64>) -> Result<f64>;
}

impl<F> Loss for F
where
    F: Fn(&Distr, &Array1<f64>) -> Result<f64> + Send + Sync,
{
    fn evaluate(&self, distr: &Distr, samples: &Array1<f64>) -> Result<f64> {
        self(distr, samples)
    }
}

/// Negative log-likelihood `-Σ ln max(pdf(x), floor)`.
///
/// Flooring keeps the loss finite when a sample falls outside the support or
/// the density is undefined there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegLogLikelihood {
    pub floor: f64,
}

impl NegLogLikelihood {
    pub fn new(floor: f64) -> Self {
        Self { floor }
    }
}

impl Default for NegLogLikelihood {
    fn default() -> Self {
        Self::new(DENSITY_FLOOR)
    }
}

impl Loss for NegLogLikelihood {
    fn evaluate(&self, distr: &Distr, samples: &Array1<f64>) -> Result<f64> {
        Ok(-samples
            .iter()
            .map(|&x| distr.pdf(x).max(self.floor).ln())
            .sum::<f64>())
    }
}

/// Configuration for [`Estimator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Density floor of the default negative log-likelihood
    pub density_floor: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            density_floor: DENSITY_FLOOR,
        }
    }
}

/// Fitted parameters and the state the search ended in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Best parameter values, keyed by name.
    pub params: Params,
    /// Loss at `params`.
    pub loss: f64,
    pub iterations: u64,
    pub evaluations: usize,
    /// Whether the minimizer met its convergence criterion.
    pub converged: bool,
    pub message: String,
}

impl Estimate {
    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Estimate(")?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={:.6}", name, value)?;
        }
        write!(
            f,
            "; loss={:.6}, iterations={}, converged={})",
            self.loss, self.iterations, self.converged
        )
    }
}

/// Zip a search vector with parameter names.
fn assign(names: &[String], values: &[f64]) -> Params {
    names.iter().cloned().zip(values.iter().copied()).collect()
}

/// Loss of the family at a search vector.
struct LikelihoodObjective<'a> {
    family: &'a DistrFamily,
    samples: &'a Array1<f64>,
    loss: &'a dyn Loss,
}

impl Objective for LikelihoodObjective<'_> {
    fn eval(&self, x: &[f64]) -> Result<f64> {
        let params = assign(self.family.param_names(), x);
        let distr = self.family.instantiate(&params)?;
        self.loss.evaluate(&distr, self.samples)
    }
}

/// Maximum-likelihood estimator for one family.
pub struct Estimator<'a> {
    family: &'a DistrFamily,
    bounds: Vec<(f64, f64)>,
    loss: Option<Box<dyn Loss + 'a>>,
    minimizer: Box<dyn Minimizer + 'a>,
    config: EstimatorConfig,
}

impl<'a> Estimator<'a> {
    /// Estimator with no bounds, the negative log-likelihood and [`NelderMead`].
    pub fn new(family: &'a DistrFamily) -> Self {
        Self {
            family,
            bounds: Vec::new(),
            loss: None,
            minimizer: Box::new(NelderMead::default()),
            config: EstimatorConfig::default(),
        }
    }

    /// `(low, high)` per parameter in name order; missing trailing pairs
    /// leave those parameters unbounded.
    pub fn with_bounds(mut self, bounds: &[(f64, f64)]) -> Self {
        self.bounds = bounds.to_vec();
        self
    }

    pub fn with_param_bounds(mut self, bounds: Vec<Bounds>) -> Self {
        self.bounds = bounds.iter().map(|b| (b.min, b.max)).collect();
        self
    }

    pub fn with_loss<L: Loss + 'a>(mut self, loss: L) -> Self {
        self.loss = Some(Box::new(loss));
        self
    }

    pub fn with_minimizer<M: Minimizer + 'a>(mut self, minimizer: M) -> Self {
        self.minimizer = Box::new(minimizer);
        self
    }

    pub fn with_config(mut self, config: EstimatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Fit the family to `samples` starting from `initial_guess`.
    ///
    /// Errors from instantiating the family or evaluating the loss abort the
    /// fit and are returned unchanged. Running out of iterations is not an
    /// error; it shows up as `converged == false`.
    pub fn fit(&self, samples: &Array1<f64>, initial_guess: &[f64]) -> Result<Estimate> {
        let names = self.family.param_names();
        let span = debug_span!("estimate", params = ?names, samples = samples.len());
        let _enter = span.enter();

        if initial_guess.len() != names.len() {
            return Err(DistrError::DimensionMismatch(format!(
                "initial guess has {} values but the family has {} parameters {:?}",
                initial_guess.len(),
                names.len(),
                names
            )));
        }
        if self.bounds.len() > names.len() {
            return Err(DistrError::DimensionMismatch(format!(
                "{} bounds given for {} parameters",
                self.bounds.len(),
                names.len()
            )));
        }
        let bounds = Bounds::from_pairs(&self.bounds, names.len())?;

        let default_loss = NegLogLikelihood::new(self.config.density_floor);
        let loss: &dyn Loss = match &self.loss {
            Some(loss) => loss.as_ref(),
            None => &default_loss,
        };
        let objective = LikelihoodObjective {
            family: self.family,
            samples,
            loss,
        };

        let result = if names.is_empty() {
            debug!("family has no free parameters, evaluating loss once");
            evaluate_point(&objective)?
        } else {
            let start: Vec<f64> = initial_guess
                .iter()
                .zip(&bounds)
                .map(|(&v, b)| b.clamp(v))
                .collect();
            debug!(?start, "starting search");
            self.minimizer.minimize(&objective, &start, &bounds)?
        };

        let params = assign(names, &result.x);
        debug!(
            ?params,
            loss = result.fval,
            iterations = result.iterations,
            converged = result.converged,
            "fit finished"
        );

        Ok(Estimate {
            params,
            loss: result.fval,
            iterations: result.iterations,
            evaluations: result.evaluations,
            converged: result.converged,
            message: result.message,
        })
    }
}

impl DistrFamily {
    /// Maximum-likelihood fit with the default loss and minimizer.
    ///
    /// `initial_guess` and `bounds` follow the order of
    /// [`DistrFamily::param_names`].
    pub fn estimate(
        &self,
        samples: &Array1<f64>,
        initial_guess: &[f64],
        bounds: &[(f64, f64)],
    ) -> Result<Params> {
        Ok(Estimator::new(self)
            .with_bounds(bounds)
            .fit(samples, initial_guess)?
            .params)
    }
}
