//! # Bounded Minimization
//!
//! The estimator only needs "minimize a scalar function of a vector inside a
//! box", expressed by the [`Minimizer`] trait. The shipped implementations run
//! `argmin` solvers in an unbounded internal space and map every trial point
//! back through [`BoundsTransform`], so the objective only ever sees values
//! that satisfy the bounds.
//!
//! Errors raised by the objective stop the search and are returned exactly as
//! the objective produced them. Errors raised by the solver itself become
//! [`DistrError::OptimizationFailure`].

use crate::error::{DistrError, Result};
use crate::parameters::bounds::{Bounds, BoundsTransform};
use argmin::core::{CostFunction, Gradient, TerminationReason, TerminationStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub mod lbfgs;
pub mod nelder_mead;

pub use lbfgs::{Lbfgs, LbfgsConfig};
pub use nelder_mead::{NelderMead, NelderMeadConfig};

/// Scalar function to be minimized.
pub trait Objective: Send + Sync {
    fn eval(&self, x: &[f64]) -> Result<f64>;
}

impl<F> Objective for F
where
    F: Fn(&[f64]) -> Result<f64> + Send + Sync,
{
    fn eval(&self, x: &[f64]) -> Result<f64> {
        self(x)
    }
}

/// Outcome of a minimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimizeResult {
    /// Best point found, in external coordinates.
    pub x: Vec<f64>,
    /// Objective value at `x`.
    pub fval: f64,
    pub iterations: u64,
    /// Number of objective evaluations, including those for gradients.
    pub evaluations: usize,
    /// Whether the solver met its convergence criterion.
    pub converged: bool,
    /// Termination message from the solver.
    pub message: String,
}

impl fmt::Display for MinimizeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MinimizeResult(fval={:.6}, iterations={}, evaluations={}, converged={})",
            self.fval, self.iterations, self.evaluations, self.converged
        )
    }
}

/// Bounded multivariate minimizer.
pub trait Minimizer: Send + Sync {
    /// Minimize `objective` starting from `x0`, one [`Bounds`] per coordinate.
    fn minimize(
        &self,
        objective: &dyn Objective,
        x0: &[f64],
        bounds: &[Bounds],
    ) -> Result<MinimizeResult>;
}

/// Evaluation counter and first objective error, shared with the solver.
#[derive(Debug, Default)]
pub(crate) struct EvalLog {
    evaluations: AtomicUsize,
    failure: Mutex<Option<DistrError>>,
}

impl EvalLog {
    fn record_failure(&self, err: DistrError) {
        if let Ok(mut slot) = self.failure.lock() {
            if slot.is_none() {
                *slot = Some(err);
            }
        }
    }

    fn take_failure(&self) -> Option<DistrError> {
        self.failure.lock().ok().and_then(|mut slot| slot.take())
    }

    fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }
}

/// Objective seen through the internal-to-external bounds mapping.
pub(crate) struct BoundedCost<'a> {
    objective: &'a dyn Objective,
    transforms: Vec<BoundsTransform>,
    log: Arc<EvalLog>,
}

impl<'a> BoundedCost<'a> {
    pub(crate) fn new(objective: &'a dyn Objective, bounds: &[Bounds]) -> Self {
        Self {
            objective,
            transforms: bounds.iter().copied().map(BoundsTransform::new).collect(),
            log: Arc::new(EvalLog::default()),
        }
    }

    pub(crate) fn log(&self) -> Arc<EvalLog> {
        Arc::clone(&self.log)
    }

    pub(crate) fn transforms(&self) -> Vec<BoundsTransform> {
        self.transforms.clone()
    }

    fn eval_internal(&self, internal: &[f64]) -> std::result::Result<f64, argmin::core::Error> {
        self.log.evaluations.fetch_add(1, Ordering::Relaxed);
        let external = to_external(&self.transforms, internal);
        match self.objective.eval(&external) {
            // Solvers compare costs; NaN would break their ordering.
            Ok(value) if value.is_nan() => Ok(f64::INFINITY),
            Ok(value) => Ok(value),
            Err(err) => {
                let message = err.to_string();
                self.log.record_failure(err);
                Err(argmin::core::Error::msg(message))
            }
        }
    }
}

impl CostFunction for BoundedCost<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> std::result::Result<Self::Output, argmin::core::Error> {
        self.eval_internal(param)
    }
}

impl Gradient for BoundedCost<'_> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    /// Central differences in internal coordinates.
    fn gradient(
        &self,
        param: &Self::Param,
    ) -> std::result::Result<Self::Gradient, argmin::core::Error> {
        let mut point = param.clone();
        let mut grad = vec![0.0; param.len()];

        for i in 0..param.len() {
            let eps = 1e-8 * param[i].abs().max(1.0);

            point[i] = param[i] + eps;
            let f_plus = self.eval_internal(&point)?;
            point[i] = param[i] - eps;
            let f_minus = self.eval_internal(&point)?;
            point[i] = param[i];

            grad[i] = (f_plus - f_minus) / (2.0 * eps);
        }

        Ok(grad)
    }
}

pub(crate) fn to_external(transforms: &[BoundsTransform], internal: &[f64]) -> Vec<f64> {
    transforms
        .iter()
        .zip(internal)
        .map(|(t, &v)| t.to_external(v))
        .collect()
}

/// Check lengths, clamp `x0` into `bounds` and map it to internal coordinates.
pub(crate) fn prepare_start(x0: &[f64], bounds: &[Bounds]) -> Result<Vec<f64>> {
    if x0.len() != bounds.len() {
        return Err(DistrError::DimensionMismatch(format!(
            "starting point has {} coordinates but {} bounds were given",
            x0.len(),
            bounds.len()
        )));
    }
    x0.iter()
        .zip(bounds)
        .map(|(&v, b)| {
            BoundsTransform::new(*b)
                .to_internal(b.clamp(v))
                .map_err(DistrError::from)
        })
        .collect()
}

/// Evaluate a zero-dimensional objective once.
pub(crate) fn evaluate_point(objective: &dyn Objective) -> Result<MinimizeResult> {
    let fval = objective.eval(&[])?;
    Ok(MinimizeResult {
        x: Vec::new(),
        fval,
        iterations: 0,
        evaluations: 1,
        converged: true,
        message: "no free parameters".to_string(),
    })
}

/// Best point and status read off a finished solver state.
pub(crate) struct SolverOutcome {
    pub(crate) internal: Vec<f64>,
    pub(crate) fval: f64,
    pub(crate) iterations: u64,
    pub(crate) status: TerminationStatus,
}

/// Turn a solver run into a [`MinimizeResult`].
///
/// A stored objective error wins over whatever the solver reported.
pub(crate) fn conclude(
    run: std::result::Result<SolverOutcome, argmin::core::Error>,
    log: &EvalLog,
    transforms: &[BoundsTransform],
) -> Result<MinimizeResult> {
    if let Some(err) = log.take_failure() {
        return Err(err);
    }
    let outcome = run.map_err(|e| DistrError::OptimizationFailure(e.to_string()))?;

    let converged = matches!(
        outcome.status,
        TerminationStatus::Terminated(TerminationReason::SolverConverged)
            | TerminationStatus::Terminated(TerminationReason::TargetCostReached)
    );

    Ok(MinimizeResult {
        x: to_external(transforms, &outcome.internal),
        fval: outcome.fval,
        iterations: outcome.iterations,
        evaluations: log.evaluations(),
        converged,
        message: outcome.status.to_string(),
    })
}
