//! Limited-memory BFGS with numerical gradients.

use super::{
    conclude, evaluate_point, prepare_start, BoundedCost, MinimizeResult, Minimizer, Objective,
    SolverOutcome,
};
use crate::error::{DistrError, Result};
use crate::parameters::bounds::Bounds;
use argmin::core::{Executor, State};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::LBFGS;
use tracing::debug;

/// Configuration for [`Lbfgs`].
#[derive(Debug, Clone, PartialEq)]
pub struct LbfgsConfig {
    /// Maximum number of iterations
    pub max_iterations: u64,
    /// Convergence tolerance for the gradient norm
    pub tolerance: f64,
    /// Number of corrections kept for the inverse Hessian
    pub memory: usize,
}

impl Default for LbfgsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-6,
            memory: 10,
        }
    }
}

/// Quasi-Newton minimizer using central-difference gradients.
///
/// Faster than [`super::NelderMead`] on smooth objectives, but every gradient
/// costs two evaluations per coordinate.
#[derive(Debug, Clone, Default)]
pub struct Lbfgs {
    config: LbfgsConfig,
}

impl Lbfgs {
    pub fn new(config: LbfgsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LbfgsConfig {
        &self.config
    }
}

impl Minimizer for Lbfgs {
    fn minimize(
        &self,
        objective: &dyn Objective,
        x0: &[f64],
        bounds: &[Bounds],
    ) -> Result<MinimizeResult> {
        let start = prepare_start(x0, bounds)?;
        if start.is_empty() {
            return evaluate_point(objective);
        }

        let tol_cost = if self.config.tolerance == 0.0 {
            0.0
        } else {
            (0.1 * self.config.tolerance).max(1e-12)
        };
        let linesearch = MoreThuenteLineSearch::new();
        let solver = LBFGS::new(linesearch, self.config.memory)
            .with_tolerance_grad(self.config.tolerance)
            .and_then(|solver| solver.with_tolerance_cost(tol_cost))
            .map_err(|e| DistrError::InvalidInput(format!("invalid L-BFGS configuration: {}", e)))?;

        let cost = BoundedCost::new(objective, bounds);
        let log = cost.log();
        let transforms = cost.transforms();

        let run = Executor::new(cost, solver)
            .configure(|state| state.param(start).max_iters(self.config.max_iterations))
            .run()
            .and_then(|res| {
                let state = res.state();
                let internal = state
                    .get_best_param()
                    .cloned()
                    .ok_or_else(|| argmin::core::Error::msg("no best parameters found"))?;
                Ok(SolverOutcome {
                    internal,
                    fval: state.get_best_cost(),
                    iterations: state.get_iter(),
                    status: state.get_termination_status().clone(),
                })
            });

        let result = conclude(run, &log, &transforms)?;
        debug!(
            fval = result.fval,
            iterations = result.iterations,
            converged = result.converged,
            "L-BFGS finished"
        );
        Ok(result)
    }
}
