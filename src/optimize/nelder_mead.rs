//! Nelder-Mead simplex search.

use super::{
    conclude, evaluate_point, prepare_start, BoundedCost, MinimizeResult, Minimizer, Objective,
    SolverOutcome,
};
use crate::error::{DistrError, Result};
use crate::parameters::bounds::Bounds;
use argmin::core::{Executor, State};
use argmin::solver::neldermead::NelderMead as ArgminNelderMead;
use tracing::debug;

/// Configuration for [`NelderMead`].
#[derive(Debug, Clone, PartialEq)]
pub struct NelderMeadConfig {
    /// Maximum number of simplex iterations
    pub max_iterations: u64,

    /// Stop once the standard deviation of the vertex costs falls below this
    pub sd_tolerance: f64,

    /// Relative step for non-zero coordinates of the initial simplex
    pub nonzero_delta: f64,

    /// Absolute step for zero coordinates of the initial simplex
    pub zero_delta: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            sd_tolerance: 1e-10,
            nonzero_delta: 0.05,
            zero_delta: 0.00025,
        }
    }
}

/// Gradient-free simplex minimizer.
#[derive(Debug, Clone, Default)]
pub struct NelderMead {
    config: NelderMeadConfig,
}

impl NelderMead {
    pub fn new(config: NelderMeadConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NelderMeadConfig {
        &self.config
    }

    /// Start point plus one vertex per coordinate, each moved along one axis.
    fn initial_simplex(&self, start: &[f64]) -> Vec<Vec<f64>> {
        let mut simplex = Vec::with_capacity(start.len() + 1);
        simplex.push(start.to_vec());
        for i in 0..start.len() {
            let mut vertex = start.to_vec();
            vertex[i] = if vertex[i] != 0.0 {
                (1.0 + self.config.nonzero_delta) * vertex[i]
            } else {
                self.config.zero_delta
            };
            simplex.push(vertex);
        }
        simplex
    }
}

impl Minimizer for NelderMead {
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

        let solver = ArgminNelderMead::new(self.initial_simplex(&start))
            .with_sd_tolerance(self.config.sd_tolerance)
            .map_err(|e| {
                DistrError::InvalidInput(format!("invalid Nelder-Mead configuration: {}", e))
            })?;

        let cost = BoundedCost::new(objective, bounds);
        let log = cost.log();
        let transforms = cost.transforms();

        let run = Executor::new(cost, solver)
            .configure(|state| state.max_iters(self.config.max_iterations))
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
            "Nelder-Mead finished"
        );
        Ok(result)
    }
}
