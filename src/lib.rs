//! # distr-family
//!
//! `distr-family` describes parametric families of probability distributions
//! and fits them to data.
//!
//! The library provides:
//! - [`DistrFamily`], a distribution with free named parameters whose
//!   parameter set is detected from the expression that builds it
//! - Lazy composition of families with `+`, `*`, `/`, truncation, censoring,
//!   mixtures and user-defined combinators
//! - Refinement, which binds some parameters and returns a smaller family or,
//!   once everything is bound, a concrete [`Distr`]
//! - Maximum-likelihood estimation over bounded parameter boxes
//!
//! ## Basic Usage
//!
//! ```
//! use distr_family::parameters::{params, ParamSource};
//! use distr_family::{Distr, DistrFamily, Refinement};
//!
//! let signal = DistrFamily::new(["mu"], |p: &dyn ParamSource| Distr::normal(p.value("mu")?, 1.0));
//! let noise = DistrFamily::new(["sigma"], |p: &dyn ParamSource| Distr::normal(0.0, p.value("sigma")?));
//! let observed = &signal + &noise;
//! assert_eq!(observed.param_names(), ["mu", "sigma"]);
//!
//! match observed.refine(&params(&[("sigma", 0.5)])).unwrap() {
//!     Refinement::Family(f) => assert_eq!(f.param_names(), ["mu"]),
//!     Refinement::Distr(_) => unreachable!(),
//! }
//! ```

pub mod distr;
pub mod error;
pub mod estimate;
pub mod family;
pub mod optimize;
pub mod parameters;

// Re-exports for convenience
pub use distr::{Distr, Distribution};
pub use error::{DistrError, Result};
pub use estimate::{Estimate, Estimator, EstimatorConfig, Loss, NegLogLikelihood, DENSITY_FLOOR};
pub use family::{Combinator, DistrFamily, FamilyExpr, Refinement};
pub use optimize::{Lbfgs, MinimizeResult, Minimizer, NelderMead};
pub use parameters::{params, Bounds, ParamSource, Params};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
