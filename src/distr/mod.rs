//! Concrete distributions consumed by distribution families.
//!
//! A family only ever talks to distributions through the [`Distribution`]
//! trait and the shared [`Distr`] handle. The handle adds the array helpers,
//! sampling, truncation, censoring and the `+`, `*`, `/` operators, all of which
//! produce new handles and never touch their inputs.

use crate::error::{DistrError, Result};
use ndarray::Array1;
use rand::{Rng, RngCore};
use std::fmt;
use std::ops::{Add, Div, Mul};
use std::sync::Arc;

mod arithmetic;
mod basic;
mod mixture;
pub mod quadrature;
mod transform;

pub use arithmetic::{Affine, BinaryOp, Convolution, Reciprocal};
pub use basic::{Constant, Exponential, Normal, Uniform};
pub use mixture::Mixture;
pub(crate) use mixture::check_weights;
pub use transform::{Censored, Truncated};

/// Bisection steps used by the default quantile.
const QUANTILE_MAX_ITER: usize = 200;

/// Capability set every concrete distribution provides.
pub trait Distribution: fmt::Debug + Send + Sync {
    /// Short type name, e.g. `"Normal"`.
    fn name(&self) -> &'static str;

    /// Density at `x`. Point masses report their probability mass.
    fn pdf(&self, x: f64) -> f64;

    /// Cumulative distribution function at `x`.
    fn cdf(&self, x: f64) -> f64;

    /// Support as `(low, high)`; either end may be infinite.
    fn range(&self) -> (f64, f64);

    /// Location of the mass if the distribution is a single point.
    fn point_mass(&self) -> Option<f64> {
        None
    }

    /// Inverse of the cdf, found by bisection unless overridden.
    fn quantile(&self, p: f64) -> f64 {
        bisect_quantile(self, p)
    }

    /// Draw one value. Defaults to inverse-transform sampling.
    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        let u: f64 = rng.gen();
        self.quantile(u)
    }
}

/// Smallest `x` with `cdf(x) >= p`, located by bisection over the support.
///
/// Infinite ends of the support are replaced by a bracket that doubles until it
/// encloses `p`.
pub fn bisect_quantile<D: Distribution + ?Sized>(distr: &D, p: f64) -> f64 {
    let (mut lo, mut hi) = distr.range();
    if p.is_nan() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return lo;
    }
    if p >= 1.0 {
        return hi;
    }

    if !lo.is_finite() {
        let anchor = if hi.is_finite() { hi.min(0.0) } else { 0.0 };
        let mut step = 1.0;
        lo = anchor - step;
        while distr.cdf(lo) >= p && step < f64::MAX / 4.0 {
            step *= 2.0;
            lo = anchor - step;
        }
    }
    if !hi.is_finite() {
        let anchor = lo.max(0.0);
        let mut step = 1.0;
        hi = anchor + step;
        while distr.cdf(hi) < p && step < f64::MAX / 4.0 {
            step *= 2.0;
            hi = anchor + step;
        }
    }

    for _ in 0..QUANTILE_MAX_ITER {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        if distr.cdf(mid) < p {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    hi
}

/// Shared, immutable handle to a concrete distribution.
#[derive(Clone)]
pub struct Distr(Arc<dyn Distribution>);

impl fmt::Debug for Distr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Distr {
    /// Wrap a concrete distribution.
    pub fn new<D: Distribution + 'static>(distr: D) -> Self {
        Self(Arc::new(distr))
    }

    /// Normal distribution with mean `mu` and standard deviation `sigma`.
    pub fn normal(mu: f64, sigma: f64) -> Result<Self> {
        Ok(Self::new(Normal::new(mu, sigma)?))
    }

    /// Uniform distribution on `[a, b]`.
    pub fn uniform(a: f64, b: f64) -> Result<Self> {
        Ok(Self::new(Uniform::new(a, b)?))
    }

    /// Exponential distribution with the given rate.
    pub fn exponential(rate: f64) -> Result<Self> {
        Ok(Self::new(Exponential::new(rate)?))
    }

    /// Point mass at `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(Constant::new(value))
    }

    /// Weighted mixture; weights are normalized to sum to one.
    pub fn mixture(weights: &[f64], components: Vec<Distr>) -> Result<Self> {
        Ok(Self::new(Mixture::new(weights, components)?))
    }

    /// The wrapped distribution.
    pub fn inner(&self) -> &dyn Distribution {
        self.0.as_ref()
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn pdf(&self, x: f64) -> f64 {
        self.0.pdf(x)
    }

    pub fn cdf(&self, x: f64) -> f64 {
        self.0.cdf(x)
    }

    pub fn quantile(&self, p: f64) -> f64 {
        self.0.quantile(p)
    }

    pub fn range(&self) -> (f64, f64) {
        self.0.range()
    }

    pub fn point_mass(&self) -> Option<f64> {
        self.0.point_mass()
    }

    /// Density evaluated pointwise over `xs`.
    pub fn pdf_array(&self, xs: &Array1<f64>) -> Array1<f64> {
        xs.mapv(|x| self.0.pdf(x))
    }

    /// Cdf evaluated pointwise over `xs`.
    pub fn cdf_array(&self, xs: &Array1<f64>) -> Array1<f64> {
        xs.mapv(|x| self.0.cdf(x))
    }

    /// Draw a single value.
    pub fn sample<R: RngCore>(&self, rng: &mut R) -> f64 {
        self.0.sample(rng)
    }

    /// Draw `n` independent values.
    pub fn rand<R: RngCore>(&self, n: usize, rng: &mut R) -> Array1<f64> {
        Array1::from_shape_fn(n, |_| self.0.sample(rng))
    }

    /// Restrict the support to `[a, b]`, renormalizing the density.
    pub fn trunc(&self, a: f64, b: f64) -> Result<Distr> {
        Ok(Self::new(Truncated::new(self.clone(), a, b)?))
    }

    /// Clip values to `[a, b]`, moving the tail mass onto the boundaries.
    pub fn censor(&self, a: f64, b: f64) -> Result<Distr> {
        Ok(Self::new(Censored::new(self.clone(), a, b)?))
    }
}

/// Check a `[a, b]` interval used by truncation or censoring.
pub(crate) fn check_interval(a: f64, b: f64) -> Result<()> {
    if a.is_nan() || b.is_nan() || a > b {
        return Err(DistrError::InvalidInput(format!(
            "interval [{}, {}] is empty or undefined",
            a, b
        )));
    }
    Ok(())
}

macro_rules! impl_distr_op {
    ($op_trait:ident, $method:ident, $func:path) => {
        impl $op_trait<&Distr> for &Distr {
            type Output = Result<Distr>;

            fn $method(self, rhs: &Distr) -> Result<Distr> {
                $func(self, rhs)
            }
        }

        impl $op_trait<Distr> for Distr {
            type Output = Result<Distr>;

            fn $method(self, rhs: Distr) -> Result<Distr> {
                $func(&self, &rhs)
            }
        }

        impl $op_trait<f64> for &Distr {
            type Output = Result<Distr>;

            fn $method(self, rhs: f64) -> Result<Distr> {
                $func(self, &Distr::constant(rhs))
            }
        }

        impl $op_trait<f64> for Distr {
            type Output = Result<Distr>;

            fn $method(self, rhs: f64) -> Result<Distr> {
                $func(&self, &Distr::constant(rhs))
            }
        }
    };
}

impl_distr_op!(Add, add, arithmetic::sum);
impl_distr_op!(Mul, mul, arithmetic::product);
impl_distr_op!(Div, div, arithmetic::quotient);
