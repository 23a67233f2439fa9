//! Elementary distributions.

use super::Distribution;
use crate::error::{DistrError, Result};
use rand::{Rng, RngCore};
use rand_distr::{Distribution as _, Exp1, StandardNormal};
use statrs::distribution::{self as sd, Continuous, ContinuousCDF};

/// Normal distribution `N(mu, sigma)`.
#[derive(Debug, Clone)]
pub struct Normal {
    mu: f64,
    sigma: f64,
    inner: sd::Normal,
}

impl Normal {
    pub fn new(mu: f64, sigma: f64) -> Result<Self> {
        if !mu.is_finite() || !sigma.is_finite() || sigma <= 0.0 {
            return Err(DistrError::InvalidParameter(format!(
                "Normal requires finite mu and sigma > 0, got mu={}, sigma={}",
                mu, sigma
            )));
        }
        Ok(Self {
            mu,
            sigma,
            inner: sd::Normal::new(mu, sigma)?,
        })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Distribution for Normal {
    fn name(&self) -> &'static str {
        "Normal"
    }

    fn pdf(&self, x: f64) -> f64 {
        self.inner.pdf(x)
    }

    fn cdf(&self, x: f64) -> f64 {
        self.inner.cdf(x)
    }

    fn range(&self) -> (f64, f64) {
        (f64::NEG_INFINITY, f64::INFINITY)
    }

    fn quantile(&self, p: f64) -> f64 {
        if p <= 0.0 {
            return f64::NEG_INFINITY;
        }
        if p >= 1.0 {
            return f64::INFINITY;
        }
        self.inner.inverse_cdf(p)
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        let z: f64 = StandardNormal.sample(rng);
        self.mu + self.sigma * z
    }
}

/// Uniform distribution on `[a, b]`.
#[derive(Debug, Clone)]
pub struct Uniform {
    a: f64,
    b: f64,
    inner: sd::Uniform,
}

impl Uniform {
    pub fn new(a: f64, b: f64) -> Result<Self> {
        if !a.is_finite() || !b.is_finite() || a >= b {
            return Err(DistrError::InvalidParameter(format!(
                "Uniform requires finite a < b, got a={}, b={}",
                a, b
            )));
        }
        Ok(Self {
            a,
            b,
            inner: sd::Uniform::new(a, b)?,
        })
    }
}

impl Distribution for Uniform {
    fn name(&self) -> &'static str {
        "Uniform"
    }

    fn pdf(&self, x: f64) -> f64 {
        self.inner.pdf(x)
    }

    fn cdf(&self, x: f64) -> f64 {
        self.inner.cdf(x)
    }

    fn range(&self) -> (f64, f64) {
        (self.a, self.b)
    }

    fn quantile(&self, p: f64) -> f64 {
        self.a + p.clamp(0.0, 1.0) * (self.b - self.a)
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        self.a + (self.b - self.a) * rng.gen::<f64>()
    }
}

/// Exponential distribution with rate `lambda`.
#[derive(Debug, Clone)]
pub struct Exponential {
    rate: f64,
    inner: sd::Exp,
}

impl Exponential {
    pub fn new(rate: f64) -> Result<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(DistrError::InvalidParameter(format!(
                "Exponential requires a finite rate > 0, got {}",
                rate
            )));
        }
        Ok(Self {
            rate,
            inner: sd::Exp::new(rate)?,
        })
    }
}

impl Distribution for Exponential {
    fn name(&self) -> &'static str {
        "Exponential"
    }

    fn pdf(&self, x: f64) -> f64 {
        self.inner.pdf(x)
    }

    fn cdf(&self, x: f64) -> f64 {
        self.inner.cdf(x)
    }

    fn range(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    fn quantile(&self, p: f64) -> f64 {
        if p >= 1.0 {
            return f64::INFINITY;
        }
        -(1.0 - p.max(0.0)).ln() / self.rate
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        let e: f64 = Exp1.sample(rng);
        e / self.rate
    }
}

/// Point mass at a single value.
///
/// `pdf` reports the probability mass: one at the point, zero elsewhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant {
    value: f64,
}

impl Constant {
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Distribution for Constant {
    fn name(&self) -> &'static str {
        "Constant"
    }

    fn pdf(&self, x: f64) -> f64 {
        if x == self.value {
            1.0
        } else {
            0.0
        }
    }

    fn cdf(&self, x: f64) -> f64 {
        if x < self.value {
            0.0
        } else {
            1.0
        }
    }

    fn range(&self) -> (f64, f64) {
        (self.value, self.value)
    }

    fn point_mass(&self) -> Option<f64> {
        Some(self.value)
    }

    fn quantile(&self, _p: f64) -> f64 {
        self.value
    }

    fn sample(&self, _rng: &mut dyn RngCore) -> f64 {
        self.value
    }
}
