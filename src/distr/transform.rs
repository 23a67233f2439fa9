//! Truncation and censoring.

use super::{check_interval, Distr, Distribution};
use crate::error::{DistrError, Result};
use rand::RngCore;

/// A distribution restricted to `[a, b]` and renormalized there.
///
/// The reported range is always `[a, b]`, even where it extends past the base
/// support; the density is zero there.
#[derive(Debug, Clone)]
pub struct Truncated {
    base: Distr,
    a: f64,
    b: f64,
    cdf_a: f64,
    mass: f64,
}

impl Truncated {
    pub fn new(base: Distr, a: f64, b: f64) -> Result<Self> {
        check_interval(a, b)?;

        let (cdf_a, mass) = match base.point_mass() {
            Some(c) if (a..=b).contains(&c) => (0.0, 1.0),
            Some(_) => (0.0, 0.0),
            None => {
                let cdf_a = base.cdf(a);
                (cdf_a, base.cdf(b) - cdf_a)
            }
        };

        if !(mass > 0.0) {
            return Err(DistrError::InvalidInput(format!(
                "truncation to [{}, {}] leaves no probability mass in {}",
                a,
                b,
                base.name()
            )));
        }

        Ok(Self {
            base,
            a,
            b,
            cdf_a,
            mass,
        })
    }

    pub fn base(&self) -> &Distr {
        &self.base
    }
}

impl Distribution for Truncated {
    fn name(&self) -> &'static str {
        "Truncated"
    }

    fn pdf(&self, x: f64) -> f64 {
        if x < self.a || x > self.b {
            return 0.0;
        }
        self.base.pdf(x) / self.mass
    }

    fn cdf(&self, x: f64) -> f64 {
        let (lo, hi) = self.range();
        if x < lo {
            return 0.0;
        }
        if x >= hi {
            return 1.0;
        }
        if self.base.point_mass().is_some() {
            return self.base.cdf(x);
        }
        ((self.base.cdf(x) - self.cdf_a) / self.mass).clamp(0.0, 1.0)
    }

    fn range(&self) -> (f64, f64) {
        (self.a, self.b)
    }

    fn point_mass(&self) -> Option<f64> {
        self.base.point_mass()
    }

    fn quantile(&self, p: f64) -> f64 {
        if let Some(c) = self.base.point_mass() {
            return c;
        }
        let (lo, hi) = self.range();
        self.base
            .quantile(self.cdf_a + p.clamp(0.0, 1.0) * self.mass)
            .clamp(lo, hi)
    }
}

/// A distribution whose values are clipped to `[a, b]`.
///
/// The support of the base is kept. Tail mass is reported by `pdf` as a point
/// mass at the boundaries: `F(a)` for `x <= a` and `1 - F(b)` for `x >= b`, the
/// contribution a censored observation makes to a likelihood.
#[derive(Debug, Clone)]
pub struct Censored {
    base: Distr,
    a: f64,
    b: f64,
}

impl Censored {
    pub fn new(base: Distr, a: f64, b: f64) -> Result<Self> {
        check_interval(a, b)?;
        Ok(Self { base, a, b })
    }

    pub fn base(&self) -> &Distr {
        &self.base
    }

    /// Censoring interval `(a, b)`.
    pub fn limits(&self) -> (f64, f64) {
        (self.a, self.b)
    }
}

impl Distribution for Censored {
    fn name(&self) -> &'static str {
        "Censored"
    }

    fn pdf(&self, x: f64) -> f64 {
        if x <= self.a {
            self.base.cdf(self.a)
        } else if x >= self.b {
            1.0 - self.base.cdf(self.b)
        } else {
            self.base.pdf(x)
        }
    }

    fn cdf(&self, x: f64) -> f64 {
        if x < self.a {
            0.0
        } else if x >= self.b {
            1.0
        } else {
            self.base.cdf(x)
        }
    }

    fn range(&self) -> (f64, f64) {
        self.base.range()
    }

    fn point_mass(&self) -> Option<f64> {
        self.base.point_mass().map(|c| c.clamp(self.a, self.b))
    }

    fn quantile(&self, p: f64) -> f64 {
        self.base.quantile(p).clamp(self.a, self.b)
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        self.base.inner().sample(rng).clamp(self.a, self.b)
    }
}
