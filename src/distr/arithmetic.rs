//! Sums, products and quotients of independent random variables.
//!
//! When one side is a point mass the result is an exact [`Affine`] or
//! [`Reciprocal`] transform of the other side. Two continuous operands give a
//! [`Convolution`], whose pdf and cdf are integrals over one operand evaluated on
//! a [`QuadratureGrid`].

use super::quadrature::QuadratureGrid;
use super::{Distr, Distribution};
use crate::error::{DistrError, Result};
use rand::RngCore;

/// `lhs + rhs`
pub fn sum(lhs: &Distr, rhs: &Distr) -> Result<Distr> {
    match (lhs.point_mass(), rhs.point_mass()) {
        (Some(a), Some(b)) => Ok(Distr::constant(a + b)),
        (Some(c), None) => Ok(Distr::new(Affine::new(rhs.clone(), 1.0, c)?)),
        (None, Some(c)) => Ok(Distr::new(Affine::new(lhs.clone(), 1.0, c)?)),
        (None, None) => Ok(Distr::new(Convolution::new(BinaryOp::Add, lhs, rhs)?)),
    }
}

/// `lhs * rhs`
pub fn product(lhs: &Distr, rhs: &Distr) -> Result<Distr> {
    match (lhs.point_mass(), rhs.point_mass()) {
        (Some(a), Some(b)) => Ok(Distr::constant(a * b)),
        (Some(c), None) | (None, Some(c)) if c == 0.0 => Ok(Distr::constant(0.0)),
        (Some(c), None) => Ok(Distr::new(Affine::new(rhs.clone(), c, 0.0)?)),
        (None, Some(c)) => Ok(Distr::new(Affine::new(lhs.clone(), c, 0.0)?)),
        (None, None) => Ok(Distr::new(Convolution::new(BinaryOp::Mul, lhs, rhs)?)),
    }
}

/// `lhs / rhs`
pub fn quotient(lhs: &Distr, rhs: &Distr) -> Result<Distr> {
    match (lhs.point_mass(), rhs.point_mass()) {
        (_, Some(c)) if c == 0.0 => Err(DistrError::InvalidInput(format!(
            "division of {} by a point mass at zero",
            lhs.name()
        ))),
        (Some(a), Some(b)) => Ok(Distr::constant(a / b)),
        (None, Some(c)) => Ok(Distr::new(Affine::new(lhs.clone(), 1.0 / c, 0.0)?)),
        (Some(c), None) if c == 0.0 => Ok(Distr::constant(0.0)),
        (Some(c), None) => Ok(Distr::new(Reciprocal::new(rhs.clone(), c)?)),
        (None, None) => Ok(Distr::new(Convolution::new(BinaryOp::Div, lhs, rhs)?)),
    }
}

/// `scale * X + shift`
#[derive(Debug, Clone)]
pub struct Affine {
    base: Distr,
    scale: f64,
    shift: f64,
}

impl Affine {
    pub fn new(base: Distr, scale: f64, shift: f64) -> Result<Self> {
        if !scale.is_finite() || scale == 0.0 || !shift.is_finite() {
            return Err(DistrError::InvalidInput(format!(
                "affine transform needs a finite non-zero scale and finite shift, got scale={}, shift={}",
                scale, shift
            )));
        }
        Ok(Self { base, scale, shift })
    }

    fn to_base(&self, y: f64) -> f64 {
        (y - self.shift) / self.scale
    }
}

impl Distribution for Affine {
    fn name(&self) -> &'static str {
        "Affine"
    }

    fn pdf(&self, y: f64) -> f64 {
        self.base.pdf(self.to_base(y)) / self.scale.abs()
    }

    fn cdf(&self, y: f64) -> f64 {
        let x = self.to_base(y);
        if self.scale > 0.0 {
            self.base.cdf(x)
        } else {
            1.0 - self.base.cdf(x)
        }
    }

    fn range(&self) -> (f64, f64) {
        let (lo, hi) = self.base.range();
        let a = self.scale * lo + self.shift;
        let b = self.scale * hi + self.shift;
        (a.min(b), a.max(b))
    }

    fn quantile(&self, p: f64) -> f64 {
        if self.scale > 0.0 {
            self.scale * self.base.quantile(p) + self.shift
        } else {
            self.scale * self.base.quantile(1.0 - p) + self.shift
        }
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        self.scale * self.base.inner().sample(rng) + self.shift
    }
}

/// `c / X` for a non-zero constant `c`.
#[derive(Debug, Clone)]
pub struct Reciprocal {
    base: Distr,
    numerator: f64,
}

impl Reciprocal {
    pub fn new(base: Distr, numerator: f64) -> Result<Self> {
        if !numerator.is_finite() || numerator == 0.0 {
            return Err(DistrError::InvalidInput(format!(
                "reciprocal needs a finite non-zero numerator, got {}",
                numerator
            )));
        }
        Ok(Self { base, numerator })
    }

    /// `P(c / X <= y)` for `c > 0`.
    fn cdf_positive(&self, c: f64, y: f64) -> f64 {
        let below_zero = self.base.cdf(0.0);
        if y > 0.0 {
            below_zero + 1.0 - self.base.cdf(c / y)
        } else if y < 0.0 {
            below_zero - self.base.cdf(c / y)
        } else {
            below_zero
        }
    }
}

impl Distribution for Reciprocal {
    fn name(&self) -> &'static str {
        "Reciprocal"
    }

    fn pdf(&self, y: f64) -> f64 {
        if y == 0.0 {
            return 0.0;
        }
        self.base.pdf(self.numerator / y) * self.numerator.abs() / (y * y)
    }

    fn cdf(&self, y: f64) -> f64 {
        let c = self.numerator;
        let p = if c > 0.0 {
            self.cdf_positive(c, y)
        } else {
            // c / X = -(|c| / X)
            1.0 - self.cdf_positive(-c, -y)
        };
        p.clamp(0.0, 1.0)
    }

    fn range(&self) -> (f64, f64) {
        let (lo, hi) = self.base.range();
        if lo < 0.0 && hi > 0.0 {
            return (f64::NEG_INFINITY, f64::INFINITY);
        }

        let c = self.numerator;
        // Approaching zero from inside the support sends c / x to ±inf.
        let inv = |x: f64, side: f64| {
            if x == 0.0 {
                c.signum() * side * f64::INFINITY
            } else {
                c / x
            }
        };
        let (a, b) = if lo >= 0.0 {
            (inv(lo, 1.0), inv(hi, 1.0))
        } else {
            (inv(lo, -1.0), inv(hi, -1.0))
        };
        (a.min(b), a.max(b))
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        self.numerator / self.base.inner().sample(rng)
    }
}

/// Binary operation combining two independent variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn apply(&self, x: f64, y: f64) -> f64 {
        match self {
            BinaryOp::Add => x + y,
            BinaryOp::Mul => x * y,
            BinaryOp::Div => x / y,
        }
    }
}

/// Distribution of `lhs op rhs` for two continuous operands.
///
/// The grid integrates over `lhs` for sums and products and over `rhs` for
/// quotients.
#[derive(Debug, Clone)]
pub struct Convolution {
    op: BinaryOp,
    lhs: Distr,
    rhs: Distr,
    grid: QuadratureGrid,
}

impl Convolution {
    pub fn new(op: BinaryOp, lhs: &Distr, rhs: &Distr) -> Result<Self> {
        let grid = match op {
            BinaryOp::Add | BinaryOp::Mul => QuadratureGrid::for_density(lhs)?,
            BinaryOp::Div => QuadratureGrid::for_density(rhs)?,
        };
        Ok(Self {
            op,
            lhs: lhs.clone(),
            rhs: rhs.clone(),
            grid,
        })
    }

    pub fn op(&self) -> BinaryOp {
        self.op
    }

    pub fn operands(&self) -> (&Distr, &Distr) {
        (&self.lhs, &self.rhs)
    }
}

/// Min and max of `op` over the corner points, skipping undefined corners.
fn corner_range(op: BinaryOp, a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    let corners = [
        op.apply(a.0, b.0),
        op.apply(a.0, b.1),
        op.apply(a.1, b.0),
        op.apply(a.1, b.1),
    ];
    let lo = corners.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = corners.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (lo, hi)
}

impl Distribution for Convolution {
    fn name(&self) -> &'static str {
        match self.op {
            BinaryOp::Add => "Sum",
            BinaryOp::Mul => "Product",
            BinaryOp::Div => "Quotient",
        }
    }

    fn pdf(&self, z: f64) -> f64 {
        match self.op {
            BinaryOp::Add => self.grid.expect(|x| self.rhs.pdf(z - x)),
            BinaryOp::Mul => self.grid.expect(|x| {
                if x == 0.0 {
                    0.0
                } else {
                    self.rhs.pdf(z / x) / x.abs()
                }
            }),
            BinaryOp::Div => self.grid.expect(|y| self.lhs.pdf(z * y) * y.abs()),
        }
    }

    fn cdf(&self, z: f64) -> f64 {
        let p = match self.op {
            BinaryOp::Add => self.grid.expect(|x| self.rhs.cdf(z - x)),
            BinaryOp::Mul => self.grid.expect(|x| {
                if x > 0.0 {
                    self.rhs.cdf(z / x)
                } else if x < 0.0 {
                    1.0 - self.rhs.cdf(z / x)
                } else {
                    // X = 0 gives a product of 0.
                    if z >= 0.0 {
                        1.0
                    } else {
                        0.0
                    }
                }
            }),
            BinaryOp::Div => self.grid.expect(|y| {
                if y > 0.0 {
                    self.lhs.cdf(z * y)
                } else {
                    1.0 - self.lhs.cdf(z * y)
                }
            }),
        };
        p.clamp(0.0, 1.0)
    }

    fn range(&self) -> (f64, f64) {
        let a = self.lhs.range();
        let b = self.rhs.range();
        match self.op {
            BinaryOp::Add => (a.0 + b.0, a.1 + b.1),
            BinaryOp::Mul => corner_range(BinaryOp::Mul, a, b),
            BinaryOp::Div => {
                if b.0 <= 0.0 && b.1 >= 0.0 {
                    (f64::NEG_INFINITY, f64::INFINITY)
                } else {
                    corner_range(BinaryOp::Div, a, b)
                }
            }
        }
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        let x = self.lhs.inner().sample(rng);
        let y = self.rhs.inner().sample(rng);
        self.op.apply(x, y)
    }
}
