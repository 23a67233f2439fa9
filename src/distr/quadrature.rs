//! Quadrature grids over a distribution's support.
//!
//! Arithmetic on two continuous distributions reduces to one-dimensional
//! integrals of the form `∫ f_X(x) g(x) dx`. A [`QuadratureGrid`] precomputes
//! nodes `x_i` and weights `w_i ≈ f_X(x_i) dx` once, so each later pdf or cdf
//! evaluation is a weighted sum.

use super::Distr;
use crate::error::{DistrError, Result};

/// Gauss-Legendre nodes per panel.
pub const GL_ORDER: usize = 16;

/// Panels the mapped integration interval is split into.
pub const PANEL_COUNT: usize = 64;

/// Gauss-Legendre nodes and weights on `[-1, 1]`.
pub fn gauss_legendre(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut nodes = vec![0.0f64; n];
    let mut weights = vec![0.0f64; n];

    if n == 0 {
        return (nodes, weights);
    }
    if n == 1 {
        weights[0] = 2.0;
        return (nodes, weights);
    }

    let nf = n as f64;
    // Roots are symmetric; only the positive half is solved for.
    for i in 0..n.div_ceil(2) {
        let mut x = (std::f64::consts::PI * (i as f64 + 0.75) / (nf + 0.5)).cos();

        // Newton iteration on P_n.
        for _ in 0..100 {
            let (p_n, p_prev) = legendre(n, x);
            let dp = nf * (x * p_n - p_prev) / (x * x - 1.0);
            let dx = p_n / dp;
            x -= dx;
            if dx.abs() < 1e-15 {
                break;
            }
        }

        let (p_n, p_prev) = legendre(n, x);
        let dp = nf * (x * p_n - p_prev) / (x * x - 1.0);
        let w = 2.0 / ((1.0 - x * x) * dp * dp);

        nodes[i] = -x;
        nodes[n - 1 - i] = x;
        weights[i] = w;
        weights[n - 1 - i] = w;
    }

    (nodes, weights)
}

/// `(P_n(x), P_{n-1}(x))` by the three-term recurrence.
fn legendre(n: usize, x: f64) -> (f64, f64) {
    let mut p0 = 1.0f64;
    let mut p1 = x;
    for j in 2..=n {
        let jf = j as f64;
        let p2 = ((2.0 * jf - 1.0) * x * p1 - (jf - 1.0) * p0) / jf;
        p0 = p1;
        p1 = p2;
    }
    (p1, p0)
}

/// Change of variables from `t` to `x` with its Jacobian `dx/dt`.
#[derive(Debug, Clone, Copy)]
enum Mapping {
    /// `x = lo + (hi - lo) t`, `t ∈ [0, 1]`
    Finite { lo: f64, hi: f64 },
    /// `x = lo + s t / (1 - t)`, `t ∈ [0, 1)`
    Lower { lo: f64, scale: f64 },
    /// `x = hi - s t / (1 - t)`, `t ∈ [0, 1)`
    Upper { hi: f64, scale: f64 },
    /// `x = m + s t / (1 - t²)`, `t ∈ (-1, 1)`
    Full { center: f64, scale: f64 },
}

impl Mapping {
    fn t_interval(&self) -> (f64, f64) {
        match self {
            Mapping::Full { .. } => (-1.0, 1.0),
            _ => (0.0, 1.0),
        }
    }

    fn apply(&self, t: f64) -> (f64, f64) {
        match *self {
            Mapping::Finite { lo, hi } => (lo + (hi - lo) * t, hi - lo),
            Mapping::Lower { lo, scale } => {
                let u = 1.0 - t;
                (lo + scale * t / u, scale / (u * u))
            }
            Mapping::Upper { hi, scale } => {
                let u = 1.0 - t;
                (hi - scale * t / u, scale / (u * u))
            }
            Mapping::Full { center, scale } => {
                let u = 1.0 - t * t;
                (center + scale * t / u, scale * (1.0 + t * t) / (u * u))
            }
        }
    }
}

/// Precomputed nodes and probability weights for one distribution.
///
/// Weights are normalized so that they sum to one.
#[derive(Debug, Clone)]
pub struct QuadratureGrid {
    pub nodes: Vec<f64>,
    pub weights: Vec<f64>,
}

impl QuadratureGrid {
    /// Grid over the support of `distr`, weighted by its density.
    ///
    /// Infinite supports are mapped onto a finite interval, scaled by the
    /// interquartile range so that the bulk of the mass gets most of the nodes.
    pub fn for_density(distr: &Distr) -> Result<Self> {
        let mapping = Self::mapping_for(distr);
        let (t_lo, t_hi) = mapping.t_interval();
        let (gl_nodes, gl_weights) = gauss_legendre(GL_ORDER);
        let panel_width = (t_hi - t_lo) / PANEL_COUNT as f64;

        let mut nodes = Vec::with_capacity(PANEL_COUNT * GL_ORDER);
        let mut weights = Vec::with_capacity(PANEL_COUNT * GL_ORDER);

        for panel in 0..PANEL_COUNT {
            let start = t_lo + panel as f64 * panel_width;
            let half = 0.5 * panel_width;
            let mid = start + half;
            for (g, gw) in gl_nodes.iter().zip(&gl_weights) {
                let (x, jacobian) = mapping.apply(mid + half * g);
                let w = gw * half * jacobian * distr.pdf(x);
                if x.is_finite() && w.is_finite() && w > 0.0 {
                    nodes.push(x);
                    weights.push(w);
                }
            }
        }

        let total: f64 = weights.iter().sum();
        if !(total > 0.0) || !total.is_finite() {
            return Err(DistrError::Computation(format!(
                "no probability mass found while integrating over {}",
                distr.name()
            )));
        }
        weights.iter_mut().for_each(|w| *w /= total);

        Ok(Self { nodes, weights })
    }

    /// Weighted sum `Σ w_i g(x_i)`.
    pub fn expect<F: Fn(f64) -> f64>(&self, g: F) -> f64 {
        self.nodes
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| w * g(x))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn mapping_for(distr: &Distr) -> Mapping {
        let (lo, hi) = distr.range();
        let center = distr.quantile(0.5);
        let iqr = distr.quantile(0.75) - distr.quantile(0.25);
        let spread = if iqr.is_finite() && iqr > 0.0 { 0.5 * iqr } else { 1.0 };

        match (lo.is_finite(), hi.is_finite()) {
            (true, true) => Mapping::Finite { lo, hi },
            (true, false) => Mapping::Lower {
                lo,
                scale: (center - lo).max(spread),
            },
            (false, true) => Mapping::Upper {
                hi,
                scale: (hi - center).max(spread),
            },
            (false, false) => Mapping::Full {
                center: if center.is_finite() { center } else { 0.0 },
                scale: spread,
            },
        }
    }
}
