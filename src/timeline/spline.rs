//! Interpolating polynomial splines over strictly increasing knots
//!
//! The degree follows the number of samples: one sample gives a constant,
//! two a line, three the interpolating parabola and four or more a cubic
//! spline with not-a-knot end conditions.

use crate::error::{RatingError, Result};

#[derive(Debug, Clone, PartialEq)]
enum Kind {
    Constant,
    Linear,
    Quadratic,
    /// Second derivatives at each knot
    Cubic(Vec<f64>),
}

/// Spline passing exactly through every `(x, y)` sample
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatingSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    kind: Kind,
}

impl InterpolatingSpline {
    /// Fit a spline of degree `min(3, n - 1)` through the samples
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self> {
        if xs.is_empty() || xs.len() != ys.len() {
            return Err(RatingError::ConfigurationError {
                message: format!(
                    "Spline needs matching non-empty samples, got {} x and {} y",
                    xs.len(),
                    ys.len()
                ),
            }
            .into());
        }
        if xs.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(RatingError::ConfigurationError {
                message: "Spline knots must be strictly increasing".to_string(),
            }
            .into());
        }

        let kind = match xs.len() {
            1 => Kind::Constant,
            2 => Kind::Linear,
            3 => Kind::Quadratic,
            _ => Kind::Cubic(not_a_knot_second_derivatives(xs, ys)),
        };

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            kind,
        })
    }

    /// Polynomial degree of each piece
    pub fn degree(&self) -> usize {
        match self.kind {
            Kind::Constant => 0,
            Kind::Linear => 1,
            Kind::Quadratic => 2,
            Kind::Cubic(_) => 3,
        }
    }

    /// Evaluate at `x`; outside the knots the end pieces are extrapolated
    pub fn evaluate(&self, x: f64) -> f64 {
        let (xs, ys) = (&self.xs, &self.ys);
        match &self.kind {
            Kind::Constant => ys[0],
            Kind::Linear => {
                let t = (x - xs[0]) / (xs[1] - xs[0]);
                ys[0] + t * (ys[1] - ys[0])
            }
            Kind::Quadratic => {
                // Lagrange form through the three samples
                let l0 = (x - xs[1]) * (x - xs[2]) / ((xs[0] - xs[1]) * (xs[0] - xs[2]));
                let l1 = (x - xs[0]) * (x - xs[2]) / ((xs[1] - xs[0]) * (xs[1] - xs[2]));
                let l2 = (x - xs[0]) * (x - xs[1]) / ((xs[2] - xs[0]) * (xs[2] - xs[1]));
                ys[0] * l0 + ys[1] * l1 + ys[2] * l2
            }
            Kind::Cubic(m) => {
                let i = self.segment(x);
                let h = xs[i + 1] - xs[i];
                let left = xs[i + 1] - x;
                let right = x - xs[i];
                m[i] * left.powi(3) / (6.0 * h)
                    + m[i + 1] * right.powi(3) / (6.0 * h)
                    + (ys[i] / h - m[i] * h / 6.0) * left
                    + (ys[i + 1] / h - m[i + 1] * h / 6.0) * right
            }
        }
    }

    /// Index of the piece covering `x`, clamped to the end pieces
    fn segment(&self, x: f64) -> usize {
        let last = self.xs.len() - 2;
        self.xs
            .partition_point(|&knot| knot <= x)
            .saturating_sub(1)
            .min(last)
    }
}

/// Solve for knot second derivatives of a not-a-knot cubic spline
///
/// The not-a-knot conditions (continuous third derivative at the second and
/// second-to-last knots) are substituted into the first and last interior
/// equations, leaving a tridiagonal system in `M[1..n-1]`.
fn not_a_knot_second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    debug_assert!(n >= 4);

    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let slope: Vec<f64> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

    // Unknowns M[1..=n-2]
    let size = n - 2;
    let mut lower = vec![0.0; size];
    let mut diag = vec![0.0; size];
    let mut upper = vec![0.0; size];
    let mut rhs = vec![0.0; size];

    for row in 0..size {
        let i = row + 1;
        lower[row] = h[i - 1];
        diag[row] = 2.0 * (h[i - 1] + h[i]);
        upper[row] = h[i];
        rhs[row] = 6.0 * (slope[i] - slope[i - 1]);
    }

    // M0 = ((h0 + h1) M1 - h0 M2) / h1
    diag[0] += h[0] * (h[0] + h[1]) / h[1];
    upper[0] -= h[0] * h[0] / h[1];
    lower[0] = 0.0;

    // M[n-1] = ((h[n-2] + h[n-3]) M[n-2] - h[n-2] M[n-3]) / h[n-3]
    let (a, b) = (h[n - 3], h[n - 2]);
    diag[size - 1] += b * (a + b) / a;
    lower[size - 1] -= b * b / a;
    upper[size - 1] = 0.0;

    let interior = solve_tridiagonal(&lower, &diag, &upper, &rhs);

    let mut m = Vec::with_capacity(n);
    m.push(((h[0] + h[1]) * interior[0] - h[0] * interior[1]) / h[1]);
    m.extend_from_slice(&interior);
    m.push(((a + b) * interior[size - 1] - b * interior[size - 2]) / a);
    m
}

/// Thomas algorithm for a tridiagonal system
fn solve_tridiagonal(lower: &[f64], diag: &[f64], upper: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    c[0] = upper[0] / diag[0];
    d[0] = rhs[0] / diag[0];
    for i in 1..n {
        let denom = diag[i] - lower[i] * c[i - 1];
        c[i] = upper[i] / denom;
        d[i] = (rhs[i] - lower[i] * d[i - 1]) / denom;
    }

    let mut x = vec![0.0; n];
    x[n - 1] = d[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d[i] - c[i] * x[i + 1];
    }
    x
}
