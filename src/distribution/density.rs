//! Unnormalized densities on [0, 1]
//!
//! A [`DensitySpec`] is plain data describing a non-negative function on the
//! closed unit interval. It is never required to integrate to one: the
//! sampler only needs an upper bound, and the normalizing constant is kept for
//! diagnostics.
//!
//! # Families
//!
//! - **Polynomial**: `p(x) = a0 + a1 x + ... + am x^m`, with the analytic
//!   integral `Z = Σ a_i / (i + 1)`
//! - **Piecewise-linear**: control points `(x, density)` covering [0, 1],
//!   linearly interpolated between neighbours
//!
//! A random, smooth piecewise-linear density can be generated with
//! [`DensitySpec::random_smooth`].
//!
//! # Example
//!
//! ```
//! use dchoice::distribution::density::DensitySpec;
//!
//! let linear = DensitySpec::polynomial(vec![0.0, 2.0]);
//! assert_eq!(linear.evaluate(0.25), 0.5);
//! assert!((linear.integral() - 1.0).abs() < 1e-12);
//! ```

use crate::error::{SimError, SimResult};
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Kernel used to smooth random control-point heights
const SMOOTHING_KERNEL: [f64; 3] = [1.0, 2.0, 1.0];

/// Offset added to raw control-point heights so none is zero
const HEIGHT_OFFSET: f64 = 0.1;

/// Floor applied after smoothing
const MIN_SMOOTHED_HEIGHT: f64 = 1e-6;

/// Description of an unnormalized density on [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DensitySpec {
    /// `p(x) = Σ coefficients[i] * x^i`
    Polynomial { coefficients: Vec<f64> },
    /// Linear interpolation between `(x, density)` control points
    PiecewiseLinear { points: Vec<(f64, f64)> },
}

impl DensitySpec {
    /// Polynomial density from coefficients `a0..am`
    pub fn polynomial(coefficients: Vec<f64>) -> Self {
        Self::Polynomial { coefficients }
    }

    /// Piecewise-linear density from `(x, density)` control points
    pub fn piecewise_linear(points: Vec<(f64, f64)>) -> Self {
        Self::PiecewiseLinear { points }
    }

    /// Generate a random smooth density from `num_control_points` points
    ///
    /// Control points are evenly spaced over [0, 1]. Heights start as
    /// `|N(0, 1)| + 0.1`, are smoothed with the `[1, 2, 1]` kernel (zero
    /// padding at both ends), floored at `1e-6`, then scaled to unit area
    /// under the interpolated curve.
    pub fn random_smooth<R: Rng + ?Sized>(rng: &mut R, num_control_points: usize) -> SimResult<Self> {
        if num_control_points < 2 {
            return Err(SimError::invalid_argument(format!(
                "a piecewise-linear density needs at least 2 control points, got {}",
                num_control_points
            )));
        }

        let raw: Vec<f64> = (0..num_control_points)
            .map(|_| {
                let z: f64 = rng.sample(StandardNormal);
                z.abs() + HEIGHT_OFFSET
            })
            .collect();

        let smoothed: Vec<f64> = (0..num_control_points)
            .map(|i| {
                let mut acc = SMOOTHING_KERNEL[1] * raw[i];
                if i > 0 {
                    acc += SMOOTHING_KERNEL[0] * raw[i - 1];
                }
                if i + 1 < num_control_points {
                    acc += SMOOTHING_KERNEL[2] * raw[i + 1];
                }
                acc.max(MIN_SMOOTHED_HEIGHT)
            })
            .collect();

        let last = (num_control_points - 1) as f64;
        let points: Vec<(f64, f64)> = smoothed
            .into_iter()
            .enumerate()
            .map(|(i, h)| (i as f64 / last, h))
            .collect();

        let area = trapezoid_area(&points);
        let points = points.into_iter().map(|(x, h)| (x, h / area)).collect();

        Ok(Self::PiecewiseLinear { points })
    }

    /// Check that the description itself is usable
    ///
    /// Sign checks happen in the sampler, which probes the density. This only
    /// rejects shapes that cannot describe a function on [0, 1].
    pub fn validate_shape(&self) -> SimResult<()> {
        match self {
            Self::Polynomial { coefficients } => {
                if coefficients.is_empty() {
                    return Err(SimError::invalid_density("polynomial has no coefficients"));
                }
                if let Some(i) = coefficients.iter().position(|a| !a.is_finite()) {
                    return Err(SimError::invalid_density(format!(
                        "coefficient a{} is not finite ({})",
                        i, coefficients[i]
                    )));
                }
            }
            Self::PiecewiseLinear { points } => {
                if points.len() < 2 {
                    return Err(SimError::invalid_density(format!(
                        "piecewise-linear density needs at least 2 control points, got {}",
                        points.len()
                    )));
                }
                if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
                    return Err(SimError::invalid_density("control points must be finite"));
                }
                if points.windows(2).any(|w| w[1].0 <= w[0].0) {
                    return Err(SimError::invalid_density(
                        "control point x values must be strictly increasing",
                    ));
                }
                let first = points[0].0;
                let last = points[points.len() - 1].0;
                if first != 0.0 || last != 1.0 {
                    return Err(SimError::invalid_density(format!(
                        "control points must span exactly [0, 1], got [{}, {}]",
                        first, last
                    )));
                }
            }
        }

        Ok(())
    }

    /// Evaluate the unnormalized density at `x`
    ///
    /// Piecewise-linear densities are only defined on their control range;
    /// `x` outside it is clamped to the nearest end point.
    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            Self::Polynomial { coefficients } => {
                // Horner's rule
                coefficients.iter().rev().fold(0.0, |acc, &a| acc * x + a)
            }
            Self::PiecewiseLinear { points } => interpolate(points, x),
        }
    }

    /// Exact integral over [0, 1]
    pub fn integral(&self) -> f64 {
        match self {
            Self::Polynomial { coefficients } => polynomial_integral(coefficients),
            Self::PiecewiseLinear { points } => trapezoid_area(points),
        }
    }

    /// Points at which the density is checked and its bound estimated
    ///
    /// Polynomials use `grid_intervals + 1` evenly spaced points. The maximum
    /// of a piecewise-linear function lies on a control point, so those are
    /// probed directly.
    pub fn probe_points(&self, grid_intervals: usize) -> Vec<f64> {
        match self {
            Self::Polynomial { .. } => {
                let intervals = grid_intervals.max(1);
                (0..=intervals).map(|i| i as f64 / intervals as f64).collect()
            }
            Self::PiecewiseLinear { points } => points.iter().map(|&(x, _)| x).collect(),
        }
    }
}

/// Analytic `∫_0^1 Σ a_i x^i dx = Σ a_i / (i + 1)`
pub fn polynomial_integral(coefficients: &[f64]) -> f64 {
    coefficients
        .iter()
        .enumerate()
        .map(|(i, a)| a / (i + 1) as f64)
        .sum()
}

/// Area under the polyline through `points`
fn trapezoid_area(points: &[(f64, f64)]) -> f64 {
    points
        .windows(2)
        .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
        .sum()
}

/// Linear interpolation through sorted control points
fn interpolate(points: &[(f64, f64)], x: f64) -> f64 {
    let (first_x, first_y) = points[0];
    let (last_x, last_y) = points[points.len() - 1];
    if x <= first_x {
        return first_y;
    }
    if x >= last_x {
        return last_y;
    }

    // First control point strictly to the right of x
    let right = points.partition_point(|&(px, _)| px <= x);
    let (x0, y0) = points[right - 1];
    let (x1, y1) = points[right];
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}
