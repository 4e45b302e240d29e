//! Rejection sampler over a [`DensitySpec`]
//!
//! The sampler draws i.i.d. values from the normalized version of an
//! unnormalized density on [0, 1]:
//!
//! 1. propose `x ~ U(0, 1)`
//! 2. propose `u ~ U(0, M)` where `M` bounds the density
//! 3. accept `x` if `u <= p(x)`, otherwise retry
//!
//! The expected number of proposals per draw is `M / Z`, with `Z` the
//! integral of the density over [0, 1].
//!
//! # Bound precision
//!
//! `M` is the largest value seen on the probe grid. For piecewise-linear
//! densities this is exact. For polynomials a peak between two probe points
//! can exceed `M`; draws near that peak are then slightly under-represented.
//! A finer grid shrinks the error at a linear cost in construction time.
//!
//! # Termination
//!
//! The loop terminates with probability one whenever `Z > 0`, but the number
//! of proposals is unbounded. Each draw gives up after `max_attempts`
//! proposals with [`SimError::RejectionLimit`].
//!
//! # Example
//!
//! ```
//! use dchoice::distribution::density::DensitySpec;
//! use dchoice::distribution::sampler::Sampler;
//! use dchoice::distribution::sampling::rng_from_seed;
//!
//! let sampler = Sampler::new(DensitySpec::polynomial(vec![0.0, 2.0])).unwrap();
//! let mut rng = rng_from_seed(Some(1));
//! let x = sampler.draw(&mut rng).unwrap();
//! assert!((0.0..1.0).contains(&x));
//! ```

use super::density::DensitySpec;
use super::sampling::uniform_unit;
use super::LoadSource;
use crate::error::{SimError, SimResult};
use rand::Rng;

/// Default number of probe intervals for polynomial densities
pub const DEFAULT_GRID_INTERVALS: usize = 1000;

/// Default proposal budget per draw
pub const DEFAULT_MAX_ATTEMPTS: u64 = 1_000_000;

/// Probed values below this are treated as negative
const NEGATIVE_TOLERANCE: f64 = -1e-12;

/// Rejection sampler bound to one density
///
/// Immutable after construction; drawing only mutates the caller's generator.
#[derive(Debug, Clone)]
pub struct Sampler {
    /// Density being sampled
    spec: DensitySpec,

    /// Upper bound used for the vertical proposal
    bound: f64,

    /// Integral of the density over [0, 1]
    normalization: f64,

    /// Proposals allowed per draw
    max_attempts: u64,
}

impl Sampler {
    /// Build a sampler with the default probe grid
    pub fn new(spec: DensitySpec) -> SimResult<Self> {
        Self::with_grid(spec, DEFAULT_GRID_INTERVALS)
    }

    /// Build a sampler probing polynomials at `grid_intervals + 1` points
    ///
    /// Fails with `InvalidDensity` if any probed value is negative, if every
    /// probed value is zero or below, or if a polynomial integrates to a
    /// non-positive value over [0, 1].
    pub fn with_grid(spec: DensitySpec, grid_intervals: usize) -> SimResult<Self> {
        if grid_intervals == 0 {
            return Err(SimError::invalid_argument("grid_intervals must be at least 1"));
        }
        spec.validate_shape()?;

        let normalization = spec.integral();
        if matches!(spec, DensitySpec::Polynomial { .. }) && normalization <= 0.0 {
            return Err(SimError::invalid_density(format!(
                "polynomial integral over [0, 1] must be positive, got {}",
                normalization
            )));
        }

        if !normalization.is_finite() {
            return Err(SimError::invalid_density(format!(
                "density integral over [0, 1] is not finite ({})",
                normalization
            )));
        }

        let mut bound: f64 = 0.0;
        for x in spec.probe_points(grid_intervals) {
            let value = spec.evaluate(x);
            if !value.is_finite() {
                return Err(SimError::invalid_density(format!(
                    "density is not finite at x={} ({})",
                    x, value
                )));
            }
            if value < NEGATIVE_TOLERANCE {
                return Err(SimError::invalid_density(format!(
                    "density must be non-negative on [0, 1], got {} at x={}",
                    value, x
                )));
            }
            bound = bound.max(value);
        }

        if bound <= 0.0 {
            return Err(SimError::invalid_density("density is zero everywhere on [0, 1]"));
        }

        tracing::debug!(
            bound,
            normalization,
            expected_attempts = bound / normalization,
            "built rejection sampler"
        );

        Ok(Self {
            spec,
            bound,
            normalization,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    /// Override the proposal budget per draw
    pub fn with_max_attempts(mut self, max_attempts: u64) -> SimResult<Self> {
        if max_attempts == 0 {
            return Err(SimError::invalid_argument("max_attempts must be at least 1"));
        }
        self.max_attempts = max_attempts;
        Ok(self)
    }

    /// Draw one value from the normalized density
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> SimResult<f64> {
        for _ in 0..self.max_attempts {
            let x = uniform_unit(rng);
            let u = uniform_unit(rng) * self.bound;
            if u <= self.spec.evaluate(x) {
                return Ok(x);
            }
        }

        Err(SimError::RejectionLimit {
            attempts: self.max_attempts,
            bound: self.bound,
        })
    }

    /// Unbounded lazy sequence of draws
    ///
    /// Calling this again starts a fresh sequence on the same generator.
    pub fn samples<'a, R: Rng + ?Sized>(&'a self, rng: &'a mut R) -> Samples<'a, R> {
        Samples { sampler: self, rng }
    }

    /// Density being sampled
    pub fn spec(&self) -> &DensitySpec {
        &self.spec
    }

    /// Upper bound `M` used for the vertical proposal
    pub fn bound(&self) -> f64 {
        self.bound
    }

    /// Integral `Z` of the density over [0, 1]
    pub fn normalization(&self) -> f64 {
        self.normalization
    }

    /// Expected proposals per accepted draw, `M / Z`
    pub fn expected_attempts(&self) -> f64 {
        self.bound / self.normalization
    }

    /// Proposal budget per draw
    pub fn max_attempts(&self) -> u64 {
        self.max_attempts
    }
}

impl LoadSource for Sampler {
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> SimResult<f64> {
        Sampler::draw(self, rng)
    }
}

/// Iterator over draws from a [`Sampler`]
pub struct Samples<'a, R: ?Sized> {
    sampler: &'a Sampler,
    rng: &'a mut R,
}

impl<R: Rng + ?Sized> Iterator for Samples<'_, R> {
    type Item = SimResult<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.sampler.draw(self.rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::sampling::rng_from_seed;

    fn empirical_mean(sampler: &Sampler, n: usize, seed: u64) -> f64 {
        let mut rng = rng_from_seed(Some(seed));
        let draws: Vec<f64> = sampler
            .samples(&mut rng)
            .take(n)
            .collect::<SimResult<_>>()
            .unwrap();
        draws.iter().sum::<f64>() / n as f64
    }

    #[test]
    fn test_uniform_density_mean() {
        let sampler = Sampler::new(DensitySpec::polynomial(vec![1.0])).unwrap();
        assert_eq!(sampler.bound(), 1.0);
        assert!((sampler.expected_attempts() - 1.0).abs() < 1e-12);

        let mean = empirical_mean(&sampler, 10000, 42);
        assert!((mean - 0.5).abs() < 0.02, "mean {} too far from 0.5", mean);
    }

    #[test]
    fn test_linear_density() {
        let sampler = Sampler::new(DensitySpec::polynomial(vec![0.0, 2.0])).unwrap();
        assert!((sampler.normalization() - 1.0).abs() < 1e-12);
        assert!((sampler.bound() - 2.0).abs() < 1e-12);

        let mean = empirical_mean(&sampler, 10000, 7);
        assert!((mean - 2.0 / 3.0).abs() < 0.02, "mean {} too far from 2/3", mean);
    }

    #[test]
    fn test_negative_density_rejected() {
        let err = Sampler::new(DensitySpec::polynomial(vec![0.0, -1.0])).unwrap_err();
        assert!(matches!(err, SimError::InvalidDensity(_)));
    }

    #[test]
    fn test_negative_between_positive_regions() {
        // (2x - 1)^2 - 0.01 dips below zero around x = 0.5
        let coeffs = vec![0.99, -4.0, 4.0];
        let err = Sampler::new(DensitySpec::polynomial(coeffs)).unwrap_err();
        assert!(matches!(err, SimError::InvalidDensity(_)));
    }

    #[test]
    fn test_zero_density_rejected() {
        let err = Sampler::new(DensitySpec::polynomial(vec![0.0])).unwrap_err();
        assert!(matches!(err, SimError::InvalidDensity(_)));

        let err = Sampler::new(DensitySpec::piecewise_linear(vec![(0.0, 0.0), (1.0, 0.0)]))
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidDensity(_)));
    }

    #[test]
    fn test_negative_control_point_rejected() {
        let spec = DensitySpec::piecewise_linear(vec![(0.0, 1.0), (0.5, -0.5), (1.0, 1.0)]);
        let err = Sampler::new(spec).unwrap_err();
        assert!(matches!(err, SimError::InvalidDensity(_)));
    }

    #[test]
    fn test_piecewise_density_mean() {
        // Triangle peaking at 1: same shape as p(x) = 2x
        let spec = DensitySpec::piecewise_linear(vec![(0.0, 0.0), (1.0, 2.0)]);
        let sampler = Sampler::new(spec).unwrap();
        assert_eq!(sampler.bound(), 2.0);

        let mean = empirical_mean(&sampler, 10000, 11);
        assert!((mean - 2.0 / 3.0).abs() < 0.02, "mean {} too far from 2/3", mean);
    }

    #[test]
    fn test_draws_stay_in_unit_interval() {
        let mut rng = rng_from_seed(Some(48));
        let spec = DensitySpec::random_smooth(&mut rng, 10).unwrap();
        let sampler = Sampler::new(spec).unwrap();

        for x in sampler.samples(&mut rng).take(1000) {
            let x = x.unwrap();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_rejection_limit() {
        // Narrow spike: almost every proposal is rejected
        let spec = DensitySpec::piecewise_linear(vec![
            (0.0, 0.0),
            (0.5, 0.0),
            (0.500001, 1.0),
            (0.500002, 0.0),
            (1.0, 0.0),
        ]);
        let sampler = Sampler::new(spec).unwrap().with_max_attempts(3).unwrap();
        let mut rng = rng_from_seed(Some(1));

        let err = sampler.draw(&mut rng).unwrap_err();
        assert_eq!(err, SimError::RejectionLimit { attempts: 3, bound: 1.0 });
    }

    #[test]
    fn test_overflowing_density_rejected() {
        // Finite coefficients whose values overflow near x = 1
        let err = Sampler::new(DensitySpec::polynomial(vec![1e308, 1e308])).unwrap_err();
        assert!(matches!(err, SimError::InvalidDensity(_)));

        let err = Sampler::new(DensitySpec::polynomial(vec![f64::MAX, f64::MAX, f64::MAX])).unwrap_err();
        assert!(matches!(err, SimError::InvalidDensity(_)));
    }

    #[test]
    fn test_invalid_parameters() {
        let spec = DensitySpec::polynomial(vec![1.0]);
        assert!(Sampler::with_grid(spec.clone(), 0).is_err());
        assert!(Sampler::new(spec).unwrap().with_max_attempts(0).is_err());
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let sampler = Sampler::new(DensitySpec::polynomial(vec![0.02, 0.15, 1.0])).unwrap();
        let mut rng1 = rng_from_seed(Some(5));
        let mut rng2 = rng_from_seed(Some(5));

        for _ in 0..20 {
            assert_eq!(sampler.draw(&mut rng1).unwrap(), sampler.draw(&mut rng2).unwrap());
        }
    }
}
