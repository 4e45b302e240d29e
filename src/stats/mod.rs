//! Statistics collection
//!
//! Reduces per-trial outcomes into summary statistics.
//!
//! - **Running moments**: mean and population standard deviation accumulated
//!   one trial at a time ([`RunningStats`])
//! - **Trial aggregation**: discrete and continuous aggregators producing
//!   the simulation summaries ([`aggregator`])
//! - **Occupancy histogram**: flattened empirical distribution of per-bin
//!   counts across all trials ([`histogram`])
//!
//! Trials are always folded in trial order, so results do not depend on
//! which trial finished first when trials run in parallel.
//!
//! # Example
//!
//! ```
//! use dchoice::stats::RunningStats;
//!
//! let mut stats = RunningStats::new();
//! for x in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
//!     stats.record(x);
//! }
//! assert!((stats.mean() - 5.0).abs() < 1e-12);
//! assert!((stats.std_dev() - 2.0).abs() < 1e-12);
//! ```

pub mod aggregator;
pub mod histogram;

use serde::{Deserialize, Serialize};

/// Mean and variance accumulator (Welford's method)
///
/// Standard deviation is the population form (divides by the number of
/// samples), matching how trial spread is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningStats {
    /// Number of samples
    count: u64,

    /// Running mean
    mean: f64,

    /// Sum of squared deviations from the running mean
    m2: f64,

    /// Smallest sample
    min: f64,

    /// Largest sample
    max: f64,
}

impl RunningStats {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Record one sample
    #[inline]
    pub fn record(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);

        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Number of samples
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Check if no samples were recorded
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Mean of the samples (0 when empty)
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance (0 when empty)
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.m2 / self.count as f64
        }
    }

    /// Population standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Smallest sample, if any
    pub fn min(&self) -> Option<f64> {
        (!self.is_empty()).then_some(self.min)
    }

    /// Largest sample, if any
    pub fn max(&self) -> Option<f64> {
        (!self.is_empty()).then_some(self.max)
    }
}
