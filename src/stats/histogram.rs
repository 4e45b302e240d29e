//! Occupancy histogram
//!
//! Flattens the per-bin counts of every trial into one empirical
//! distribution: how likely is a bin to end a trial holding exactly `c`
//! balls. Power-of-k strategies concentrate this mass tightly around the
//! mean load; uniform placement spreads it out.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Empirical distribution of per-bin occupancy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OccupancyHistogram {
    /// Occupancy value → number of bins observed with it
    counts: BTreeMap<u64, u64>,

    /// Total number of bins recorded
    total: u64,
}

impl OccupancyHistogram {
    /// Create an empty histogram
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a set of occupancy vectors
    pub fn from_distributions<'a, I>(distributions: I) -> Self
    where
        I: IntoIterator<Item = &'a Vec<u64>>,
    {
        let mut histogram = Self::new();
        for bins in distributions {
            histogram.record_bins(bins);
        }
        histogram
    }

    /// Record every bin of one trial
    pub fn record_bins(&mut self, bins: &[u64]) {
        for &occupancy in bins {
            *self.counts.entry(occupancy).or_insert(0) += 1;
        }
        self.total += bins.len() as u64;
    }

    /// Number of bins recorded
    pub fn len(&self) -> u64 {
        self.total
    }

    /// Check if histogram is empty
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of bins observed holding exactly `occupancy` balls
    pub fn count(&self, occupancy: u64) -> u64 {
        self.counts.get(&occupancy).copied().unwrap_or(0)
    }

    /// Fraction of all bins holding exactly `occupancy` balls
    pub fn probability(&self, occupancy: u64) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(occupancy) as f64 / self.total as f64
    }

    /// Smallest and largest occupancy observed
    pub fn range(&self) -> Option<(u64, u64)> {
        let min = *self.counts.keys().next()?;
        let max = *self.counts.keys().next_back()?;
        Some((min, max))
    }

    /// Probability mass for each occupancy in `center ± radius`
    ///
    /// Mass is normalized over the window, so values sum to one whenever any
    /// observation falls inside it. Occupancies with no observations appear
    /// with probability zero.
    pub fn window(&self, center: u64, radius: u64) -> Vec<(u64, f64)> {
        let lo = center.saturating_sub(radius);
        let hi = center.saturating_add(radius);
        let in_window: u64 = self.counts.range(lo..=hi).map(|(_, &c)| c).sum();

        (lo..=hi)
            .map(|occupancy| {
                let p = if in_window == 0 {
                    0.0
                } else {
                    self.count(occupancy) as f64 / in_window as f64
                };
                (occupancy, p)
            })
            .collect()
    }

    /// Iterate over `(occupancy, count)` in ascending occupancy
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.counts.iter().map(|(&k, &v)| (k, v))
    }
}
