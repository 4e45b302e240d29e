//! Trial aggregation
//!
//! Aggregators collect per-trial outcomes in trial order and reduce them into
//! summaries once all trials are in.
//!
//! # Discrete
//!
//! Keeps every terminal occupancy vector (needed for histograms) and reduces
//! the per-trial maxima into mean and standard deviation, plus the
//! element-wise mean occupancy per bin.
//!
//! # Continuous
//!
//! For each selection width k, reduces the per-trial minimum loads into the
//! Monte Carlo estimate of `E[min of k loads]` and its spread.
//!
//! # Example
//!
//! ```
//! use dchoice::stats::aggregator::DiscreteAggregator;
//!
//! let mut aggregator = DiscreteAggregator::new(3);
//! aggregator.add_trial(vec![2, 0, 1]);
//! aggregator.add_trial(vec![1, 1, 1]);
//!
//! let summary = aggregator.summarize();
//! assert_eq!(summary.max_loads, vec![2, 1]);
//! assert_eq!(summary.avg_max_load, 1.5);
//! assert_eq!(summary.avg_distribution, vec![1.5, 0.5, 1.0]);
//! ```

use super::histogram::OccupancyHistogram;
use super::RunningStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of a discrete (balls-in-bins) simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteSummary {
    /// Maximum occupancy of each trial
    pub max_loads: Vec<u64>,
    /// Mean of `max_loads`
    pub avg_max_load: f64,
    /// Population standard deviation of `max_loads`
    pub std_max_load: f64,
    /// Terminal occupancy vector of each trial
    pub load_distributions: Vec<Vec<u64>>,
    /// Element-wise mean occupancy per bin
    pub avg_distribution: Vec<f64>,
}

impl DiscreteSummary {
    /// Number of trials summarized
    pub fn num_trials(&self) -> usize {
        self.max_loads.len()
    }

    /// Flattened per-bin occupancy distribution over all trials
    pub fn histogram(&self) -> OccupancyHistogram {
        OccupancyHistogram::from_distributions(&self.load_distributions)
    }

    /// Percentage reduction of the average max load relative to `baseline`
    pub fn improvement_over(&self, baseline: &DiscreteSummary) -> f64 {
        if baseline.avg_max_load == 0.0 {
            return 0.0;
        }
        (baseline.avg_max_load - self.avg_max_load) / baseline.avg_max_load * 100.0
    }
}

/// Collects discrete trial outcomes
#[derive(Debug, Clone)]
pub struct DiscreteAggregator {
    num_bins: usize,
    max_loads: Vec<u64>,
    distributions: Vec<Vec<u64>>,
}

impl DiscreteAggregator {
    /// Create an aggregator for trials over `num_bins` bins
    pub fn new(num_bins: usize) -> Self {
        Self {
            num_bins,
            max_loads: Vec::new(),
            distributions: Vec::new(),
        }
    }

    /// Add the terminal occupancy of one trial
    ///
    /// # Panics
    ///
    /// Panics if the vector length differs from the configured bin count.
    pub fn add_trial(&mut self, bins: Vec<u64>) {
        let max_load = bins.iter().copied().max().unwrap_or(0);
        self.add_trial_with_max(bins, max_load);
    }

    /// Add one trial whose maximum occupancy is already known
    ///
    /// # Panics
    ///
    /// Panics if the vector length differs from the configured bin count.
    pub fn add_trial_with_max(&mut self, bins: Vec<u64>, max_load: u64) {
        assert_eq!(bins.len(), self.num_bins, "occupancy vector has wrong length");
        debug_assert_eq!(bins.iter().copied().max().unwrap_or(0), max_load);
        self.max_loads.push(max_load);
        self.distributions.push(bins);
    }

    /// Number of trials added
    pub fn num_trials(&self) -> usize {
        self.distributions.len()
    }

    /// Reduce all trials into a summary
    pub fn summarize(self) -> DiscreteSummary {
        let mut avg_distribution = vec![0.0; self.num_bins];
        for bins in &self.distributions {
            for (acc, &count) in avg_distribution.iter_mut().zip(bins) {
                *acc += count as f64;
            }
        }
        if !self.distributions.is_empty() {
            let trials = self.distributions.len() as f64;
            for acc in &mut avg_distribution {
                *acc /= trials;
            }
        }

        let mut stats = RunningStats::new();
        for &max in &self.max_loads {
            stats.record(max as f64);
        }

        DiscreteSummary {
            max_loads: self.max_loads,
            avg_max_load: stats.mean(),
            std_max_load: stats.std_dev(),
            load_distributions: self.distributions,
            avg_distribution,
        }
    }
}

/// Expected chosen load for one selection width
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChosenLoad {
    /// Mean of the per-trial minimum loads
    pub mean: f64,
    /// Population standard deviation of the per-trial minimum loads
    pub std_dev: f64,
}

/// Summary of a continuous (server-load) simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousSummary {
    /// Number of trials summarized
    pub num_trials: usize,
    /// Selection width k → expected chosen load
    pub per_k: BTreeMap<usize, ChosenLoad>,
}

impl ContinuousSummary {
    /// Selection width k → mean chosen load
    pub fn expected_loads(&self) -> BTreeMap<usize, f64> {
        self.per_k.iter().map(|(&k, load)| (k, load.mean)).collect()
    }

    /// Selection width k → percentage reduction relative to the smallest k
    pub fn reduction_from_baseline(&self) -> BTreeMap<usize, f64> {
        let baseline = match self.per_k.values().next() {
            Some(load) if load.mean != 0.0 => load.mean,
            _ => return self.per_k.keys().map(|&k| (k, 0.0)).collect(),
        };

        self.per_k
            .iter()
            .map(|(&k, load)| (k, (baseline - load.mean) / baseline * 100.0))
            .collect()
    }
}

/// Collects continuous trial outcomes
#[derive(Debug, Clone)]
pub struct ContinuousAggregator {
    per_k: Vec<RunningStats>,
}

impl ContinuousAggregator {
    /// Create an aggregator for widths `1..=max_k`
    pub fn new(max_k: usize) -> Self {
        Self {
            per_k: vec![RunningStats::new(); max_k],
        }
    }

    /// Add one trial's minimum loads, indexed by `k - 1`
    ///
    /// # Panics
    ///
    /// Panics if the number of values differs from `max_k`.
    pub fn add_trial(&mut self, min_loads: &[f64]) {
        assert_eq!(min_loads.len(), self.per_k.len(), "expected one minimum per k");
        for (stats, &value) in self.per_k.iter_mut().zip(min_loads) {
            stats.record(value);
        }
    }

    /// Number of trials added
    pub fn num_trials(&self) -> usize {
        self.per_k.first().map(|s| s.count() as usize).unwrap_or(0)
    }

    /// Reduce all trials into a summary
    pub fn summarize(self) -> ContinuousSummary {
        let num_trials = self.num_trials();
        let per_k = self
            .per_k
            .into_iter()
            .enumerate()
            .map(|(i, stats)| {
                (
                    i + 1,
                    ChosenLoad {
                        mean: stats.mean(),
                        std_dev: stats.std_dev(),
                    },
                )
            })
            .collect();

        ContinuousSummary { num_trials, per_k }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discrete_empty() {
        let summary = DiscreteAggregator::new(4).summarize();
        assert_eq!(summary.num_trials(), 0);
        assert_eq!(summary.avg_max_load, 0.0);
        assert_eq!(summary.avg_distribution, vec![0.0; 4]);
    }

    #[test]
    fn test_discrete_summary() {
        let mut aggregator = DiscreteAggregator::new(4);
        aggregator.add_trial(vec![3, 0, 1, 0]);
        aggregator.add_trial(vec![1, 1, 1, 1]);
        aggregator.add_trial(vec![0, 2, 0, 2]);
        assert_eq!(aggregator.num_trials(), 3);

        let summary = aggregator.summarize();
        assert_eq!(summary.max_loads, vec![3, 1, 2]);
        assert!((summary.avg_max_load - 2.0).abs() < 1e-12);
        // Population std of [3, 1, 2]
        assert!((summary.std_max_load - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(summary.load_distributions.len(), 3);

        let expected = [4.0 / 3.0, 1.0, 2.0 / 3.0, 1.0];
        for (got, want) in summary.avg_distribution.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    #[should_panic(expected = "wrong length")]
    fn test_discrete_wrong_length() {
        let mut aggregator = DiscreteAggregator::new(3);
        aggregator.add_trial(vec![1, 2]);
    }

    #[test]
    fn test_discrete_known_max() {
        let mut aggregator = DiscreteAggregator::new(3);
        aggregator.add_trial_with_max(vec![4, 1, 0], 4);
        aggregator.add_trial_with_max(vec![2, 2, 1], 2);

        let summary = aggregator.summarize();
        assert_eq!(summary.max_loads, vec![4, 2]);
        assert!((summary.avg_max_load - 3.0).abs() < 1e-12);
        assert!((summary.std_max_load - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_discrete_histogram() {
        let mut aggregator = DiscreteAggregator::new(2);
        aggregator.add_trial(vec![2, 0]);
        aggregator.add_trial(vec![1, 1]);
        let h = aggregator.summarize().histogram();
        assert_eq!(h.len(), 4);
        assert_eq!(h.count(1), 2);
    }

    #[test]
    fn test_improvement_over() {
        let mut a = DiscreteAggregator::new(1);
        a.add_trial(vec![10]);
        let baseline = a.summarize();

        let mut b = DiscreteAggregator::new(1);
        b.add_trial(vec![8]);
        let better = b.summarize();

        assert!((better.improvement_over(&baseline) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_continuous_summary() {
        let mut aggregator = ContinuousAggregator::new(3);
        aggregator.add_trial(&[0.6, 0.4, 0.2]);
        aggregator.add_trial(&[0.4, 0.2, 0.2]);
        assert_eq!(aggregator.num_trials(), 2);

        let summary = aggregator.summarize();
        assert_eq!(summary.num_trials, 2);
        assert_eq!(summary.per_k.len(), 3);
        assert!((summary.per_k[&1].mean - 0.5).abs() < 1e-12);
        assert!((summary.per_k[&1].std_dev - 0.1).abs() < 1e-12);
        assert!((summary.per_k[&3].mean - 0.2).abs() < 1e-12);
        assert!(summary.per_k[&3].std_dev.abs() < 1e-12);

        let reduction = summary.reduction_from_baseline();
        assert!(reduction[&1].abs() < 1e-12);
        assert!((reduction[&3] - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_continuous_empty() {
        let summary = ContinuousAggregator::new(2).summarize();
        assert_eq!(summary.num_trials, 0);
        assert_eq!(summary.reduction_from_baseline().values().sum::<f64>(), 0.0);
    }
}
