//! Balls-into-bins simulation
//!
//! Each trial throws `num_balls` balls into `num_bins` empty bins, one at a
//! time, using a [`PlacementStrategy`]. The trial outcome is the terminal
//! occupancy vector and its maximum.
//!
//! # Example
//!
//! ```
//! use dchoice::engine::discrete::DiscreteSimulation;
//! use dchoice::strategy::PlacementStrategy;
//!
//! let sim = DiscreteSimulation::new(10, 50, 4, PlacementStrategy::best_of_two())
//!     .unwrap()
//!     .with_seed(Some(1));
//! let summary = sim.run().unwrap();
//! assert_eq!(summary.num_trials(), 4);
//! assert!(summary.load_distributions.iter().all(|bins| bins.iter().sum::<u64>() == 50));
//! ```

use super::{run_trials, trial_seeds, validate_trials, Execution};
use crate::error::{SimError, SimResult};
use crate::stats::aggregator::{DiscreteAggregator, DiscreteSummary};
use crate::strategy::PlacementStrategy;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Outcome of one discrete trial
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscreteTrial {
    /// Terminal occupancy per bin
    pub bins: Vec<u64>,
    /// Largest occupancy
    pub max_load: u64,
}

/// Configured balls-into-bins simulation
///
/// All parameters are validated by [`DiscreteSimulation::new`], so a run can
/// only fail if the strategy itself fails mid-trial.
#[derive(Debug, Clone)]
pub struct DiscreteSimulation {
    num_bins: usize,
    num_balls: u64,
    num_trials: usize,
    strategy: PlacementStrategy,
    seed: Option<u64>,
    execution: Execution,
}

impl DiscreteSimulation {
    /// Create a simulation
    ///
    /// Fails with `InvalidArgument` for zero bins, balls or trials, or when
    /// the strategy needs more distinct probes than there are bins.
    pub fn new(
        num_bins: usize,
        num_balls: u64,
        num_trials: usize,
        strategy: PlacementStrategy,
    ) -> SimResult<Self> {
        if num_bins == 0 {
            return Err(SimError::invalid_argument("number of bins must be at least 1"));
        }
        if num_balls == 0 {
            return Err(SimError::invalid_argument("number of balls must be at least 1"));
        }
        validate_trials(num_trials)?;
        strategy.validate_for(num_bins)?;

        Ok(Self {
            num_bins,
            num_balls,
            num_trials,
            strategy,
            seed: None,
            execution: Execution::Sequential,
        })
    }

    /// Seed the master generator (`None` seeds from entropy)
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Choose sequential or parallel trial execution
    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Placement strategy
    pub fn strategy(&self) -> PlacementStrategy {
        self.strategy
    }

    /// Number of bins
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    /// Balls per trial
    pub fn num_balls(&self) -> u64 {
        self.num_balls
    }

    /// Number of trials
    pub fn num_trials(&self) -> usize {
        self.num_trials
    }

    /// Run one trial on the given generator
    pub fn run_trial<R: Rng + ?Sized>(&self, rng: &mut R) -> SimResult<DiscreteTrial> {
        let mut bins = vec![0u64; self.num_bins];

        for _ in 0..self.num_balls {
            self.strategy.place(&mut bins, rng)?;
        }

        let max_load = bins.iter().copied().max().unwrap_or(0);
        Ok(DiscreteTrial { bins, max_load })
    }

    /// Run every trial and summarize
    pub fn run(&self) -> SimResult<DiscreteSummary> {
        info!(
            strategy = %self.strategy,
            bins = self.num_bins,
            balls = self.num_balls,
            trials = self.num_trials,
            execution = ?self.execution,
            "starting balls-into-bins simulation"
        );

        let seeds = trial_seeds(self.seed, self.num_trials);
        let trials = run_trials(&seeds, self.execution, |index, rng| {
            let trial = self.run_trial(rng)?;
            debug!(trial = index, max_load = trial.max_load, "trial finished");
            Ok(trial)
        })?;

        let mut aggregator = DiscreteAggregator::new(self.num_bins);
        for trial in trials {
            aggregator.add_trial_with_max(trial.bins, trial.max_load);
        }
        let summary = aggregator.summarize();

        info!(
            strategy = %self.strategy,
            avg_max_load = summary.avg_max_load,
            std_max_load = summary.std_max_load,
            "balls-into-bins simulation finished"
        );

        Ok(summary)
    }
}

/// Run one strategy per width `1..=max_k`
///
/// `strategy_for` maps a width to its strategy, e.g.
/// [`PlacementStrategy::classical`]. Every simulation is validated before the
/// first one runs. Width `k` uses the master seed offset by `k`, so each
/// width has its own reproducible stream.
pub fn sweep_strategies<F>(
    num_bins: usize,
    num_balls: u64,
    num_trials: usize,
    max_k: usize,
    seed: Option<u64>,
    execution: Execution,
    strategy_for: F,
) -> SimResult<BTreeMap<usize, DiscreteSummary>>
where
    F: Fn(usize) -> SimResult<PlacementStrategy>,
{
    if max_k == 0 {
        return Err(SimError::invalid_argument("max_k must be at least 1"));
    }

    let simulations = (1..=max_k)
        .map(|k| {
            let strategy = strategy_for(k)?;
            Ok((
                k,
                DiscreteSimulation::new(num_bins, num_balls, num_trials, strategy)?
                    .with_seed(seed.map(|s| s.wrapping_add(k as u64)))
                    .with_execution(execution),
            ))
        })
        .collect::<SimResult<Vec<_>>>()?;

    simulations
        .into_iter()
        .map(|(k, sim)| Ok((k, sim.run()?)))
        .collect()
}
