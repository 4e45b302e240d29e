//! Continuous server-load simulation
//!
//! Each trial draws one load per server from a [`LoadSource`], then for every
//! width `k` in `1..=max_k` samples `k` distinct servers and records the
//! smallest load among them. Averaged over trials this estimates
//! `E[min of k loads]`, the load seen by a least-loaded-of-k dispatcher.

use super::{run_trials, trial_seeds, validate_trials, Execution};
use crate::distribution::LoadSource;
use crate::error::{SimError, SimResult};
use crate::stats::aggregator::{ContinuousAggregator, ContinuousSummary};
use crate::strategy::min_of_sampled;
use rand::Rng;
use tracing::{debug, info};

/// Outcome of one continuous trial
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousTrial {
    /// Minimum sampled load for each width, indexed by `k - 1`
    pub min_loads: Vec<f64>,
}

/// Configured server-load simulation
#[derive(Debug, Clone)]
pub struct ContinuousSimulation<S> {
    num_servers: usize,
    max_k: usize,
    num_trials: usize,
    source: S,
    seed: Option<u64>,
    execution: Execution,
}

impl<S: LoadSource> ContinuousSimulation<S> {
    /// Create a simulation
    ///
    /// Fails with `InvalidArgument` for zero servers, widths or trials, or
    /// when `max_k` exceeds the number of servers.
    pub fn new(num_servers: usize, max_k: usize, num_trials: usize, source: S) -> SimResult<Self> {
        if num_servers == 0 {
            return Err(SimError::invalid_argument("number of servers must be at least 1"));
        }
        if max_k == 0 {
            return Err(SimError::invalid_argument("max_k must be at least 1"));
        }
        if max_k > num_servers {
            return Err(SimError::invalid_argument(format!(
                "max_k ({}) exceeds number of servers ({})",
                max_k, num_servers
            )));
        }
        validate_trials(num_trials)?;

        Ok(Self {
            num_servers,
            max_k,
            num_trials,
            source,
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

    /// Load source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Largest selection width
    pub fn max_k(&self) -> usize {
        self.max_k
    }

    /// Run one trial on the given generator
    pub fn run_trial<R: Rng + ?Sized>(&self, rng: &mut R) -> SimResult<ContinuousTrial> {
        let loads = self.source.draw_loads(self.num_servers, rng)?;

        let min_loads = (1..=self.max_k)
            .map(|k| min_of_sampled(&loads, k, &mut *rng))
            .collect::<SimResult<Vec<_>>>()?;

        Ok(ContinuousTrial { min_loads })
    }

    /// Run every trial and summarize
    pub fn run(&self) -> SimResult<ContinuousSummary> {
        info!(
            servers = self.num_servers,
            max_k = self.max_k,
            trials = self.num_trials,
            execution = ?self.execution,
            "starting server-load simulation"
        );

        let seeds = trial_seeds(self.seed, self.num_trials);
        let trials = run_trials(&seeds, self.execution, |index, rng| {
            let trial = self.run_trial(rng)?;
            debug!(trial = index, "trial finished");
            Ok(trial)
        })?;

        let mut aggregator = ContinuousAggregator::new(self.max_k);
        for trial in &trials {
            aggregator.add_trial(&trial.min_loads);
        }
        let summary = aggregator.summarize();

        if let (Some(first), Some(last)) = (summary.per_k.values().next(), summary.per_k.values().last()) {
            info!(
                k1_load = first.mean,
                max_k_load = last.mean,
                "server-load simulation finished"
            );
        }

        Ok(summary)
    }
}
