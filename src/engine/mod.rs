//! Trial engine
//!
//! Runs independent randomized trials and feeds their outcomes to the
//! aggregators. Each trial moves through three phases:
//!
//! 1. **Init**: fresh state (zeroed bins, or freshly drawn server loads)
//! 2. **Place/draw**: repeated strategy applications
//! 3. **Finalize**: capture the trial outcome
//!
//! # Models
//!
//! - [`discrete::DiscreteSimulation`]: balls into bins under a placement
//!   strategy; outcome is the terminal occupancy vector
//! - [`continuous::ContinuousSimulation`]: least-loaded selection among k
//!   servers with continuous loads; outcome is the minimum for every k
//!
//! # Reproducibility
//!
//! The master generator (seeded or from entropy) draws one seed per trial up
//! front, and every trial runs on its own generator built from that seed. No
//! trial observes another's state, so sequential and parallel execution give
//! identical results for the same seed. Outcomes are collected in trial order
//! before aggregation.

pub mod continuous;
pub mod discrete;

use crate::distribution::sampling::{rng_from_seed, SimRng};
use crate::error::{SimError, SimResult};
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// How trials are scheduled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Execution {
    /// One trial after another on the calling thread
    #[default]
    Sequential,
    /// Trials spread over the rayon thread pool
    Parallel,
}

/// Draw one seed per trial from the master generator
pub(crate) fn trial_seeds(seed: Option<u64>, num_trials: usize) -> Vec<u64> {
    let mut master = rng_from_seed(seed);
    (0..num_trials).map(|_| master.gen()).collect()
}

/// Run `trial` once per seed and collect the outcomes in trial order
pub(crate) fn run_trials<T, F>(seeds: &[u64], execution: Execution, trial: F) -> SimResult<Vec<T>>
where
    T: Send,
    F: Fn(usize, &mut SimRng) -> SimResult<T> + Sync,
{
    let run_one = |(index, &seed): (usize, &u64)| {
        let mut rng = SimRng::seed_from_u64(seed);
        trial(index, &mut rng)
    };

    match execution {
        Execution::Sequential => seeds.iter().enumerate().map(run_one).collect(),
        Execution::Parallel => seeds.par_iter().enumerate().map(run_one).collect(),
    }
}

/// Shared check for trial counts
pub(crate) fn validate_trials(num_trials: usize) -> SimResult<()> {
    if num_trials == 0 {
        return Err(SimError::invalid_argument("number of trials must be at least 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trial_seeds_reproducible() {
        assert_eq!(trial_seeds(Some(9), 5), trial_seeds(Some(9), 5));
        assert_ne!(trial_seeds(Some(9), 5), trial_seeds(Some(10), 5));
        assert_eq!(trial_seeds(None, 3).len(), 3);
    }

    #[test]
    fn test_run_trials_order_independent_of_execution() {
        let seeds = trial_seeds(Some(1), 64);
        let trial = |index: usize, rng: &mut SimRng| -> SimResult<(usize, u64)> {
            Ok((index, rng.gen::<u64>()))
        };

        let sequential = run_trials(&seeds, Execution::Sequential, trial).unwrap();
        let parallel = run_trials(&seeds, Execution::Parallel, trial).unwrap();
        assert_eq!(sequential, parallel);
        assert!(sequential.iter().enumerate().all(|(i, &(idx, _))| i == idx));
    }

    #[test]
    fn test_run_trials_propagates_error() {
        let seeds = trial_seeds(Some(1), 4);
        let result: SimResult<Vec<()>> = run_trials(&seeds, Execution::Sequential, |index, _| {
            if index == 2 {
                Err(SimError::invalid_argument("boom"))
            } else {
                Ok(())
            }
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_trials() {
        assert!(validate_trials(0).is_err());
        assert!(validate_trials(1).is_ok());
    }
}
