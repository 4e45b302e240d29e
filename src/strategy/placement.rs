//! Discrete ball placement

use crate::distribution::sampling::{sample_without_replacement, uniform_index};
use crate::error::{SimError, SimResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the k candidate bins of one placement are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbePolicy {
    /// k independent uniform draws; candidates may coincide
    WithReplacement,
    /// k distinct bins; requires k <= number of bins
    WithoutReplacement,
}

impl fmt::Display for ProbePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WithReplacement => write!(f, "with replacement"),
            Self::WithoutReplacement => write!(f, "without replacement"),
        }
    }
}

/// Best-of-k ball placement
///
/// Each ball probes `k` bins and lands in the least loaded one. Ties go to
/// the first probe drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementStrategy {
    k: usize,
    probes: ProbePolicy,
}

impl PlacementStrategy {
    /// Strategy with an explicit width and probe policy
    pub fn new(k: usize, probes: ProbePolicy) -> SimResult<Self> {
        if k == 0 {
            return Err(SimError::invalid_argument("selection width k must be at least 1"));
        }
        Ok(Self { k, probes })
    }

    /// Uniform random placement (k = 1)
    pub fn uniform() -> Self {
        Self {
            k: 1,
            probes: ProbePolicy::WithReplacement,
        }
    }

    /// Best of two independent probes
    pub fn best_of_two() -> Self {
        Self {
            k: 2,
            probes: ProbePolicy::WithReplacement,
        }
    }

    /// Standard family: uniform for k = 1, best-of-two with independent
    /// probes for k = 2, distinct probes for k >= 3
    pub fn classical(k: usize) -> SimResult<Self> {
        let probes = if k <= 2 {
            ProbePolicy::WithReplacement
        } else {
            ProbePolicy::WithoutReplacement
        };
        Self::new(k, probes)
    }

    /// Selection width
    pub fn k(&self) -> usize {
        self.k
    }

    /// Probe policy
    pub fn probes(&self) -> ProbePolicy {
        self.probes
    }

    /// Check that this strategy can run on `num_bins` bins
    pub fn validate_for(&self, num_bins: usize) -> SimResult<()> {
        if num_bins == 0 {
            return Err(SimError::invalid_argument("number of bins must be at least 1"));
        }
        if self.k > 1 && self.probes == ProbePolicy::WithoutReplacement && self.k > num_bins {
            return Err(SimError::invalid_argument(format!(
                "k ({}) exceeds number of bins ({}) for distinct probes",
                self.k, num_bins
            )));
        }
        Ok(())
    }

    /// Choose the bin for the next ball without placing it
    pub fn choose_bin<R: Rng + ?Sized>(&self, bins: &[u64], rng: &mut R) -> SimResult<usize> {
        let n = bins.len();
        if n == 0 {
            return Err(SimError::invalid_argument("cannot place into an empty population"));
        }

        if self.k == 1 {
            return Ok(uniform_index(rng, n));
        }

        let chosen = match self.probes {
            ProbePolicy::WithReplacement => {
                let mut best = uniform_index(rng, n);
                for _ in 1..self.k {
                    let probe = uniform_index(rng, n);
                    if bins[probe] < bins[best] {
                        best = probe;
                    }
                }
                best
            }
            ProbePolicy::WithoutReplacement => {
                let probes = sample_without_replacement(rng, n, self.k)?;
                least_loaded(bins, &probes)
            }
        };

        Ok(chosen)
    }

    /// Place one ball and return the bin it landed in
    pub fn place<R: Rng + ?Sized>(&self, bins: &mut [u64], rng: &mut R) -> SimResult<usize> {
        let target = self.choose_bin(bins, rng)?;
        bins[target] += 1;
        Ok(target)
    }
}

impl fmt::Display for PlacementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.k {
            1 => write!(f, "random (k=1)"),
            k => write!(f, "best of {} (k={}, {})", k, k, self.probes),
        }
    }
}

/// First probe with the strictly smallest occupancy
fn least_loaded(bins: &[u64], probes: &[usize]) -> usize {
    let mut best = probes[0];
    for &probe in &probes[1..] {
        if bins[probe] < bins[best] {
            best = probe;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::sampling::rng_from_seed;

    #[test]
    fn test_classical_policies() {
        assert_eq!(PlacementStrategy::classical(1).unwrap(), PlacementStrategy::uniform());
        assert_eq!(PlacementStrategy::classical(2).unwrap(), PlacementStrategy::best_of_two());
        let s = PlacementStrategy::classical(3).unwrap();
        assert_eq!(s.k(), 3);
        assert_eq!(s.probes(), ProbePolicy::WithoutReplacement);
        assert!(PlacementStrategy::classical(0).is_err());
    }

    #[test]
    fn test_validate_for() {
        let s = PlacementStrategy::new(5, ProbePolicy::WithoutReplacement).unwrap();
        assert!(s.validate_for(5).is_ok());
        assert!(matches!(s.validate_for(4), Err(SimError::InvalidArgument(_))));

        // Independent probes may exceed the population
        let s = PlacementStrategy::new(5, ProbePolicy::WithReplacement).unwrap();
        assert!(s.validate_for(2).is_ok());
        assert!(s.validate_for(0).is_err());
    }

    #[test]
    fn test_least_loaded_tie_break() {
        let bins = [3, 1, 1, 0, 2];
        assert_eq!(least_loaded(&bins, &[0, 2, 1]), 2);
        assert_eq!(least_loaded(&bins, &[4, 3, 0]), 3);
        assert_eq!(least_loaded(&bins, &[0]), 0);
    }

    #[test]
    fn test_full_width_picks_global_minimum() {
        // Probing every bin without replacement always finds the emptiest
        let mut rng = rng_from_seed(Some(3));
        let s = PlacementStrategy::new(4, ProbePolicy::WithoutReplacement).unwrap();
        let bins = [5, 2, 7, 9];
        for _ in 0..50 {
            assert_eq!(s.choose_bin(&bins, &mut rng).unwrap(), 1);
        }
    }

    #[test]
    fn test_full_width_keeps_bins_level() {
        let mut rng = rng_from_seed(Some(8));
        let s = PlacementStrategy::new(10, ProbePolicy::WithoutReplacement).unwrap();
        let mut bins = vec![0u64; 10];
        for _ in 0..95 {
            s.place(&mut bins, &mut rng).unwrap();
        }
        let max = *bins.iter().max().unwrap();
        let min = *bins.iter().min().unwrap();
        assert!(max - min <= 1, "bins not level: {:?}", bins);
    }

    #[test]
    fn test_place_increments_once() {
        let mut rng = rng_from_seed(Some(1));
        for s in [
            PlacementStrategy::uniform(),
            PlacementStrategy::best_of_two(),
            PlacementStrategy::classical(3).unwrap(),
        ] {
            let mut bins = vec![0u64; 7];
            let target = s.place(&mut bins, &mut rng).unwrap();
            assert_eq!(bins.iter().sum::<u64>(), 1);
            assert_eq!(bins[target], 1);
        }
    }

    #[test]
    fn test_distinct_probes_need_enough_bins() {
        let mut rng = rng_from_seed(Some(1));
        let s = PlacementStrategy::new(3, ProbePolicy::WithoutReplacement).unwrap();
        let mut bins = vec![0u64; 2];
        assert!(s.place(&mut bins, &mut rng).is_err());
    }

    #[test]
    fn test_empty_population() {
        let mut rng = rng_from_seed(Some(1));
        let mut bins: Vec<u64> = Vec::new();
        assert!(PlacementStrategy::uniform().place(&mut bins, &mut rng).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(PlacementStrategy::uniform().to_string(), "random (k=1)");
        assert_eq!(
            PlacementStrategy::best_of_two().to_string(),
            "best of 2 (k=2, with replacement)"
        );
    }
}
