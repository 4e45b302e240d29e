//! Random sampling primitives
//!
//! Uniform index draws and sampling without replacement. These are the only
//! randomness consumed by placement strategies and by the sampler's proposal
//! step, and they all take the generator explicitly.
//!
//! # Performance
//!
//! The default generator is xoshiro256++, which is fast and has good
//! statistical properties. Placement draws one or more indices per ball, so
//! this sits on the hot path of every discrete simulation.

use crate::error::{SimError, SimResult};
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Generator used by the simulation engine
pub type SimRng = Xoshiro256PlusPlus;

/// Create the simulation generator
///
/// With a seed the sequence is reproducible; without one the generator is
/// seeded from OS entropy.
pub fn rng_from_seed(seed: Option<u64>) -> SimRng {
    match seed {
        Some(seed) => SimRng::seed_from_u64(seed),
        None => SimRng::from_entropy(),
    }
}

/// Uniform integer in `[0, n)`
///
/// # Panics
///
/// Panics if `n == 0`. Simulation constructors reject empty populations
/// before any trial runs.
#[inline(always)]
pub fn uniform_index<R: Rng + ?Sized>(rng: &mut R, n: usize) -> usize {
    rng.gen_range(0..n)
}

/// Uniform real in `[0, 1)`
#[inline(always)]
pub fn uniform_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>()
}

/// Sample `k` distinct indices from `[0, n)`
///
/// Every k-subset is equally likely and the indices come back in random
/// order. Fails with `InvalidArgument` when `k > n`.
pub fn sample_without_replacement<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    k: usize,
) -> SimResult<Vec<usize>> {
    if k > n {
        return Err(SimError::invalid_argument(format!(
            "cannot sample {} distinct indices from a population of {}",
            k, n
        )));
    }

    Ok(rand::seq::index::sample(rng, n, k).into_vec())
}
