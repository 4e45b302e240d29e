//! Random load generation
//!
//! This module provides the randomness consumed by the simulation engine:
//! the sampling primitives used by placement strategies, and the load sources
//! that produce one continuous load per server at the start of each trial.
//!
//! # Load sources
//!
//! - **Uniform**: loads drawn from U(0, 1)
//! - **Sampler**: loads drawn by rejection sampling from an arbitrary
//!   non-negative density on [0, 1] (polynomial or piecewise-linear)
//!
//! # Explicit randomness
//!
//! Nothing in this module owns a generator. Every draw takes the caller's
//! `rand::Rng`, so a single seeded [`sampling::SimRng`] reproduces a whole
//! simulation and independent trials can run on independent generators.
//!
//! # Example
//!
//! ```
//! use dchoice::distribution::{LoadSource, uniform::UniformLoad, sampling::rng_from_seed};
//!
//! let mut rng = rng_from_seed(Some(7));
//! let loads = UniformLoad.draw_loads(16, &mut rng).unwrap();
//! assert_eq!(loads.len(), 16);
//! assert!(loads.iter().all(|&x| (0.0..1.0).contains(&x)));
//! ```

use crate::error::SimResult;
use rand::Rng;

/// Source of continuous server loads
///
/// Implementations are immutable values; all state lives in the generator
/// passed to [`LoadSource::draw`]. `Sync` lets trials share one source when
/// they run in parallel.
pub trait LoadSource: Sync {
    /// Draw a single load
    ///
    /// Only rejection-based sources can fail, and only with
    /// [`crate::error::SimError::RejectionLimit`].
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> SimResult<f64>;

    /// Draw one load per server
    fn draw_loads<R: Rng + ?Sized>(&self, num_servers: usize, rng: &mut R) -> SimResult<Vec<f64>> {
        (0..num_servers).map(|_| self.draw(&mut *rng)).collect()
    }
}

pub mod density;
pub mod sampler;
pub mod sampling;
pub mod uniform;
