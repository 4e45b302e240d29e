//! dchoice - Power-of-d-choices load placement simulator
//!
//! Monte Carlo estimates of how much "sample k candidates, pick the least
//! loaded" improves load balance.
//!
//! # Models
//!
//! - **Balls into bins**: throw m balls into n bins with a best-of-k
//!   placement strategy and measure the maximum occupancy
//! - **Server load**: draw one continuous load per server from a density on
//!   [0, 1] and measure the expected load of the least loaded of k sampled
//!   servers
//!
//! # Architecture
//!
//! - **distribution**: sampling primitives, densities, rejection sampler
//! - **strategy**: placement and selection rules
//! - **engine**: trial loops, sequential or parallel
//! - **stats**: aggregation into summaries and histograms
//! - **config / coordinator / output**: the command-line shell
//!
//! Every random choice is drawn from an explicitly passed generator, so a
//! seed reproduces a run exactly.

pub mod config;
pub mod coordinator;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod output;
pub mod stats;
pub mod strategy;

// Re-export commonly used types
pub use config::Config;
pub use error::{SimError, SimResult};

/// Result type used by the configuration and reporting layers
pub type Result<T> = anyhow::Result<T>;
