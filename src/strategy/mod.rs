//! Placement strategies
//!
//! Strategies decide where the next unit of load goes.
//!
//! - **Discrete**: [`PlacementStrategy`] picks the bin that receives the next
//!   ball, given current occupancy. Width `k = 1` is uniform random placement;
//!   `k >= 2` is the power-of-k-choices rule (least loaded of k probes).
//! - **Continuous**: [`min_of_sampled`] picks the least loaded of `k` distinct
//!   servers whose loads were drawn at the start of the trial.
//!
//! # Probe policies
//!
//! The classical best-of-two rule draws its two probes independently, so both
//! may land on the same bin. Wider rules in the same family draw distinct
//! probes. The two are kept apart as [`ProbePolicy`] values rather than merged;
//! [`PlacementStrategy::classical`] reproduces the standard mapping.

pub mod placement;
pub mod selection;

pub use placement::{PlacementStrategy, ProbePolicy};
pub use selection::min_of_sampled;
