//! Simulation engine errors
//!
//! Every error is raised eagerly: configuration and densities are checked when
//! a simulation or sampler is constructed, before any trial runs. The only
//! error that can surface mid-run is [`SimError::RejectionLimit`], a diagnostic
//! for a density whose probed bound badly overestimates its true maximum.

/// Errors produced by the simulation core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// Malformed configuration (counts, widths, sample sizes).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Density that is negative somewhere, identically zero, or malformed.
    #[error("invalid density: {0}")]
    InvalidDensity(String),

    /// Rejection sampling gave up after too many proposals.
    #[error("rejection sampling exceeded {attempts} attempts (density bound {bound})")]
    RejectionLimit { attempts: u64, bound: f64 },
}

impl SimError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn invalid_density(msg: impl Into<String>) -> Self {
        Self::InvalidDensity(msg.into())
    }
}

/// Result type for the simulation core
pub type SimResult<T> = std::result::Result<T, SimError>;
