//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.
//!
//! A configuration names one model (balls-into-bins or server-load), the
//! runtime settings shared by every model (seed, execution, sampler limits),
//! and how results are reported.
//!
//! ```toml
//! [model]
//! kind = "server_load"
//! num_servers = 10000
//! max_k = 10
//! num_trials = 100
//!
//! [model.loads]
//! kind = "polynomial"
//! coefficients = [0.02, 0.15, 1.0]
//!
//! [runtime]
//! seed = 48
//! ```

pub mod cli;
pub mod toml;
pub mod validator;

use crate::distribution::sampler::{DEFAULT_GRID_INTERVALS, DEFAULT_MAX_ATTEMPTS};
use crate::engine::Execution;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default bins for balls-into-bins
pub const DEFAULT_BINS: usize = 100;
/// Default balls per balls-into-bins trial
pub const DEFAULT_BALLS: u64 = 100_000;
/// Default balls-into-bins trials
pub const DEFAULT_BIN_TRIALS: usize = 25;
/// Default largest width for balls-into-bins sweeps
pub const DEFAULT_BIN_MAX_K: usize = 5;
/// Default servers for server-load models
pub const DEFAULT_SERVERS: usize = 10_000;
/// Default largest width for server-load models
pub const DEFAULT_SERVER_MAX_K: usize = 10;
/// Default server-load trials
pub const DEFAULT_SERVER_TRIALS: usize = 100;
/// Default trials for the random smooth density
pub const DEFAULT_RANDOM_DENSITY_TRIALS: usize = 200;
/// Default control points for the random smooth density
pub const DEFAULT_CONTROL_POINTS: usize = 10;
/// Default polynomial density `0.02 + 0.15 x + x^2`
pub const DEFAULT_POLYNOMIAL: [f64; 3] = [0.02, 0.15, 1.0];

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Simulated model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelConfig {
    /// Discrete balls into bins, swept over widths 1..=max_k
    BallsInBins {
        num_bins: usize,
        num_balls: u64,
        num_trials: usize,
        max_k: usize,
        /// How candidate bins are probed
        #[serde(default)]
        probes: ProbeMode,
    },
    /// Continuous server loads, least loaded of k for k in 1..=max_k
    ServerLoad {
        num_servers: usize,
        max_k: usize,
        num_trials: usize,
        /// Distribution of server loads
        #[serde(default)]
        loads: LoadModel,
    },
}

/// Probe policy selection for a width sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ProbeMode {
    /// Independent probes for k = 2, distinct probes for k >= 3
    #[default]
    Classical,
    /// Independent probes for every width
    WithReplacement,
    /// Distinct probes for every width
    WithoutReplacement,
}

impl fmt::Display for ProbeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classical => write!(f, "classical"),
            Self::WithReplacement => write!(f, "with replacement"),
            Self::WithoutReplacement => write!(f, "without replacement"),
        }
    }
}

/// Distribution of continuous server loads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadModel {
    /// U(0, 1)
    Uniform,
    /// Unnormalized polynomial density on [0, 1]
    Polynomial { coefficients: Vec<f64> },
    /// Piecewise-linear density through `(x, density)` points
    PiecewiseLinear { points: Vec<(f64, f64)> },
    /// Randomly generated smooth density
    RandomSmooth {
        #[serde(default = "default_control_points")]
        control_points: usize,
    },
}

impl Default for LoadModel {
    fn default() -> Self {
        Self::Uniform
    }
}

impl fmt::Display for LoadModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => write!(f, "uniform"),
            Self::Polynomial { coefficients } => write!(f, "polynomial {:?}", coefficients),
            Self::PiecewiseLinear { points } => {
                write!(f, "piecewise-linear ({} points)", points.len())
            }
            Self::RandomSmooth { control_points } => {
                write!(f, "random smooth ({} control points)", control_points)
            }
        }
    }
}

fn default_control_points() -> usize {
    DEFAULT_CONTROL_POINTS
}

/// Settings shared by every model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Master seed (random when absent)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Sequential or parallel trials
    #[serde(default)]
    pub execution: Execution,
    /// Probe intervals for polynomial densities
    #[serde(default = "default_grid_intervals")]
    pub grid_intervals: usize,
    /// Rejection sampling proposals allowed per draw
    #[serde(default = "default_max_rejections")]
    pub max_rejections: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seed: None,
            execution: Execution::Sequential,
            grid_intervals: DEFAULT_GRID_INTERVALS,
            max_rejections: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

fn default_grid_intervals() -> usize {
    DEFAULT_GRID_INTERVALS
}

fn default_max_rejections() -> u64 {
    DEFAULT_MAX_ATTEMPTS
}

/// Report settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report format
    #[serde(default)]
    pub format: OutputFormat,
    /// Half-width of the occupancy window shown around the mean load
    #[serde(default = "default_histogram_radius")]
    pub histogram_radius: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            histogram_radius: default_histogram_radius(),
        }
    }
}

fn default_histogram_radius() -> u64 {
    10
}

/// Report format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Text,
    /// JSON document on stdout
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_defaults() {
        let runtime = RuntimeConfig::default();
        assert_eq!(runtime.seed, None);
        assert_eq!(runtime.execution, Execution::Sequential);
        assert_eq!(runtime.grid_intervals, 1000);
        assert_eq!(runtime.max_rejections, 1_000_000);
    }

    #[test]
    fn test_load_model_display() {
        assert_eq!(LoadModel::Uniform.to_string(), "uniform");
        assert_eq!(
            LoadModel::RandomSmooth { control_points: 10 }.to_string(),
            "random smooth (10 control points)"
        );
    }
}
