//! CLI argument parsing using clap

use super::*;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// Model selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelKind {
    /// Balls into bins, swept over k = 1..=max_k
    Bins,
    /// Server loads drawn from U(0, 1)
    Uniform,
    /// Server loads drawn from a polynomial density
    Polynomial,
    /// Server loads drawn from a random smooth density
    Wiggly,
}

/// dchoice - Power-of-d-choices load placement simulator
#[derive(Parser, Debug)]
#[command(name = "dchoice")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Model to simulate (defaults to bins when no config file is given)
    #[arg(short = 'm', long, value_enum)]
    pub model: Option<ModelKind>,

    /// TOML configuration file (command-line values take precedence)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    // === Model Options ===
    /// Number of bins (balls-into-bins)
    #[arg(short = 'n', long)]
    pub bins: Option<usize>,

    /// Balls thrown per trial (balls-into-bins)
    #[arg(short = 'b', long)]
    pub balls: Option<u64>,

    /// Number of servers (server-load models)
    #[arg(short = 's', long)]
    pub servers: Option<usize>,

    /// Number of independent trials
    #[arg(short = 't', long)]
    pub trials: Option<usize>,

    /// Largest selection width k
    #[arg(short = 'k', long)]
    pub max_k: Option<usize>,

    /// Probe policy for balls-into-bins
    #[arg(long, value_enum)]
    pub probes: Option<ProbeMode>,

    // === Density Options ===
    /// Polynomial coefficients a0,a1,... (comma-separated)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub coeffs: Option<Vec<f64>>,

    /// Control points for the random smooth density
    #[arg(long)]
    pub control_points: Option<usize>,

    /// Probe intervals used to bound polynomial densities
    #[arg(long)]
    pub grid_intervals: Option<usize>,

    /// Rejection sampling proposals allowed per draw
    #[arg(long)]
    pub max_rejections: Option<u64>,

    // === Runtime Options ===
    /// Master random seed
    #[arg(long, env = "DCHOICE_SEED")]
    pub seed: Option<u64>,

    /// Run trials in parallel
    #[arg(long)]
    pub parallel: bool,

    // === Output Options ===
    /// Report format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Validate configuration and exit without running
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> Result<()> {
        if self.trials == Some(0) {
            anyhow::bail!("trials must be at least 1");
        }
        if self.max_k == Some(0) {
            anyhow::bail!("max_k must be at least 1");
        }

        if let Some(model) = self.model {
            let server_model = model != ModelKind::Bins;
            if server_model && (self.bins.is_some() || self.balls.is_some()) {
                anyhow::bail!("--bins and --balls only apply to the bins model");
            }
            if !server_model && self.servers.is_some() {
                anyhow::bail!("--servers only applies to server-load models");
            }
            if self.coeffs.is_some() && model != ModelKind::Polynomial {
                anyhow::bail!("--coeffs only applies to the polynomial model");
            }
            if self.control_points.is_some() && model != ModelKind::Wiggly {
                anyhow::bail!("--control-points only applies to the wiggly model");
            }
        }

        Ok(())
    }

    /// Build a configuration from CLI arguments alone
    ///
    /// Unset values fall back to the per-model defaults.
    pub fn to_config(&self) -> Result<Config> {
        let model = match self.model.unwrap_or(ModelKind::Bins) {
            ModelKind::Bins => ModelConfig::BallsInBins {
                num_bins: self.bins.unwrap_or(DEFAULT_BINS),
                num_balls: self.balls.unwrap_or(DEFAULT_BALLS),
                num_trials: self.trials.unwrap_or(DEFAULT_BIN_TRIALS),
                max_k: self.max_k.unwrap_or(DEFAULT_BIN_MAX_K),
                probes: self.probes.unwrap_or_default(),
            },
            kind => {
                let (loads, default_trials) = match kind {
                    ModelKind::Polynomial => (
                        LoadModel::Polynomial {
                            coefficients: self
                                .coeffs
                                .clone()
                                .unwrap_or_else(|| DEFAULT_POLYNOMIAL.to_vec()),
                        },
                        DEFAULT_SERVER_TRIALS,
                    ),
                    ModelKind::Wiggly => (
                        LoadModel::RandomSmooth {
                            control_points: self.control_points.unwrap_or(DEFAULT_CONTROL_POINTS),
                        },
                        DEFAULT_RANDOM_DENSITY_TRIALS,
                    ),
                    _ => (LoadModel::Uniform, DEFAULT_SERVER_TRIALS),
                };

                ModelConfig::ServerLoad {
                    num_servers: self.servers.unwrap_or(DEFAULT_SERVERS),
                    max_k: self.max_k.unwrap_or(DEFAULT_SERVER_MAX_K),
                    num_trials: self.trials.unwrap_or(default_trials),
                    loads,
                }
            }
        };

        let mut config = Config {
            model,
            runtime: RuntimeConfig::default(),
            output: OutputConfig::default(),
        };
        self.apply_runtime(&mut config);

        Ok(config)
    }

    /// Load the configuration file if given, otherwise build from arguments
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => {
                let config = super::toml::parse_toml_file(path)?;
                super::toml::merge_cli_with_config(self, config)
                    .with_context(|| format!("Failed to apply CLI overrides to {}", path.display()))
            }
            None => self.to_config(),
        }
    }

    /// Copy runtime and output overrides into `config`
    pub(crate) fn apply_runtime(&self, config: &mut Config) {
        if let Some(seed) = self.seed {
            config.runtime.seed = Some(seed);
        }
        if self.parallel {
            config.runtime.execution = Execution::Parallel;
        }
        if let Some(intervals) = self.grid_intervals {
            config.runtime.grid_intervals = intervals;
        }
        if let Some(max) = self.max_rejections {
            config.runtime.max_rejections = max;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
    }
}
