//! TOML configuration file parsing

use super::cli::Cli;
use super::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Serialize a configuration back to TOML
pub fn to_toml_string(config: &Config) -> Result<String> {
    ::toml::to_string_pretty(config).context("Failed to serialize configuration")
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Result<Config> {
    if cli.model.is_some() {
        anyhow::bail!("--model cannot be combined with a configuration file; set [model] kind instead");
    }

    match &mut config.model {
        ModelConfig::BallsInBins {
            num_bins,
            num_balls,
            num_trials,
            max_k,
            probes,
        } => {
            if cli.servers.is_some() || cli.coeffs.is_some() || cli.control_points.is_some() {
                anyhow::bail!("server-load options given for a balls_in_bins configuration");
            }
            if let Some(bins) = cli.bins {
                *num_bins = bins;
            }
            if let Some(balls) = cli.balls {
                *num_balls = balls;
            }
            if let Some(trials) = cli.trials {
                *num_trials = trials;
            }
            if let Some(k) = cli.max_k {
                *max_k = k;
            }
            if let Some(mode) = cli.probes {
                *probes = mode;
            }
        }
        ModelConfig::ServerLoad {
            num_servers,
            max_k,
            num_trials,
            loads,
        } => {
            if cli.bins.is_some() || cli.balls.is_some() || cli.probes.is_some() {
                anyhow::bail!("balls-into-bins options given for a server_load configuration");
            }
            if let Some(servers) = cli.servers {
                *num_servers = servers;
            }
            if let Some(trials) = cli.trials {
                *num_trials = trials;
            }
            if let Some(k) = cli.max_k {
                *max_k = k;
            }

            // Density overrides only apply to a matching load model
            match loads {
                LoadModel::Polynomial { coefficients } => {
                    if cli.control_points.is_some() {
                        anyhow::bail!("--control-points does not apply to the polynomial load model");
                    }
                    if let Some(coeffs) = &cli.coeffs {
                        *coefficients = coeffs.clone();
                    }
                }
                LoadModel::RandomSmooth { control_points } => {
                    if cli.coeffs.is_some() {
                        anyhow::bail!("--coeffs does not apply to the random smooth load model");
                    }
                    if let Some(points) = cli.control_points {
                        *control_points = points;
                    }
                }
                _ => {
                    if cli.coeffs.is_some() || cli.control_points.is_some() {
                        anyhow::bail!("density options do not apply to the {} load model", loads);
                    }
                }
            }
        }
    }

    cli.apply_runtime(&mut config);
    Ok(config)
}
