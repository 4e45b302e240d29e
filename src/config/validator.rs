//! Configuration validation

use super::*;
use anyhow::Result;
use tracing::warn;

/// Trials below this give noisy estimates
const FEW_TRIALS: usize = 5;

/// Largest occupancy window half-width shown in text reports
pub const MAX_HISTOGRAM_RADIUS: u64 = 1000;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    match &config.model {
        ModelConfig::BallsInBins {
            num_bins,
            num_balls,
            num_trials,
            max_k,
            probes,
        } => validate_balls_in_bins(*num_bins, *num_balls, *num_trials, *max_k, *probes)?,
        ModelConfig::ServerLoad {
            num_servers,
            max_k,
            num_trials,
            loads,
        } => validate_server_load(*num_servers, *max_k, *num_trials, loads)?,
    }

    validate_runtime(&config.runtime)?;
    validate_output(&config.output)?;

    Ok(())
}

/// Validate report settings
pub fn validate_output(output: &OutputConfig) -> Result<()> {
    if output.histogram_radius > MAX_HISTOGRAM_RADIUS {
        anyhow::bail!(
            "histogram_radius must be at most {}, got {}",
            MAX_HISTOGRAM_RADIUS,
            output.histogram_radius
        );
    }

    Ok(())
}

/// Validate a balls-into-bins sweep
pub fn validate_balls_in_bins(
    num_bins: usize,
    num_balls: u64,
    num_trials: usize,
    max_k: usize,
    probes: ProbeMode,
) -> Result<()> {
    if num_bins == 0 {
        anyhow::bail!("num_bins must be at least 1");
    }
    if num_balls == 0 {
        anyhow::bail!("num_balls must be at least 1");
    }
    validate_counts(num_trials, max_k)?;

    // Distinct probes need at least k bins
    let largest_distinct = match probes {
        ProbeMode::WithReplacement => None,
        ProbeMode::WithoutReplacement if max_k >= 2 => Some(max_k),
        ProbeMode::Classical if max_k >= 3 => Some(max_k),
        _ => None,
    };
    if let Some(k) = largest_distinct {
        if k > num_bins {
            anyhow::bail!(
                "max_k ({}) exceeds num_bins ({}) with {} probes",
                k,
                num_bins,
                probes
            );
        }
    }

    if num_balls < num_bins as u64 {
        warn!(num_balls, num_bins, "fewer balls than bins, most bins stay empty");
    }

    Ok(())
}

/// Validate a server-load simulation
pub fn validate_server_load(
    num_servers: usize,
    max_k: usize,
    num_trials: usize,
    loads: &LoadModel,
) -> Result<()> {
    if num_servers == 0 {
        anyhow::bail!("num_servers must be at least 1");
    }
    validate_counts(num_trials, max_k)?;

    if max_k > num_servers {
        anyhow::bail!("max_k ({}) exceeds num_servers ({})", max_k, num_servers);
    }

    validate_load_model(loads)
}

/// Validate the load distribution parameters
///
/// Only checks what is visible without probing the density; negativity and
/// zero mass are caught when the sampler is built.
pub fn validate_load_model(loads: &LoadModel) -> Result<()> {
    match loads {
        LoadModel::Uniform => {}
        LoadModel::Polynomial { coefficients } => {
            if coefficients.is_empty() {
                anyhow::bail!("polynomial density needs at least one coefficient");
            }
            if let Some(c) = coefficients.iter().find(|c| !c.is_finite()) {
                anyhow::bail!("polynomial coefficients must be finite, got {}", c);
            }
        }
        LoadModel::PiecewiseLinear { points } => {
            if points.len() < 2 {
                anyhow::bail!(
                    "piecewise-linear density needs at least 2 points, got {}",
                    points.len()
                );
            }
        }
        LoadModel::RandomSmooth { control_points } => {
            if *control_points < 2 {
                anyhow::bail!(
                    "random smooth density needs at least 2 control points, got {}",
                    control_points
                );
            }
        }
    }

    Ok(())
}

/// Validate runtime settings
pub fn validate_runtime(runtime: &RuntimeConfig) -> Result<()> {
    if runtime.grid_intervals == 0 {
        anyhow::bail!("grid_intervals must be at least 1");
    }
    if runtime.max_rejections == 0 {
        anyhow::bail!("max_rejections must be at least 1");
    }

    if runtime.seed.is_none() {
        warn!("no seed given, results will not be reproducible");
    }

    Ok(())
}

fn validate_counts(num_trials: usize, max_k: usize) -> Result<()> {
    if num_trials == 0 {
        anyhow::bail!("num_trials must be at least 1");
    }
    if max_k == 0 {
        anyhow::bail!("max_k must be at least 1");
    }
    if num_trials < FEW_TRIALS {
        warn!(num_trials, "few trials, estimates will be noisy");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bins(num_bins: usize, max_k: usize, probes: ProbeMode) -> Config {
        Config {
            model: ModelConfig::BallsInBins {
                num_bins,
                num_balls: 100,
                num_trials: 10,
                max_k,
                probes,
            },
            runtime: RuntimeConfig::default(),
            output: OutputConfig::default(),
        }
    }

    fn servers(num_servers: usize, max_k: usize, loads: LoadModel) -> Config {
        Config {
            model: ModelConfig::ServerLoad {
                num_servers,
                max_k,
                num_trials: 10,
                loads,
            },
            runtime: RuntimeConfig::default(),
            output: OutputConfig::default(),
        }
    }

    #[test]
    fn test_valid_configs() {
        assert!(validate_config(&bins(100, 5, ProbeMode::Classical)).is_ok());
        assert!(validate_config(&servers(100, 10, LoadModel::Uniform)).is_ok());
    }

    #[test]
    fn test_probe_mode_limits_width() {
        // Two bins: k = 2 with replacement is fine, k = 3 distinct is not
        assert!(validate_config(&bins(2, 2, ProbeMode::Classical)).is_ok());
        assert!(validate_config(&bins(2, 3, ProbeMode::Classical)).is_err());
        assert!(validate_config(&bins(2, 3, ProbeMode::WithReplacement)).is_ok());
        assert!(validate_config(&bins(1, 2, ProbeMode::WithoutReplacement)).is_err());
    }

    #[test]
    fn test_zero_counts() {
        assert!(validate_config(&bins(0, 1, ProbeMode::Classical)).is_err());
        assert!(validate_config(&bins(10, 0, ProbeMode::Classical)).is_err());
        assert!(validate_config(&servers(0, 1, LoadModel::Uniform)).is_err());
        assert!(validate_config(&servers(5, 6, LoadModel::Uniform)).is_err());
    }

    #[test]
    fn test_load_models() {
        let empty = LoadModel::Polynomial { coefficients: vec![] };
        assert!(validate_config(&servers(10, 2, empty)).is_err());

        let nan = LoadModel::Polynomial { coefficients: vec![f64::NAN] };
        assert!(validate_config(&servers(10, 2, nan)).is_err());

        let one_point = LoadModel::PiecewiseLinear { points: vec![(0.0, 1.0)] };
        assert!(validate_config(&servers(10, 2, one_point)).is_err());

        let smooth = LoadModel::RandomSmooth { control_points: 1 };
        assert!(validate_config(&servers(10, 2, smooth)).is_err());
    }

    #[test]
    fn test_histogram_radius_bounded() {
        let mut config = bins(100, 2, ProbeMode::Classical);
        config.output.histogram_radius = MAX_HISTOGRAM_RADIUS;
        assert!(validate_config(&config).is_ok());

        config.output.histogram_radius = u64::MAX;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("histogram_radius"));
    }

    #[test]
    fn test_runtime_limits() {
        let mut config = servers(10, 2, LoadModel::Uniform);
        config.runtime.grid_intervals = 0;
        assert!(validate_config(&config).is_err());

        let mut config = servers(10, 2, LoadModel::Uniform);
        config.runtime.max_rejections = 0;
        assert!(validate_config(&config).is_err());
    }
}
