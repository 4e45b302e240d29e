//! Coordinator module
//!
//! Turns a validated [`Config`] into simulations, runs them, and collects the
//! results into a [`Report`] for the output layer.

use crate::config::{Config, LoadModel, ModelConfig, ProbeMode};
use crate::distribution::density::DensitySpec;
use crate::distribution::sampler::Sampler;
use crate::distribution::sampling::rng_from_seed;
use crate::distribution::uniform::UniformLoad;
use crate::distribution::LoadSource;
use crate::engine::continuous::ContinuousSimulation;
use crate::engine::discrete::sweep_strategies;
use crate::engine::Execution;
use crate::error::SimResult;
use crate::stats::aggregator::{ContinuousSummary, DiscreteSummary};
use crate::strategy::{PlacementStrategy, ProbePolicy};
use crate::Result;
use anyhow::Context;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Mixed into the master seed for the random smooth density, so the density
/// and the trials never share a stream
const DENSITY_SEED_SALT: u64 = 0x5eed_0d15_7a1b_u64;

/// Results of one configured run
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum Report {
    BallsInBins(SweepReport),
    ServerLoad(ServerLoadReport),
}

/// Balls-into-bins results for every width
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub num_bins: usize,
    pub num_balls: u64,
    pub num_trials: usize,
    pub probes: ProbeMode,
    pub seed: Option<u64>,
    /// Width k → summary
    pub results: BTreeMap<usize, DiscreteSummary>,
}

impl SweepReport {
    /// Summary for k = 1, the uniform placement baseline
    pub fn baseline(&self) -> Option<&DiscreteSummary> {
        self.results.get(&1)
    }

    /// Occupancy a bin holds on average, `num_balls / num_bins` rounded
    pub fn mean_occupancy(&self) -> u64 {
        (self.num_balls as f64 / self.num_bins as f64).round() as u64
    }
}

/// Server-load results
#[derive(Debug, Clone, Serialize)]
pub struct ServerLoadReport {
    pub num_servers: usize,
    pub num_trials: usize,
    pub seed: Option<u64>,
    pub loads: LoadModel,
    /// Sampler diagnostics (absent for uniform loads)
    pub density: Option<DensityInfo>,
    pub summary: ContinuousSummary,
}

/// Diagnostics of the rejection sampler used for a run
#[derive(Debug, Clone, Serialize)]
pub struct DensityInfo {
    pub spec: DensitySpec,
    pub bound: f64,
    pub normalization: f64,
    pub expected_attempts: f64,
}

impl From<&Sampler> for DensityInfo {
    fn from(sampler: &Sampler) -> Self {
        Self {
            spec: sampler.spec().clone(),
            bound: sampler.bound(),
            normalization: sampler.normalization(),
            expected_attempts: sampler.expected_attempts(),
        }
    }
}

/// Run the configured model
pub fn run(config: &Config) -> Result<Report> {
    let runtime = &config.runtime;

    match &config.model {
        ModelConfig::BallsInBins {
            num_bins,
            num_balls,
            num_trials,
            max_k,
            probes,
        } => {
            let mode = *probes;
            let results = sweep_strategies(
                *num_bins,
                *num_balls,
                *num_trials,
                *max_k,
                runtime.seed,
                runtime.execution,
                |k| strategy_for(mode, k),
            )
            .context("Balls-into-bins simulation failed")?;

            Ok(Report::BallsInBins(SweepReport {
                num_bins: *num_bins,
                num_balls: *num_balls,
                num_trials: *num_trials,
                probes: mode,
                seed: runtime.seed,
                results,
            }))
        }
        ModelConfig::ServerLoad {
            num_servers,
            max_k,
            num_trials,
            loads,
        } => {
            let (density, summary) = match density_for(loads, runtime.seed)? {
                None => {
                    let summary = run_continuous(
                        *num_servers,
                        *max_k,
                        *num_trials,
                        UniformLoad,
                        runtime.seed,
                        runtime.execution,
                    )?;
                    (None, summary)
                }
                Some(spec) => {
                    let sampler = Sampler::with_grid(spec, runtime.grid_intervals)
                        .and_then(|s| s.with_max_attempts(runtime.max_rejections))
                        .with_context(|| format!("Invalid {} density", loads))?;
                    let info = DensityInfo::from(&sampler);
                    info!(
                        bound = info.bound,
                        normalization = info.normalization,
                        "sampling server loads from {}",
                        loads
                    );

                    let summary = run_continuous(
                        *num_servers,
                        *max_k,
                        *num_trials,
                        sampler,
                        runtime.seed,
                        runtime.execution,
                    )?;
                    (Some(info), summary)
                }
            };

            Ok(Report::ServerLoad(ServerLoadReport {
                num_servers: *num_servers,
                num_trials: *num_trials,
                seed: runtime.seed,
                loads: loads.clone(),
                density,
                summary,
            }))
        }
    }
}

/// Placement strategy for width `k` under a probe mode
pub fn strategy_for(mode: ProbeMode, k: usize) -> SimResult<PlacementStrategy> {
    match mode {
        ProbeMode::Classical => PlacementStrategy::classical(k),
        ProbeMode::WithReplacement => PlacementStrategy::new(k, ProbePolicy::WithReplacement),
        ProbeMode::WithoutReplacement => PlacementStrategy::new(k, ProbePolicy::WithoutReplacement),
    }
}

/// Density for a load model, `None` for plain uniform loads
pub fn density_for(loads: &LoadModel, seed: Option<u64>) -> Result<Option<DensitySpec>> {
    let spec = match loads {
        LoadModel::Uniform => return Ok(None),
        LoadModel::Polynomial { coefficients } => DensitySpec::polynomial(coefficients.clone()),
        LoadModel::PiecewiseLinear { points } => DensitySpec::piecewise_linear(points.clone()),
        LoadModel::RandomSmooth { control_points } => {
            let mut rng = rng_from_seed(seed.map(|s| s ^ DENSITY_SEED_SALT));
            DensitySpec::random_smooth(&mut rng, *control_points)
                .context("Failed to generate random smooth density")?
        }
    };

    Ok(Some(spec))
}

fn run_continuous<S: LoadSource>(
    num_servers: usize,
    max_k: usize,
    num_trials: usize,
    source: S,
    seed: Option<u64>,
    execution: Execution,
) -> Result<ContinuousSummary> {
    let summary = ContinuousSimulation::new(num_servers, max_k, num_trials, source)?
        .with_seed(seed)
        .with_execution(execution)
        .run()
        .context("Server-load simulation failed")?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OutputConfig, RuntimeConfig};
    use crate::error::SimError;

    fn config(model: ModelConfig, seed: u64) -> Config {
        Config {
            model,
            runtime: RuntimeConfig {
                seed: Some(seed),
                ..RuntimeConfig::default()
            },
            output: OutputConfig::default(),
        }
    }

    fn servers(loads: LoadModel) -> ModelConfig {
        ModelConfig::ServerLoad {
            num_servers: 50,
            max_k: 4,
            num_trials: 20,
            loads,
        }
    }

    #[test]
    fn test_balls_in_bins_sweep() {
        let model = ModelConfig::BallsInBins {
            num_bins: 10,
            num_balls: 100,
            num_trials: 3,
            max_k: 3,
            probes: ProbeMode::Classical,
        };
        let report = run(&config(model, 11)).unwrap();

        match report {
            Report::BallsInBins(sweep) => {
                assert_eq!(sweep.results.len(), 3);
                assert_eq!(sweep.mean_occupancy(), 10);
                assert_eq!(sweep.baseline().unwrap().num_trials(), 3);
            }
            other => panic!("unexpected report {:?}", other),
        }
    }

    #[test]
    fn test_uniform_loads_have_no_density() {
        match run(&config(servers(LoadModel::Uniform), 3)).unwrap() {
            Report::ServerLoad(report) => {
                assert!(report.density.is_none());
                assert_eq!(report.summary.per_k.len(), 4);
            }
            other => panic!("unexpected report {:?}", other),
        }
    }

    #[test]
    fn test_polynomial_density_info() {
        let loads = LoadModel::Polynomial { coefficients: vec![0.0, 2.0] };
        match run(&config(servers(loads), 3)).unwrap() {
            Report::ServerLoad(report) => {
                let density = report.density.unwrap();
                assert!((density.normalization - 1.0).abs() < 1e-12);
                assert!((density.bound - 2.0).abs() < 1e-12);
                assert!((density.expected_attempts - 2.0).abs() < 1e-9);
            }
            other => panic!("unexpected report {:?}", other),
        }
    }

    #[test]
    fn test_negative_density_is_rejected() {
        let loads = LoadModel::Polynomial { coefficients: vec![0.0, -1.0] };
        let err = run(&config(servers(loads), 3)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SimError>(),
            Some(SimError::InvalidDensity(_))
        ));
    }

    #[test]
    fn test_random_smooth_density_follows_seed() {
        let loads = LoadModel::RandomSmooth { control_points: 6 };
        let a = density_for(&loads, Some(8)).unwrap();
        let b = density_for(&loads, Some(8)).unwrap();
        let c = density_for(&loads, Some(9)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(density_for(&LoadModel::Uniform, Some(8)).unwrap().is_none());
    }

    #[test]
    fn test_strategy_for_modes() {
        assert_eq!(strategy_for(ProbeMode::Classical, 3).unwrap().probes(), ProbePolicy::WithoutReplacement);
        assert_eq!(strategy_for(ProbeMode::WithReplacement, 3).unwrap().probes(), ProbePolicy::WithReplacement);
        assert_eq!(strategy_for(ProbeMode::WithoutReplacement, 2).unwrap().probes(), ProbePolicy::WithoutReplacement);
        assert!(strategy_for(ProbeMode::Classical, 0).is_err());
    }
}
