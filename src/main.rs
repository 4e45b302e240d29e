//! dchoice CLI entry point

use anyhow::{Context, Result};
use dchoice::config::{cli::Cli, Config, ModelConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);
    cli.validate()?;

    let config = cli.load_config()?;

    dchoice::config::validator::validate_config(&config)
        .context("Configuration validation failed")?;

    print_configuration(&config);

    if cli.dry_run {
        eprintln!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    let report = dchoice::coordinator::run(&config)?;
    dchoice::output::print_report(&report, &config.output)?;

    Ok(())
}

/// Install the stderr subscriber
///
/// `DCHOICE_LOG` takes precedence; otherwise `info`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "dchoice=debug" } else { "dchoice=info" };
    let filter = EnvFilter::try_from_env("DCHOICE_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Log the resolved configuration
fn print_configuration(config: &Config) {
    match &config.model {
        ModelConfig::BallsInBins {
            num_bins,
            num_balls,
            num_trials,
            max_k,
            probes,
        } => info!(
            bins = num_bins,
            balls = num_balls,
            trials = num_trials,
            max_k,
            probes = %probes,
            "balls-into-bins configuration"
        ),
        ModelConfig::ServerLoad {
            num_servers,
            max_k,
            num_trials,
            loads,
        } => info!(
            servers = num_servers,
            trials = num_trials,
            max_k,
            loads = %loads,
            "server-load configuration"
        ),
    }
    info!(
        seed = ?config.runtime.seed,
        execution = ?config.runtime.execution,
        grid_intervals = config.runtime.grid_intervals,
        max_rejections = config.runtime.max_rejections,
        "runtime configuration"
    );
}
