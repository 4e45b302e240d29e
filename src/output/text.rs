//! Human-readable text output

use crate::coordinator::{strategy_for, Report, ServerLoadReport, SweepReport};
use crate::Result;
use anyhow::Context;
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════";

/// Print a report to stdout
pub fn print_report(report: &Report, histogram_radius: u64) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, report, histogram_radius).context("Failed to write report")
}

/// Write a report as text
///
/// Balls-into-bins reports list the average maximum load per width, its
/// improvement over uniform placement, and the occupancy distribution within
/// `histogram_radius` of the mean occupancy. Server-load reports list the
/// expected chosen load per width and its reduction relative to k = 1.
pub fn write_report<W: Write>(out: &mut W, report: &Report, histogram_radius: u64) -> io::Result<()> {
    match report {
        Report::BallsInBins(sweep) => write_sweep(out, sweep, histogram_radius),
        Report::ServerLoad(servers) => write_server_load(out, servers),
    }
}

fn write_sweep<W: Write>(out: &mut W, sweep: &SweepReport, radius: u64) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "                  BALLS INTO BINS")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out)?;
    writeln!(out, "Bins:   {}", format_number(sweep.num_bins as u64))?;
    writeln!(out, "Balls:  {} per trial", format_number(sweep.num_balls))?;
    writeln!(out, "Trials: {}", sweep.num_trials)?;
    writeln!(out, "Probes: {}", sweep.probes)?;
    writeln!(out, "Seed:   {}", format_seed(sweep.seed))?;
    writeln!(out)?;

    writeln!(out, "Maximum load:")?;
    writeln!(
        out,
        "  {:>3}  {:<36} {:>10} {:>8} {:>12}",
        "k", "Strategy", "Avg max", "Std", "Improvement"
    )?;
    for (&k, summary) in &sweep.results {
        let name = strategy_for(sweep.probes, k)
            .map(|s| s.to_string())
            .unwrap_or_else(|_| format!("k={}", k));
        let improvement = match sweep.baseline() {
            Some(baseline) if k > 1 => format!("{:.2}%", summary.improvement_over(baseline)),
            _ => "-".to_string(),
        };
        writeln!(
            out,
            "  {:>3}  {:<36} {:>10.2} {:>8.3} {:>12}",
            k, name, summary.avg_max_load, summary.std_max_load, improvement
        )?;
    }
    writeln!(out)?;

    let center = sweep.mean_occupancy();
    let windows: Vec<(usize, Vec<(u64, f64)>)> = sweep
        .results
        .iter()
        .map(|(&k, summary)| (k, summary.histogram().window(center, radius)))
        .collect();

    writeln!(
        out,
        "Occupancy distribution within {} ± {}:",
        format_number(center),
        radius
    )?;
    write!(out, "  {:>10}", "Load")?;
    for (k, _) in &windows {
        write!(out, " {:>8}", format!("k={}", k))?;
    }
    writeln!(out)?;

    let rows = windows.first().map(|(_, w)| w.len()).unwrap_or(0);
    for row in 0..rows {
        let occupancy = windows[0].1[row].0;
        write!(out, "  {:>10}", occupancy)?;
        for (_, window) in &windows {
            write!(out, " {:>8.4}", window[row].1)?;
        }
        writeln!(out)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", RULE)?;

    Ok(())
}

fn write_server_load<W: Write>(out: &mut W, report: &ServerLoadReport) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "                    SERVER LOAD")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out)?;
    writeln!(out, "Servers: {}", format_number(report.num_servers as u64))?;
    writeln!(out, "Trials:  {}", report.num_trials)?;
    writeln!(out, "Loads:   {}", report.loads)?;
    writeln!(out, "Seed:    {}", format_seed(report.seed))?;

    if let Some(density) = &report.density {
        writeln!(
            out,
            "Density: bound {:.4}, normalization {:.4}, {:.2} proposals per draw",
            density.bound, density.normalization, density.expected_attempts
        )?;
    }
    writeln!(out)?;

    let reductions = report.summary.reduction_from_baseline();
    writeln!(out, "Expected chosen load:")?;
    writeln!(out, "  {:>3}  {:>10} {:>10} {:>10}", "k", "E[load]", "Std", "Reduction")?;
    for (&k, load) in &report.summary.per_k {
        let reduction = reductions.get(&k).copied().unwrap_or(0.0);
        writeln!(
            out,
            "  {:>3}  {:>10.5} {:>10.5} {:>9.2}%",
            k, load.mean, load.std_dev, reduction
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{}", RULE)?;

    Ok(())
}

fn format_seed(seed: Option<u64>) -> String {
    match seed {
        Some(seed) => seed.to_string(),
        None => "random".to_string(),
    }
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();

    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result.chars().rev().collect()
}
