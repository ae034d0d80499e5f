//! Run the full rate shock x deposit run grid and write one CSV row per scenario
//!
//! Grid points are evaluated in parallel against a single shared configuration.

use anyhow::Context;
use bank_stress::report::write_sweep_csv;
use bank_stress::scenario::{CapitalThresholds, ScenarioRunner, StressTestConfig, MAX_RATE_SHOCK_BPS, MAX_WITHDRAWAL_PERCENT};
use bank_stress::{CapitalStatus, ScenarioResult};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "sweep")]
#[command(about = "Stress grid over rate shocks and withdrawal percentages")]
struct Args {
    /// Rate shock step in basis points
    #[arg(long, default_value_t = 25)]
    shock_step: i32,

    /// Withdrawal step in whole percent
    #[arg(long, default_value_t = 1)]
    withdrawal_step: u32,

    /// Directory with positions.csv and balance_sheet.json (built-in reference if omitted)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Equity ($M) below which capital is reported as critical (default 5000)
    #[arg(long)]
    critical_equity: Option<f64>,

    /// Output CSV path
    #[arg(short, long, default_value = "stress_sweep_output.csv")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    anyhow::ensure!(args.shock_step > 0 && args.withdrawal_step > 0, "grid steps must be positive");

    let config = match &args.data_dir {
        Some(dir) => StressTestConfig::from_data_dir(dir)
            .with_context(|| format!("Failed to load configuration from {}", dir.display()))?,
        None => StressTestConfig::reference(),
    };
    let config = match args.critical_equity {
        Some(critical_equity) => config.with_thresholds(CapitalThresholds { critical_equity }),
        None => config,
    };
    let runner = ScenarioRunner::with_config(config);

    let shocks: Vec<i32> = (0..=MAX_RATE_SHOCK_BPS).step_by(args.shock_step as usize).collect();
    let withdrawals: Vec<f64> = (0..=MAX_WITHDRAWAL_PERCENT)
        .step_by(args.withdrawal_step as usize)
        .map(|pct| pct as f64 / 100.0)
        .collect();

    println!("Running {} x {} scenarios...", shocks.len(), withdrawals.len());
    let start = Instant::now();

    let results: Vec<ScenarioResult> = runner
        .sweep(&shocks, &withdrawals)
        .into_iter()
        .collect::<Result<_, _>>()
        .context("Sweep aborted")?;

    println!("Evaluated {} scenarios in {:?}", results.len(), start.elapsed());

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let written = write_sweep_csv(&results, BufWriter::new(file))?;
    println!("Output written to {} ({} rows)", args.output.display(), written);

    let count = |status: CapitalStatus| results.iter().filter(|r| r.capital_status == status).count();
    println!("\nGrid Summary:");
    println!("  Stable:    {}", count(CapitalStatus::Stable));
    println!("  Critical:  {}", count(CapitalStatus::Critical));
    println!("  Insolvent: {}", count(CapitalStatus::Insolvent));

    if let Some(first) = results.iter().find(|r| r.capital_status == CapitalStatus::Insolvent) {
        println!(
            "  First insolvency: +{} bps with a {:.0}% run",
            first.params.rate_shock_bps,
            first.params.withdrawal_pct * 100.0
        );
    }

    Ok(())
}
