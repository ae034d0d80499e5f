//! Bank Stress CLI
//!
//! Evaluates one rate shock / deposit run scenario and prints the result

use anyhow::Context;
use bank_stress::report::{render_table, write_positions_csv};
use bank_stress::scenario::{CapitalThresholds, ScenarioParameters, ScenarioRunner, StressTestConfig};
use bank_stress::portfolio::load_positions;
use bank_stress::BalanceSheet;
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;

/// Stress a bank's securities book with a rate hike and a deposit run
#[derive(Parser)]
#[command(name = "bank_stress")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Interest rate hike in basis points
    #[arg(short, long, default_value_t = 300, value_parser = clap::value_parser!(i32).range(0..=500))]
    rate_shock_bps: i32,

    /// Deposits withdrawn, in whole percent
    #[arg(short, long, default_value_t = 25, value_parser = clap::value_parser!(u32).range(0..=50))]
    withdrawal_pct: u32,

    /// Position catalog CSV (defaults to the built-in reference book)
    #[arg(long)]
    positions: Option<PathBuf>,

    /// Balance sheet JSON (defaults to the built-in YE 2022 figures)
    #[arg(long)]
    balance_sheet: Option<PathBuf>,

    /// Equity ($M) below which capital is reported as critical (default 5000)
    #[arg(long)]
    critical_equity: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable table
    Table,
    /// Full result bundle as JSON
    Json,
    /// Per-position valuation as CSV
    Csv,
}

fn load_config(cli: &Cli) -> anyhow::Result<StressTestConfig> {
    let mut config = StressTestConfig::reference();

    if let Some(path) = &cli.positions {
        config.positions = load_positions(path)
            .with_context(|| format!("Failed to load positions from {}", path.display()))?;
    }
    if let Some(path) = &cli.balance_sheet {
        config.balance_sheet = BalanceSheet::from_json_path(path)
            .with_context(|| format!("Failed to load balance sheet from {}", path.display()))?;
    }
    if let Some(critical_equity) = cli.critical_equity {
        anyhow::ensure!(critical_equity.is_finite(), "--critical-equity must be a finite amount");
        config = config.with_thresholds(CapitalThresholds { critical_equity });
    }

    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let as_of = config.balance_sheet.as_of;
    let runner = ScenarioRunner::with_config(config);

    let params = ScenarioParameters::from_percent(cli.rate_shock_bps, cli.withdrawal_pct);
    let result = runner.run(&params).context("Scenario evaluation failed")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.format {
        OutputFormat::Table => {
            writeln!(out, "Bank Stress v{}", env!("CARGO_PKG_VERSION"))?;
            writeln!(out, "Balance sheet as of {}", as_of)?;
            writeln!(out, "======================\n")?;
            render_table(&result, &mut out)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &result)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_positions_csv(&result, &mut out)?,
    }

    Ok(())
}
