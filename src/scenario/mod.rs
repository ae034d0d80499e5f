//! Scenario runner for single, batch and grid stress evaluations
//!
//! Holds the position catalog and balance sheet once, then evaluates any
//! number of rate shock / withdrawal combinations against them. Each
//! evaluation is a pure function of the configuration and its parameters, so
//! batches fan out across threads without coordination.

mod config;
mod params;
mod result;

pub use config::{CapitalThresholds, StressTestConfig, DEFAULT_CRITICAL_EQUITY, DEFAULT_DATA_PATH};
pub use params::{ScenarioParameters, MAX_RATE_SHOCK_BPS, MAX_WITHDRAWAL_PERCENT};
pub use result::{CapitalStatus, ScenarioResult};

use rayon::prelude::*;

use crate::error::StressResult;
use crate::valuation::evaluate_scenario;
use crate::waterfall::run_waterfall;

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_data_dir(Path::new("data"))?;
///
/// for bps in [100, 300, 500] {
///     let result = runner.run(&ScenarioParameters::from_percent(bps, 25))?;
///     println!("{}: {:.0}", bps, result.final_equity());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    config: StressTestConfig,
}

impl ScenarioRunner {
    /// Create runner with the built-in reference book and balance sheet
    pub fn new() -> Self {
        Self {
            config: StressTestConfig::reference(),
        }
    }

    /// Create runner with a pre-built configuration
    pub fn with_config(config: StressTestConfig) -> Self {
        Self { config }
    }

    /// Create runner by loading positions.csv and balance_sheet.json from a directory
    pub fn from_data_dir(dir: &std::path::Path) -> StressResult<Self> {
        Ok(Self {
            config: StressTestConfig::from_data_dir(dir)?,
        })
    }

    /// Evaluate one scenario: validate, reprice, run the waterfall, classify
    pub fn run(&self, params: &ScenarioParameters) -> StressResult<ScenarioResult> {
        params.validate()?;

        let valuation = evaluate_scenario(&self.config.positions, params.rate_shock_bps)?;
        let waterfall = run_waterfall(
            params,
            &self.config.balance_sheet,
            valuation.aggregate_loss_fraction,
        )?;
        let capital_status = CapitalStatus::classify(waterfall.final_equity, &self.config.thresholds);

        log::info!(
            "+{} bps / {:.0}% run: loss fraction {:.4}, equity {:.0} -> {:.0} ({})",
            params.rate_shock_bps,
            params.withdrawal_pct * 100.0,
            valuation.aggregate_loss_fraction,
            waterfall.initial_equity,
            waterfall.final_equity,
            capital_status.as_str()
        );

        Ok(ScenarioResult {
            params: *params,
            valuation,
            waterfall,
            capital_status,
        })
    }

    /// Evaluate many scenarios in parallel; results keep the input order
    pub fn run_batch(&self, params: &[ScenarioParameters]) -> Vec<StressResult<ScenarioResult>> {
        params.par_iter().map(|p| self.run(p)).collect()
    }

    /// Evaluate every shock x withdrawal combination, shock-major order
    pub fn sweep(&self, rate_shocks_bps: &[i32], withdrawal_pcts: &[f64]) -> Vec<StressResult<ScenarioResult>> {
        let grid: Vec<ScenarioParameters> = rate_shocks_bps
            .iter()
            .flat_map(|&bps| {
                withdrawal_pcts
                    .iter()
                    .map(move |&pct| ScenarioParameters::new(bps, pct))
            })
            .collect();

        self.run_batch(&grid)
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &StressTestConfig {
        &self.config
    }

    /// Get mutable reference to the configuration for customization
    pub fn config_mut(&mut self) -> &mut StressTestConfig {
        &mut self.config
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
