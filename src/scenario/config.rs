//! Immutable configuration shared across scenario evaluations

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::StressResult;
use crate::portfolio::{load_positions, reference_positions, Position};
use crate::waterfall::BalanceSheet;

/// Default data directory holding positions.csv and balance_sheet.json
pub const DEFAULT_DATA_PATH: &str = "data";

/// Equity level below which capital is reported as critically low ($M)
pub const DEFAULT_CRITICAL_EQUITY: f64 = 5_000.0;

fn default_critical_equity() -> f64 {
    DEFAULT_CRITICAL_EQUITY
}

/// Thresholds used to classify the post-shock capital position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapitalThresholds {
    #[serde(default = "default_critical_equity")]
    pub critical_equity: f64,
}

impl Default for CapitalThresholds {
    fn default() -> Self {
        Self {
            critical_equity: DEFAULT_CRITICAL_EQUITY,
        }
    }
}

/// Position catalog and balance sheet held fixed across scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressTestConfig {
    pub positions: Vec<Position>,
    pub balance_sheet: BalanceSheet,
    #[serde(default)]
    pub thresholds: CapitalThresholds,
}

impl StressTestConfig {
    pub fn new(positions: Vec<Position>, balance_sheet: BalanceSheet) -> Self {
        Self {
            positions,
            balance_sheet,
            thresholds: CapitalThresholds::default(),
        }
    }

    /// Built-in reference book and YE 2022 balance sheet
    pub fn reference() -> Self {
        Self::new(reference_positions(), BalanceSheet::reference())
    }

    /// Load the catalog from CSV and the balance sheet from JSON
    pub fn from_paths(positions_csv: &Path, balance_sheet_json: &Path) -> StressResult<Self> {
        let positions = load_positions(positions_csv)?;
        let balance_sheet = BalanceSheet::from_json_path(balance_sheet_json)?;
        Ok(Self::new(positions, balance_sheet))
    }

    /// Load positions.csv and balance_sheet.json from a data directory
    pub fn from_data_dir(dir: &Path) -> StressResult<Self> {
        Self::from_paths(&dir.join("positions.csv"), &dir.join("balance_sheet.json"))
    }

    pub fn with_thresholds(mut self, thresholds: CapitalThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

impl Default for StressTestConfig {
    fn default() -> Self {
        Self::reference()
    }
}
