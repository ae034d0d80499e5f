//! Balance sheet constants shared by every scenario

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use crate::error::{StressError, StressResult};

/// Default balance sheet location, relative to the working directory
pub const DEFAULT_BALANCE_SHEET_PATH: &str = "data/balance_sheet.json";

/// Haircut taken when AFS securities are sold to raise cash
pub const DEFAULT_AFS_HAIRCUT: f64 = 0.10;

fn default_afs_haircut() -> f64 {
    DEFAULT_AFS_HAIRCUT
}

fn default_as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 12, 31).unwrap_or_default()
}

/// Funding and capital position of the bank before the shock ($M)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// Deposits the withdrawal percentage applies to
    pub total_deposits: f64,

    /// Equity capital before any realized losses
    pub initial_equity: f64,

    /// Cash on hand, first line of liquidity
    pub cash_reserves: f64,

    /// Book value of available-for-sale securities
    pub afs_assets: f64,

    /// Fraction of AFS book value lost on a forced sale
    #[serde(default = "default_afs_haircut")]
    pub afs_haircut: f64,

    /// Reporting date the figures are taken from
    #[serde(default = "default_as_of")]
    pub as_of: NaiveDate,
}

impl BalanceSheet {
    /// YE 2022 figures used by the reference scenario
    pub fn reference() -> Self {
        Self {
            total_deposits: 180_000.0,
            initial_equity: 15_000.0,
            cash_reserves: 15_000.0,
            afs_assets: 25_000.0,
            afs_haircut: DEFAULT_AFS_HAIRCUT,
            as_of: default_as_of(),
        }
    }

    /// Load from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> StressResult<Self> {
        let file = File::open(path)?;
        let sheet: BalanceSheet = serde_json::from_reader(file)?;
        sheet.validate()?;
        Ok(sheet)
    }

    /// Load from the default data/balance_sheet.json location
    pub fn load_default() -> StressResult<Self> {
        Self::from_json_path(DEFAULT_BALANCE_SHEET_PATH)
    }

    /// Net cash raised per unit of AFS book value sold
    pub fn afs_recovery(&self) -> f64 {
        1.0 - self.afs_haircut
    }

    /// Magnitudes must be non-negative and the haircut must leave some recovery
    pub fn validate(&self) -> StressResult<()> {
        let magnitudes = [
            ("total_deposits", self.total_deposits),
            ("cash_reserves", self.cash_reserves),
            ("afs_assets", self.afs_assets),
            ("initial_equity", self.initial_equity),
        ];
        for (field, value) in magnitudes {
            if !value.is_finite() || value < 0.0 {
                return Err(StressError::invalid_balance_sheet(format!(
                    "{} must be a non-negative amount, got {}",
                    field, value
                )));
            }
        }

        if !(0.0..1.0).contains(&self.afs_haircut) {
            return Err(StressError::invalid_balance_sheet(format!(
                "afs_haircut must lie in [0, 1), got {}",
                self.afs_haircut
            )));
        }

        Ok(())
    }
}

impl Default for BalanceSheet {
    fn default() -> Self {
        Self::reference()
    }
}
