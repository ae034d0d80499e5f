//! Scenario result bundle handed to presentation layers

use serde::{Deserialize, Serialize};

use super::config::CapitalThresholds;
use super::params::ScenarioParameters;
use crate::valuation::PortfolioValuation;
use crate::waterfall::WaterfallResult;

/// Post-shock capital classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapitalStatus {
    /// Enough capital buffer left
    Stable,
    /// Positive but below the critical threshold
    Critical,
    /// Negative equity
    Insolvent,
}

impl CapitalStatus {
    pub fn classify(final_equity: f64, thresholds: &CapitalThresholds) -> Self {
        if final_equity < 0.0 {
            CapitalStatus::Insolvent
        } else if final_equity < thresholds.critical_equity {
            CapitalStatus::Critical
        } else {
            CapitalStatus::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CapitalStatus::Stable => "STABLE",
            CapitalStatus::Critical => "CRITICAL",
            CapitalStatus::Insolvent => "INSOLVENT",
        }
    }
}

/// Everything a presentation layer needs, without recomputation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub params: ScenarioParameters,
    pub valuation: PortfolioValuation,
    pub waterfall: WaterfallResult,
    pub capital_status: CapitalStatus,
}

impl ScenarioResult {
    pub fn aggregate_loss_fraction(&self) -> f64 {
        self.valuation.aggregate_loss_fraction
    }

    pub fn final_equity(&self) -> f64 {
        self.waterfall.final_equity
    }
}
