//! The two scenario degrees of freedom

use serde::{Deserialize, Serialize};

use crate::error::{StressError, StressResult};

/// Largest rate shock offered on the input surface
pub const MAX_RATE_SHOCK_BPS: i32 = 500;

/// Largest withdrawal offered on the input surface, in percent of deposits
pub const MAX_WITHDRAWAL_PERCENT: u32 = 50;

/// Rate shock and deposit run for one scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    /// Basis points added to every position's yield
    pub rate_shock_bps: i32,

    /// Fraction of total deposits withdrawn, in [0, 1]
    pub withdrawal_pct: f64,
}

impl ScenarioParameters {
    pub fn new(rate_shock_bps: i32, withdrawal_pct: f64) -> Self {
        Self {
            rate_shock_bps,
            withdrawal_pct,
        }
    }

    /// Build from input-surface units: bps and whole percent of deposits
    pub fn from_percent(rate_shock_bps: i32, withdrawal_percent: u32) -> Self {
        Self::new(rate_shock_bps, withdrawal_percent as f64 / 100.0)
    }

    /// Like `from_percent`, but rejects values outside the input-surface
    /// bounds of 0..=500 bps and 0..=50 percent
    pub fn from_bounded_percent(rate_shock_bps: i32, withdrawal_percent: u32) -> StressResult<Self> {
        if !(0..=MAX_RATE_SHOCK_BPS).contains(&rate_shock_bps) {
            return Err(StressError::invalid_params(format!(
                "rate shock must lie in [0, {}] bps, got {}",
                MAX_RATE_SHOCK_BPS, rate_shock_bps
            )));
        }
        if withdrawal_percent > MAX_WITHDRAWAL_PERCENT {
            return Err(StressError::invalid_params(format!(
                "withdrawal must lie in [0, {}]%, got {}%",
                MAX_WITHDRAWAL_PERCENT, withdrawal_percent
            )));
        }
        Ok(Self::from_percent(rate_shock_bps, withdrawal_percent))
    }

    /// Rate shock as a decimal yield move (300 bps = 0.03)
    pub fn rate_shock(&self) -> f64 {
        self.rate_shock_bps as f64 / 10_000.0
    }

    pub fn validate(&self) -> StressResult<()> {
        if self.rate_shock_bps < 0 {
            return Err(StressError::invalid_params(format!(
                "rate shock must be non-negative, got {} bps",
                self.rate_shock_bps
            )));
        }
        if !(0.0..=1.0).contains(&self.withdrawal_pct) {
            return Err(StressError::invalid_params(format!(
                "withdrawal fraction must lie in [0, 1], got {}",
                self.withdrawal_pct
            )));
        }
        Ok(())
    }
}

impl Default for ScenarioParameters {
    /// +300 bps and a 25% run, the reference case
    fn default() -> Self {
        Self::from_percent(300, 25)
    }
}
