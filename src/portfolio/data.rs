//! Fixed-coupon position held in the securities book

use serde::{Deserialize, Serialize};

use crate::error::{StressError, StressResult};

/// Longest schedule accepted: 100 years of monthly coupons
pub const MAX_MATURITY_PERIODS: u32 = 1_200;

/// A single fixed-income holding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Display label (e.g. "10Y Treasury")
    pub name: String,

    /// Notional, in $M
    pub face: f64,

    /// Coupon rate per period as a decimal (0.02 = 2%)
    pub coupon: f64,

    /// Number of coupon periods to maturity
    pub maturity: u32,

    /// Discount rate per period at scenario start
    pub base_yield: f64,
}

impl Position {
    pub fn new(name: impl Into<String>, face: f64, coupon: f64, maturity: u32, base_yield: f64) -> Self {
        Self {
            name: name.into(),
            face,
            coupon,
            maturity,
            base_yield,
        }
    }

    /// Coupon amount paid each period
    pub fn coupon_payment(&self) -> f64 {
        self.face * self.coupon
    }

    /// Cash flow schedule as (period, amount), periods 1-indexed.
    /// Face is returned together with the final coupon.
    pub fn cash_flows(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        let coupon = self.coupon_payment();
        (1..=self.maturity).map(move |t| {
            if t == self.maturity {
                (t, coupon + self.face)
            } else {
                (t, coupon)
            }
        })
    }

    /// Reject positions that cannot produce a meaningful price
    pub fn validate(&self) -> StressResult<()> {
        if self.maturity < 1 {
            return Err(StressError::invalid_position(&self.name, "maturity must be at least 1 period"));
        }
        if self.maturity > MAX_MATURITY_PERIODS {
            return Err(StressError::invalid_position(
                &self.name,
                format!("maturity {} exceeds {} periods", self.maturity, MAX_MATURITY_PERIODS),
            ));
        }
        if !self.face.is_finite() || self.face < 0.0 {
            return Err(StressError::invalid_position(
                &self.name,
                format!("face must be a non-negative amount, got {}", self.face),
            ));
        }
        if !self.coupon.is_finite() || self.coupon < 0.0 {
            return Err(StressError::invalid_position(
                &self.name,
                format!("coupon must be non-negative, got {}", self.coupon),
            ));
        }
        Ok(())
    }
}

/// Hypothetical securities book proxying the YE 2022 filings
pub fn reference_positions() -> Vec<Position> {
    vec![
        Position::new("10Y Treasury (Safe?)", 5000.0, 0.0175, 10, 0.0175),
        Position::new("30Y Agency MBS (Long Duration)", 3000.0, 0.0200, 30, 0.0200),
        Position::new("5Y Note (Liquid)", 2000.0, 0.0150, 5, 0.0150),
        Position::new("10Y Corp Bond (Higher Yield)", 5000.0, 0.0400, 10, 0.0400),
    ]
}
