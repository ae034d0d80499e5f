//! Flat per-period discounting for fixed-coupon cash flows

use serde::{Deserialize, Serialize};

/// Flat discount rate applied to every period of a schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatDiscount {
    /// Discount rate per period (0.05 = 5%)
    pub rate: f64,
}

impl FlatDiscount {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    /// Discounting is only defined while 1 + rate stays positive
    pub fn is_valid(&self) -> bool {
        self.rate.is_finite() && self.rate > -1.0
    }

    /// One-period discount factor v = 1 / (1 + rate)
    pub fn period_factor(&self) -> f64 {
        1.0 / (1.0 + self.rate)
    }

    /// Discount factor to a given period: v^t
    pub fn factor_to(&self, period: u32) -> f64 {
        match i32::try_from(period) {
            Ok(t) => (1.0 + self.rate).powi(-t),
            Err(_) => (1.0 + self.rate).powf(-(period as f64)),
        }
    }

    /// Present value of a stream of (period, amount) flows
    pub fn pv_stream<I>(&self, flows: I) -> f64
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        flows
            .into_iter()
            .map(|(period, amount)| amount * self.factor_to(period))
            .sum()
    }
}

/// Shift a per-period yield by a number of basis points
pub fn shift_bps(rate: f64, bps: i32) -> f64 {
    rate + bps as f64 / 10_000.0
}
