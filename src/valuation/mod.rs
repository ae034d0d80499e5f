//! Valuation engine: reprices fixed-coupon positions under a yield shock
//!
//! Prices every position by discounting its full cash flow schedule, once at
//! the base yield and once at the shocked yield. The aggregate loss fraction
//! it produces is what the liquidity waterfall charges on forced HTM sales.

mod discount;
mod pricing;
mod engine;

pub use discount::{FlatDiscount, shift_bps};
pub use pricing::price;
pub use engine::{evaluate_scenario, value_position, PortfolioValuation, ValuationResult};
