//! Liquidity waterfall: meets a deposit run from cash, then AFS, then HTM
//!
//! Each tier is only engaged once the previous one is exhausted. Cash is used
//! at par, AFS is sold at a fixed haircut, and HTM is force-sold at the
//! shocked market loss fraction from the valuation engine. Realized losses are
//! charged against equity.

mod balance_sheet;
mod types;
mod engine;

pub use balance_sheet::{BalanceSheet, DEFAULT_AFS_HAIRCUT, DEFAULT_BALANCE_SHEET_PATH};
pub use types::{FundingTier, TierDraw, WaterfallResult};
pub use engine::run_waterfall;
