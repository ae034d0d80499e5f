//! Bank Stress - rate-shock and deposit-run stress testing for a bank's securities book
//!
//! This library provides:
//! - Full discounted cash flow repricing of fixed-coupon positions under a yield shock
//! - A Cash -> AFS -> HTM liquidity waterfall charging realized losses to equity
//! - Scenario, batch and grid evaluation against an immutable configuration
//! - Result flattening for tables, charts and CSV

pub mod error;
pub mod portfolio;
pub mod valuation;
pub mod waterfall;
pub mod scenario;
pub mod report;

// Re-export commonly used types
pub use error::{StressError, StressResult};
pub use portfolio::Position;
pub use valuation::{price, evaluate_scenario, PortfolioValuation, ValuationResult};
pub use waterfall::{run_waterfall, BalanceSheet, FundingTier, WaterfallResult};
pub use scenario::{CapitalStatus, ScenarioParameters, ScenarioResult, ScenarioRunner, StressTestConfig};
