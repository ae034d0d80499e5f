//! Error types for stress test evaluation

use thiserror::Error;

/// Result alias used throughout the engine
pub type StressResult<T> = Result<T, StressError>;

/// Everything that can abort a scenario evaluation or a configuration load
#[derive(Error, Debug)]
pub enum StressError {
    /// A position cannot be priced (bad maturity, face, coupon or yield)
    #[error("Invalid position '{name}': {reason}")]
    InvalidPosition { name: String, reason: String },

    /// HTM loss fraction at or above 1 (or not a number) makes the face needed undefined
    #[error("Degenerate HTM loss fraction {fraction}: forced sale cannot raise cash")]
    DegenerateLossFraction { fraction: f64 },

    /// Scenario parameters outside their allowed range
    #[error("Invalid scenario parameters: {reason}")]
    InvalidScenarioParameters { reason: String },

    /// Catalog with no positions, or no value to shock
    #[error("Portfolio is empty or has zero initial value")]
    EmptyPortfolio,

    /// Balance sheet magnitude or haircut out of range
    #[error("Invalid balance sheet: {reason}")]
    InvalidBalanceSheet { reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StressError {
    pub(crate) fn invalid_position(name: &str, reason: impl Into<String>) -> Self {
        StressError::InvalidPosition {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_params(reason: impl Into<String>) -> Self {
        StressError::InvalidScenarioParameters {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_balance_sheet(reason: impl Into<String>) -> Self {
        StressError::InvalidBalanceSheet {
            reason: reason.into(),
        }
    }

    /// True for errors caused by scenario or configuration input rather than I/O
    pub fn is_input_error(&self) -> bool {
        !matches!(
            self,
            StressError::Csv(_) | StressError::Io(_) | StressError::Json(_)
        )
    }
}
