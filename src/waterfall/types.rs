//! Funding tiers and waterfall output

use serde::{Deserialize, Serialize};

/// Funding sources, in the order they are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundingTier {
    /// Cash reserves, used at par
    Cash,
    /// Available-for-sale securities, sold at a haircut
    Afs,
    /// Held-to-maturity securities, force-sold at the shocked market loss
    Htm,
}

impl FundingTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            FundingTier::Cash => "Cash",
            FundingTier::Afs => "AFS",
            FundingTier::Htm => "HTM",
        }
    }

    /// Tier drawn once this one is exhausted
    pub fn next(&self) -> Option<FundingTier> {
        match self {
            FundingTier::Cash => Some(FundingTier::Afs),
            FundingTier::Afs => Some(FundingTier::Htm),
            FundingTier::Htm => None,
        }
    }
}

/// What one tier contributed when it was engaged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierDraw {
    pub tier: FundingTier,

    /// Cash delivered toward the withdrawal
    pub cash_raised: f64,

    /// Book (or face) value given up to raise it
    pub book_sold: f64,

    /// Loss charged against equity
    pub loss_realized: f64,

    /// Withdrawal demand still outstanding after this tier
    pub remaining_after: f64,
}

/// Outcome of running a withdrawal through the waterfall ($M)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterfallResult {
    pub withdrawal_amount: f64,

    pub cash_used: f64,

    /// AFS book value sold
    pub afs_drawn: f64,
    pub afs_cash_raised: f64,
    pub afs_loss_realized: f64,

    pub htm_face_sold: f64,
    pub htm_cash_raised: f64,
    pub htm_loss_realized: f64,

    pub initial_equity: f64,
    pub final_equity: f64,

    /// final_equity - initial_equity
    pub equity_delta: f64,

    /// Tiers that were engaged, in draw order
    pub tiers: Vec<TierDraw>,
}

impl WaterfallResult {
    /// Total loss realized across all tiers
    pub fn total_loss_realized(&self) -> f64 {
        self.afs_loss_realized + self.htm_loss_realized
    }

    /// Whether HTM securities had to be sold
    pub fn htm_engaged(&self) -> bool {
        self.tiers.iter().any(|d| d.tier == FundingTier::Htm)
    }

    /// Negative equity signals insolvency downstream
    pub fn is_insolvent(&self) -> bool {
        self.final_equity < 0.0
    }

    /// Draw for a given tier, if it was engaged
    pub fn draw(&self, tier: FundingTier) -> Option<&TierDraw> {
        self.tiers.iter().find(|d| d.tier == tier)
    }
}
