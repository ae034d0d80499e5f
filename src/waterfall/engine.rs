//! Cash -> AFS -> HTM liquidity waterfall

use super::balance_sheet::BalanceSheet;
use super::types::{FundingTier, TierDraw, WaterfallResult};
use crate::error::{StressError, StressResult};
use crate::scenario::ScenarioParameters;

/// Meet a deposit withdrawal from cash, then AFS, then HTM, charging realized
/// losses against equity.
///
/// `htm_loss_fraction` is the aggregate loss fraction from the valuation
/// engine; forced HTM sales raise `1 - htm_loss_fraction` per unit of face.
/// It is checked before any tier runs, so the evaluation is all or nothing.
/// HTM capacity is not capped: demand beyond total assets shows up only as
/// negative final equity.
pub fn run_waterfall(
    params: &ScenarioParameters,
    sheet: &BalanceSheet,
    htm_loss_fraction: f64,
) -> StressResult<WaterfallResult> {
    params.validate()?;
    sheet.validate()?;
    if !htm_loss_fraction.is_finite() || !(0.0..1.0).contains(&htm_loss_fraction) {
        return Err(StressError::DegenerateLossFraction {
            fraction: htm_loss_fraction,
        });
    }

    let withdrawal_amount = sheet.total_deposits * params.withdrawal_pct;
    let mut remaining = withdrawal_amount;
    let mut tiers = Vec::with_capacity(3);
    let mut stage = Some(FundingTier::Cash);

    while let Some(tier) = stage {
        if remaining <= 0.0 {
            break;
        }

        let draw = match tier {
            FundingTier::Cash => draw_cash(sheet, remaining),
            FundingTier::Afs => draw_afs(sheet, remaining),
            FundingTier::Htm => draw_htm(htm_loss_fraction, remaining),
        };
        log::debug!(
            "{} tier: raised {:.2} selling {:.2}, loss {:.2}, {:.2} still owed",
            tier.as_str(),
            draw.cash_raised,
            draw.book_sold,
            draw.loss_realized,
            draw.remaining_after
        );

        remaining = draw.remaining_after;
        tiers.push(draw);
        stage = tier.next();
    }

    let cash_used = tier_value(&tiers, FundingTier::Cash, |d| d.cash_raised);
    let afs_drawn = tier_value(&tiers, FundingTier::Afs, |d| d.book_sold);
    let afs_cash_raised = tier_value(&tiers, FundingTier::Afs, |d| d.cash_raised);
    let afs_loss_realized = tier_value(&tiers, FundingTier::Afs, |d| d.loss_realized);
    let htm_face_sold = tier_value(&tiers, FundingTier::Htm, |d| d.book_sold);
    let htm_cash_raised = tier_value(&tiers, FundingTier::Htm, |d| d.cash_raised);
    let htm_loss_realized = tier_value(&tiers, FundingTier::Htm, |d| d.loss_realized);

    let initial_equity = sheet.initial_equity;
    let final_equity = initial_equity - afs_loss_realized - htm_loss_realized;

    if final_equity < 0.0 {
        log::warn!("Equity exhausted: final equity {:.2}", final_equity);
    }

    Ok(WaterfallResult {
        withdrawal_amount,
        cash_used,
        afs_drawn,
        afs_cash_raised,
        afs_loss_realized,
        htm_face_sold,
        htm_cash_raised,
        htm_loss_realized,
        initial_equity,
        final_equity,
        equity_delta: final_equity - initial_equity,
        tiers,
    })
}

/// Field of an engaged tier's draw, zero when the tier was never reached
fn tier_value(tiers: &[TierDraw], tier: FundingTier, field: impl Fn(&TierDraw) -> f64) -> f64 {
    tiers.iter().find(|d| d.tier == tier).map(field).unwrap_or(0.0)
}

/// Cash is paid out at par
fn draw_cash(sheet: &BalanceSheet, remaining: f64) -> TierDraw {
    let cash_used = sheet.cash_reserves.min(remaining);
    TierDraw {
        tier: FundingTier::Cash,
        cash_raised: cash_used,
        book_sold: cash_used,
        loss_realized: 0.0,
        remaining_after: remaining - cash_used,
    }
}

/// Sell just enough AFS to cover demand, or the whole pool if that falls short
fn draw_afs(sheet: &BalanceSheet, remaining: f64) -> TierDraw {
    let needed = remaining / sheet.afs_recovery();

    if needed <= sheet.afs_assets {
        TierDraw {
            tier: FundingTier::Afs,
            cash_raised: remaining,
            book_sold: needed,
            loss_realized: needed * sheet.afs_haircut,
            remaining_after: 0.0,
        }
    } else {
        let cash_raised = sheet.afs_assets * sheet.afs_recovery();
        TierDraw {
            tier: FundingTier::Afs,
            cash_raised,
            book_sold: sheet.afs_assets,
            loss_realized: sheet.afs_assets * sheet.afs_haircut,
            remaining_after: remaining - cash_raised,
        }
    }
}

/// Face F sold at loss fraction f raises F * (1 - f)
fn draw_htm(loss_fraction: f64, remaining: f64) -> TierDraw {
    let face_sold = remaining / (1.0 - loss_fraction);
    TierDraw {
        tier: FundingTier::Htm,
        cash_raised: remaining,
        book_sold: face_sold,
        loss_realized: face_sold * loss_fraction,
        remaining_after: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Aggregate loss fraction of the reference book at +300 bps
    const REFERENCE_FRACTION_300: f64 = 0.258_193_905_219_696_6;

    fn params(withdrawal_pct: f64) -> ScenarioParameters {
        ScenarioParameters::new(300, withdrawal_pct)
    }

    #[test]
    fn test_reference_run_reaches_htm() {
        let sheet = BalanceSheet::reference();
        let result = run_waterfall(&params(0.25), &sheet, REFERENCE_FRACTION_300).unwrap();

        assert_relative_eq!(result.withdrawal_amount, 45_000.0);
        assert_relative_eq!(result.cash_used, 15_000.0);

        assert_relative_eq!(result.afs_drawn, 25_000.0);
        assert_relative_eq!(result.afs_cash_raised, 22_500.0, epsilon = 1e-9);
        assert_relative_eq!(result.afs_loss_realized, 2_500.0, epsilon = 1e-9);

        assert_relative_eq!(result.htm_cash_raised, 7_500.0, epsilon = 1e-9);
        assert_relative_eq!(result.htm_face_sold, 10_110.4589, epsilon = 1e-3);
        assert_relative_eq!(result.htm_loss_realized, 2_610.4589, epsilon = 1e-3);
        assert_relative_eq!(result.final_equity, 9_889.5411, epsilon = 1e-3);

        let order: Vec<FundingTier> = result.tiers.iter().map(|d| d.tier).collect();
        assert_eq!(order, vec![FundingTier::Cash, FundingTier::Afs, FundingTier::Htm]);
    }

    #[test]
    fn test_no_withdrawal_engages_nothing() {
        let result = run_waterfall(&ScenarioParameters::new(0, 0.0), &BalanceSheet::reference(), 0.0).unwrap();

        assert!(result.tiers.is_empty());
        assert_eq!(result.final_equity, result.initial_equity);
        assert_eq!(result.equity_delta, 0.0);
    }

    #[test]
    fn test_cash_only_run() {
        // 5% of 180,000 = 9,000 < 15,000 cash
        let result = run_waterfall(&params(0.05), &BalanceSheet::reference(), REFERENCE_FRACTION_300).unwrap();

        assert_relative_eq!(result.cash_used, 9_000.0, epsilon = 1e-9);
        assert_eq!(result.afs_loss_realized, 0.0);
        assert_eq!(result.htm_loss_realized, 0.0);
        assert_eq!(result.final_equity, 15_000.0);
        assert!(result.draw(FundingTier::Afs).is_none());
    }

    #[test]
    fn test_withdrawal_equal_to_cash_stays_in_cash_tier() {
        let result = run_waterfall(
            &ScenarioParameters::new(0, 15_000.0 / 180_000.0),
            &BalanceSheet::reference(),
            REFERENCE_FRACTION_300,
        )
        .unwrap();

        assert_relative_eq!(result.cash_used, 15_000.0, epsilon = 1e-9);
        assert_eq!(result.tiers.len(), 1);
        assert_eq!(result.afs_loss_realized, 0.0);
        assert_eq!(result.htm_loss_realized, 0.0);
        assert_eq!(result.final_equity, result.initial_equity);
    }

    #[test]
    fn test_cash_boundary_with_exact_amounts() {
        let sheet = BalanceSheet {
            total_deposits: 100_000.0,
            cash_reserves: 25_000.0,
            ..BalanceSheet::reference()
        };
        let result = run_waterfall(&ScenarioParameters::new(0, 0.25), &sheet, 0.5).unwrap();

        assert_eq!(result.withdrawal_amount, sheet.cash_reserves);
        assert_eq!(result.tiers.len(), 1);
        assert_eq!(result.final_equity, result.initial_equity);
    }

    #[test]
    fn test_afs_exactly_covers_remainder() {
        // 37,500 demand: 22,500 after cash needs exactly the 25,000 AFS pool
        let result = run_waterfall(
            &ScenarioParameters::new(0, 37_500.0 / 180_000.0),
            &BalanceSheet::reference(),
            REFERENCE_FRACTION_300,
        )
        .unwrap();

        assert_relative_eq!(result.afs_drawn, 25_000.0, epsilon = 1e-9);
        assert_relative_eq!(result.afs_loss_realized, 2_500.0, epsilon = 1e-9);
        assert_eq!(result.tiers.len(), 2);
        assert!(!result.htm_engaged());
        assert_eq!(result.htm_loss_realized, 0.0);
    }

    #[test]
    fn test_afs_boundary_with_exact_amounts() {
        // Halving haircut keeps every step exact: 10,000 left after cash needs 20,000 of AFS
        let sheet = BalanceSheet {
            total_deposits: 100_000.0,
            cash_reserves: 10_000.0,
            afs_assets: 20_000.0,
            afs_haircut: 0.5,
            ..BalanceSheet::reference()
        };
        let result = run_waterfall(&ScenarioParameters::new(0, 0.2), &sheet, 0.5).unwrap();

        assert_eq!(result.afs_drawn, sheet.afs_assets);
        assert_eq!(result.afs_cash_raised, 10_000.0);
        assert_eq!(result.afs_loss_realized, 10_000.0);
        assert!(result.draw(FundingTier::Htm).is_none());
        assert_eq!(result.final_equity, 5_000.0);
    }

    #[test]
    fn test_partial_afs_draw() {
        // 15% of 180,000 = 27,000: 12,000 left after cash, needs 13,333.33 of AFS
        let result = run_waterfall(&params(0.15), &BalanceSheet::reference(), REFERENCE_FRACTION_300).unwrap();

        assert_relative_eq!(result.afs_drawn, 12_000.0 / 0.9, epsilon = 1e-9);
        assert_relative_eq!(result.afs_loss_realized, 12_000.0 / 0.9 * 0.1, epsilon = 1e-9);
        assert_eq!(result.htm_loss_realized, 0.0);
        assert!(!result.htm_engaged());
        assert_relative_eq!(result.final_equity, 15_000.0 - 1_333.333_333, epsilon = 1e-5);
    }

    #[test]
    fn test_equity_conservation() {
        let sheet = BalanceSheet::reference();
        for pct in [0.0, 0.05, 0.1, 0.2, 0.3, 0.5, 0.9, 1.0] {
            for fraction in [0.0, 0.1, REFERENCE_FRACTION_300, 0.5] {
                let r = run_waterfall(&params(pct), &sheet, fraction).unwrap();
                assert_eq!(r.final_equity, r.initial_equity - r.afs_loss_realized - r.htm_loss_realized);
                assert_eq!(r.equity_delta, r.final_equity - r.initial_equity);

                let raised: f64 = r.tiers.iter().map(|d| d.cash_raised).sum();
                assert_relative_eq!(raised, r.withdrawal_amount, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_full_run_is_insolvent() {
        let result = run_waterfall(&params(1.0), &BalanceSheet::reference(), 0.5).unwrap();
        assert!(result.is_insolvent());
    }

    #[test]
    fn test_degenerate_loss_fraction() {
        let sheet = BalanceSheet::reference();
        for fraction in [1.0, 1.5, -0.1, f64::NAN, f64::INFINITY] {
            let err = run_waterfall(&params(0.25), &sheet, fraction).unwrap_err();
            assert!(matches!(err, StressError::DegenerateLossFraction { .. }));
        }
    }

    #[test]
    fn test_invalid_withdrawal_rejected() {
        let err = run_waterfall(&params(1.2), &BalanceSheet::reference(), 0.1).unwrap_err();
        assert!(matches!(err, StressError::InvalidScenarioParameters { .. }));
    }

    #[test]
    fn test_custom_haircut() {
        let sheet = BalanceSheet { afs_haircut: 0.2, ..BalanceSheet::reference() };
        // 20,000 demand: 5,000 after cash, needs 6,250 AFS at 80% recovery
        let result = run_waterfall(&ScenarioParameters::new(0, 20_000.0 / 180_000.0), &sheet, 0.0).unwrap();

        assert_relative_eq!(result.afs_drawn, 6_250.0, epsilon = 1e-6);
        assert_relative_eq!(result.afs_loss_realized, 1_250.0, epsilon = 1e-6);
    }
}
