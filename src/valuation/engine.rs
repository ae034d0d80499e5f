//! Reprice the position catalog under a parallel rate shock

use serde::{Deserialize, Serialize};

use super::discount::shift_bps;
use super::pricing::price;
use crate::error::{StressError, StressResult};
use crate::portfolio::Position;

/// Repricing outcome for one position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationResult {
    pub name: String,
    pub face: f64,
    pub coupon: f64,
    pub maturity: u32,
    pub base_yield: f64,

    /// PV at the base yield
    pub initial_price: f64,

    /// Base yield plus the shock
    pub shocked_yield: f64,

    /// PV at the shocked yield
    pub shocked_price: f64,

    /// shocked_price - initial_price (negative when rates rise)
    pub loss: f64,

    /// Loss as a percentage of initial price (-23.4 = 23.4% down)
    pub loss_pct: f64,
}

/// Per-position results plus portfolio aggregates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioValuation {
    pub rate_shock_bps: i32,
    pub positions: Vec<ValuationResult>,
    pub total_initial_price: f64,
    pub total_shocked_price: f64,
    pub total_loss: f64,

    /// |total_loss| / total_initial_price, the haircut applied to forced HTM sales
    pub aggregate_loss_fraction: f64,
}

impl PortfolioValuation {
    /// Position with the largest percentage drop
    pub fn worst_position(&self) -> Option<&ValuationResult> {
        self.positions
            .iter()
            .min_by(|a, b| a.loss_pct.total_cmp(&b.loss_pct))
    }

    /// Value lost on paper, as a positive amount
    pub fn unrealized_loss(&self) -> f64 {
        self.total_loss.abs()
    }
}

/// Reprice a single position at its base yield and at base + shock
pub fn value_position(position: &Position, rate_shock_bps: i32) -> StressResult<ValuationResult> {
    let initial_price = price(position, position.base_yield)?;
    let shocked_yield = shift_bps(position.base_yield, rate_shock_bps);
    let shocked_price = price(position, shocked_yield)?;

    let loss = shocked_price - initial_price;
    // A zero-face holding prices at 0 in both states: report 0%, not NaN
    let loss_pct = if initial_price != 0.0 {
        loss / initial_price * 100.0
    } else {
        0.0
    };

    Ok(ValuationResult {
        name: position.name.clone(),
        face: position.face,
        coupon: position.coupon,
        maturity: position.maturity,
        base_yield: position.base_yield,
        initial_price,
        shocked_yield,
        shocked_price,
        loss,
        loss_pct,
    })
}

/// Reprice every position and aggregate the portfolio loss fraction.
///
/// Aborts on the first invalid position; there is no partial result.
pub fn evaluate_scenario(positions: &[Position], rate_shock_bps: i32) -> StressResult<PortfolioValuation> {
    if rate_shock_bps < 0 {
        return Err(StressError::invalid_params(format!(
            "rate shock must be non-negative, got {} bps",
            rate_shock_bps
        )));
    }
    if positions.is_empty() {
        return Err(StressError::EmptyPortfolio);
    }

    let results = positions
        .iter()
        .map(|p| value_position(p, rate_shock_bps))
        .collect::<StressResult<Vec<_>>>()?;

    let total_initial_price: f64 = results.iter().map(|r| r.initial_price).sum();
    let total_shocked_price: f64 = results.iter().map(|r| r.shocked_price).sum();
    let total_loss: f64 = results.iter().map(|r| r.loss).sum();

    if total_initial_price <= 0.0 {
        return Err(StressError::EmptyPortfolio);
    }

    let aggregate_loss_fraction = (total_loss / total_initial_price).abs();

    for r in &results {
        log::debug!(
            "{}: {:.2} -> {:.2} at {:.4} ({:.2}%)",
            r.name, r.initial_price, r.shocked_price, r.shocked_yield, r.loss_pct
        );
    }
    log::debug!(
        "+{} bps: total loss {:.2} on {:.2} (fraction {:.6})",
        rate_shock_bps, total_loss, total_initial_price, aggregate_loss_fraction
    );

    Ok(PortfolioValuation {
        rate_shock_bps,
        positions: results,
        total_initial_price,
        total_shocked_price,
        total_loss,
        aggregate_loss_fraction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::reference_positions;
    use approx::assert_relative_eq;

    #[test]
    fn test_no_shock_no_loss() {
        let valuation = evaluate_scenario(&reference_positions(), 0).unwrap();

        assert_relative_eq!(valuation.total_loss, 0.0, epsilon = 1e-9);
        assert_relative_eq!(valuation.aggregate_loss_fraction, 0.0, epsilon = 1e-12);
        assert_relative_eq!(valuation.total_initial_price, 15_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_reference_book_at_300bps() {
        let valuation = evaluate_scenario(&reference_positions(), 300).unwrap();

        assert_eq!(valuation.positions.len(), 4);
        assert_relative_eq!(valuation.total_loss, -3872.9086, epsilon = 1e-3);
        assert_relative_eq!(valuation.aggregate_loss_fraction, 0.2581939, epsilon = 1e-6);

        let mbs = &valuation.positions[1];
        assert_relative_eq!(mbs.loss_pct, -46.1174, epsilon = 1e-3);
        assert_relative_eq!(mbs.shocked_yield, 0.05, epsilon = 1e-15);
    }

    #[test]
    fn test_longest_duration_loses_most() {
        let valuation = evaluate_scenario(&reference_positions(), 300).unwrap();
        let worst = valuation.worst_position().unwrap();
        assert_eq!(worst.name, "30Y Agency MBS (Long Duration)");
    }

    #[test]
    fn test_duration_ordering() {
        let positions: Vec<Position> = [2, 5, 10, 20, 30]
            .iter()
            .map(|&m| Position::new(format!("{}Y", m), 1000.0, 0.03, m, 0.03))
            .collect();
        let valuation = evaluate_scenario(&positions, 200).unwrap();

        for pair in valuation.positions.windows(2) {
            assert!(
                pair[1].loss_pct.abs() > pair[0].loss_pct.abs(),
                "{} should lose more than {}",
                pair[1].name,
                pair[0].name
            );
        }
    }

    #[test]
    fn test_loss_fraction_grows_with_shock() {
        let positions = reference_positions();
        let fractions: Vec<f64> = [0, 100, 300, 500]
            .iter()
            .map(|&bps| evaluate_scenario(&positions, bps).unwrap().aggregate_loss_fraction)
            .collect();

        for pair in fractions.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert!(fractions.iter().all(|&f| (0.0..1.0).contains(&f)));
    }

    #[test]
    fn test_empty_catalog() {
        assert!(matches!(evaluate_scenario(&[], 100), Err(StressError::EmptyPortfolio)));
    }

    #[test]
    fn test_zero_value_catalog() {
        let positions = vec![Position::new("nothing", 0.0, 0.02, 5, 0.02)];
        assert!(matches!(evaluate_scenario(&positions, 100), Err(StressError::EmptyPortfolio)));
    }

    #[test]
    fn test_zero_face_position_reports_zero_loss_pct() {
        let mut positions = reference_positions();
        positions.push(Position::new("matured", 0.0, 0.02, 5, 0.02));
        let valuation = evaluate_scenario(&positions, 300).unwrap();

        let matured = valuation.positions.last().unwrap();
        assert_eq!(matured.initial_price, 0.0);
        assert_eq!(matured.loss, 0.0);
        assert_eq!(matured.loss_pct, 0.0);

        // The empty holding leaves the book totals untouched
        assert_relative_eq!(valuation.aggregate_loss_fraction, 0.2581939, epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_position_aborts_whole_evaluation() {
        let mut positions = reference_positions();
        positions.push(Position::new("broken", 1000.0, 0.02, 0, 0.02));

        let err = evaluate_scenario(&positions, 100).unwrap_err();
        assert!(matches!(err, StressError::InvalidPosition { ref name, .. } if name == "broken"));
    }

    #[test]
    fn test_negative_shock_rejected() {
        let err = evaluate_scenario(&reference_positions(), -25).unwrap_err();
        assert!(matches!(err, StressError::InvalidScenarioParameters { .. }));
    }
}
