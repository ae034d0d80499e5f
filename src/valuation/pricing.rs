//! Discounted cash flow pricing of fixed-coupon positions

use super::discount::FlatDiscount;
use crate::error::{StressError, StressResult};
use crate::portfolio::Position;

/// Present value of a position's cash flows discounted at `yield_rate` per period.
///
/// Full repricing of every coupon and the final face repayment; no duration
/// approximation. Rejects positions that fail validation and yields at or
/// below -1, where the discount factor stops being positive.
pub fn price(position: &Position, yield_rate: f64) -> StressResult<f64> {
    position.validate()?;

    let curve = FlatDiscount::new(yield_rate);
    if !curve.is_valid() {
        return Err(StressError::invalid_position(
            &position.name,
            format!("yield {} must be greater than -1", yield_rate),
        ));
    }

    Ok(curve.pv_stream(position.cash_flows()))
}
