//! Prediction accuracy scoring
//!
//! accuracy = 1 / (1 + (distance / settlement)^2), with a 33% penalty when the
//! bet's side lost.

use super::RewardError;
use crate::market::Side;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Share of accuracy kept when the side was wrong
pub const WRONG_SIDE_FACTOR: Decimal = dec!(0.67);

/// Distance score ignoring direction. 1 at the settlement, decaying toward 0.
pub fn base_accuracy(breakpoint: Decimal, settlement: Decimal) -> Result<Decimal, RewardError> {
    if settlement <= Decimal::ZERO {
        return Err(RewardError::InvalidSettlement(settlement));
    }
    if breakpoint <= Decimal::ZERO {
        return Err(RewardError::InvalidBreakpoint(breakpoint));
    }

    let ratio = (breakpoint - settlement)
        .abs()
        .checked_div(settlement)
        .ok_or(RewardError::Overflow)?;
    let denominator = ratio
        .checked_mul(ratio)
        .and_then(|sq| sq.checked_add(Decimal::ONE))
        .ok_or(RewardError::Overflow)?;

    Decimal::ONE
        .checked_div(denominator)
        .ok_or(RewardError::Overflow)
}

/// Accuracy of a bet on `side` at `breakpoint` against `settlement`
pub fn accuracy(breakpoint: Decimal, settlement: Decimal, side: Side) -> Result<Decimal, RewardError> {
    let base = base_accuracy(breakpoint, settlement)?;
    if side.is_correct(breakpoint, settlement) {
        Ok(base)
    } else {
        Ok(base * WRONG_SIDE_FACTOR)
    }
}
