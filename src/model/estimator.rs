//! Weighted net-demand settlement estimator
//!
//! Each breakpoint pulls the estimate toward its price with weight
//! `yes - 0.5 * no`:
//! base = Σ(price * net) / Σ|net|
//!
//! A uniform noise term of up to ±(noise_width / 2) of the reference scale is
//! added and the result is clamped to the scale's bounds.

use super::{EstimateError, PriceScale, RandomSource, SettlementModel};
use crate::config::EstimatorConfig;
use crate::market::PriceLevelStore;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Discount applied to "no" bets when netting demand
const NO_WEIGHT: Decimal = dec!(0.5);

/// Estimator driven by yes/no pressure across all breakpoints
#[derive(Debug, Clone)]
pub struct WeightedDemandEstimator {
    config: EstimatorConfig,
}

impl WeightedDemandEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    /// Deterministic part of the estimate.
    ///
    /// Returns `None` when there is no net demand (no bets, or perfectly
    /// balanced yes/no pressure).
    pub fn base_estimate(&self, store: &PriceLevelStore) -> Result<Option<Decimal>, EstimateError> {
        let mut weighted_sum = Decimal::ZERO;
        let mut total_magnitude = Decimal::ZERO;

        for level in store.levels() {
            let net = Decimal::from(level.yes_count()) - NO_WEIGHT * Decimal::from(level.no_count());
            let pull = level
                .price()
                .checked_mul(net)
                .ok_or(EstimateError::Overflow)?;
            weighted_sum = weighted_sum
                .checked_add(pull)
                .ok_or(EstimateError::Overflow)?;
            total_magnitude = total_magnitude
                .checked_add(net.abs())
                .ok_or(EstimateError::Overflow)?;
        }

        if total_magnitude.is_zero() {
            return Ok(None);
        }
        weighted_sum
            .checked_div(total_magnitude)
            .map(Some)
            .ok_or(EstimateError::Overflow)
    }

    /// Reference value, lower bound and upper bound for a scale
    pub fn bounds(&self, scale: PriceScale) -> Result<(Decimal, Decimal, Decimal), EstimateError> {
        match scale {
            PriceScale::Median(median) => {
                if median <= Decimal::ZERO {
                    return Err(EstimateError::InvalidMedian(median));
                }
                let floor = median
                    .checked_mul(self.config.floor_ratio)
                    .ok_or(EstimateError::Overflow)?;
                let ceiling = median
                    .checked_mul(self.config.ceiling_ratio)
                    .ok_or(EstimateError::Overflow)?;
                Ok((median, floor, ceiling))
            }
            PriceScale::Legacy => Ok((
                self.config.legacy_reference,
                self.config.legacy_floor,
                self.config.legacy_ceiling,
            )),
        }
    }
}

impl Default for WeightedDemandEstimator {
    fn default() -> Self {
        Self::new(EstimatorConfig::default())
    }
}

impl SettlementModel for WeightedDemandEstimator {
    fn estimate(
        &self,
        store: &PriceLevelStore,
        scale: PriceScale,
        rng: &mut dyn RandomSource,
    ) -> Result<Decimal, EstimateError> {
        let (reference, floor, ceiling) = self.bounds(scale)?;
        let base = self.base_estimate(store)?.unwrap_or(reference);

        let variance = (rng.next_decimal() - dec!(0.5))
            .checked_mul(reference)
            .and_then(|v| v.checked_mul(self.config.noise_width))
            .ok_or(EstimateError::Overflow)?;
        let noisy = base.checked_add(variance).ok_or(EstimateError::Overflow)?;

        let estimate = noisy.max(floor).min(ceiling);
        tracing::trace!(%base, %variance, %estimate, "Settlement estimate");
        Ok(estimate)
    }
}
