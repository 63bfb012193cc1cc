//! Settlement model module
//!
//! Estimates the crowd-consensus settlement price from breakpoint demand

mod estimator;
pub mod random;

pub use estimator::WeightedDemandEstimator;
pub use random::{FixedRandom, RandomSource, RngSource, SequenceRandom};

use crate::market::PriceLevelStore;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reference scale the estimate is bounded by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceScale {
    /// Discovery-phase median market cap
    Median(Decimal),
    /// No median yet: fixed absolute bounds
    Legacy,
}

impl From<Option<Decimal>> for PriceScale {
    fn from(median: Option<Decimal>) -> Self {
        median.map_or(PriceScale::Legacy, PriceScale::Median)
    }
}

/// A settlement estimate at a point in session time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementSnapshot {
    /// Estimated settlement price
    pub estimated_price: Decimal,
    /// Logical session tick the estimate was computed on
    pub computed_at: u64,
    /// Wall-clock time of the computation
    pub recorded_at: DateTime<Utc>,
}

impl SettlementSnapshot {
    pub fn new(estimated_price: Decimal, computed_at: u64) -> Self {
        Self {
            estimated_price,
            computed_at,
            recorded_at: Utc::now(),
        }
    }
}

/// Estimation errors
#[derive(Debug, Error, PartialEq)]
pub enum EstimateError {
    /// Median must be positive
    #[error("Invalid median: {0}")]
    InvalidMedian(Decimal),
    /// Demand accumulation exceeded decimal range
    #[error("Arithmetic overflow while weighting breakpoint demand")]
    Overflow,
}

/// Trait for settlement price models
pub trait SettlementModel: Send + Sync {
    /// Estimate the settlement price for the current store
    fn estimate(
        &self,
        store: &PriceLevelStore,
        scale: PriceScale,
        rng: &mut dyn RandomSource,
    ) -> Result<Decimal, EstimateError>;
}
