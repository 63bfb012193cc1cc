//! Reward calculation types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One step of the multiplier table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplierTier {
    /// Stake level the tier starts at
    pub threshold: Decimal,
    /// Reward multiplier for this tier
    pub multiplier: Decimal,
}

impl MultiplierTier {
    pub const fn new(threshold: Decimal, multiplier: Decimal) -> Self {
        Self {
            threshold,
            multiplier,
        }
    }
}

/// Default tiers: low-stake breakpoints pay more, congested ones less
pub const DEFAULT_TIERS: [MultiplierTier; 7] = [
    MultiplierTier::new(dec!(0), dec!(1.5)),
    MultiplierTier::new(dec!(100), dec!(1.3)),
    MultiplierTier::new(dec!(200), dec!(1.1)),
    MultiplierTier::new(dec!(300), dec!(1.0)),
    MultiplierTier::new(dec!(400), dec!(0.8)),
    MultiplierTier::new(dec!(500), dec!(0.6)),
    MultiplierTier::new(dec!(600), dec!(0.5)),
];

/// How stake at a breakpoint is measured for tier lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StakeBasis {
    /// Bet count times a fixed unit stake
    #[default]
    Count,
    /// Sum of the stake amounts actually recorded
    Staked,
}

/// Result of a token allocation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Tokens allocated
    pub tokens: Decimal,
    /// Accuracy score, 0 to 1
    pub accuracy: Decimal,
    /// Stake multiplier applied
    pub multiplier: Decimal,
    /// stake * accuracy * multiplier
    pub weight: Decimal,
}

/// Reward calculation errors
#[derive(Debug, Error, PartialEq)]
pub enum RewardError {
    /// Settlement must be positive
    #[error("Invalid settlement price: {0}")]
    InvalidSettlement(Decimal),
    /// Breakpoint must be positive
    #[error("Invalid breakpoint: {0}")]
    InvalidBreakpoint(Decimal),
    /// Stake must be non-negative
    #[error("Invalid stake: {0}")]
    InvalidStake(Decimal),
    /// Tier table is empty or not ascending
    #[error("Invalid multiplier table: {0}")]
    InvalidTierTable(String),
    /// Normalizer must be positive
    #[error("Invalid weight normalizer: {0}")]
    InvalidNormalizer(Decimal),
    /// Participant percentage must be in (0, 100]
    #[error("Invalid participant percentage: {0}")]
    InvalidParticipantPct(Decimal),
    /// Intermediate value exceeded decimal range
    #[error("Arithmetic overflow in reward calculation")]
    Overflow,
}
