//! Token allocation calculator
//!
//! weight = stake * accuracy * multiplier
//! tokens = participant_share * weight / weight_normalizer
//!
//! The participant share is a percentage of the token's total supply. The normalizer is a fixed constant, not the total weight of all bettors,
//! so allocations do not sum to the participant share.

use super::{accuracy, Allocation, MultiplierTable, RewardError};
use crate::config::RewardConfig;
use crate::market::{PriceLevelStore, Side};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Computes what-if and final token allocations
#[derive(Debug, Clone)]
pub struct RewardCalculator {
    table: MultiplierTable,
    participant_share: Decimal,
    weight_normalizer: Decimal,
}

impl RewardCalculator {
    /// Create a calculator
    pub fn new(
        table: MultiplierTable,
        participant_share: Decimal,
        weight_normalizer: Decimal,
    ) -> Result<Self, RewardError> {
        if weight_normalizer <= Decimal::ZERO {
            return Err(RewardError::InvalidNormalizer(weight_normalizer));
        }
        Ok(Self {
            table,
            participant_share,
            weight_normalizer,
        })
    }

    /// Create from RewardConfig for a token with the given total supply
    pub fn from_config(config: &RewardConfig, total_supply: u64) -> Result<Self, RewardError> {
        Self::new(
            MultiplierTable::from_config(config)?,
            participant_share(total_supply, config.participant_pct)?,
            config.weight_normalizer,
        )
    }

    /// Tokens distributed across all bettors
    pub fn participant_share(&self) -> Decimal {
        self.participant_share
    }

    pub fn table(&self) -> &MultiplierTable {
        &self.table
    }

    /// Multiplier currently earned at a breakpoint
    pub fn multiplier(&self, breakpoint: Decimal, store: &PriceLevelStore) -> Decimal {
        self.table.multiplier(breakpoint, store)
    }

    /// Allocate tokens using the breakpoint's current multiplier
    pub fn allocate(
        &self,
        breakpoint: Decimal,
        stake: Decimal,
        settlement: Decimal,
        side: Side,
        store: &PriceLevelStore,
    ) -> Result<Allocation, RewardError> {
        let multiplier = self.table.multiplier(breakpoint, store);
        self.allocate_with_multiplier(breakpoint, stake, settlement, side, multiplier)
    }

    /// Allocate tokens with a multiplier locked in earlier (at bet time)
    pub fn allocate_with_multiplier(
        &self,
        breakpoint: Decimal,
        stake: Decimal,
        settlement: Decimal,
        side: Side,
        multiplier: Decimal,
    ) -> Result<Allocation, RewardError> {
        if stake < Decimal::ZERO {
            return Err(RewardError::InvalidStake(stake));
        }
        let accuracy = accuracy(breakpoint, settlement, side)?;

        let weight = stake
            .checked_mul(accuracy)
            .and_then(|w| w.checked_mul(multiplier))
            .ok_or(RewardError::Overflow)?;
        let tokens = weight
            .checked_div(self.weight_normalizer)
            .and_then(|share| share.checked_mul(self.participant_share))
            .ok_or(RewardError::Overflow)?;

        Ok(Allocation {
            tokens,
            accuracy,
            multiplier,
            weight,
        })
    }
}

/// `total_supply * pct / 100`, with pct in (0, 100]
pub fn participant_share(total_supply: u64, pct: Decimal) -> Result<Decimal, RewardError> {
    if pct <= Decimal::ZERO || pct > dec!(100) {
        return Err(RewardError::InvalidParticipantPct(pct));
    }
    Decimal::from(total_supply)
        .checked_mul(pct)
        .and_then(|share| share.checked_div(dec!(100)))
        .ok_or(RewardError::Overflow)
}

impl Default for RewardCalculator {
    fn default() -> Self {
        Self {
            table: MultiplierTable::default(),
            participant_share: dec!(800000000),
            weight_normalizer: dec!(500),
        }
    }
}
