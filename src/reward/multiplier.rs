//! Stake-tiered reward multiplier
//!
//! Breakpoints with little stake pay a higher multiplier to reward early and
//! contrarian bets. Each tier covers stakes below `threshold + band`.

use super::{MultiplierTier, RewardError, StakeBasis, DEFAULT_TIERS};
use crate::config::RewardConfig;
use crate::market::PriceLevelStore;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Multiplier for a breakpoint nobody has bet on
pub const UNSTAKED_MULTIPLIER: Decimal = dec!(1.5);

/// Ordered tier table
#[derive(Debug, Clone)]
pub struct MultiplierTable {
    tiers: Vec<MultiplierTier>,
    band: Decimal,
    unit_stake: Decimal,
    basis: StakeBasis,
}

impl MultiplierTable {
    /// Create a table, validating that tiers are non-empty and ascending
    pub fn new(
        tiers: Vec<MultiplierTier>,
        band: Decimal,
        unit_stake: Decimal,
        basis: StakeBasis,
    ) -> Result<Self, RewardError> {
        if tiers.is_empty() {
            return Err(RewardError::InvalidTierTable("no tiers".to_string()));
        }
        if tiers.windows(2).any(|w| w[0].threshold >= w[1].threshold) {
            return Err(RewardError::InvalidTierTable(
                "thresholds must be strictly ascending".to_string(),
            ));
        }
        if band < Decimal::ZERO || unit_stake < Decimal::ZERO {
            return Err(RewardError::InvalidTierTable(
                "band and unit stake must be non-negative".to_string(),
            ));
        }
        Ok(Self {
            tiers,
            band,
            unit_stake,
            basis,
        })
    }

    /// Create from RewardConfig
    pub fn from_config(config: &RewardConfig) -> Result<Self, RewardError> {
        Self::new(
            config.tiers.clone(),
            config.tier_band,
            config.unit_stake,
            config.stake_basis,
        )
    }

    /// Stake measure at a breakpoint, `None` if the breakpoint is unknown
    pub fn stake_at(&self, breakpoint: Decimal, store: &PriceLevelStore) -> Option<Decimal> {
        let level = store.get(breakpoint)?;
        Some(match self.basis {
            StakeBasis::Count => Decimal::from(level.bet_count()) * self.unit_stake,
            StakeBasis::Staked => level.staked(),
        })
    }

    /// Multiplier for a given stake level
    pub fn for_stake(&self, stake: Decimal) -> Decimal {
        self.tiers
            .iter()
            .find(|tier| stake < tier.threshold + self.band)
            .or_else(|| self.tiers.last())
            .map_or(UNSTAKED_MULTIPLIER, |tier| tier.multiplier)
    }

    /// Multiplier for a breakpoint in the store
    pub fn multiplier(&self, breakpoint: Decimal, store: &PriceLevelStore) -> Decimal {
        match self.stake_at(breakpoint, store) {
            Some(stake) => self.for_stake(stake),
            None => UNSTAKED_MULTIPLIER,
        }
    }

    pub fn tiers(&self) -> &[MultiplierTier] {
        &self.tiers
    }
}

impl Default for MultiplierTable {
    fn default() -> Self {
        Self {
            tiers: DEFAULT_TIERS.to_vec(),
            band: dec!(100),
            unit_stake: dec!(20),
            basis: StakeBasis::Count,
        }
    }
}
