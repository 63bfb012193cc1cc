//! In-memory breakpoint store

use super::{MarketError, PriceLevel, Side};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

/// Default breakpoint ladder, as multiples of the discovery median
pub const DEFAULT_LADDER: [Decimal; 8] = [
    dec!(0.25),
    dec!(0.5),
    dec!(0.75),
    dec!(1),
    dec!(1.5),
    dec!(2),
    dec!(3),
    dec!(4),
];

/// Static mock breakpoints used before a discovery median exists: (price, yes, no)
const MOCK_LEVELS: [(Decimal, u64, u64); 8] = [
    (dec!(250000), 2, 9),
    (dec!(200000), 4, 8),
    (dec!(150000), 7, 6),
    (dec!(125000), 9, 5),
    (dec!(100000), 12, 4),
    (dec!(75000), 10, 2),
    (dec!(50000), 6, 1),
    (dec!(25000), 3, 0),
];

/// Breakpoints keyed by price
#[derive(Debug, Clone, Default)]
pub struct PriceLevelStore {
    levels: BTreeMap<Decimal, PriceLevel>,
}

impl PriceLevelStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the breakpoint ladder around a discovery median
    pub fn from_median(median: Decimal, ladder: &[Decimal]) -> Result<Self, MarketError> {
        if median <= Decimal::ZERO {
            return Err(MarketError::InvalidMedian(median));
        }
        let mut store = Self::new();
        for factor in ladder {
            let price = median
                .checked_mul(*factor)
                .ok_or(MarketError::Overflow(median))?;
            store.insert(PriceLevel::new(price.normalize())?)?;
        }
        Ok(store)
    }

    /// Store seeded with the static mock values
    pub fn mock() -> Self {
        let levels = MOCK_LEVELS
            .iter()
            .filter_map(|&(price, yes, no)| PriceLevel::with_counts(price, yes, no).ok())
            .map(|level| (level.price(), level))
            .collect();
        Self { levels }
    }

    /// Insert a breakpoint. Prices must be unique.
    pub fn insert(&mut self, level: PriceLevel) -> Result<(), MarketError> {
        let price = level.price();
        if self.levels.contains_key(&price) {
            return Err(MarketError::DuplicateBreakpoint(price));
        }
        self.levels.insert(price, level);
        Ok(())
    }

    /// Record a bet on an existing breakpoint
    pub fn record_bet(
        &mut self,
        price: Decimal,
        side: Side,
        position: Decimal,
        stake: Decimal,
    ) -> Result<(), MarketError> {
        let level = self
            .levels
            .get_mut(&price)
            .ok_or(MarketError::UnknownBreakpoint(price))?;
        level.record(side, position, stake);
        Ok(())
    }

    pub fn get(&self, price: Decimal) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    pub fn contains(&self, price: Decimal) -> bool {
        self.levels.contains_key(&price)
    }

    /// Breakpoints in ascending price order
    pub fn levels(&self) -> impl Iterator<Item = &PriceLevel> {
        self.levels.values()
    }

    /// Breakpoints highest first, the order they are displayed in
    pub fn levels_desc(&self) -> impl Iterator<Item = &PriceLevel> {
        self.levels.values().rev()
    }

    /// Breakpoint prices in ascending order
    pub fn prices(&self) -> Vec<Decimal> {
        self.levels.keys().copied().collect()
    }

    /// Snap an arbitrary price to the closest breakpoint. Ties go to the lower one.
    pub fn nearest(&self, price: Decimal) -> Option<Decimal> {
        self.levels
            .keys()
            .copied()
            .min_by(|a, b| (*a - price).abs().cmp(&(*b - price).abs()))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of bets across all breakpoints
    pub fn total_bets(&self) -> u64 {
        self.levels.values().map(PriceLevel::bet_count).sum()
    }

    /// Stake recorded across all breakpoints
    pub fn total_staked(&self) -> Decimal {
        self.levels.values().map(PriceLevel::staked).sum()
    }
}
