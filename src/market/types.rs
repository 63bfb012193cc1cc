//! Breakpoint types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Prediction side on a breakpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Price settles at or above the breakpoint
    Yes,
    /// Price settles below the breakpoint
    No,
}

impl Side {
    /// Whether this side wins for the given settlement
    pub fn is_correct(self, breakpoint: Decimal, settlement: Decimal) -> bool {
        match self {
            Side::Yes => settlement >= breakpoint,
            Side::No => settlement < breakpoint,
        }
    }

    /// The opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Yes => Side::No,
            Side::No => Side::Yes,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Yes => write!(f, "YES"),
            Side::No => write!(f, "NO"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yes" | "y" => Ok(Side::Yes),
            "no" | "n" => Ok(Side::No),
            other => Err(MarketError::InvalidSide(other.to_string())),
        }
    }
}

/// Timeline position of a single bet, used only for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub side: Side,
    /// Position on the phase timeline, 0 to 100
    pub position: Decimal,
}

/// One discrete price breakpoint and the bets placed on it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceLevel {
    price: Decimal,
    yes_count: u64,
    no_count: u64,
    /// Sum of recorded stake amounts
    staked: Decimal,
    markers: Vec<Marker>,
}

impl PriceLevel {
    /// Create an empty breakpoint
    pub fn new(price: Decimal) -> Result<Self, MarketError> {
        if price <= Decimal::ZERO {
            return Err(MarketError::InvalidBreakpoint(price));
        }
        Ok(Self {
            price,
            yes_count: 0,
            no_count: 0,
            staked: Decimal::ZERO,
            markers: Vec::new(),
        })
    }

    /// Create a breakpoint pre-filled with `yes` and `no` bets of zero stake.
    ///
    /// Markers are spread evenly across the timeline, alternating sides.
    pub fn with_counts(price: Decimal, yes: u64, no: u64) -> Result<Self, MarketError> {
        let mut level = Self::new(price)?;
        let total = yes + no;
        let (mut yes_left, mut no_left) = (yes, no);
        for i in 0..total {
            let position = Decimal::from(i * 100) / Decimal::from(total.max(1));
            let side = if (i % 2 == 0 && yes_left > 0) || no_left == 0 {
                yes_left -= 1;
                Side::Yes
            } else {
                no_left -= 1;
                Side::No
            };
            level.record(side, position, Decimal::ZERO);
        }
        Ok(level)
    }

    /// Record one bet. Counts and markers always move together.
    pub fn record(&mut self, side: Side, position: Decimal, stake: Decimal) {
        match side {
            Side::Yes => self.yes_count += 1,
            Side::No => self.no_count += 1,
        }
        self.staked += stake.max(Decimal::ZERO);
        self.markers.push(Marker {
            side,
            position: position.clamp(Decimal::ZERO, dec!(100)),
        });
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn yes_count(&self) -> u64 {
        self.yes_count
    }

    pub fn no_count(&self) -> u64 {
        self.no_count
    }

    /// Total number of bets on this breakpoint
    pub fn bet_count(&self) -> u64 {
        self.yes_count + self.no_count
    }

    pub fn staked(&self) -> Decimal {
        self.staked
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Share of bets on the yes side, 0 to 100
    pub fn yes_pct(&self) -> Decimal {
        match self.bet_count() {
            0 => dec!(50),
            n => Decimal::from(self.yes_count * 100) / Decimal::from(n),
        }
    }
}

/// Market data errors
#[derive(Debug, Error, PartialEq)]
pub enum MarketError {
    /// Breakpoint price must be positive
    #[error("Invalid breakpoint: {0}")]
    InvalidBreakpoint(Decimal),
    /// A breakpoint with this price already exists
    #[error("Duplicate breakpoint: {0}")]
    DuplicateBreakpoint(Decimal),
    /// No breakpoint with this price
    #[error("Unknown breakpoint: {0}")]
    UnknownBreakpoint(Decimal),
    /// Reference median must be positive
    #[error("Invalid median: {0}")]
    InvalidMedian(Decimal),
    /// Breakpoint ladder does not fit in a Decimal at this median
    #[error("Breakpoint overflow at median {0}")]
    Overflow(Decimal),
    /// Unparseable side
    #[error("Invalid side: {0} (expected yes or no)")]
    InvalidSide(String),
}

/// Format a market cap the way the launch page shows it ($1.2M, $100k, $500)
pub fn format_price(price: Decimal) -> String {
    if price >= dec!(1_000_000) {
        format!("${}M", (price / dec!(1_000_000)).round_dp(1))
    } else if price >= dec!(1000) {
        format!("${}k", (price / dec!(1000)).round())
    } else {
        format!("${}", price.normalize())
    }
}
