//! Launch session types

use crate::market::{MarketError, Side};
use crate::model::EstimateError;
use crate::reward::RewardError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Launch phase. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Collecting market-cap votes
    Discovery,
    /// Accepting breakpoint bets
    Predict,
    /// Final price fixed; terminal
    Settled,
}

impl Phase {
    /// Numeric code used for gauges
    pub fn code(self) -> u8 {
        match self {
            Phase::Discovery => 0,
            Phase::Predict => 1,
            Phase::Settled => 2,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Discovery => write!(f, "DISCOVERY"),
            Phase::Predict => write!(f, "PREDICT"),
            Phase::Settled => write!(f, "SETTLED"),
        }
    }
}

/// A bet placed during the predict phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bet {
    /// Unique bet identifier
    pub id: Uuid,
    /// Wallet that placed the bet
    pub bettor: String,
    /// Breakpoint the bet is on
    pub breakpoint: Decimal,
    /// Predicted side
    pub side: Side,
    /// Amount staked (SOL)
    pub amount: Decimal,
    /// Multiplier locked in when the bet was placed
    pub multiplier: Decimal,
    /// Session tick the bet was placed on
    pub tick: u64,
    /// Placement time
    pub placed_at: DateTime<Utc>,
    /// Whether the allocation has been claimed
    pub claimed: bool,
}

/// One point of the settlement estimate history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Position on the phase timeline, 0 to 100
    pub time: Decimal,
    /// Estimated settlement price
    pub price: Decimal,
}

/// Phase transitions reported by [`super::LaunchSession::advance`]
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseEvent {
    /// Discovery closed and the predict ladder was built
    PredictStarted { median: Decimal, votes: usize },
    /// Predict closed and the final price was fixed
    Settled { price: Decimal, total_bets: u64 },
}

/// Launch session errors
#[derive(Debug, Error, PartialEq)]
pub enum LaunchError {
    #[error("Name too long (max 32 chars)")]
    NameTooLong,
    #[error("Symbol too long (max 10 chars)")]
    SymbolTooLong,
    #[error("Invalid duration: {0}s")]
    InvalidDuration(u64),
    #[error("Invalid total supply")]
    InvalidSupply,
    #[error("Invalid default median: {0}")]
    InvalidDefaultMedian(Decimal),
    #[error("Breakpoint ladder is empty")]
    EmptyLadder,
    #[error("Invalid ladder factor: {0}")]
    InvalidLadderFactor(Decimal),
    #[error("Wrong phase: expected {expected}, currently {actual}")]
    WrongPhase { expected: Phase, actual: Phase },
    #[error("Invalid vote: {0}")]
    InvalidVote(Decimal),
    #[error("Invalid bet amount: {0}")]
    InvalidAmount(Decimal),
    #[error("Unknown bet: {0}")]
    UnknownBet(Uuid),
    #[error("Tokens already claimed for bet {0}")]
    AlreadyClaimed(Uuid),
    #[error("Bet {0} belongs to another wallet")]
    NotBettor(Uuid),
    #[error(transparent)]
    Market(#[from] MarketError),
    #[error(transparent)]
    Estimate(#[from] EstimateError),
    #[error(transparent)]
    Reward(#[from] RewardError),
}
