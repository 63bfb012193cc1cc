//! Reward module
//!
//! Accuracy scoring, stake multipliers and token allocation

mod accuracy;
mod calculator;
mod multiplier;
mod types;

pub use accuracy::{accuracy, base_accuracy, WRONG_SIDE_FACTOR};
pub use calculator::{participant_share, RewardCalculator};
pub use multiplier::{MultiplierTable, UNSTAKED_MULTIPLIER};
pub use types::{Allocation, MultiplierTier, RewardError, StakeBasis, DEFAULT_TIERS};
