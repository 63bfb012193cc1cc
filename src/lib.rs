//! launch-oracle: crowd-consensus settlement oracle for prediction-style token launches
//!
//! This library provides the core components for:
//! - Breakpoint market state (price levels, YES/NO demand)
//! - Settlement price estimation from weighted demand
//! - Accuracy, stake multipliers and token allocation
//! - The discovery -> predict -> settled launch lifecycle
//! - Synthetic activity simulation on a timer
//! - Wallet balance lookup with provider fallback
//! - Full observability stack

pub mod balance;
pub mod cli;
pub mod config;
pub mod launch;
pub mod market;
pub mod model;
pub mod reward;
pub mod simulator;
pub mod telemetry;
