//! Launch simulation module
//!
//! Synthetic participants plus a timer-driven loop over a launch session

mod activity;
mod driver;

pub use activity::{ActivityEntry, ActivitySimulator};
pub use driver::{RunSummary, SessionDriver, TickReport};
