//! Launch lifecycle module
//!
//! Discovery voting, predict-phase betting and settlement for one token launch

mod countdown;
mod session;
mod types;

pub use countdown::Countdown;
pub use session::{median, LaunchSession, MAX_VOTE};
pub use types::{Bet, LaunchError, Phase, PhaseEvent, PricePoint};
