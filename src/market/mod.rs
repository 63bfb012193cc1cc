//! Breakpoint market module
//!
//! Discrete price breakpoints with yes/no bet counts

mod store;
mod types;

pub use store::{PriceLevelStore, DEFAULT_LADDER};
pub use types::{format_price, MarketError, Marker, PriceLevel, Side};
