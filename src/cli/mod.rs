//! CLI interface for launch-oracle
//!
//! Provides subcommands for:
//! - `simulate`: Run a simulated launch end to end
//! - `quote`: What-if token allocation for a bet
//! - `levels`: Show the mock breakpoint market
//! - `serve`: Run the balance lookup server
//! - `config`: Show the effective configuration

mod quote;
mod serve;
mod simulate;

pub use quote::{print_levels, QuoteArgs};
pub use serve::ServeArgs;
pub use simulate::SimulateArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "launch-oracle")]
#[command(about = "Crowd-consensus settlement oracle for prediction-style token launches")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a simulated launch
    Simulate(SimulateArgs),
    /// Quote the token allocation for a bet
    Quote(QuoteArgs),
    /// Show the mock breakpoint market
    Levels,
    /// Run the balance lookup server
    Serve(ServeArgs),
    /// Show configuration
    Config,
}
