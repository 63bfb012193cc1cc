//! Quote and levels command implementations

use crate::config::Config;
use crate::market::{format_price, PriceLevelStore, Side};
use crate::model::{FixedRandom, PriceScale, SettlementModel, WeightedDemandEstimator};
use crate::reward::RewardCalculator;
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Breakpoint market cap
    #[arg(long)]
    pub breakpoint: Decimal,

    /// Amount staked (SOL)
    #[arg(long)]
    pub stake: Decimal,

    /// Predicted side: yes or no
    #[arg(long)]
    pub side: Side,

    /// Settlement price; defaults to the central estimate of the mock market
    #[arg(long)]
    pub settlement: Option<Decimal>,
}

impl QuoteArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let store = PriceLevelStore::mock();
        let calculator =
            RewardCalculator::from_config(&config.reward, config.launch.total_supply)?;
        let settlement = match self.settlement {
            Some(price) => price,
            None => central_estimate(config, &store)?,
        };

        let allocation =
            calculator.allocate(self.breakpoint, self.stake, settlement, self.side, &store)?;

        println!(
            "Bet {} SOL {} @ {}",
            self.stake.normalize(),
            self.side,
            format_price(self.breakpoint)
        );
        println!("  Settlement:  {}", format_price(settlement));
        println!("  Accuracy:    {}", allocation.accuracy.round_dp(4));
        println!("  Multiplier:  {}x", allocation.multiplier.normalize());
        println!("  Weight:      {}", allocation.weight.round_dp(4));
        println!("  Tokens:      {}", allocation.tokens.round_dp(0));
        Ok(())
    }
}

/// Print the mock market, highest breakpoint first
pub fn print_levels(config: &Config) -> anyhow::Result<()> {
    let store = PriceLevelStore::mock();
    let calculator =
        RewardCalculator::from_config(&config.reward, config.launch.total_supply)?;

    println!("{:>10} {:>6} {:>6} {:>7} {:>6}", "LEVEL", "YES", "NO", "YES%", "MULT");
    for level in store.levels_desc() {
        println!(
            "{:>10} {:>6} {:>6} {:>6}% {:>5}x",
            format_price(level.price()),
            level.yes_count(),
            level.no_count(),
            level.yes_pct().round_dp(1),
            calculator.multiplier(level.price(), &store).normalize()
        );
    }
    println!(
        "{} breakpoints, {} bets, central estimate {}",
        store.len(),
        store.total_bets(),
        format_price(central_estimate(config, &store)?)
    );
    Ok(())
}

/// Estimate with the noise term at zero
fn central_estimate(config: &Config, store: &PriceLevelStore) -> anyhow::Result<Decimal> {
    let estimator = WeightedDemandEstimator::new(config.estimator.clone());
    Ok(estimator.estimate(store, PriceScale::Legacy, &mut FixedRandom::midpoint())?)
}
