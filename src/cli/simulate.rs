//! Simulate command implementation

use crate::config::Config;
use crate::launch::{LaunchSession, Phase, PhaseEvent};
use crate::market::format_price;
use crate::model::{RandomSource, RngSource};
use crate::simulator::{ActivitySimulator, SessionDriver, TickReport};
use clap::Args;
use rust_decimal::Decimal;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Stop after this many ticks
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Random seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Session seconds advanced per tick
    #[arg(long)]
    pub step_secs: Option<u64>,

    /// Wall-clock milliseconds between ticks (0 runs flat out)
    #[arg(long)]
    pub tick_ms: Option<u64>,
}

impl SimulateArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let session = LaunchSession::new(
            config.launch.clone(),
            config.estimator.clone(),
            &config.reward,
        )?
        .with_max_history(config.simulator.max_history);

        let rng: Box<dyn RandomSource> = match self.seed.or(config.simulator.seed) {
            Some(seed) => Box::new(RngSource::seeded(seed)),
            None => Box::new(RngSource::from_entropy()),
        };
        let step = Duration::from_secs(self.step_secs.unwrap_or(config.simulator.step_secs));
        let interval = Duration::from_millis(self.tick_ms.unwrap_or(config.simulator.tick_ms));

        println!(
            "{} ({}) | discovery {}s | predict {}s | step {}s",
            config.launch.name,
            config.launch.symbol,
            config.launch.discovery_secs,
            config.launch.predict_secs,
            step.as_secs()
        );

        let mut driver = SessionDriver::new(
            session,
            ActivitySimulator::new(config.simulator.clone()),
            rng,
            step,
        );

        let mut printed = 0u64;
        let finished = tokio::select! {
            result = driver.run(interval, self.ticks, |report, session, simulator| {
                print_tick(report, session);
                for entry in simulator.since(printed) {
                    println!("    {}", entry);
                }
                printed = simulator.next_seq();
            }) => Some(result?),
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping simulation");
                None
            }
        };

        if let Some(summary) = finished {
            tracing::info!(
                ticks = summary.ticks,
                phase = %summary.phase,
                total_bets = summary.total_bets,
                "Simulation finished"
            );
        }

        print_summary(&mut driver)
    }
}

fn print_tick(report: &TickReport, session: &LaunchSession) {
    for event in &report.events {
        match event {
            PhaseEvent::PredictStarted { median, votes } => println!(
                "==> PREDICT open: median {} from {} votes",
                format_price(*median),
                votes
            ),
            PhaseEvent::Settled { price, total_bets } => println!(
                "==> SETTLED at {} ({} bets)",
                format_price(*price),
                total_bets
            ),
        }
    }

    let estimate = report
        .estimate
        .map(format_price)
        .unwrap_or_else(|| "-".to_string());
    println!(
        "[tick {:>4}] {:<9} est {:>8} | remaining {:>6}s | {:>5}% | bets {}",
        report.tick,
        report.phase.to_string(),
        estimate,
        session.remaining().as_secs(),
        session.progress().round_dp(1),
        session.store().total_bets()
    );
}

fn print_summary(driver: &mut SessionDriver) -> anyhow::Result<()> {
    let session = driver.session_mut();
    println!();
    println!("Phase: {}", session.phase());
    if let Some(median) = session.median() {
        println!("Discovery median: {}", format_price(median));
    }

    if session.phase() != Phase::Settled {
        if let Some(latest) = session.latest_estimate() {
            println!("Latest estimate: {}", format_price(latest.estimated_price));
        }
        return Ok(());
    }

    let settlement = session.settlement_price().unwrap_or_default();
    println!("Settlement price: {}", format_price(settlement));

    let owned: Vec<_> = session
        .bets()
        .iter()
        .map(|b| (b.id, b.bettor.clone()))
        .collect();
    let mut total_tokens = Decimal::ZERO;
    for (id, bettor) in &owned {
        total_tokens += session.claim(*id, bettor)?.tokens;
    }
    println!(
        "Claimed {} allocations, {} tokens total",
        owned.len(),
        total_tokens.round_dp(0)
    );

    println!();
    println!("{:>10} {:>6} {:>6} {:>7} {:>10}", "LEVEL", "YES", "NO", "YES%", "STAKED");
    for level in session.store().levels_desc() {
        println!(
            "{:>10} {:>6} {:>6} {:>6}% {:>10}",
            format_price(level.price()),
            level.yes_count(),
            level.no_count(),
            level.yes_pct().round_dp(1),
            level.staked().normalize()
        );
    }
    Ok(())
}
