//! Synthetic crowd activity
//!
//! Fills a launch session with random votes and bets so the estimate has
//! something to move on, and keeps a bounded human-readable feed of it.

use crate::config::SimulatorConfig;
use crate::launch::{LaunchError, LaunchSession, Phase, PhaseEvent};
use crate::market::{format_price, Side};
use crate::model::RandomSource;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::VecDeque;
use std::fmt;

const BASE58: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// One line of the activity feed
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    /// Monotonic sequence number
    pub seq: u64,
    pub at: DateTime<Utc>,
    pub tick: u64,
    pub message: String,
}

impl fmt::Display for ActivityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// Generates synthetic votes and bets
pub struct ActivitySimulator {
    config: SimulatorConfig,
    log: VecDeque<ActivityEntry>,
    next_seq: u64,
}

impl ActivitySimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            config,
            log: VecDeque::new(),
            next_seq: 0,
        }
    }

    /// Run one tick of synthetic activity against the session.
    ///
    /// Returns how many votes or bets were placed.
    pub fn tick(
        &mut self,
        session: &mut LaunchSession,
        rng: &mut dyn RandomSource,
    ) -> Result<usize, LaunchError> {
        match session.phase() {
            Phase::Discovery => {
                self.vote(session, rng)?;
                Ok(1)
            }
            Phase::Predict => {
                let max = self.config.max_bets_per_tick.max(1) as usize;
                let count = 1 + rng.next_index(max);
                for _ in 0..count {
                    self.bet(session, rng)?;
                }
                Ok(count)
            }
            Phase::Settled => Ok(0),
        }
    }

    /// Add a feed line for a phase transition
    pub fn note_event(&mut self, tick: u64, event: &PhaseEvent) {
        let message = match event {
            PhaseEvent::PredictStarted { median, votes } => format!(
                "Discovery closed: median {} from {} votes, predict is open",
                format_price(*median),
                votes
            ),
            PhaseEvent::Settled { price, total_bets } => format!(
                "Settled at {} after {} bets",
                format_price(*price),
                total_bets
            ),
        };
        self.push(tick, message);
    }

    /// Feed lines, oldest first
    pub fn log(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.log.iter()
    }

    /// Feed lines with a sequence number of at least `seq`
    pub fn since(&self, seq: u64) -> impl Iterator<Item = &ActivityEntry> {
        self.log.iter().filter(move |e| e.seq >= seq)
    }

    /// Sequence number the next line will get
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    /// Most recent feed line
    pub fn last_entry(&self) -> Option<&ActivityEntry> {
        self.log.back()
    }

    fn vote(&mut self, session: &mut LaunchSession, rng: &mut dyn RandomSource) -> Result<(), LaunchError> {
        // uniform between 0.5x and 2x of the expected median
        let factor = dec!(0.5) + dec!(1.5) * rng.next_decimal();
        let mcap = (session.config().default_median * factor).round();
        session.submit_vote(mcap)?;

        let wallet = fake_wallet(rng);
        self.push(
            session.tick(),
            format!("{} voted {} market cap", wallet, format_price(mcap)),
        );
        Ok(())
    }

    fn bet(&mut self, session: &mut LaunchSession, rng: &mut dyn RandomSource) -> Result<(), LaunchError> {
        let prices = session.store().prices();
        if prices.is_empty() {
            return Ok(());
        }
        let breakpoint = prices[rng.next_index(prices.len())];
        let side = if rng.next_bool() { Side::Yes } else { Side::No };
        let stake = self.pick_stake(rng);
        let wallet = fake_wallet(rng);

        session.place_bet(&wallet, breakpoint, side, stake)?;
        self.push(
            session.tick(),
            format!(
                "{} bet {} SOL {} @ {}",
                wallet,
                stake.normalize(),
                side,
                format_price(breakpoint)
            ),
        );
        Ok(())
    }

    fn pick_stake(&self, rng: &mut dyn RandomSource) -> Decimal {
        let menu = &self.config.stake_menu;
        if menu.is_empty() {
            return Decimal::ONE;
        }
        menu[rng.next_index(menu.len())]
    }

    fn push(&mut self, tick: u64, message: String) {
        let capacity = self.config.max_log_lines.max(1);
        while self.log.len() >= capacity {
            self.log.pop_front();
        }
        self.log.push_back(ActivityEntry {
            seq: self.next_seq,
            at: Utc::now(),
            tick,
            message,
        });
        self.next_seq += 1;
    }
}

/// Shortened wallet address, e.g. `7xKp…3fQa`
fn fake_wallet(rng: &mut dyn RandomSource) -> String {
    let mut pick = || BASE58[rng.next_index(BASE58.len())] as char;
    let head: String = (0..4).map(|_| pick()).collect();
    let tail: String = (0..4).map(|_| pick()).collect();
    format!("{}…{}", head, tail)
}
