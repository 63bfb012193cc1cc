//! Launch session state machine
//!
//! discovery -> predict -> settled, advanced by an owned countdown.

use super::{Bet, Countdown, LaunchError, Phase, PhaseEvent, PricePoint};
use crate::config::{EstimatorConfig, LaunchConfig, RewardConfig};
use crate::market::{PriceLevelStore, Side};
use crate::model::{
    PriceScale, RandomSource, SettlementModel, SettlementSnapshot, WeightedDemandEstimator,
};
use crate::reward::{Allocation, RewardCalculator};
use crate::telemetry::{self, CounterMetric, GaugeMetric};
use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::VecDeque;
use std::time::Duration;
use uuid::Uuid;

const MAX_NAME_LEN: usize = 32;
const MAX_SYMBOL_LEN: usize = 10;
const MAX_DISCOVERY_SECS: u64 = 3600;
const MAX_PREDICT_SECS: u64 = 86_400;
const DEFAULT_HISTORY: usize = 100;
/// Largest accepted market-cap vote
pub const MAX_VOTE: Decimal = dec!(1000000000000000);

/// One token launch from discovery through settlement
pub struct LaunchSession {
    config: LaunchConfig,
    estimator: WeightedDemandEstimator,
    calculator: RewardCalculator,
    phase: Phase,
    countdown: Countdown,
    tick: u64,
    votes: Vec<Decimal>,
    median: Option<Decimal>,
    store: PriceLevelStore,
    bets: Vec<Bet>,
    latest: Option<SettlementSnapshot>,
    history: VecDeque<PricePoint>,
    max_history: usize,
    settlement: Option<Decimal>,
}

impl LaunchSession {
    /// Start a session in the discovery phase.
    ///
    /// Until discovery closes the store holds the static mock breakpoints.
    pub fn new(
        config: LaunchConfig,
        estimator: EstimatorConfig,
        reward: &RewardConfig,
    ) -> Result<Self, LaunchError> {
        validate(&config)?;
        let calculator = RewardCalculator::from_config(reward, config.total_supply)?;
        let countdown = Countdown::new(Duration::from_secs(config.discovery_secs));

        tracing::info!(
            name = %config.name,
            symbol = %config.symbol,
            discovery_secs = config.discovery_secs,
            predict_secs = config.predict_secs,
            "Launch created"
        );
        telemetry::set_gauge(GaugeMetric::Phase, f64::from(Phase::Discovery.code()));

        Ok(Self {
            config,
            estimator: WeightedDemandEstimator::new(estimator),
            calculator,
            phase: Phase::Discovery,
            countdown,
            tick: 0,
            votes: Vec::new(),
            median: None,
            store: PriceLevelStore::mock(),
            bets: Vec::new(),
            latest: None,
            history: VecDeque::new(),
            max_history: DEFAULT_HISTORY,
            settlement: None,
        })
    }

    /// Cap the estimate history
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history.max(1);
        self
    }

    /// Submit a market-cap vote during discovery
    pub fn submit_vote(&mut self, mcap: Decimal) -> Result<(), LaunchError> {
        self.require_phase(Phase::Discovery)?;
        if mcap <= Decimal::ZERO || mcap > MAX_VOTE {
            return Err(LaunchError::InvalidVote(mcap));
        }
        self.votes.push(mcap);
        telemetry::increment(CounterMetric::VotesSubmitted);
        tracing::debug!(%mcap, total_votes = self.votes.len(), "Vote submitted");
        Ok(())
    }

    /// Place a bet on an existing breakpoint during predict
    pub fn place_bet(
        &mut self,
        bettor: &str,
        breakpoint: Decimal,
        side: Side,
        amount: Decimal,
    ) -> Result<Bet, LaunchError> {
        self.require_phase(Phase::Predict)?;
        if amount <= Decimal::ZERO {
            return Err(LaunchError::InvalidAmount(amount));
        }

        // Multiplier reflects stake already on the breakpoint, before this bet
        let multiplier = self.calculator.multiplier(breakpoint, &self.store);
        self.store
            .record_bet(breakpoint, side, self.countdown.progress(), amount)?;

        let bet = Bet {
            id: Uuid::new_v4(),
            bettor: bettor.to_string(),
            breakpoint,
            side,
            amount,
            multiplier,
            tick: self.tick,
            placed_at: Utc::now(),
            claimed: false,
        };
        self.bets.push(bet.clone());

        telemetry::increment(CounterMetric::BetsPlaced);
        telemetry::set_gauge(GaugeMetric::TotalBets, self.store.total_bets() as f64);
        tracing::debug!(id = %bet.id, bettor, %breakpoint, %side, %amount, %multiplier, "Bet placed");
        Ok(bet)
    }

    /// Advance session time, firing any phase transitions that come due
    pub fn advance(
        &mut self,
        elapsed: Duration,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<PhaseEvent>, LaunchError> {
        if self.phase == Phase::Settled {
            return Ok(Vec::new());
        }
        self.tick += 1;
        let mut events = Vec::new();
        let mut pending = elapsed;

        while self.phase != Phase::Settled {
            let Some(carry) = self.countdown.advance(pending) else {
                break;
            };
            let event = match self.phase {
                Phase::Discovery => self.start_predict()?,
                Phase::Predict => self.settle(rng)?,
                Phase::Settled => break,
            };
            events.push(event);
            pending = carry;
        }

        Ok(events)
    }

    /// Recompute the live settlement estimate
    ///
    /// Before a median exists the estimate uses the legacy absolute bounds.
    pub fn refresh_estimate(
        &mut self,
        rng: &mut dyn RandomSource,
    ) -> Result<SettlementSnapshot, LaunchError> {
        if self.phase == Phase::Settled {
            return Err(LaunchError::WrongPhase {
                expected: Phase::Predict,
                actual: self.phase,
            });
        }
        let started = std::time::Instant::now();
        let price = self
            .estimator
            .estimate(&self.store, PriceScale::from(self.median), rng)?;
        telemetry::record_latency(telemetry::LatencyMetric::Estimate, started.elapsed());

        Ok(self.record_snapshot(price))
    }

    /// What-if allocation for a hypothetical bet.
    ///
    /// Without an explicit settlement the final price is used, then the latest
    /// estimate, then the reference scale.
    pub fn quote(
        &self,
        breakpoint: Decimal,
        stake: Decimal,
        side: Side,
        settlement: Option<Decimal>,
    ) -> Result<Allocation, LaunchError> {
        let settlement = settlement
            .or(self.settlement)
            .or_else(|| self.latest.as_ref().map(|s| s.estimated_price))
            .unwrap_or_else(|| self.reference_price());
        Ok(self
            .calculator
            .allocate(breakpoint, stake, settlement, side, &self.store)?)
    }

    /// Claim the allocation for a bet after settlement.
    ///
    /// Only the wallet that placed the bet may claim it.
    pub fn claim(&mut self, bet_id: Uuid, bettor: &str) -> Result<Allocation, LaunchError> {
        self.require_phase(Phase::Settled)?;
        let settlement = self
            .settlement
            .ok_or(LaunchError::WrongPhase {
                expected: Phase::Settled,
                actual: self.phase,
            })?;
        let bet = self
            .bets
            .iter_mut()
            .find(|b| b.id == bet_id)
            .ok_or(LaunchError::UnknownBet(bet_id))?;
        if bet.bettor != bettor {
            return Err(LaunchError::NotBettor(bet_id));
        }
        if bet.claimed {
            return Err(LaunchError::AlreadyClaimed(bet_id));
        }

        let allocation = self.calculator.allocate_with_multiplier(
            bet.breakpoint,
            bet.amount,
            settlement,
            bet.side,
            bet.multiplier,
        )?;
        bet.claimed = true;

        tracing::info!(
            bet = %bet_id,
            bettor,
            tokens = %allocation.tokens,
            accuracy = %allocation.accuracy,
            "Tokens claimed"
        );
        Ok(allocation)
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    pub fn calculator(&self) -> &RewardCalculator {
        &self.calculator
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Time left in the current phase
    pub fn remaining(&self) -> Duration {
        self.countdown.remaining()
    }

    /// Elapsed share of the current phase, 0 to 100
    pub fn progress(&self) -> Decimal {
        self.countdown.progress()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn votes(&self) -> &[Decimal] {
        &self.votes
    }

    /// Discovery median, once discovery has closed
    pub fn median(&self) -> Option<Decimal> {
        self.median
    }

    pub fn store(&self) -> &PriceLevelStore {
        &self.store
    }

    pub fn bets(&self) -> &[Bet] {
        &self.bets
    }

    pub fn latest_estimate(&self) -> Option<&SettlementSnapshot> {
        self.latest.as_ref()
    }

    pub fn history(&self) -> impl Iterator<Item = &PricePoint> {
        self.history.iter()
    }

    /// Final settlement price, once settled
    pub fn settlement_price(&self) -> Option<Decimal> {
        self.settlement
    }

    fn reference_price(&self) -> Decimal {
        self.median.unwrap_or(self.config.default_median)
    }

    fn require_phase(&self, expected: Phase) -> Result<(), LaunchError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(LaunchError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn start_predict(&mut self) -> Result<PhaseEvent, LaunchError> {
        let median = median(&self.votes).unwrap_or(self.config.default_median);
        self.store = PriceLevelStore::from_median(median, &self.config.breakpoint_ladder)?;
        self.median = Some(median);
        self.phase = Phase::Predict;
        self.countdown = Countdown::new(Duration::from_secs(self.config.predict_secs));
        self.latest = None;
        self.history.clear();

        tracing::info!(
            %median,
            votes = self.votes.len(),
            breakpoints = self.store.len(),
            "Discovery closed, predict phase started"
        );
        telemetry::set_gauge(GaugeMetric::DiscoveryMedian, to_f64(median));
        telemetry::set_gauge(GaugeMetric::Phase, f64::from(Phase::Predict.code()));

        Ok(PhaseEvent::PredictStarted {
            median,
            votes: self.votes.len(),
        })
    }

    fn settle(&mut self, rng: &mut dyn RandomSource) -> Result<PhaseEvent, LaunchError> {
        let price = self
            .estimator
            .estimate(&self.store, PriceScale::from(self.median), rng)?;
        self.record_snapshot(price);
        self.settlement = Some(price);
        self.phase = Phase::Settled;

        let total_bets = self.store.total_bets();
        tracing::info!(
            settlement_price = %price,
            total_bets,
            total_staked = %self.store.total_staked(),
            "Launch settled"
        );
        telemetry::set_gauge(GaugeMetric::Phase, f64::from(Phase::Settled.code()));

        Ok(PhaseEvent::Settled { price, total_bets })
    }

    fn record_snapshot(&mut self, price: Decimal) -> SettlementSnapshot {
        let snapshot = SettlementSnapshot::new(price, self.tick);
        if self.history.len() >= self.max_history {
            self.history.pop_front();
        }
        self.history.push_back(PricePoint {
            time: self.countdown.progress(),
            price,
        });
        self.latest = Some(snapshot.clone());
        telemetry::set_gauge(GaugeMetric::SettlementEstimate, to_f64(price));
        snapshot
    }
}

/// Median of the collected votes; mean of the middle pair for even counts
pub fn median(votes: &[Decimal]) -> Option<Decimal> {
    if votes.is_empty() {
        return None;
    }
    let mut sorted = votes.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        let (low, high) = (sorted[mid - 1], sorted[mid]);
        Some(match low.checked_add(high) {
            Some(sum) => sum / dec!(2),
            // same sign and too large to sum: halve the gap instead
            None => low + (high - low) / dec!(2),
        })
    } else {
        Some(sorted[mid])
    }
}

fn validate(config: &LaunchConfig) -> Result<(), LaunchError> {
    if config.name.chars().count() > MAX_NAME_LEN {
        return Err(LaunchError::NameTooLong);
    }
    if config.symbol.chars().count() > MAX_SYMBOL_LEN {
        return Err(LaunchError::SymbolTooLong);
    }
    if config.discovery_secs == 0 || config.discovery_secs > MAX_DISCOVERY_SECS {
        return Err(LaunchError::InvalidDuration(config.discovery_secs));
    }
    if config.predict_secs == 0 || config.predict_secs > MAX_PREDICT_SECS {
        return Err(LaunchError::InvalidDuration(config.predict_secs));
    }
    if config.total_supply == 0 {
        return Err(LaunchError::InvalidSupply);
    }
    if config.default_median <= Decimal::ZERO || config.default_median > MAX_VOTE {
        return Err(LaunchError::InvalidDefaultMedian(config.default_median));
    }
    if config.breakpoint_ladder.is_empty() {
        return Err(LaunchError::EmptyLadder);
    }
    if let Some(factor) = config
        .breakpoint_ladder
        .iter()
        .find(|factor| **factor <= Decimal::ZERO)
    {
        return Err(LaunchError::InvalidLadderFactor(*factor));
    }
    // duplicate or oversized factors surface here rather than at the phase change
    PriceLevelStore::from_median(MAX_VOTE, &config.breakpoint_ladder)?;
    Ok(())
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
