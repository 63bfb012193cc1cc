//! Tick driver
//!
//! Each tick runs synthetic activity, advances session time by a fixed step
//! and refreshes the live estimate.

use super::ActivitySimulator;
use crate::launch::{LaunchError, LaunchSession, Phase, PhaseEvent};
use crate::model::RandomSource;
use rust_decimal::Decimal;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Outcome of one driver tick
#[derive(Debug, Clone)]
pub struct TickReport {
    pub tick: u64,
    pub phase: Phase,
    /// Votes or bets placed this tick
    pub actions: usize,
    pub events: Vec<PhaseEvent>,
    /// Live estimate after the tick, or the final price once settled
    pub estimate: Option<Decimal>,
}

/// Summary returned when a run stops
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub phase: Phase,
    pub settlement: Option<Decimal>,
    pub total_bets: u64,
}

/// Owns a session and pushes it forward tick by tick
pub struct SessionDriver {
    session: LaunchSession,
    simulator: ActivitySimulator,
    rng: Box<dyn RandomSource>,
    step: Duration,
}

impl SessionDriver {
    pub fn new(
        session: LaunchSession,
        simulator: ActivitySimulator,
        rng: Box<dyn RandomSource>,
        step: Duration,
    ) -> Self {
        Self {
            session,
            simulator,
            rng,
            step,
        }
    }

    /// Run a single tick
    pub fn step(&mut self) -> Result<TickReport, LaunchError> {
        let actions = self.simulator.tick(&mut self.session, self.rng.as_mut())?;
        let events = self.session.advance(self.step, self.rng.as_mut())?;
        let tick = self.session.tick();
        for event in &events {
            self.simulator.note_event(tick, event);
        }

        let estimate = if self.session.phase() == Phase::Settled {
            self.session.settlement_price()
        } else {
            Some(self.session.refresh_estimate(self.rng.as_mut())?.estimated_price)
        };

        tracing::debug!(
            tick,
            phase = %self.session.phase(),
            actions,
            estimate = ?estimate,
            "Tick complete"
        );

        Ok(TickReport {
            tick,
            phase: self.session.phase(),
            actions,
            events,
            estimate,
        })
    }

    /// Step on a timer until the session settles or `max_ticks` is reached.
    ///
    /// A zero `interval` steps back to back.
    pub async fn run<F>(
        &mut self,
        interval: Duration,
        max_ticks: Option<u64>,
        mut on_tick: F,
    ) -> Result<RunSummary, LaunchError>
    where
        F: FnMut(&TickReport, &LaunchSession, &ActivitySimulator),
    {
        let mut timer = (!interval.is_zero()).then(|| {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            timer
        });
        let mut ticks = 0u64;

        while self.session.phase() != Phase::Settled {
            if max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }
            match timer.as_mut() {
                Some(timer) => {
                    timer.tick().await;
                }
                None => tokio::task::yield_now().await,
            }

            let report = self.step()?;
            ticks += 1;
            on_tick(&report, &self.session, &self.simulator);
        }

        Ok(self.summary(ticks))
    }

    pub fn session(&self) -> &LaunchSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut LaunchSession {
        &mut self.session
    }

    pub fn simulator(&self) -> &ActivitySimulator {
        &self.simulator
    }

    pub fn into_session(self) -> LaunchSession {
        self.session
    }

    fn summary(&self, ticks: u64) -> RunSummary {
        RunSummary {
            ticks,
            phase: self.session.phase(),
            settlement: self.session.settlement_price(),
            total_bets: self.session.store().total_bets(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EstimatorConfig, LaunchConfig, RewardConfig, SimulatorConfig};
    use crate::model::{FixedRandom, RngSource};

    fn driver(rng: Box<dyn RandomSource>) -> SessionDriver {
        let config = LaunchConfig {
            discovery_secs: 60,
            predict_secs: 300,
            ..LaunchConfig::default()
        };
        let session =
            LaunchSession::new(config, EstimatorConfig::default(), &RewardConfig::default()).unwrap();
        SessionDriver::new(
            session,
            ActivitySimulator::new(SimulatorConfig::default()),
            rng,
            Duration::from_secs(30),
        )
    }

    #[test]
    fn test_step_through_phases() {
        let mut driver = driver(Box::new(FixedRandom::midpoint()));

        let first = driver.step().unwrap();
        assert_eq!(first.phase, Phase::Discovery);
        assert_eq!(first.actions, 1);
        assert!(first.events.is_empty());
        assert!(first.estimate.is_some());

        let second = driver.step().unwrap();
        assert_eq!(second.phase, Phase::Predict);
        assert!(matches!(
            second.events.as_slice(),
            [PhaseEvent::PredictStarted { votes: 2, .. }]
        ));
        let line = &driver.simulator().last_entry().unwrap().message;
        assert!(line.starts_with("Discovery closed"), "{}", line);
    }

    #[tokio::test]
    async fn test_run_to_settlement() {
        let mut driver = driver(Box::new(RngSource::seeded(42)));
        let mut seen = 0;
        let summary = driver
            .run(Duration::ZERO, None, |_, _, _| seen += 1)
            .await
            .unwrap();

        // 60s discovery + 300s predict in 30s steps
        assert_eq!(summary.ticks, 12);
        assert_eq!(seen, 12);
        assert_eq!(summary.phase, Phase::Settled);
        let price = summary.settlement.unwrap();
        let median = driver.session().median().unwrap();
        assert!(price >= median * Decimal::new(2, 1));
        assert!(price <= median * Decimal::from(3));
        assert!(summary.total_bets >= 10);
    }

    #[tokio::test]
    async fn test_run_respects_max_ticks() {
        let mut driver = driver(Box::new(RngSource::seeded(1)));
        let summary = driver
            .run(Duration::from_millis(1), Some(3), |_, _, _| {})
            .await
            .unwrap();
        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.phase, Phase::Predict);
        assert_eq!(summary.settlement, None);
    }

    #[tokio::test]
    async fn test_same_seed_same_settlement() {
        let mut a = driver(Box::new(RngSource::seeded(7)));
        let mut b = driver(Box::new(RngSource::seeded(7)));
        let left = a.run(Duration::ZERO, None, |_, _, _| {}).await.unwrap();
        let right = b.run(Duration::ZERO, None, |_, _, _| {}).await.unwrap();
        assert_eq!(left, right);
    }
}
