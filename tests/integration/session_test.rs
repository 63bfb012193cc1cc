//! Launch lifecycle through the simulator driver

use launch_oracle::config::{EstimatorConfig, LaunchConfig, RewardConfig, SimulatorConfig};
use launch_oracle::launch::{LaunchError, LaunchSession, Phase, PhaseEvent};
use launch_oracle::market::Side;
use launch_oracle::model::{FixedRandom, RngSource};
use launch_oracle::reward::StakeBasis;
use launch_oracle::simulator::{ActivitySimulator, SessionDriver};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

const ALICE: &str = "7xKp…3fQa";
const BOB: &str = "9aBc…2dEf";

fn launch(discovery_secs: u64, predict_secs: u64) -> LaunchSession {
    let config = LaunchConfig {
        name: "Oods".to_string(),
        symbol: "OODS".to_string(),
        discovery_secs,
        predict_secs,
        ..LaunchConfig::default()
    };
    LaunchSession::new(config, EstimatorConfig::default(), &RewardConfig::default()).unwrap()
}

#[test]
fn test_manual_lifecycle() {
    let mut session = launch(120, 3600);
    let mut rng = FixedRandom::midpoint();

    for vote in [dec!(90000), dec!(110000), dec!(200000)] {
        session.submit_vote(vote).unwrap();
    }
    let events = session.advance(Duration::from_secs(120), &mut rng).unwrap();
    assert_eq!(
        events,
        vec![PhaseEvent::PredictStarted {
            median: dec!(110000),
            votes: 3
        }]
    );

    let ladder: Vec<Decimal> = session.store().prices();
    assert_eq!(ladder.first(), Some(&dec!(27500)));
    assert_eq!(ladder.last(), Some(&dec!(440000)));

    let near = session.store().nearest(dec!(100000)).unwrap();
    assert_eq!(near, dec!(110000));
    let yes = session.place_bet(ALICE, near, Side::Yes, dec!(2)).unwrap();
    let no = session.place_bet(BOB, dec!(220000), Side::No, dec!(1)).unwrap();

    // halfway through predict
    session.advance(Duration::from_secs(1800), &mut rng).unwrap();
    let late = session.place_bet(ALICE, dec!(165000), Side::Yes, dec!(1)).unwrap();
    let marker = session.store().get(dec!(165000)).unwrap().markers()[0];
    assert_eq!(marker.position, dec!(50));
    assert_eq!(marker.side, Side::Yes);

    let events = session.advance(Duration::from_secs(1800), &mut rng).unwrap();
    let price = match events.as_slice() {
        [PhaseEvent::Settled { price, total_bets: 3 }] => *price,
        other => panic!("unexpected events: {:?}", other),
    };
    assert!(price >= dec!(22000) && price <= dec!(330000));

    assert_eq!(
        session.claim(no.id, ALICE),
        Err(LaunchError::NotBettor(no.id))
    );

    let mut total = Decimal::ZERO;
    for bet in [&yes, &no, &late] {
        let allocation = session.claim(bet.id, &bet.bettor).unwrap();
        assert!(allocation.tokens > Decimal::ZERO);
        assert_eq!(allocation.multiplier, bet.multiplier);
        total += allocation.tokens;
    }
    assert!(total > Decimal::ZERO);
}

#[test]
fn test_staked_basis_changes_multiplier() {
    let reward = RewardConfig {
        stake_basis: StakeBasis::Staked,
        ..RewardConfig::default()
    };
    let config = LaunchConfig {
        discovery_secs: 10,
        predict_secs: 100,
        ..LaunchConfig::default()
    };
    let mut session = LaunchSession::new(config, EstimatorConfig::default(), &reward).unwrap();
    session
        .advance(Duration::from_secs(10), &mut FixedRandom::midpoint())
        .unwrap();

    session.place_bet(ALICE, dec!(100000), Side::Yes, dec!(250)).unwrap();
    let next = session.place_bet(BOB, dec!(100000), Side::Yes, dec!(1)).unwrap();
    // 250 staked -> tier (200, 1.1)
    assert_eq!(next.multiplier, dec!(1.1));
}

#[test]
fn test_driver_run_with_blocking_runtime() {
    let session = launch(60, 600);
    let mut driver = SessionDriver::new(
        session,
        ActivitySimulator::new(SimulatorConfig {
            max_log_lines: 8,
            ..SimulatorConfig::default()
        }),
        Box::new(RngSource::seeded(2024)),
        Duration::from_secs(60),
    );

    let mut estimates = Vec::new();
    let summary = tokio_test::block_on(driver.run(Duration::ZERO, None, |report, _, _| {
        estimates.push(report.estimate);
    }))
    .unwrap();

    assert_eq!(summary.phase, Phase::Settled);
    assert_eq!(summary.ticks, 11);
    assert!(estimates.iter().all(Option::is_some));
    assert_eq!(estimates.last().copied().flatten(), summary.settlement);
    assert_eq!(driver.simulator().log().count(), 8);
    assert!(driver.session().history().count() > 0);

    let mut session = driver.into_session();
    let owned: Vec<_> = session
        .bets()
        .iter()
        .map(|b| (b.id, b.bettor.clone()))
        .collect();
    assert_eq!(owned.len() as u64, summary.total_bets);
    for (id, bettor) in &owned {
        assert!(session.claim(*id, bettor).is_ok());
    }
}

#[tokio::test]
async fn test_driver_stops_at_tick_limit() {
    let session = launch(600, 3600);
    let mut driver = SessionDriver::new(
        session,
        ActivitySimulator::new(SimulatorConfig::default()),
        Box::new(RngSource::seeded(5)),
        Duration::from_secs(60),
    );
    let summary = driver
        .run(Duration::from_millis(1), Some(4), |_, _, _| {})
        .await
        .unwrap();

    assert_eq!(summary.ticks, 4);
    assert_eq!(summary.phase, Phase::Discovery);
    assert_eq!(driver.session().votes().len(), 4);
    assert!(driver.session().latest_estimate().is_some());
}
