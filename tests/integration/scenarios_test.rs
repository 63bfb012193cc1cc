//! Estimator and reward properties over public APIs

use launch_oracle::market::{PriceLevel, PriceLevelStore, Side};
use launch_oracle::model::{
    FixedRandom, PriceScale, RngSource, SequenceRandom, SettlementModel, WeightedDemandEstimator,
};
use launch_oracle::reward::{accuracy, base_accuracy, RewardCalculator, WRONG_SIDE_FACTOR};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn store_with(levels: &[(Decimal, u64, u64)]) -> PriceLevelStore {
    let mut store = PriceLevelStore::new();
    for &(price, yes, no) in levels {
        store
            .insert(PriceLevel::with_counts(price, yes, no).unwrap())
            .unwrap();
    }
    store
}

#[test]
fn test_empty_demand_stays_near_median() {
    let estimator = WeightedDemandEstimator::default();
    let store = store_with(&[(dec!(100000), 0, 0)]);
    let mut rng = RngSource::seeded(99);

    for _ in 0..500 {
        let estimate = estimator
            .estimate(&store, PriceScale::Median(dec!(100000)), &mut rng)
            .unwrap();
        assert!(estimate >= dec!(80000) && estimate <= dec!(120000), "{}", estimate);
    }
}

#[test]
fn test_empty_store_never_divides_by_zero() {
    let estimator = WeightedDemandEstimator::default();
    let store = PriceLevelStore::new();
    let mut rng = SequenceRandom::new(vec![0.0, 0.999_999, 0.5]);

    let low = estimator
        .estimate(&store, PriceScale::Median(dec!(40000)), &mut rng)
        .unwrap();
    let high = estimator
        .estimate(&store, PriceScale::Median(dec!(40000)), &mut rng)
        .unwrap();
    assert_eq!(low, dec!(36000));
    assert!(high > dec!(43999) && high <= dec!(44000));
}

#[test]
fn test_estimate_respects_clamp() {
    let estimator = WeightedDemandEstimator::default();
    // all demand far above the median
    let store = store_with(&[(dec!(10000000), 50, 0)]);
    let estimate = estimator
        .estimate(&store, PriceScale::Median(dec!(100000)), &mut FixedRandom::midpoint())
        .unwrap();
    assert_eq!(estimate, dec!(300000));

    let legacy = estimator
        .estimate(&store, PriceScale::Legacy, &mut FixedRandom::midpoint())
        .unwrap();
    assert_eq!(legacy, dec!(250000));
}

#[test]
fn test_exact_hit_accuracy_by_side() {
    assert_eq!(accuracy(dec!(100000), dec!(100000), Side::Yes).unwrap(), dec!(1));
    assert_eq!(accuracy(dec!(100000), dec!(100000), Side::No).unwrap(), dec!(0.67));
    assert_eq!(base_accuracy(dec!(100000), dec!(100000)).unwrap(), dec!(1));
}

#[test]
fn test_accuracy_decreases_with_distance() {
    let settlement = dec!(100000);
    let mut previous = dec!(1);
    for step in 1..=40 {
        let breakpoint = settlement + Decimal::from(step * 5000);
        let score = base_accuracy(breakpoint, settlement).unwrap();
        assert!(score < previous, "{} at {}", score, breakpoint);
        previous = score;
    }
}

#[test]
fn test_wrong_side_penalty_factor() {
    let settlement = dec!(100000);
    for breakpoint in [dec!(25000), dec!(90000), dec!(150000), dec!(400000)] {
        let (right, wrong) = if breakpoint <= settlement {
            (Side::Yes, Side::No)
        } else {
            (Side::No, Side::Yes)
        };
        let correct = accuracy(breakpoint, settlement, right).unwrap();
        let incorrect = accuracy(breakpoint, settlement, wrong).unwrap();
        assert_eq!(incorrect, correct * WRONG_SIDE_FACTOR);
    }
}

#[test]
fn test_multiplier_tiers_by_bet_count() {
    let calculator = RewardCalculator::default();
    let store = store_with(&[(dec!(100000), 0, 0), (dec!(200000), 250, 0)]);

    assert_eq!(calculator.multiplier(dec!(100000), &store), dec!(1.5));
    assert_eq!(calculator.multiplier(dec!(200000), &store), dec!(0.5));
}

#[test]
fn test_multiplier_non_increasing_with_stake() {
    let calculator = RewardCalculator::default();
    let mut previous = dec!(1.5);
    for bets in 0..60 {
        let store = store_with(&[(dec!(100000), bets, 0)]);
        let multiplier = calculator.multiplier(dec!(100000), &store);
        assert!(multiplier <= previous, "{} bets -> {}", bets, multiplier);
        previous = multiplier;
    }
    assert_eq!(previous, dec!(0.5));
}

#[test]
fn test_zero_stake_allocates_nothing() {
    let calculator = RewardCalculator::default();
    let store = PriceLevelStore::mock();
    for side in [Side::Yes, Side::No] {
        let allocation = calculator
            .allocate(dec!(150000), dec!(0), dec!(120000), side, &store)
            .unwrap();
        assert_eq!(allocation.tokens, dec!(0));
    }
}

#[test]
fn test_exact_hit_allocation() {
    let calculator = RewardCalculator::default();
    let store = store_with(&[(dec!(100000), 0, 0)]);
    let allocation = calculator
        .allocate(dec!(100000), dec!(1), dec!(100000), Side::Yes, &store)
        .unwrap();

    assert_eq!(allocation.weight, dec!(1.5));
    assert_eq!(allocation.tokens, dec!(2400000));
}

#[test]
fn test_invalid_inputs_are_errors() {
    let calculator = RewardCalculator::default();
    let store = PriceLevelStore::mock();
    assert!(calculator
        .allocate(dec!(100000), dec!(1), dec!(0), Side::Yes, &store)
        .is_err());
    assert!(calculator
        .allocate(dec!(100000), dec!(1), dec!(-5), Side::Yes, &store)
        .is_err());
    assert!(calculator
        .allocate(dec!(100000), dec!(-1), dec!(100000), Side::Yes, &store)
        .is_err());
}
