//! Configuration loading and wiring

use launch_oracle::config::{Config, API_KEY_ENV};
use launch_oracle::launch::LaunchSession;
use launch_oracle::market::Side;
use launch_oracle::model::FixedRandom;
use launch_oracle::reward::RewardCalculator;
use rust_decimal_macros::dec;
use std::io::Write;
use std::time::Duration;

#[test]
fn test_example_config_builds_session() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    let session = LaunchSession::new(
        config.launch.clone(),
        config.estimator.clone(),
        &config.reward,
    )
    .unwrap();
    assert_eq!(session.config().symbol, "DEMO");
    assert_eq!(session.config().breakpoint_ladder.len(), 8);

    let calculator =
        RewardCalculator::from_config(&config.reward, config.launch.total_supply).unwrap();
    assert_eq!(calculator.table().tiers().len(), 7);
    assert_eq!(calculator.participant_share(), dec!(800000000));
    assert_eq!(config.simulator.stake_menu.len(), 5);
    assert_eq!(config.server.bind, "0.0.0.0:3000");
}

#[test]
fn test_partial_file_keeps_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[launch]\nname = \"Oods\"\nsymbol = \"OODS\"\n\n[reward]\nweight_normalizer = 250"
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.launch.name, "Oods");
    assert_eq!(config.launch.discovery_secs, 300);
    assert_eq!(config.reward.weight_normalizer, dec!(250));
    assert_eq!(config.reward.tiers.len(), 7);
    assert_eq!(config.balance.timeout_secs, 10);
}

#[test]
fn test_invalid_tier_table_rejected() {
    let toml = r#"
        [[reward.tiers]]
        threshold = 100
        multiplier = 1.0

        [[reward.tiers]]
        threshold = 0
        multiplier = 1.5
    "#;
    let config: Config = toml::from_str(toml).unwrap();
    assert!(RewardCalculator::from_config(&config.reward, config.launch.total_supply).is_err());
}

#[test]
fn test_supply_drives_session_rewards() {
    let toml = r#"
        [launch]
        total_supply = 2000000000
        discovery_secs = 10
        predict_secs = 100

        [reward]
        participant_pct = 80
    "#;
    let config: Config = toml::from_str(toml).unwrap();
    let mut session =
        LaunchSession::new(config.launch, config.estimator, &config.reward).unwrap();
    assert_eq!(session.calculator().participant_share(), dec!(1600000000));

    session
        .advance(Duration::from_secs(10), &mut FixedRandom::midpoint())
        .unwrap();
    let quote = session
        .quote(dec!(100000), dec!(1), Side::Yes, Some(dec!(100000)))
        .unwrap();
    // twice the supply, twice the 2.4M tokens
    assert_eq!(quote.tokens, dec!(4800000));
}

#[test]
fn test_participant_pct_out_of_range_rejected() {
    let config: Config = toml::from_str("[reward]\nparticipant_pct = 120").unwrap();
    let result = LaunchSession::new(config.launch, config.estimator, &config.reward);
    assert!(result.is_err());
}

#[test]
fn test_env_key_override() {
    std::env::set_var(API_KEY_ENV, "from-env");
    let config = Config::default().with_env();
    std::env::remove_var(API_KEY_ENV);

    assert_eq!(config.balance.api_key.as_deref(), Some("from-env"));
    // the key never leaks into serialized output
    let rendered = toml::to_string(&config).unwrap();
    assert!(!rendered.contains("from-env"));
}
