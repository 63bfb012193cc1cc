//! Configuration types for launch-oracle

use crate::reward::{MultiplierTier, StakeBasis, DEFAULT_TIERS};
use crate::telemetry::LogFormat;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Environment variable holding the preferred RPC provider key
pub const API_KEY_ENV: &str = "HELIUS_API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub launch: LaunchConfig,
    #[serde(default)]
    pub estimator: EstimatorConfig,
    #[serde(default)]
    pub reward: RewardConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub balance: BalanceConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Token launch parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LaunchConfig {
    /// Token name (max 32 chars)
    #[serde(default = "default_name")]
    pub name: String,

    /// Token symbol (max 10 chars)
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Total token supply
    #[serde(default = "default_total_supply")]
    pub total_supply: u64,

    /// Discovery phase length (seconds)
    #[serde(default = "default_discovery_secs")]
    pub discovery_secs: u64,

    /// Predict phase length (seconds)
    #[serde(default = "default_predict_secs")]
    pub predict_secs: u64,

    /// Median used when discovery collects no votes
    #[serde(default = "default_median")]
    pub default_median: Decimal,

    /// Breakpoints as multiples of the discovery median
    #[serde(default = "default_ladder")]
    pub breakpoint_ladder: Vec<Decimal>,
}

fn default_name() -> String {
    "Demo Token".to_string()
}
fn default_symbol() -> String {
    "DEMO".to_string()
}
fn default_total_supply() -> u64 {
    1_000_000_000
}
fn default_discovery_secs() -> u64 {
    300 // 5 minutes
}
fn default_predict_secs() -> u64 {
    86_400 // 24 hours
}
fn default_median() -> Decimal {
    dec!(100000)
}
fn default_ladder() -> Vec<Decimal> {
    crate::market::DEFAULT_LADDER.to_vec()
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            symbol: default_symbol(),
            total_supply: default_total_supply(),
            discovery_secs: default_discovery_secs(),
            predict_secs: default_predict_secs(),
            default_median: default_median(),
            breakpoint_ladder: default_ladder(),
        }
    }
}

/// Settlement estimator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Total noise width as a fraction of the reference (0.2 = ±10%)
    pub noise_width: Decimal,
    /// Lower clamp as a multiple of the median
    pub floor_ratio: Decimal,
    /// Upper clamp as a multiple of the median
    pub ceiling_ratio: Decimal,
    /// Reference used when no median is defined
    pub legacy_reference: Decimal,
    /// Absolute lower clamp when no median is defined
    pub legacy_floor: Decimal,
    /// Absolute upper clamp when no median is defined
    pub legacy_ceiling: Decimal,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            noise_width: dec!(0.2),
            floor_ratio: dec!(0.2),
            ceiling_ratio: dec!(3),
            legacy_reference: dec!(100000),
            legacy_floor: dec!(25000),
            legacy_ceiling: dec!(250000),
        }
    }
}

/// Reward calculator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Percentage of the launch's total supply distributed to bettors
    pub participant_pct: Decimal,
    /// Fixed weight the share is normalized against
    pub weight_normalizer: Decimal,
    /// Stake assumed per bet when only counts are known
    pub unit_stake: Decimal,
    /// Lookahead band added to each tier threshold
    pub tier_band: Decimal,
    /// What the multiplier tiers are measured in
    pub stake_basis: StakeBasis,
    /// Multiplier tiers, ascending by threshold
    pub tiers: Vec<MultiplierTier>,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            participant_pct: dec!(80),
            weight_normalizer: dec!(500),
            unit_stake: dec!(20),
            tier_band: dec!(100),
            stake_basis: StakeBasis::default(),
            tiers: DEFAULT_TIERS.to_vec(),
        }
    }
}

/// Activity simulator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Wall-clock delay between ticks (ms); 0 runs as fast as possible
    pub tick_ms: u64,
    /// Session time that passes per tick (seconds)
    pub step_secs: u64,
    /// Upper bound on synthetic bets per predict tick
    pub max_bets_per_tick: u32,
    /// Stake amounts synthetic bettors pick from
    pub stake_menu: Vec<Decimal>,
    /// Activity log capacity
    pub max_log_lines: usize,
    /// Estimate history capacity
    pub max_history: usize,
    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_ms: 2000,
            step_secs: 1800,
            max_bets_per_tick: 3,
            stake_menu: vec![dec!(0.1), dec!(0.5), dec!(1), dec!(2), dec!(5)],
            max_log_lines: 50,
            max_history: 100,
            seed: None,
        }
    }
}

/// Balance lookup configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// Preferred RPC endpoint, used only when an API key is present
    pub preferred_url: String,
    /// API key for the preferred endpoint
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Public RPC endpoint used as fallback
    pub fallback_url: String,
    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            preferred_url: "https://mainnet.helius-rpc.com".to_string(),
            api_key: None,
            fallback_url: "https://api.mainnet-beta.solana.com".to_string(),
            timeout_secs: 10,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
    /// Prometheus exporter port; disabled when unset
    pub metrics_port: Option<u16>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment overrides (currently the preferred provider key)
    pub fn with_env(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.balance.api_key = Some(key);
            }
        }
        self
    }
}
