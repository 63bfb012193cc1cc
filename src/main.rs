use clap::Parser;
use launch_oracle::cli::{print_levels, Cli, Commands};
use launch_oracle::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            toml::from_str(include_str!("../config.toml.example"))?
        }
    }
    .with_env();

    // Initialize telemetry
    let _telemetry = launch_oracle::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Simulate(args) => {
            tracing::info!("Starting launch simulation");
            args.execute(&config).await?;
        }
        Commands::Quote(args) => {
            args.execute(&config)?;
        }
        Commands::Levels => {
            print_levels(&config)?;
        }
        Commands::Serve(args) => {
            tracing::info!("Starting balance server");
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Launch: {} ({}), supply {}",
                config.launch.name, config.launch.symbol, config.launch.total_supply
            );
            println!(
                "  Phases: discovery {}s, predict {}s, default median {}",
                config.launch.discovery_secs,
                config.launch.predict_secs,
                config.launch.default_median
            );
            println!(
                "  Rewards: {}% of supply / {}, basis {:?}, {} tiers",
                config.reward.participant_pct,
                config.reward.weight_normalizer,
                config.reward.stake_basis,
                config.reward.tiers.len()
            );
            println!(
                "  Balance: preferred {} ({}), fallback {}",
                config.balance.preferred_url,
                if config.balance.api_key.is_some() {
                    "key set"
                } else {
                    "no key"
                },
                config.balance.fallback_url
            );
            println!("  Server: {}", config.server.bind);
            println!();
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
