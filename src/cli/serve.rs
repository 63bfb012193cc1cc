//! Serve command implementation

use crate::balance::{self, AppState, BalanceService};
use crate::config::Config;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address, overrides server.bind
    #[arg(long)]
    pub bind: Option<String>,
}

impl ServeArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let bind = self.bind.as_deref().unwrap_or(&config.server.bind);
        let state = Arc::new(AppState {
            balance: BalanceService::from_config(&config.balance)?,
        });
        balance::serve(bind, state).await
    }
}
