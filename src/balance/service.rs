//! Provider fallback policy

use super::{BalanceError, BalanceProvider, BalanceResponse, RpcBalanceProvider};
use crate::config::BalanceConfig;
use crate::telemetry::{self, LatencyMetric};
use std::time::{Duration, Instant};

/// Looks up balances through a preferred provider with a single fallback
pub struct BalanceService {
    preferred: Option<Box<dyn BalanceProvider>>,
    fallback: Box<dyn BalanceProvider>,
}

impl BalanceService {
    pub fn new(
        preferred: Option<Box<dyn BalanceProvider>>,
        fallback: Box<dyn BalanceProvider>,
    ) -> Self {
        Self {
            preferred,
            fallback,
        }
    }

    /// Preferred provider only when an API key is configured
    pub fn from_config(config: &BalanceConfig) -> Result<Self, BalanceError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let preferred = match config.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => Some(Box::new(RpcBalanceProvider::helius(
                &config.preferred_url,
                key,
                timeout,
            )?) as Box<dyn BalanceProvider>),
            None => {
                tracing::warn!("No API key configured, using public RPC only");
                None
            }
        };
        let fallback = Box::new(RpcBalanceProvider::public(&config.fallback_url, timeout)?);
        Ok(Self::new(preferred, fallback))
    }

    /// Fetch the balance of `address`.
    ///
    /// Any failure from the preferred provider falls back once; the fallback's
    /// outcome is final.
    pub async fn lookup(&self, address: &str) -> Result<BalanceResponse, BalanceError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(BalanceError::MissingAddress);
        }

        let started = Instant::now();
        if let Some(preferred) = &self.preferred {
            match attempt(preferred.as_ref(), address).await {
                Ok(lamports) => {
                    telemetry::record_latency(LatencyMetric::BalanceLookup, started.elapsed());
                    return Ok(BalanceResponse::new(address, lamports));
                }
                Err(e) => {
                    tracing::warn!(
                        provider = preferred.name(),
                        error = %e,
                        "Preferred provider failed, falling back"
                    );
                }
            }
        }

        let lamports = attempt(self.fallback.as_ref(), address).await?;
        telemetry::record_latency(LatencyMetric::BalanceLookup, started.elapsed());
        Ok(BalanceResponse::new(address, lamports))
    }
}

async fn attempt(provider: &dyn BalanceProvider, address: &str) -> Result<u64, BalanceError> {
    let result = provider.get_balance(address).await;
    let outcome = if result.is_ok() { "ok" } else { "error" };
    telemetry::record_balance_lookup(provider.name(), outcome);
    result
}
