//! JSON-RPC balance provider
//!
//! Issues `getBalance` against a Solana-compatible RPC endpoint.

use super::{BalanceError, BalanceProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Balance provider backed by an RPC endpoint
pub struct RpcBalanceProvider {
    name: String,
    url: String,
    client: Client,
}

impl RpcBalanceProvider {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BalanceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BalanceError::Transport(e.to_string()))?;

        Ok(Self {
            name: name.into(),
            url: url.into(),
            client,
        })
    }

    /// Helius endpoint authenticated with an API key
    pub fn helius(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, BalanceError> {
        let url = format!("{}/?api-key={}", base_url.trim_end_matches('/'), api_key);
        Self::new("helius", url, timeout)
    }

    /// Public endpoint, no credentials
    pub fn public(url: &str, timeout: Duration) -> Result<Self, BalanceError> {
        Self::new("public", url, timeout)
    }
}

#[async_trait]
impl BalanceProvider for RpcBalanceProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_balance(&self, address: &str) -> Result<u64, BalanceError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "getBalance",
            params: [address],
        };

        tracing::debug!(provider = %self.name, %address, "Requesting balance");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(transport)?;

        match serde_json::from_str::<RpcResponse>(&body) {
            Ok(parsed) => parse_response(parsed),
            Err(_) if !status.is_success() => {
                Err(BalanceError::Transport(format!("HTTP {}", status)))
            }
            Err(e) => Err(BalanceError::InvalidResponse(e.to_string())),
        }
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<RpcResult>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcResult {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    message: String,
}

fn parse_response(response: RpcResponse) -> Result<u64, BalanceError> {
    if let Some(error) = response.error {
        return Err(BalanceError::Rpc(error.message));
    }
    response
        .result
        .map(|r| r.value)
        .ok_or_else(|| BalanceError::InvalidResponse("missing result".to_string()))
}

/// Transport failure without the request URL, which can carry an API key
fn transport(e: reqwest::Error) -> BalanceError {
    BalanceError::Transport(e.without_url().to_string())
}
