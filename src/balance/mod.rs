//! Wallet balance lookup module
//!
//! Proxies native-token balance queries to an RPC provider with one fallback

mod provider;
mod server;
mod service;

pub use provider::RpcBalanceProvider;
pub use server::{get_balance, health_check, router, serve, AppState, BalanceQuery};
pub use service::BalanceService;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Lamports per SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Balance lookup errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BalanceError {
    #[error("Address required")]
    MissingAddress,
    /// Error reported by the RPC provider itself
    #[error("{0}")]
    Rpc(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl BalanceError {
    pub fn status(&self) -> StatusCode {
        match self {
            BalanceError::MissingAddress | BalanceError::Rpc(_) => StatusCode::BAD_REQUEST,
            BalanceError::Transport(_) | BalanceError::InvalidResponse(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Source of native-token balances
#[async_trait]
pub trait BalanceProvider: Send + Sync {
    /// Provider name used in logs and metrics
    fn name(&self) -> &str;

    /// Balance of `address` in lamports
    async fn get_balance(&self, address: &str) -> Result<u64, BalanceError>;
}

/// Successful lookup body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceResponse {
    pub address: String,
    /// Balance in SOL
    pub balance: f64,
    pub lamports: u64,
}

impl BalanceResponse {
    pub fn new(address: &str, lamports: u64) -> Self {
        Self {
            address: address.to_string(),
            balance: lamports as f64 / LAMPORTS_PER_SOL as f64,
            lamports,
        }
    }
}
