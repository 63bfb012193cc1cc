//! HTTP surface for balance lookups

use super::{BalanceError, BalanceResponse, BalanceService};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Shared server state
pub struct AppState {
    pub balance: BalanceService,
}

#[derive(Debug, Default, Deserialize)]
pub struct BalanceQuery {
    pub address: Option<String>,
}

impl IntoResponse for BalanceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            BalanceError::MissingAddress | BalanceError::Rpc(_) => self.to_string(),
            BalanceError::Transport(_) | BalanceError::InvalidResponse(_) => {
                "Failed to fetch balance".to_string()
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/balance", get(get_balance))
        .route("/health", get(health_check))
        .with_state(state)
}

pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<BalanceResponse>, BalanceError> {
    let address = query.address.unwrap_or_default();
    match state.balance.lookup(&address).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            if e.status() == StatusCode::INTERNAL_SERVER_ERROR {
                tracing::error!(%address, error = %e, "Balance lookup failed");
            }
            Err(e)
        }
    }
}

pub async fn health_check() -> &'static str {
    "OK"
}

/// Serve until ctrl-c
pub async fn serve(bind: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "Balance server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "Failed to listen for shutdown signal");
            }
        })
        .await?;

    tracing::info!("Balance server stopped");
    Ok(())
}
