//! Balance lookups against local stand-in RPC servers

use axum::{http::StatusCode, routing::post, Json, Router};
use launch_oracle::balance::{self, AppState, BalanceService, RpcBalanceProvider};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Solana-style RPC: `bad` addresses get a JSON-RPC error
async fn fake_rpc() -> SocketAddr {
    async fn handle(Json(body): Json<Value>) -> Json<Value> {
        assert_eq!(body["method"], "getBalance");
        let address = body["params"][0].as_str().unwrap_or_default();
        if address == "bad" {
            Json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": -32602, "message": "Invalid param: WrongSize" }
            }))
        } else {
            Json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": { "context": { "slot": 1 }, "value": 2_500_000_000u64 }
            }))
        }
    }
    spawn(Router::new().route("/", post(handle))).await
}

/// Upstream that only ever fails with a non-JSON body
async fn broken_rpc() -> SocketAddr {
    async fn handle() -> (StatusCode, &'static str) {
        (StatusCode::BAD_GATEWAY, "upstream unavailable")
    }
    spawn(Router::new().route("/", post(handle))).await
}

fn service(preferred: Option<SocketAddr>, fallback: SocketAddr) -> BalanceService {
    let timeout = Duration::from_secs(5);
    let preferred = preferred.map(|addr| {
        Box::new(
            RpcBalanceProvider::helius(&format!("http://{}", addr), "test-key", timeout).unwrap(),
        ) as Box<dyn balance::BalanceProvider>
    });
    let fallback =
        RpcBalanceProvider::public(&format!("http://{}", fallback), timeout).unwrap();
    BalanceService::new(preferred, Box::new(fallback))
}

#[tokio::test]
async fn test_rpc_provider_round_trip() {
    let rpc = fake_rpc().await;
    let response = service(None, rpc).lookup("7xKp3fQa").await.unwrap();
    assert_eq!(response.lamports, 2_500_000_000);
    assert_eq!(response.balance, 2.5);
}

#[tokio::test]
async fn test_broken_preferred_falls_back() {
    let broken = broken_rpc().await;
    let rpc = fake_rpc().await;
    let response = service(Some(broken), rpc).lookup("7xKp3fQa").await.unwrap();
    assert_eq!(response.lamports, 2_500_000_000);
}

#[tokio::test]
async fn test_http_endpoint_status_codes() {
    let rpc = fake_rpc().await;
    let broken = broken_rpc().await;

    let healthy = spawn(balance::router(Arc::new(AppState {
        balance: service(None, rpc),
    })))
    .await;
    let failing = spawn(balance::router(Arc::new(AppState {
        balance: service(None, broken),
    })))
    .await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let ok = client
        .get(format!("http://{}/api/balance?address=7xKp3fQa", healthy))
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status().as_u16(), 200);
    let body: Value = ok.json().await.unwrap();
    assert_eq!(body["address"], "7xKp3fQa");
    assert_eq!(body["balance"], 2.5);
    assert_eq!(body["lamports"], 2_500_000_000u64);

    let missing = client
        .get(format!("http://{}/api/balance", healthy))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 400);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["error"], "Address required");

    let rpc_error = client
        .get(format!("http://{}/api/balance?address=bad", healthy))
        .send()
        .await
        .unwrap();
    assert_eq!(rpc_error.status().as_u16(), 400);
    let body: Value = rpc_error.json().await.unwrap();
    assert_eq!(body["error"], "Invalid param: WrongSize");

    let unavailable = client
        .get(format!("http://{}/api/balance?address=7xKp3fQa", failing))
        .send()
        .await
        .unwrap();
    assert_eq!(unavailable.status().as_u16(), 500);
    let body: Value = unavailable.json().await.unwrap();
    assert_eq!(body["error"], "Failed to fetch balance");

    let health = client
        .get(format!("http://{}/health", healthy))
        .send()
        .await
        .unwrap();
    assert_eq!(health.text().await.unwrap(), "OK");
}
