//! Health and ledger status endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

use super::{ApiResponse, AppState};
use crate::ledger::LedgerStatus;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime_secs: u64,
    pub version: &'static str,
    pub services: Value,
}

fn health_status(ledger: &LedgerStatus) -> (StatusCode, &'static str) {
    if ledger.is_connected() {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    }
}

fn envelope(code: StatusCode, report: HealthReport) -> (StatusCode, Json<ApiResponse<HealthReport>>) {
    let mut body = ApiResponse::ok(report);
    if !code.is_success() {
        body.success = false;
        body.error = Some("Ledger connection failed".to_string());
    }
    (code, Json(body))
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<HealthReport>>) {
    let ledger = state.store.status().await;
    let (code, status) = health_status(&ledger);

    envelope(
        code,
        HealthReport {
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_secs: state.started_at.elapsed().as_secs(),
            version: env!("CARGO_PKG_VERSION"),
            services: json!({
                "api": "healthy",
                "ledger": ledger,
            }),
        },
    )
}

/// GET /api/health/detailed
pub async fn detailed(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthReport>>) {
    let ledger = state.store.status().await;
    let (code, status) = health_status(&ledger);

    envelope(
        code,
        HealthReport {
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_secs: state.started_at.elapsed().as_secs(),
            version: env!("CARGO_PKG_VERSION"),
            services: json!({
                "api": {
                    "status": "healthy",
                    "port": state.port,
                    "pid": std::process::id(),
                },
                "ledger": ledger,
            }),
        },
    )
}

/// GET /api/test/blockchain
pub async fn test_connection(State(state): State<AppState>) -> Json<ApiResponse<Value>> {
    let connected = state.store.test_connection().await;
    let message = if connected {
        "Ledger connection successful"
    } else {
        "Ledger connection failed"
    };

    Json(ApiResponse::with_message(json!({ "connected": connected }), message))
}

/// GET /api/ledger/status
pub async fn ledger_status(State(state): State<AppState>) -> Json<ApiResponse<LedgerStatus>> {
    Json(ApiResponse::ok(state.store.status().await))
}
