//! HTTP API
//!
//! All endpoints live under `/api` and answer with the [`ApiResponse`]
//! envelope.

pub mod access;
pub mod batches;
pub mod health;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::ledger::RecordStore;

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub started_at: Instant,
    pub port: u16,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, port: u16) -> Self {
        Self {
            store,
            started_at: Instant::now(),
            port,
        }
    }
}

/// Response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
        }
    }
}

/// Create the API router
pub fn create_router(state: AppState, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let api = Router::new()
        .route("/health", get(health::health))
        .route("/health/detailed", get(health::detailed))
        .route("/test/blockchain", get(health::test_connection))
        .route("/ledger/status", get(health::ledger_status))
        .route("/batches", get(batches::list_batches))
        .route("/batches/add-batch", post(batches::add_batch))
        .route("/batches/add-farmer", post(batches::add_farmer))
        .route("/batches/add-cultivation", post(batches::add_cultivation))
        .route("/batches/add-processing", post(batches::add_processing))
        .route("/batches/add-lab-result", post(batches::add_lab_result))
        .route("/batches/add-certificate", post(batches::add_certificate))
        .route("/batches/add-transfer", post(batches::add_transfer))
        .route("/batches/add-trace-data", post(batches::add_trace_data))
        .route("/batches/upload-csv", post(batches::upload_csv))
        .route("/batches/:batch_id", get(batches::get_batch))
        .route("/batches/:batch_id/exists", get(batches::batch_exists))
        .route("/batches/:batch_id/summary", get(batches::batch_summary))
        .route("/batches/:batch_id/transfers", get(batches::batch_transfers))
        .route("/access/authorize", post(access::authorize))
        .route("/access/revoke", post(access::revoke))
        .route("/access/:address", get(access::check));

    Router::new()
        .route("/", get(root))
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
        .nest("/api", api)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "AgroTrust GI Product Verification API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "documentation": "/api/health",
    }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::failure("Route not found")),
    )
}
