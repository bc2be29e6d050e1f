//! Allowlist management through the gateway's signing identity

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ApiResponse, AppState};
use crate::error::ApiError;
use crate::ledger::is_valid_address;

type ApiResult = Result<Json<ApiResponse<Value>>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct AccessRequest {
    pub address: Option<String>,
}

fn checked_address(address: Option<&str>) -> Result<String, ApiError> {
    let address = address.map(str::trim).unwrap_or_default();
    if address.is_empty() {
        return Err(ApiError::bad_request("All fields are required"));
    }
    if !is_valid_address(address) {
        return Err(ApiError::bad_request(format!("Invalid address: {address}")));
    }
    Ok(address.to_string())
}

/// POST /api/access/authorize
pub async fn authorize(
    State(state): State<AppState>,
    payload: Result<Json<AccessRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = payload?;
    let address = checked_address(request.address.as_deref())?;
    let receipt = state.store.authorize_user(&address).await?;

    Ok(Json(ApiResponse::with_message(
        json!({
            "address": address,
            "authorized": true,
            "transactionHash": receipt.transaction_hash,
        }),
        "User authorized",
    )))
}

/// POST /api/access/revoke
pub async fn revoke(
    State(state): State<AppState>,
    payload: Result<Json<AccessRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = payload?;
    let address = checked_address(request.address.as_deref())?;
    let receipt = state.store.revoke_user(&address).await?;

    Ok(Json(ApiResponse::with_message(
        json!({
            "address": address,
            "authorized": false,
            "transactionHash": receipt.transaction_hash,
        }),
        "User revoked",
    )))
}

/// GET /api/access/:address
pub async fn check(State(state): State<AppState>, Path(address): Path<String>) -> ApiResult {
    let address = checked_address(Some(&address))?;
    let authorized = state.store.is_authorized(&address).await?;

    Ok(Json(ApiResponse::ok(json!({
        "address": address,
        "authorized": authorized,
    }))))
}
