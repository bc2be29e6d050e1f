//! Error types for the ledger connection and the HTTP layer

use std::path::PathBuf;

use agro_trust::ContractError;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::forms::FormError;
use crate::routes::ApiResponse;

/// Failure of a ledger invocation
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The record store rejected the call
    #[error("{}", .0.message())]
    Contract(ContractError),

    /// The host failed outside the contract's own error set
    #[error("ledger host error: {0}")]
    Host(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("ledger connection is unavailable")]
    Disconnected,

    /// The worker dropped the call without answering
    #[error("ledger call `{0}` was aborted")]
    Aborted(&'static str),

    #[error("failed to start ledger: {0}")]
    Startup(String),

    #[error("ledger state {path}: {reason}")]
    Snapshot { path: PathBuf, reason: String },
}

impl LedgerError {
    pub fn contract_error(&self) -> Option<ContractError> {
        match self {
            LedgerError::Contract(err) => Some(*err),
            _ => None,
        }
    }

    /// True when the connection itself, not the call, failed
    pub fn is_connectivity(&self) -> bool {
        matches!(self, LedgerError::Disconnected | LedgerError::Aborted(_))
    }
}

impl From<ContractError> for LedgerError {
    fn from(err: ContractError) -> Self {
        LedgerError::Contract(err)
    }
}

/// Errors answered by HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn batch_not_found() -> Self {
        ApiError::NotFound("Batch not found".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Ledger(LedgerError::InvalidAddress(_)) => StatusCode::BAD_REQUEST,
            ApiError::Ledger(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(err.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(ApiResponse::<()>::failure(self.to_string()))).into_response()
    }
}
