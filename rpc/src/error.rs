//! RPC error types and their HTTP rendering.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use idlink_verification::VerificationError;
use serde::Serialize;
use thiserror::Error;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("field {field} exceeds {max} bytes")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("invalid verification code")]
    InvalidCode,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Name a registry field the way clients spell it on the wire.
fn wire_field(name: &'static str) -> &'static str {
    match name {
        "identity" => "discordId",
        "external_username" => "robloxId",
        other => other,
    }
}

impl From<VerificationError> for RpcError {
    fn from(e: VerificationError) -> Self {
        match e {
            VerificationError::MissingField(name) => RpcError::MissingField(wire_field(name)),
            VerificationError::FieldTooLong { field, max } => RpcError::FieldTooLong {
                field: wire_field(field),
                max,
            },
            VerificationError::InvalidCode => RpcError::InvalidCode,
            VerificationError::Store(store) => RpcError::Store(store.to_string()),
        }
    }
}

impl From<JsonRejection> for RpcError {
    fn from(e: JsonRejection) -> Self {
        RpcError::InvalidRequest(e.body_text())
    }
}

impl From<QueryRejection> for RpcError {
    fn from(e: QueryRejection) -> Self {
        RpcError::InvalidRequest(e.body_text())
    }
}

impl From<tokio::task::JoinError> for RpcError {
    fn from(e: tokio::task::JoinError) -> Self {
        RpcError::Internal(e.to_string())
    }
}

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self {
            RpcError::MissingField(_)
            | RpcError::FieldTooLong { .. }
            | RpcError::InvalidCode
            | RpcError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RpcError::Store(_) | RpcError::Internal(_) | RpcError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RpcError::MissingField(_) => "MISSING_FIELD",
            RpcError::FieldTooLong { .. } => "FIELD_TOO_LONG",
            RpcError::InvalidCode => "INVALID_CODE",
            RpcError::InvalidRequest(_) => "INVALID_REQUEST",
            RpcError::Store(_) => "STORE_ERROR",
            RpcError::Internal(_) | RpcError::Io(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            RpcError::Store(detail) | RpcError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                "Internal server error".to_string()
            }
            RpcError::Io(err) => {
                tracing::error!(error = %err, "request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = ErrorResponse {
            error: ErrorDetails {
                code: self.code(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}
