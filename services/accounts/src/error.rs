//! Custom error types for the accounts service

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Why a login was refused. Both cases render the same response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    UnknownAccount,
    BadCredentials,
}

impl std::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthFailure::UnknownAccount => f.write_str("no such account"),
            AuthFailure::BadCredentials => f.write_str("bad credentials"),
        }
    }
}

/// Custom error type for account operations
#[derive(Error, Debug)]
pub enum AccountError {
    /// Malformed or missing field
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Email already belongs to another account
    #[error("Email address is already in use")]
    Uniqueness,

    /// No user with the requested id
    #[error("No user found with this id")]
    NotFound,

    /// Login refused
    #[error("Authentication failed: {0}")]
    Auth(AuthFailure),

    /// Persistence or infrastructure fault
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl From<DatabaseError> for AccountError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::UniqueViolation { .. } => AccountError::Uniqueness,
            other => AccountError::Unexpected(other.into()),
        }
    }
}

impl From<JsonRejection> for AccountError {
    fn from(rejection: JsonRejection) -> Self {
        AccountError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AccountError {
    fn from(rejection: PathRejection) -> Self {
        AccountError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AccountError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AccountError::Uniqueness => (
                StatusCode::BAD_REQUEST,
                "Email address is already in use".to_string(),
            ),
            AccountError::NotFound => (
                StatusCode::NOT_FOUND,
                "No user found with this id".to_string(),
            ),
            AccountError::Auth(reason) => {
                warn!(%reason, "login refused");
                (
                    StatusCode::BAD_REQUEST,
                    "Incorrect email or password".to_string(),
                )
            }
            AccountError::Unexpected(e) => {
                error!("Unexpected error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for account results
pub type AccountResult<T> = Result<T, AccountError>;
