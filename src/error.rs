//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde_json::json;

/// Application-wide error type.
///
/// Validation variants are always raised before any mutation is applied, so
/// a failed request never leaves a partial write behind.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Storage layer failed (connection error, query error).
    ///
    /// Returns HTTP 500 without exposing the cause.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Deposit or withdrawal amount is missing, zero or negative.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid amount: must be a positive number")]
    InvalidAmount,

    /// Withdrawal exceeds the current balance.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("Insufficient funds: balance is {balance}, requested {requested}")]
    InsufficientFunds { balance: Decimal, requested: Decimal },

    /// Monthly goal is missing or negative.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid goal amount: must be zero or greater")]
    InvalidGoal,

    /// Statistics requested for an account that was never created.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Account not found")]
    AccountNotFound,

    /// Path segment does not name one of the tracked accounts.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Unknown account: {0}")]
    UnknownAccount(String),
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "insufficient_funds",
///     "message": "Insufficient funds: balance is 4000, requested 10000"
///   }
/// }
/// ```
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::InvalidAmount => {
                (StatusCode::BAD_REQUEST, "invalid_amount", self.to_string())
            }
            AppError::InsufficientFunds { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "insufficient_funds",
                self.to_string(),
            ),
            AppError::InvalidGoal => (StatusCode::BAD_REQUEST, "invalid_goal", self.to_string()),
            AppError::AccountNotFound => {
                (StatusCode::NOT_FOUND, "account_not_found", self.to_string())
            }
            AppError::UnknownAccount(_) => {
                (StatusCode::BAD_REQUEST, "unknown_account", self.to_string())
            }
            AppError::Storage(err) => {
                tracing::error!(error = %err, "Storage operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
