//! Health check endpoint for service monitoring.

use crate::{error::AppError, services::account_service::AccountService};
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Ledger backend in use (`postgres` or `memory`)
    pub storage: String,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "storage": "postgres",
///   "timestamp": "2026-03-15T12:00:00Z"
/// }
/// ```
///
/// If the store is unreachable, returns the standard 500 error response.
pub async fn health_check(
    State(service): State<AccountService>,
) -> Result<Json<HealthResponse>, AppError> {
    service.ping().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        storage: service.backend().to_string(),
        timestamp: Utc::now(),
    }))
}
