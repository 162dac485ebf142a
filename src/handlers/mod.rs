//! HTTP request handlers (route handlers).
//!
//! Each handler parses the account id from the path, delegates to
//! [`AccountService`](crate::services::account_service::AccountService) and
//! returns JSON; errors are rendered by `AppError`'s `IntoResponse`.

use axum::{Json, extract::rejection::JsonRejection};

use crate::error::AppError;

/// Balance, goal, summary and stats endpoints
pub mod accounts;
pub mod health;
/// Deposit, withdraw and history endpoints
pub mod transactions;

/// Unwrap a JSON body, or report it as `invalid` when it could not be read.
///
/// Bodies that fail to parse (a non-numeric or out-of-range amount, bad
/// syntax, wrong content type) carry no usable value, so they fail the same
/// validation a missing value would.
pub(crate) fn read_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    invalid: AppError,
) -> Result<T, AppError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "Request body rejected");
            Err(invalid)
        }
    }
}
