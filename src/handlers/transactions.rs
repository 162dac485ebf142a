//! Transaction HTTP handlers.
//!
//! This module implements transaction-related API endpoints:
//! - GET /api/v1/transactions/{account} - History, newest first
//! - POST /api/v1/deposit/{account} - Add money to an account
//! - POST /api/v1/withdraw/{account} - Remove money from an account

use crate::{
    error::AppError,
    models::{
        account::AccountId,
        transaction::{
            DepositRequest, DepositResponse, TransactionListResponse, WithdrawRequest,
            WithdrawResponse,
        },
    },
    services::account_service::AccountService,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use super::read_body;

/// List an account's transactions, most recent first.
///
/// An account that was never used yields an empty list rather than 404.
pub async fn list_transactions(
    State(service): State<AccountService>,
    Path(account): Path<String>,
) -> Result<Json<TransactionListResponse>, AppError> {
    let account_id: AccountId = account.parse()?;
    let transactions = service.list_transactions(account_id).await?;
    Ok(Json(TransactionListResponse { transactions }))
}

/// Deposit into an account.
///
/// # Request Body
///
/// ```json
/// {
///   "amount": 3000,
///   "description": "gift"
/// }
/// ```
///
/// # Response (200)
///
/// ```json
/// {
///   "balance": 3000.0,
///   "goalProgress": 30.0,
///   "transaction": {
///     "id": "770e8400-...",
///     "type": "deposit",
///     "amount": 3000.0,
///     "date": "2026-03-15T12:00:00Z",
///     "description": "gift",
///     "accountId": "joint"
///   }
/// }
/// ```
pub async fn create_deposit(
    State(service): State<AccountService>,
    Path(account): Path<String>,
    payload: Result<Json<DepositRequest>, JsonRejection>,
) -> Result<Json<DepositResponse>, AppError> {
    let account_id: AccountId = account.parse()?;
    let request = read_body(payload, AppError::InvalidAmount)?;
    let receipt = service
        .deposit(account_id, request.amount, request.description)
        .await?;
    Ok(Json(receipt))
}

/// Withdraw from an account.
///
/// # Validation
///
/// - Amount must be a positive number (400 otherwise)
/// - Amount must not exceed the balance (422 otherwise)
pub async fn create_withdrawal(
    State(service): State<AccountService>,
    Path(account): Path<String>,
    payload: Result<Json<WithdrawRequest>, JsonRejection>,
) -> Result<Json<WithdrawResponse>, AppError> {
    let account_id: AccountId = account.parse()?;
    let request = read_body(payload, AppError::InvalidAmount)?;
    let receipt = service
        .withdraw(account_id, request.amount, request.description)
        .await?;
    Ok(Json(receipt))
}
