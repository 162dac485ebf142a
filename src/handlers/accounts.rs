//! Account HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - GET /api/v1/balance/{account} - Balance and goal state
//! - POST /api/v1/goal/{account} - Update the monthly goal
//! - GET /api/v1/summary - All three accounts at a glance
//! - GET /api/v1/stats/{account} - Current-month statistics

use crate::{
    error::AppError,
    models::account::{
        AccountId, BalanceResponse, GoalRequest, GoalResponse, StatsResponse, SummaryResponse,
    },
    services::account_service::AccountService,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use super::read_body;

/// Get balance, goal and derived fields for an account.
///
/// Creates the account with its default goal on first access.
///
/// # Response (200)
///
/// ```json
/// {
///   "balance": 4000.0,
///   "monthlyGoal": 10000.0,
///   "goalProgress": 50.0,
///   "lastMonthSavings": 0.0
/// }
/// ```
pub async fn get_balance(
    State(service): State<AccountService>,
    Path(account): Path<String>,
) -> Result<Json<BalanceResponse>, AppError> {
    let account_id: AccountId = account.parse()?;
    Ok(Json(service.get_balance(account_id).await?))
}

/// Update the monthly savings goal.
///
/// # Request Body
///
/// ```json
/// { "monthlyGoal": 7500 }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ "monthlyGoal": 7500.0, "goalProgress": 40.0 }`
/// - **Error (400)**: Goal missing, negative or not a number
pub async fn set_goal(
    State(service): State<AccountService>,
    Path(account): Path<String>,
    payload: Result<Json<GoalRequest>, JsonRejection>,
) -> Result<Json<GoalResponse>, AppError> {
    let account_id: AccountId = account.parse()?;
    let request = read_body(payload, AppError::InvalidGoal)?;
    let goal = service
        .set_monthly_goal(account_id, request.monthly_goal)
        .await?;
    Ok(Json(goal))
}

/// Summary of every account.
///
/// ```json
/// {
///   "accounts": [
///     { "accountId": "first-person", "balance": 0.0, "monthlyGoal": 5000.0, "goalProgress": 0.0, "lastMonthSavings": 0.0 }
///   ]
/// }
/// ```
pub async fn get_summary(
    State(service): State<AccountService>,
) -> Result<Json<SummaryResponse>, AppError> {
    let accounts = service.get_summary().await?;
    Ok(Json(SummaryResponse { accounts }))
}

/// Monthly statistics.
///
/// Returns 404 for an account that has never been created; this endpoint
/// does not create accounts.
pub async fn get_stats(
    State(service): State<AccountService>,
    Path(account): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let account_id: AccountId = account.parse()?;
    Ok(Json(service.get_stats(account_id).await?))
}
