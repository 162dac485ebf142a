//! Account data models and API response types.
//!
//! This module defines:
//! - `AccountId`: the closed set of tracked accounts
//! - `Account`: one ledger record with its embedded transaction history
//! - Response bodies returned by the account endpoints

use std::{fmt, str::FromStr};

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{error::AppError, models::transaction::Transaction, services::metrics};

/// Identifier of one of the three savings accounts.
///
/// The set is closed: anything outside it is rejected when a path segment is
/// parsed, before any store access happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountId {
    FirstPerson,
    SecondPerson,
    Joint,
}

impl AccountId {
    /// Every account, in display order.
    pub const ALL: [AccountId; 3] = [
        AccountId::FirstPerson,
        AccountId::SecondPerson,
        AccountId::Joint,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AccountId::FirstPerson => "first-person",
            AccountId::SecondPerson => "second-person",
            AccountId::Joint => "joint",
        }
    }

    /// Monthly goal an account starts with when it is first created.
    pub fn default_monthly_goal(self) -> Decimal {
        match self {
            AccountId::FirstPerson | AccountId::SecondPerson => dec!(5000),
            AccountId::Joint => dec!(10000),
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| AppError::UnknownAccount(s.to_string()))
    }
}

/// A savings account record.
///
/// # Invariants
///
/// - `balance` is the sum of all deposits minus all withdrawals and never
///   goes negative
/// - `transactions` is append-only, kept in insertion order
/// - `goal_progress` and `last_month_savings` are derived from `transactions`
///   and refreshed whenever the account is mutated
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: AccountId,
    pub balance: Decimal,
    pub transactions: Vec<Transaction>,
    pub monthly_goal: Decimal,
    pub last_month_savings: Decimal,
    pub goal_progress: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derived fields of an account, computed from its history at a given time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedMetrics {
    pub goal_progress: Decimal,
    pub last_month_savings: Decimal,
}

impl Account {
    /// A fresh account: zero balance, empty history, default goal.
    pub fn seed(account_id: AccountId, now: DateTime<Utc>) -> Self {
        Self {
            account_id,
            balance: Decimal::ZERO,
            transactions: Vec::new(),
            monthly_goal: account_id.default_monthly_goal(),
            last_month_savings: Decimal::ZERO,
            goal_progress: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    /// Recompute the derived fields without touching the record.
    pub fn compute_metrics<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DerivedMetrics {
        DerivedMetrics {
            goal_progress: metrics::compute_goal_progress(
                &self.transactions,
                self.monthly_goal,
                now,
            ),
            last_month_savings: metrics::compute_last_month_savings(&self.transactions, now),
        }
    }

    /// The derived fields as currently stored.
    pub fn stored_metrics(&self) -> DerivedMetrics {
        DerivedMetrics {
            goal_progress: self.goal_progress,
            last_month_savings: self.last_month_savings,
        }
    }

    pub fn apply_metrics(&mut self, derived: DerivedMetrics) {
        self.goal_progress = derived.goal_progress;
        self.last_month_savings = derived.last_month_savings;
    }

    pub fn refresh_metrics<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) {
        let derived = self.compute_metrics(now);
        self.apply_metrics(derived);
    }
}

/// Response body for `GET /api/v1/balance/{account}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub balance: Decimal,
    pub monthly_goal: Decimal,
    pub goal_progress: Decimal,
    pub last_month_savings: Decimal,
}

impl From<&Account> for BalanceResponse {
    fn from(account: &Account) -> Self {
        Self {
            balance: account.balance,
            monthly_goal: account.monthly_goal,
            goal_progress: account.goal_progress,
            last_month_savings: account.last_month_savings,
        }
    }
}

/// Request body for updating the monthly goal.
///
/// # JSON Example
///
/// ```json
/// { "monthlyGoal": 7500 }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRequest {
    /// Missing goals are rejected by the service, not by deserialization
    #[serde(default)]
    pub monthly_goal: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalResponse {
    pub monthly_goal: Decimal,
    pub goal_progress: Decimal,
}

/// One row of the all-accounts summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub account_id: AccountId,
    pub balance: Decimal,
    pub monthly_goal: Decimal,
    pub goal_progress: Decimal,
    pub last_month_savings: Decimal,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub accounts: Vec<AccountSummary>,
}

/// Current-month statistics for a single account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub monthly_deposits: Decimal,
    pub monthly_withdrawals: Decimal,
    pub net_savings: Decimal,
    pub goal_progress: Decimal,
    pub last_month_savings: Decimal,
}
