//! Transaction data models and API request/response types.
//!
//! This module defines:
//! - `Transaction`: an immutable ledger entry embedded in an account
//! - Request types for deposit and withdraw operations
//! - Response bodies for the transaction endpoints

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::account::AccountId;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdraw => "withdraw",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(TransactionKind::Deposit),
            "withdraw" => Ok(TransactionKind::Withdraw),
            other => Err(format!("unknown transaction kind: {other}")),
        }
    }
}

/// A single deposit or withdrawal.
///
/// Created only as a side effect of a successful deposit or withdrawal and
/// never edited afterwards.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "770e8400-e29b-41d4-a716-446655440002",
///   "type": "deposit",
///   "amount": 3000.0,
///   "date": "2026-03-15T12:00:00Z",
///   "description": "gift",
///   "accountId": "joint"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Always strictly positive
    pub amount: Decimal,

    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,

    pub description: String,

    pub account_id: AccountId,
}

impl Transaction {
    pub fn new(
        kind: TransactionKind,
        account_id: AccountId,
        amount: Decimal,
        description: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            timestamp,
            description: description.unwrap_or_default(),
            account_id,
        }
    }
}

/// Request to deposit money into an account.
///
/// # JSON Example
///
/// ```json
/// {
///   "amount": 3000,
///   "description": "gift"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    /// Missing amounts are rejected by the service as invalid
    #[serde(default)]
    pub amount: Option<Decimal>,

    #[serde(default)]
    pub description: Option<String>,
}

/// Request to withdraw money from an account.
///
/// # Validation
///
/// - Amount must be present and positive
/// - Account must hold at least `amount`
#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    #[serde(default)]
    pub amount: Option<Decimal>,

    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositResponse {
    pub balance: Decimal,
    pub goal_progress: Decimal,
    pub transaction: Transaction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithdrawResponse {
    pub balance: Decimal,
    pub transaction: Transaction,
}

#[derive(Debug, Serialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
}
