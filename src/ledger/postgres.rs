//! PostgreSQL ledger store.
//!
//! # Tables
//!
//! - `accounts`: one row per account id with balance, goal and derived fields
//! - `ledger_transactions`: append-only history keyed by account id, ordered
//!   by a `seq` column that records insertion order

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction as DbTransaction};
use uuid::Uuid;

use super::{LedgerStore, Mutation};
use crate::{
    db::DbPool,
    error::AppError,
    models::{
        account::{Account, AccountId},
        transaction::{Transaction, TransactionKind},
    },
};

/// Row of the `accounts` table.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    account_id: String,
    balance: Decimal,
    monthly_goal: Decimal,
    goal_progress: Decimal,
    last_month_savings: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row of the `ledger_transactions` table.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    account_id: String,
    kind: String,
    amount: Decimal,
    description: String,
    created_at: DateTime<Utc>,
}

/// Text columns that fail to parse are reported as decode errors.
fn decode_err(column: &str, message: String) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: message.into(),
    }
}

fn parse_account_id(raw: &str) -> Result<AccountId, sqlx::Error> {
    AccountId::from_str(raw).map_err(|e| decode_err("account_id", e.to_string()))
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = sqlx::Error;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            kind: TransactionKind::from_str(&row.kind).map_err(|e| decode_err("kind", e))?,
            amount: row.amount,
            timestamp: row.created_at,
            description: row.description,
            account_id: parse_account_id(&row.account_id)?,
        })
    }
}

impl AccountRow {
    fn into_account(self, transactions: Vec<Transaction>) -> Result<Account, sqlx::Error> {
        Ok(Account {
            account_id: parse_account_id(&self.account_id)?,
            balance: self.balance,
            transactions,
            monthly_goal: self.monthly_goal,
            last_month_savings: self.last_month_savings,
            goal_progress: self.goal_progress,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Ledger store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    pool: DbPool,
}

impl PgLedgerStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load_history(
        tx: &mut DbTransaction<'_, Postgres>,
        account_id: AccountId,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, account_id, kind, amount, description, created_at
            FROM ledger_transactions
            WHERE account_id = $1
            ORDER BY seq
            "#,
        )
        .bind(account_id.as_str())
        .fetch_all(&mut **tx)
        .await?
        .into_iter()
        .map(Transaction::try_from)
        .collect()
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn get(&self, account_id: AccountId) -> Result<Option<Account>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Balance and history must come from the same snapshot.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE account_id = $1")
            .bind(account_id.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        let account = match row {
            Some(row) => {
                let history = Self::load_history(&mut tx, account_id).await?;
                Some(row.into_account(history)?)
            }
            None => None,
        };

        tx.commit().await?;
        Ok(account)
    }

    async fn upsert(&self, seed: Account, mutate: Mutation) -> Result<Account, AppError> {
        let account_id = seed.account_id;
        let mut tx = self.pool.begin().await?;

        // Seed the row if missing. A concurrent seeder blocks on the primary
        // key until this transaction finishes, then does nothing.
        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                balance,
                monthly_goal,
                goal_progress,
                last_month_savings,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (account_id) DO NOTHING
            "#,
        )
        .bind(account_id.as_str())
        .bind(seed.balance)
        .bind(seed.monthly_goal)
        .bind(seed.goal_progress)
        .bind(seed.last_month_savings)
        .bind(seed.created_at)
        .bind(seed.updated_at)
        .execute(&mut *tx)
        .await?;

        // FOR UPDATE holds the row until commit, serializing mutations per account
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT * FROM accounts WHERE account_id = $1 FOR UPDATE",
        )
        .bind(account_id.as_str())
        .fetch_one(&mut *tx)
        .await?;
        let history = Self::load_history(&mut tx, account_id).await?;
        let mut account = row.into_account(history)?;
        let persisted = account.transactions.len();

        if let Err(err) = mutate(&mut account) {
            tx.rollback().await?;
            return Err(err);
        }

        sqlx::query(
            r#"
            UPDATE accounts
            SET balance = $1,
                monthly_goal = $2,
                goal_progress = $3,
                last_month_savings = $4,
                updated_at = $5
            WHERE account_id = $6
            "#,
        )
        .bind(account.balance)
        .bind(account.monthly_goal)
        .bind(account.goal_progress)
        .bind(account.last_month_savings)
        .bind(account.updated_at)
        .bind(account_id.as_str())
        .execute(&mut *tx)
        .await?;

        // History is append-only: only entries added by this mutation are written.
        for transaction in account.transactions.iter().skip(persisted) {
            sqlx::query(
                r#"
                INSERT INTO ledger_transactions (
                    id,
                    account_id,
                    kind,
                    amount,
                    description,
                    created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(transaction.id)
            .bind(transaction.account_id.as_str())
            .bind(transaction.kind.as_str())
            .bind(transaction.amount)
            .bind(&transaction.description)
            .bind(transaction.timestamp)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(account)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
