//! Account service - the only path through which ledger state changes.
//!
//! This service handles:
//! - Lazy creation and startup seeding of the three accounts
//! - Deposit/withdraw validation and balance updates
//! - Keeping goal progress and last-month savings current
//!
//! # Consistency
//!
//! Every check runs inside the store's per-account lock (see
//! [`LedgerStore::upsert`]), so a withdrawal's balance check and the
//! decrement that follows are atomic with respect to other mutations of the
//! same account. Validation that does not depend on stored state happens
//! before the lock is taken.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use rust_decimal::Decimal;

use crate::{
    error::AppError,
    ledger::{LedgerStore, mutation},
    models::{
        account::{
            Account, AccountId, AccountSummary, BalanceResponse, GoalResponse, StatsResponse,
        },
        transaction::{DepositResponse, Transaction, TransactionKind, WithdrawResponse},
    },
    services::{clock::Clock, metrics},
};

/// Shared handle to the ledger plus a clock.
///
/// Cheap to clone; used directly as axum router state.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
}

/// Amounts must be present and strictly positive.
fn validate_amount(amount: Option<Decimal>) -> Result<Decimal, AppError> {
    match amount {
        Some(amount) if amount > Decimal::ZERO => Ok(amount),
        _ => Err(AppError::InvalidAmount),
    }
}

impl AccountService {
    pub fn new(store: Arc<dyn LedgerStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Name of the storage backend, for health reporting.
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.store.ping().await
    }

    /// Current instant for stamping, and the same instant in the local zone
    /// for month arithmetic.
    fn now(&self) -> (DateTime<Utc>, DateTime<Local>) {
        let now = self.clock.now();
        (now, now.with_timezone(&Local))
    }

    /// Create any of the three accounts that do not exist yet.
    ///
    /// Idempotent; safe to run concurrently with requests.
    pub async fn ensure_seeded(&self) -> Result<(), AppError> {
        for account_id in AccountId::ALL {
            self.get_or_create(account_id).await?;
        }
        tracing::info!("Accounts seeded");
        Ok(())
    }

    /// Fetch an account, creating it with its default goal if missing.
    pub async fn get_or_create(&self, account_id: AccountId) -> Result<Account, AppError> {
        if let Some(account) = self.store.get(account_id).await? {
            return Ok(account);
        }

        let (now, _) = self.now();
        let account = self
            .store
            .upsert(Account::seed(account_id, now), mutation(|_| Ok(())))
            .await?;
        tracing::info!(account = %account_id, goal = %account.monthly_goal, "Account created");
        Ok(account)
    }

    /// Balance and goal state with derived fields recomputed at call time.
    ///
    /// Recomputation is pure; the result is written back only when it differs
    /// from what is stored (e.g. after a month rollover).
    pub async fn get_balance(&self, account_id: AccountId) -> Result<BalanceResponse, AppError> {
        let (now, local_now) = self.now();
        let mut account = self.get_or_create(account_id).await?;

        let fresh = account.compute_metrics(&local_now);
        if fresh != account.stored_metrics() {
            let refresh = mutation(move |account| {
                account.refresh_metrics(&local_now);
                account.updated_at = now;
                Ok(())
            });
            account = self
                .store
                .upsert(Account::seed(account_id, now), refresh)
                .await?;
            tracing::debug!(account = %account_id, "Derived metrics refreshed");
        }

        Ok(BalanceResponse::from(&account))
    }

    /// Add money to an account.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`: amount missing, zero, negative, or would overflow
    ///   the balance
    pub async fn deposit(
        &self,
        account_id: AccountId,
        amount: Option<Decimal>,
        description: Option<String>,
    ) -> Result<DepositResponse, AppError> {
        let amount = validate_amount(amount).inspect_err(|_| {
            tracing::debug!(account = %account_id, ?amount, "Deposit rejected: invalid amount");
        })?;
        let (now, local_now) = self.now();
        let transaction = Transaction::new(
            TransactionKind::Deposit,
            account_id,
            amount,
            description,
            now,
        );

        let entry = transaction.clone();
        let account = self
            .store
            .upsert(
                Account::seed(account_id, now),
                mutation(move |account| {
                    account.balance = account
                        .balance
                        .checked_add(entry.amount)
                        .ok_or(AppError::InvalidAmount)?;
                    account.transactions.push(entry);
                    account.refresh_metrics(&local_now);
                    account.updated_at = now;
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(
            account = %account_id,
            amount = %amount,
            balance = %account.balance,
            goal_progress = %account.goal_progress,
            "Deposit recorded"
        );

        Ok(DepositResponse {
            balance: account.balance,
            goal_progress: account.goal_progress,
            transaction,
        })
    }

    /// Remove money from an account.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`: amount missing, zero or negative
    /// - `InsufficientFunds`: amount exceeds the balance; nothing is written
    pub async fn withdraw(
        &self,
        account_id: AccountId,
        amount: Option<Decimal>,
        description: Option<String>,
    ) -> Result<WithdrawResponse, AppError> {
        let amount = validate_amount(amount).inspect_err(|_| {
            tracing::debug!(account = %account_id, ?amount, "Withdrawal rejected: invalid amount");
        })?;
        let (now, local_now) = self.now();
        let transaction = Transaction::new(
            TransactionKind::Withdraw,
            account_id,
            amount,
            description,
            now,
        );

        let entry = transaction.clone();
        let result = self
            .store
            .upsert(
                Account::seed(account_id, now),
                mutation(move |account| {
                    if entry.amount > account.balance {
                        return Err(AppError::InsufficientFunds {
                            balance: account.balance,
                            requested: entry.amount,
                        });
                    }
                    account.balance -= entry.amount;
                    account.transactions.push(entry);
                    account.refresh_metrics(&local_now);
                    account.updated_at = now;
                    Ok(())
                }),
            )
            .await;

        let account = match result {
            Ok(account) => account,
            Err(err @ AppError::InsufficientFunds { .. }) => {
                tracing::warn!(account = %account_id, amount = %amount, "Withdrawal rejected: {err}");
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        tracing::info!(
            account = %account_id,
            amount = %amount,
            balance = %account.balance,
            "Withdrawal recorded"
        );

        Ok(WithdrawResponse {
            balance: account.balance,
            transaction,
        })
    }

    /// Replace the monthly goal and recompute progress against it.
    ///
    /// # Errors
    ///
    /// - `InvalidGoal`: goal missing or negative (zero is accepted and means
    ///   "no goal")
    pub async fn set_monthly_goal(
        &self,
        account_id: AccountId,
        monthly_goal: Option<Decimal>,
    ) -> Result<GoalResponse, AppError> {
        let monthly_goal = match monthly_goal {
            Some(goal) if goal >= Decimal::ZERO => goal,
            _ => return Err(AppError::InvalidGoal),
        };
        let (now, local_now) = self.now();

        let account = self
            .store
            .upsert(
                Account::seed(account_id, now),
                mutation(move |account| {
                    account.monthly_goal = monthly_goal;
                    account.refresh_metrics(&local_now);
                    account.updated_at = now;
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(account = %account_id, goal = %monthly_goal, "Monthly goal updated");

        Ok(GoalResponse {
            monthly_goal: account.monthly_goal,
            goal_progress: account.goal_progress,
        })
    }

    /// All transactions, most recent first.
    ///
    /// An account that was never created has no transactions; this does not
    /// create it.
    pub async fn list_transactions(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Transaction>, AppError> {
        let Some(account) = self.store.get(account_id).await? else {
            return Ok(Vec::new());
        };

        // Reverse first so entries sharing a timestamp keep newest-inserted first
        let mut transactions = account.transactions;
        transactions.reverse();
        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(transactions)
    }

    /// Current-month totals plus derived fields.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound`: the account was never created. Unlike the other
    ///   operations, stats do not create accounts lazily.
    pub async fn get_stats(&self, account_id: AccountId) -> Result<StatsResponse, AppError> {
        let (_, local_now) = self.now();
        let account = self
            .store
            .get(account_id)
            .await?
            .ok_or(AppError::AccountNotFound)?;

        let monthly = metrics::compute_monthly_aggregates(&account.transactions, &local_now);
        let derived = account.compute_metrics(&local_now);

        Ok(StatsResponse {
            monthly_deposits: monthly.deposits,
            monthly_withdrawals: monthly.withdrawals,
            net_savings: monthly.net,
            goal_progress: derived.goal_progress,
            last_month_savings: derived.last_month_savings,
        })
    }

    /// Snapshot of every account with derived fields recomputed at call time.
    pub async fn get_summary(&self) -> Result<Vec<AccountSummary>, AppError> {
        let (_, local_now) = self.now();
        let mut summary = Vec::with_capacity(AccountId::ALL.len());

        for account_id in AccountId::ALL {
            let account = self.get_or_create(account_id).await?;
            let derived = account.compute_metrics(&local_now);
            summary.push(AccountSummary {
                account_id,
                balance: account.balance,
                monthly_goal: account.monthly_goal,
                goal_progress: derived.goal_progress,
                last_month_savings: derived.last_month_savings,
            });
        }

        Ok(summary)
    }
}
