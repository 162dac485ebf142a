//! Ledger storage.
//!
//! A ledger store maps each [`AccountId`] to one [`Account`] record with its
//! transaction history embedded. Two backends exist:
//!
//! - [`MemoryLedgerStore`]: process-local, used when no database is configured
//!   and in tests
//! - [`PgLedgerStore`]: PostgreSQL via sqlx
//!
//! # Concurrency
//!
//! `upsert` holds an exclusive lock on the single record for the whole
//! read-modify-write, so a balance check inside a mutation and the write that
//! follows it cannot interleave with another mutation of the same account.
//! Different accounts never contend.

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::account::{Account, AccountId},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryLedgerStore;
pub use postgres::PgLedgerStore;

/// A change applied to an account under its record lock.
///
/// Returning an error aborts the change; nothing is persisted.
pub type Mutation = Box<dyn FnOnce(&mut Account) -> Result<(), AppError> + Send>;

/// Box a closure as a [`Mutation`].
pub fn mutation<F>(f: F) -> Mutation
where
    F: FnOnce(&mut Account) -> Result<(), AppError> + Send + 'static,
{
    Box::new(f)
}

/// Durable mapping from account id to account record.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Fetch an account, or `None` if it was never created.
    ///
    /// The returned balance and history come from one consistent snapshot.
    async fn get(&self, account_id: AccountId) -> Result<Option<Account>, AppError>;

    /// Apply `mutate` to the stored account, creating it from `seed` first if
    /// it does not exist yet, and persist the result.
    ///
    /// Transactions may only be appended by `mutate`; existing entries are
    /// never rewritten.
    async fn upsert(&self, seed: Account, mutate: Mutation) -> Result<Account, AppError>;

    /// Check that the backing storage is reachable.
    async fn ping(&self) -> Result<(), AppError>;

    /// Short name reported by the health endpoint.
    fn backend(&self) -> &'static str;
}
