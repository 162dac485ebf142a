//! In-memory ledger store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{LedgerStore, Mutation};
use crate::{
    error::AppError,
    models::account::{Account, AccountId},
};

/// Ledger held in process memory.
///
/// The account set is closed, so every id gets its own slot up front and the
/// map itself is never written after construction. Locking a slot serializes
/// all access to that one account.
#[derive(Debug)]
pub struct MemoryLedgerStore {
    slots: HashMap<AccountId, Mutex<Option<Account>>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self {
            slots: AccountId::ALL
                .into_iter()
                .map(|id| (id, Mutex::new(None)))
                .collect(),
        }
    }

    fn slot(&self, account_id: AccountId) -> &Mutex<Option<Account>> {
        // Every AccountId is inserted in `new`.
        &self.slots[&account_id]
    }
}

impl Default for MemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn get(&self, account_id: AccountId) -> Result<Option<Account>, AppError> {
        Ok(self.slot(account_id).lock().await.clone())
    }

    async fn upsert(&self, seed: Account, mutate: Mutation) -> Result<Account, AppError> {
        let mut slot = self.slot(seed.account_id).lock().await;

        // Work on a copy so a rejected mutation leaves the stored record as is.
        let mut working = slot.clone().unwrap_or(seed);
        mutate(&mut working)?;

        *slot = Some(working.clone());
        Ok(working)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
