// Helpers are shared by test files that are compiled separately
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use savings_tracker::{
    ledger::MemoryLedgerStore,
    services::{account_service::AccountService, clock::Clock},
};

/// Clock that only moves when told to.
///
/// Default instants sit mid-month at noon UTC so month arithmetic in the
/// local zone gives the same answer wherever the tests run.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(rfc3339: &str) -> Self {
        Self {
            now: Mutex::new(parse_instant(rfc3339)),
        }
    }

    pub fn set(&self, rfc3339: &str) {
        *self.now.lock().unwrap() = parse_instant(rfc3339);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub fn parse_instant(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

/// Service over a fresh in-memory ledger, with the clock it reads.
pub fn test_service() -> (AccountService, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::at("2026-03-15T12:00:00Z"));
    let service = AccountService::new(Arc::new(MemoryLedgerStore::new()), clock.clone());
    (service, clock)
}
