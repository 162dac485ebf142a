//! Source of "now" for stamping transactions and evaluating month windows.

use chrono::{DateTime, Utc};

/// Supplies the current instant.
///
/// Production code uses [`SystemClock`]; tests provide their own to move
/// across month boundaries deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
