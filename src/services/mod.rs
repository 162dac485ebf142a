//! Business logic services.
//!
//! Services contain the ledger rules separated from HTTP handlers.

pub mod account_service;
pub mod clock;
pub mod metrics;
