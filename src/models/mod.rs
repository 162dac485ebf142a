//! Data models for accounts and their transaction history.

/// Savings account model
pub mod account;
/// Deposit and withdrawal model
pub mod transaction;
