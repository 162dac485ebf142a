//! Savings tracker.
//!
//! A small REST service managing three fixed savings accounts (two personal
//! and one joint): deposits, withdrawals, running balances and progress
//! against a monthly savings goal.
//!
//! # Layout
//!
//! - [`ledger`]: account storage (in-memory or PostgreSQL)
//! - [`services`]: the account service and the derived-metrics engine
//! - [`handlers`] and [`routes`]: the axum HTTP surface

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod routes;
pub mod services;
