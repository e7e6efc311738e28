//! Deterministic, pure leave-ledger logic.
//!
//! Core modules must be free of I/O side effects. They operate on an in-memory
//! [`types::StoreDocument`] and take the current date as an argument, so every
//! outcome is reproducible in tests.

pub mod catalog;
pub mod date;
pub mod error;
pub mod invariants;
pub mod ledger;
pub mod types;
