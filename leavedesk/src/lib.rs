//! Leave-management workflow: requests, approvals, and balance accounting.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (leave types, the request state
//!   machine, balance accounting). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (store document, audit log, config).
//!
//! [`controller`] coordinates core logic with the record store to implement
//! CLI commands: every successful mutation is saved and audited.

pub mod controller;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
