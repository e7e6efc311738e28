//! I/O helpers: store persistence, audit log, config, and scaffolding.

pub mod audit;
pub mod config;
pub mod init;
pub mod store;
