//! Stable exit codes for leavedesk CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid usage or configuration, or an I/O failure while saving.
pub const INVALID: i32 = 1;
/// The command was refused (unknown employee, insufficient balance, ...).
/// Nothing was changed.
pub const REJECTED: i32 = 2;
/// The store document is missing or corrupt.
pub const STORE_UNREADABLE: i32 = 3;
