//! Developer diagnostics on stderr, filtered by `RUST_LOG`.
//!
//! Unrelated to the audit log in [`crate::io::audit`]: audit lines are product
//! output and are written regardless of the filter.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset: warnings from this crate only, so
/// dependency chatter never reaches the terminal.
pub fn default_filter() -> String {
    format!("{}=warn", env!("CARGO_CRATE_NAME"))
}

/// Install the stderr subscriber.
///
/// `RUST_LOG` takes precedence over [`default_filter`]. Output is compact.
///
/// # Example
/// ```bash
/// RUST_LOG=leavedesk=debug leavedesk request Alice --type annual --days 2 --start 2030-01-06
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
