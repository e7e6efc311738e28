//! Scaffolding for a fresh leave store (`leavedesk init`).

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::info;

use super::config::{LeaveConfig, write_config};
use super::store::{StorePaths, write_document};
use crate::core::types::StoreDocument;

/// Options for `init_store`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, overwrite an existing store document and config.
    pub force: bool,
}

/// Create an empty store document at `paths.store_path`, and the config file
/// at `config_path` if it does not exist yet.
///
/// Fails if the store already exists unless `options.force` is set. The audit
/// log is left untouched either way.
pub fn init_store(
    paths: &StorePaths,
    config_path: &Path,
    cfg: &LeaveConfig,
    options: &InitOptions,
) -> Result<()> {
    let store_path = &paths.store_path;
    if store_path.exists() && !options.force {
        return Err(anyhow!(
            "leavedesk init: {} already exists (use --force to overwrite)",
            store_path.display()
        ));
    }
    if store_path.exists() && !store_path.is_file() {
        return Err(anyhow!(
            "leavedesk init: {} exists but is not a file",
            store_path.display()
        ));
    }
    if let Some(parent) = store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }

    write_document(store_path, &StoreDocument::default())?;
    if options.force || !config_path.exists() {
        write_config(config_path, cfg)?;
    }
    info!(store = %store_path.display(), "initialized leave store");
    Ok(())
}
