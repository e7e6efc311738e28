//! leavedesk configuration stored in `leavedesk.toml`.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::catalog::LeaveCatalog;
use crate::core::types::LeaveType;
use crate::io::store::StorePaths;

/// leavedesk configuration (TOML).
///
/// Intended to be edited by humans. Missing fields fall back to defaults that
/// match a fresh install: `leave_data.json` and `system.log` next to the
/// config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LeaveConfig {
    /// JSON document holding employees and holidays.
    pub store_path: PathBuf,

    /// Append-only audit log.
    pub audit_log_path: PathBuf,

    pub leave_types: LeaveTypesConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LeaveTypesConfig {
    /// Organisation-specific leave types accepted alongside the built-ins
    /// (e.g. `["Study Leave"]`).
    pub extra: Vec<String>,
}

impl Default for LeaveConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("leave_data.json"),
            audit_log_path: PathBuf::from("system.log"),
            leave_types: LeaveTypesConfig::default(),
        }
    }
}

impl LeaveConfig {
    pub fn validate(&self) -> Result<()> {
        if self.store_path.as_os_str().is_empty() {
            return Err(anyhow!("store_path must be non-empty"));
        }
        if self.audit_log_path.as_os_str().is_empty() {
            return Err(anyhow!("audit_log_path must be non-empty"));
        }
        let mut seen = HashSet::new();
        for name in &self.leave_types.extra {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(anyhow!("leave_types.extra entries must be non-blank"));
            }
            let folded = trimmed.to_ascii_lowercase();
            let shadows_built_in = LeaveType::BUILT_IN.iter().any(|known| {
                known.name().eq_ignore_ascii_case(trimmed)
                    || known.alias().is_some_and(|alias| alias == folded)
            });
            if shadows_built_in {
                return Err(anyhow!(
                    "leave_types.extra entry '{}' duplicates a built-in type",
                    trimmed
                ));
            }
            if !seen.insert(folded) {
                return Err(anyhow!(
                    "leave_types.extra entry '{}' is listed twice",
                    trimmed
                ));
            }
        }
        Ok(())
    }

    pub fn catalog(&self) -> LeaveCatalog {
        LeaveCatalog::new(self.leave_types.extra.iter().cloned())
    }

    /// Resolve store and audit paths; relative entries are taken from `base`.
    pub fn store_paths(&self, base: &Path) -> StorePaths {
        StorePaths {
            store_path: base.join(&self.store_path),
            audit_log_path: base.join(&self.audit_log_path),
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `LeaveConfig::default()`.
pub fn load_config(path: &Path) -> Result<LeaveConfig> {
    if !path.exists() {
        let cfg = LeaveConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: LeaveConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &LeaveConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
