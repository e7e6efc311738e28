//! Test-only fixtures for leave documents and stores.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use tempfile::TempDir;

use crate::core::date::parse_iso_date;
use crate::core::types::{Balances, Employee, LeaveType, StoreDocument};
use crate::io::store::{Persist, StorePaths, write_document};

/// Fixed "today" used by deterministic ledger tests.
pub const TODAY: &str = "2026-10-16";

pub fn day(value: &str) -> NaiveDate {
    parse_iso_date(value).unwrap_or_else(|| panic!("invalid fixture date {value}"))
}

pub fn balances(entries: &[(LeaveType, u32)]) -> Balances {
    entries.iter().cloned().collect()
}

/// Employee with the given balances and an empty history.
pub fn employee(entries: &[(LeaveType, u32)], is_manager: bool) -> Employee {
    Employee::new(balances(entries), is_manager)
}

/// Document holding a single employee and no holidays.
pub fn document_with(name: &str, employee: Employee) -> StoreDocument {
    let mut doc = StoreDocument::default();
    doc.employees.insert(name.to_string(), employee);
    doc
}

/// In-memory [`Persist`] backend that records every save and audit note.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    pub saved: Vec<StoreDocument>,
    pub notes: Vec<String>,
}

impl Persist for MemoryBackend {
    fn save(&mut self, doc: &StoreDocument) -> Result<()> {
        self.saved.push(doc.clone());
        Ok(())
    }

    fn log(&mut self, note: &str) -> Result<()> {
        self.notes.push(note.to_string());
        Ok(())
    }
}

/// Temporary directory holding a store document and its audit log.
pub struct TestStore {
    dir: TempDir,
    pub paths: StorePaths,
}

impl TestStore {
    /// Write `doc` as `leave_data.json` in a fresh temp dir.
    pub fn new(doc: &StoreDocument) -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let paths = StorePaths {
            store_path: dir.path().join("leave_data.json"),
            audit_log_path: dir.path().join("system.log"),
        };
        write_document(&paths.store_path, doc)?;
        Ok(Self { dir, paths })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("leavedesk.toml")
    }

    /// Audit log lines written so far (empty if the log does not exist yet).
    pub fn audit_lines(&self) -> Result<Vec<String>> {
        if !self.paths.audit_log_path.exists() {
            return Ok(Vec::new());
        }
        Ok(std::fs::read_to_string(&self.paths.audit_log_path)?
            .lines()
            .map(str::to_string)
            .collect())
    }
}
