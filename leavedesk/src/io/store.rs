//! Record store: load/save of the leave document plus the audit log.
//!
//! [`RecordStore`] owns the in-memory [`StoreDocument`]. Where the document and
//! audit entries end up is decided by a [`Persist`] backend, so the ledger can
//! be exercised against an in-memory backend in tests.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::invariants::validate_invariants;
use crate::core::types::StoreDocument;
use crate::io::audit::append_entry;

const STORE_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/leave_store/v1.schema.json"
));

/// Fatal store failure; the process must not continue.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store {} is unreadable: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },
}

fn unreadable(path: &Path, reason: impl std::fmt::Display) -> anyhow::Error {
    StoreError::Unreadable {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
    .into()
}

/// Locations of the store document and its audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub store_path: PathBuf,
    pub audit_log_path: PathBuf,
}

/// Destination for saved documents and audit notes.
pub trait Persist {
    /// Overwrite the persisted document with `doc`.
    fn save(&mut self, doc: &StoreDocument) -> Result<()>;
    /// Append one audit note.
    fn log(&mut self, note: &str) -> Result<()>;
}

/// Backend writing the JSON document and audit log to disk.
#[derive(Debug, Clone)]
pub struct FileBackend {
    paths: StorePaths,
}

impl FileBackend {
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }
}

impl Persist for FileBackend {
    fn save(&mut self, doc: &StoreDocument) -> Result<()> {
        write_document(&self.paths.store_path, doc)
    }

    fn log(&mut self, note: &str) -> Result<()> {
        append_entry(&self.paths.audit_log_path, note)
    }
}

/// Sole owner of the persisted leave state.
#[derive(Debug)]
pub struct RecordStore<P: Persist = FileBackend> {
    doc: StoreDocument,
    backend: P,
}

impl RecordStore<FileBackend> {
    /// Load the document from disk (schema + invariants).
    ///
    /// A document without `holidays` is migrated in place: the key is added as
    /// an empty set and the file is rewritten immediately. A missing or corrupt
    /// document yields [`StoreError::Unreadable`].
    pub fn load(paths: &StorePaths) -> Result<Self> {
        let path = &paths.store_path;
        debug!(path = %path.display(), "loading store");
        let contents = fs::read_to_string(path).map_err(|err| unreadable(path, err))?;
        let value: Value = serde_json::from_str(&contents).map_err(|err| unreadable(path, err))?;
        validate_schema(&value).map_err(|err| unreadable(path, err))?;
        let needs_holidays = value.get("holidays").is_none();
        let doc: StoreDocument =
            serde_json::from_value(value).map_err(|err| unreadable(path, err))?;
        let errors = validate_invariants(&doc);
        if !errors.is_empty() {
            return Err(unreadable(
                path,
                format!("invariants failed: {}", errors.join("; ")),
            ));
        }

        let mut store = RecordStore::with_backend(doc, FileBackend::new(paths.clone()));
        if needs_holidays {
            warn!(path = %path.display(), "store has no holidays list; adding an empty one");
            store.save().context("persist holidays migration")?;
        }
        info!(
            employees = store.doc.employees.len(),
            holidays = store.doc.holidays.len(),
            "store loaded"
        );
        Ok(store)
    }
}

impl<P: Persist> RecordStore<P> {
    pub fn with_backend(doc: StoreDocument, backend: P) -> Self {
        Self { doc, backend }
    }

    pub fn document(&self) -> &StoreDocument {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut StoreDocument {
        &mut self.doc
    }

    pub fn backend(&self) -> &P {
        &self.backend
    }

    /// Persist the full in-memory document, replacing the previous contents.
    pub fn save(&mut self) -> Result<()> {
        self.backend.save(&self.doc)
    }

    pub fn log(&mut self, note: &str) -> Result<()> {
        self.backend.log(note)
    }
}

/// Write the document as pretty JSON with a trailing newline.
///
/// This is a plain overwrite, not a temp-file rename: a crash mid-write can
/// leave a truncated document behind.
pub fn write_document(path: &Path, doc: &StoreDocument) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(doc).context("serialize store")?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write store {}", path.display()))?;
    debug!(path = %path.display(), "store saved");
    Ok(())
}

fn validate_schema(doc: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(STORE_SCHEMA).context("parse store schema")?;
    let compiled = validator_for(&schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(doc) {
        let messages = compiled
            .iter_errors(doc)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}
