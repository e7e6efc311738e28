//! Append-only audit log of state-changing actions.
//!
//! One line per action: `[YYYY-MM-DD HH:MM:SS] <note>`. The file is only ever
//! appended to; nothing in this crate rotates or truncates it.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use tracing::debug;

/// Render one audit line (newline-terminated) for `note` at `at`.
///
/// Embedded line breaks are flattened so that each action stays on one line.
pub fn format_entry(note: &str, at: NaiveDateTime) -> String {
    let flat = note.replace(['\r', '\n'], " ");
    format!("[{}] {}\n", at.format("%Y-%m-%d %H:%M:%S"), flat.trim_end())
}

/// Append `note` stamped with the current local time.
pub fn append_entry(path: &Path, note: &str) -> Result<()> {
    append_entry_at(path, note, Local::now().naive_local())
}

pub fn append_entry_at(path: &Path, note: &str, at: NaiveDateTime) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open audit log {}", path.display()))?;
    file.write_all(format_entry(note, at).as_bytes())
        .with_context(|| format!("append audit log {}", path.display()))?;
    debug!(path = %path.display(), "audit entry appended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, min: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .and_then(|day| day.and_hms_opt(hour, min, sec))
            .expect("timestamp")
    }

    #[test]
    fn entry_uses_bracketed_local_timestamp() {
        assert_eq!(
            format_entry("Holiday added: 2999-12-25", at(9, 5, 7)),
            "[2026-10-16 09:05:07] Holiday added: 2999-12-25\n"
        );
    }

    #[test]
    fn multi_line_notes_are_flattened() {
        assert_eq!(
            format_entry("first\nsecond\n", at(0, 0, 0)),
            "[2026-10-16 00:00:00] first second\n"
        );
    }

    #[test]
    fn append_preserves_existing_lines() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("logs").join("system.log");

        append_entry_at(&path, "one", at(1, 0, 0)).expect("append one");
        append_entry_at(&path, "two", at(2, 0, 0)).expect("append two");

        let contents = fs::read_to_string(&path).expect("read log");
        assert_eq!(
            contents,
            "[2026-10-16 01:00:00] one\n[2026-10-16 02:00:00] two\n"
        );
    }
}
