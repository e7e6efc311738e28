//! The set of leave types a deployment accepts.

use crate::core::types::LeaveType;

/// Built-in leave types plus any configured extras.
///
/// Resolution is case-insensitive on the display name, and built-in types
/// also accept their short alias (`sick`, `annual`, `maternity`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaveCatalog {
    extra: Vec<String>,
}

impl LeaveCatalog {
    pub fn new<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extra: extra
                .into_iter()
                .map(|name| name.into().trim().to_string())
                .collect(),
        }
    }

    /// All recognized types, built-ins first.
    pub fn types(&self) -> Vec<LeaveType> {
        LeaveType::BUILT_IN
            .into_iter()
            .chain(self.extra.iter().cloned().map(LeaveType::Other))
            .collect()
    }

    pub fn resolve(&self, input: &str) -> Option<LeaveType> {
        let wanted = input.trim();
        if wanted.is_empty() {
            return None;
        }
        self.types().into_iter().find(|candidate| {
            candidate.name().eq_ignore_ascii_case(wanted)
                || candidate
                    .alias()
                    .is_some_and(|alias| alias.eq_ignore_ascii_case(wanted))
        })
    }
}
