//! Shared types for the leave ledger.
//!
//! These mirror the persisted store document one-to-one. Maps and sets are
//! ordered so that serialized output is stable across runs.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::error::LeaveError;

/// Category of leave a balance or request applies to.
///
/// The three built-in categories are always recognized. `Other` carries
/// organisation-specific types enabled through configuration; see
/// [`crate::core::catalog::LeaveCatalog`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LeaveType {
    Sick,
    Annual,
    Maternity,
    Other(String),
}

impl LeaveType {
    pub const BUILT_IN: [LeaveType; 3] = [LeaveType::Sick, LeaveType::Annual, LeaveType::Maternity];

    /// Display name, also used as the persisted key.
    pub fn name(&self) -> &str {
        match self {
            LeaveType::Sick => "Sick Leave",
            LeaveType::Annual => "Annual Leave",
            LeaveType::Maternity => "Maternity Leave",
            LeaveType::Other(name) => name,
        }
    }

    /// Short alias accepted on input for built-in types.
    pub fn alias(&self) -> Option<&'static str> {
        match self {
            LeaveType::Sick => Some("sick"),
            LeaveType::Annual => Some("annual"),
            LeaveType::Maternity => Some("maternity"),
            LeaveType::Other(_) => None,
        }
    }
}

impl From<String> for LeaveType {
    fn from(value: String) -> Self {
        LeaveType::BUILT_IN
            .into_iter()
            .find(|known| known.name() == value)
            .unwrap_or(LeaveType::Other(value))
    }
}

impl From<LeaveType> for String {
    fn from(value: LeaveType) -> Self {
        match value {
            LeaveType::Other(name) => name,
            known => known.name().to_string(),
        }
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Remaining days per leave type.
pub type Balances = BTreeMap<LeaveType, u32>;

/// Lifecycle state of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Denied,
    Cancelled,
}

impl LeaveStatus {
    /// Pending and approved requests still hold deducted days.
    pub fn is_live(self) -> bool {
        matches!(self, LeaveStatus::Pending | LeaveStatus::Approved)
    }

    pub fn can_transition_to(self, next: LeaveStatus) -> bool {
        matches!(
            (self, next),
            (LeaveStatus::Pending, LeaveStatus::Approved)
                | (LeaveStatus::Pending, LeaveStatus::Denied)
                | (LeaveStatus::Pending, LeaveStatus::Cancelled)
                | (LeaveStatus::Approved, LeaveStatus::Cancelled)
        )
    }

    /// Entering this state returns the request's days to the balance.
    pub fn refunds(self) -> bool {
        matches!(self, LeaveStatus::Denied | LeaveStatus::Cancelled)
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Denied => "Denied",
            LeaveStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

/// A single leave request. Only `status` changes after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    pub days: u32,
    pub start_date: NaiveDate,
    pub status: LeaveStatus,
    pub requested_on: NaiveDate,
}

impl LeaveRequest {
    /// Move to `next`, rejecting transitions the lifecycle does not allow.
    pub fn transition(&mut self, next: LeaveStatus) -> Result<(), LeaveError> {
        if !self.status.can_transition_to(next) {
            return Err(LeaveError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    pub fn summary(&self) -> String {
        format!(
            "{} on {} for {} day(s) - {}",
            self.leave_type, self.start_date, self.days, self.status
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default)]
    pub leave_balance: Balances,
    #[serde(default)]
    pub is_manager: bool,
    #[serde(default)]
    pub leave_history: Vec<LeaveRequest>,
}

impl Employee {
    pub fn new(leave_balance: Balances, is_manager: bool) -> Self {
        Self {
            leave_balance,
            is_manager,
            leave_history: Vec::new(),
        }
    }

    pub fn balance(&self, leave_type: &LeaveType) -> u32 {
        self.leave_balance.get(leave_type).copied().unwrap_or(0)
    }

    pub fn has_pending(&self) -> bool {
        self.leave_history
            .iter()
            .any(|request| request.status == LeaveStatus::Pending)
    }
}

/// The whole persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub employees: BTreeMap<String, Employee>,
    #[serde(default)]
    pub holidays: BTreeSet<NaiveDate>,
}

/// Result of a controller operation, rendered as a single display string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The operation succeeded; any mutation is already saved and logged.
    Success(String),
    /// The operation was refused; nothing changed.
    Rejected(LeaveError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn error(&self) -> Option<&LeaveError> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Rejected(err) => Some(err),
        }
    }
}

impl From<Result<String, LeaveError>> for Outcome {
    fn from(value: Result<String, LeaveError>) -> Self {
        match value {
            Ok(message) => Outcome::Success(message),
            Err(err) => Outcome::Rejected(err),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(message) => f.write_str(message),
            Outcome::Rejected(err) => write!(f, "{err}"),
        }
    }
}
