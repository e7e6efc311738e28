//! Recoverable leave-workflow errors.
//!
//! Every variant renders as the one-line message shown to the user. Callers
//! that need to branch use [`LeaveError::kind`] instead of matching on text.

use chrono::NaiveDate;
use thiserror::Error;

use crate::core::types::{LeaveStatus, LeaveType};

/// Input field that a command requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    LeaveType,
    Days,
    StartDate,
}

impl Field {
    fn prompt(self) -> &'static str {
        match self {
            Field::Name => "Employee name is required.",
            Field::LeaveType => "Specify the leave type.",
            Field::Days => "Mention how many days you want to request.",
            Field::StartDate => "Start date is missing.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaveError {
    #[error("Employee '{name}' not found.")]
    NotFound { name: String },

    #[error("Employee '{name}' is already registered.")]
    AlreadyExists { name: String },

    #[error("{}", field.prompt())]
    MissingField { field: Field },

    #[error("Leave days must be a positive whole number (got '{input}').")]
    InvalidDays { input: String },

    #[error("Invalid date '{input}': use YYYY-MM-DD, today or later.")]
    InvalidDate { input: String },

    #[error("{date} is a holiday. Pick a different date.")]
    HolidayConflict { date: NaiveDate },

    #[error("You only have {available} {leave_type} day(s) left (requested {requested}).")]
    InsufficientBalance {
        leave_type: LeaveType,
        available: u32,
        requested: u64,
    },

    #[error("No active {leave_type} request starting {start_date} to cancel.")]
    NoMatchingLeave {
        leave_type: LeaveType,
        start_date: NaiveDate,
    },

    #[error("No pending leaves to approve for {name}.")]
    NoPendingRequests { name: String },

    #[error("{actor} is not a manager and cannot approve leave.")]
    Unauthorized { actor: String },

    #[error("{date} is already registered as a holiday.")]
    DuplicateHoliday { date: NaiveDate },

    #[error("Unknown leave type '{input}'.")]
    UnknownLeaveType { input: String },

    #[error("No previous leave records found for {name}.")]
    NoLeaveHistory { name: String },

    #[error("{name} has no leave request #{number}.")]
    RequestNotFound { name: String, number: usize },

    #[error("Cannot move a {from} request to {to}.")]
    InvalidTransition { from: LeaveStatus, to: LeaveStatus },
}

impl LeaveError {
    /// Stable machine-readable code for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            LeaveError::NotFound { .. } => "not_found",
            LeaveError::AlreadyExists { .. } => "already_exists",
            LeaveError::MissingField { .. } => "missing_field",
            LeaveError::InvalidDays { .. } => "invalid_days",
            LeaveError::InvalidDate { .. } => "invalid_date",
            LeaveError::HolidayConflict { .. } => "holiday_conflict",
            LeaveError::InsufficientBalance { .. } => "insufficient_balance",
            LeaveError::NoMatchingLeave { .. } => "no_matching_leave",
            LeaveError::NoPendingRequests { .. } => "no_pending_requests",
            LeaveError::Unauthorized { .. } => "unauthorized",
            LeaveError::DuplicateHoliday { .. } => "duplicate_holiday",
            LeaveError::UnknownLeaveType { .. } => "unknown_leave_type",
            LeaveError::NoLeaveHistory { .. } => "no_leave_history",
            LeaveError::RequestNotFound { .. } => "request_not_found",
            LeaveError::InvalidTransition { .. } => "invalid_transition",
        }
    }
}
