//! Leave-request state machine and balance accounting.
//!
//! Every function here operates on an in-memory [`StoreDocument`] and performs
//! no I/O. Validation always completes before the document is touched, so an
//! `Err` return guarantees the document is unchanged. Mutating operations
//! return a [`Change`] carrying the user-facing message and the audit note the
//! caller must persist.

use chrono::NaiveDate;

use crate::core::catalog::LeaveCatalog;
use crate::core::date::{is_valid_future_date_on, parse_iso_date};
use crate::core::error::{Field, LeaveError};
use crate::core::types::{Balances, Employee, LeaveRequest, LeaveStatus, LeaveType, StoreDocument};

/// A successful mutation: what to tell the user and what to audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub message: String,
    pub note: String,
}

/// Raw, unvalidated input for a leave submission.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeaveApplication<'a> {
    pub leave_type: Option<&'a str>,
    pub days: Option<&'a str>,
    pub start_date: Option<&'a str>,
}

/// Per-request admin decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Deny,
}

/// A pending request together with its 1-based position in the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingEntry<'a> {
    pub number: usize,
    pub request: &'a LeaveRequest,
}

pub fn register(
    doc: &mut StoreDocument,
    name: &str,
    initial_balances: Balances,
    is_manager: bool,
) -> Result<Change, LeaveError> {
    let name = present(Some(name), Field::Name)?;
    if doc.employees.contains_key(name) {
        return Err(LeaveError::AlreadyExists {
            name: name.to_string(),
        });
    }
    let note = format!(
        "New employee added: {name}, Manager: {is_manager}, Leave: {}",
        format_balances(&initial_balances)
    );
    doc.employees
        .insert(name.to_string(), Employee::new(initial_balances, is_manager));
    Ok(Change {
        message: format!("{name} has been successfully added."),
        note,
    })
}

/// Partial update: each of `new_balances` and `is_manager` applies only when given.
pub fn edit(
    doc: &mut StoreDocument,
    name: &str,
    new_balances: Option<Balances>,
    is_manager: Option<bool>,
) -> Result<Change, LeaveError> {
    let employee = find_employee_mut(doc, name)?;
    let leave_note = new_balances
        .as_ref()
        .map(format_balances)
        .unwrap_or_else(|| "unchanged".to_string());
    let manager_note = is_manager
        .map(|flag| flag.to_string())
        .unwrap_or_else(|| "unchanged".to_string());

    if let Some(balances) = new_balances {
        employee.leave_balance = balances;
    }
    if let Some(flag) = is_manager {
        employee.is_manager = flag;
    }
    Ok(Change {
        message: format!("{name}'s record has been updated."),
        note: format!("Employee updated: {name}, Leave: {leave_note}, Manager status: {manager_note}"),
    })
}

/// Delete the employee and their entire leave history.
pub fn remove(doc: &mut StoreDocument, name: &str) -> Result<Change, LeaveError> {
    if doc.employees.remove(name).is_none() {
        return Err(not_found(name));
    }
    Ok(Change {
        message: format!("'{name}' has been removed."),
        note: format!("Deleted employee: {name}"),
    })
}

pub fn add_holiday(
    doc: &mut StoreDocument,
    input: &str,
    today: NaiveDate,
) -> Result<Change, LeaveError> {
    let date = valid_date(input, today)?;
    if doc.holidays.contains(&date) {
        return Err(LeaveError::DuplicateHoliday { date });
    }
    doc.holidays.insert(date);
    Ok(Change {
        message: format!("{date} marked as a holiday."),
        note: format!("New holiday added: {date}"),
    })
}

/// Read-only balance report: every balance, or one type (0 if never granted).
pub fn check_balance(
    doc: &StoreDocument,
    catalog: &LeaveCatalog,
    name: &str,
    leave_type: Option<&str>,
) -> Result<String, LeaveError> {
    let employee = find_employee(doc, name)?;
    let Some(input) = leave_type.filter(|value| !value.trim().is_empty()) else {
        let mut lines = vec!["Your leave balances:".to_string()];
        lines.extend(
            employee
                .leave_balance
                .iter()
                .map(|(kind, days)| format!("- {kind}: {days} day(s)")),
        );
        return Ok(lines.join("\n"));
    };
    let kind = resolve(catalog, input)?;
    Ok(format!(
        "You have {} {kind} day(s) remaining.",
        employee.balance(&kind)
    ))
}

/// Submit a request, deducting its days up front.
///
/// Checks run in a fixed order and stop at the first failure: type present and
/// known, days a positive integer, start date present, well-formed and not in
/// the past, not a holiday, and finally sufficient balance.
pub fn request_leave(
    doc: &mut StoreDocument,
    catalog: &LeaveCatalog,
    today: NaiveDate,
    name: &str,
    application: LeaveApplication<'_>,
) -> Result<Change, LeaveError> {
    let employee = find_employee(doc, name)?;

    let kind = resolve(catalog, present(application.leave_type, Field::LeaveType)?)?;
    let days_input = present(application.days, Field::Days)?;
    let requested = days_input
        .parse::<u64>()
        .ok()
        .filter(|days| *days > 0)
        .ok_or_else(|| LeaveError::InvalidDays {
            input: days_input.to_string(),
        })?;
    let start_date = valid_date(present(application.start_date, Field::StartDate)?, today)?;
    if doc.holidays.contains(&start_date) {
        return Err(LeaveError::HolidayConflict { date: start_date });
    }
    let available = employee.balance(&kind);
    // Balances are u32, so anything wider can never be covered.
    let days = u32::try_from(requested)
        .ok()
        .filter(|days| *days <= available)
        .ok_or_else(|| LeaveError::InsufficientBalance {
            leave_type: kind.clone(),
            available,
            requested,
        })?;

    let employee = find_employee_mut(doc, name)?;
    employee.leave_balance.insert(kind.clone(), available - days);
    employee.leave_history.push(LeaveRequest {
        leave_type: kind.clone(),
        days,
        start_date,
        status: LeaveStatus::Pending,
        requested_on: today,
    });
    Ok(Change {
        message: format!(
            "Leave request submitted for {days} {kind} day(s) starting {start_date}. Awaiting approval."
        ),
        note: format!(
            "{name} submitted a leave request for {days} day(s) of {kind} starting from {start_date}."
        ),
    })
}

/// Cancel the first live request matching `(leave_type, start_date)` in stored order.
///
/// Requests are only ever appended, so stored order is submission order and
/// the earliest-submitted match wins.
pub fn cancel_leave(
    doc: &mut StoreDocument,
    catalog: &LeaveCatalog,
    today: NaiveDate,
    name: &str,
    leave_type: Option<&str>,
    start_date: Option<&str>,
) -> Result<Change, LeaveError> {
    let employee = find_employee(doc, name)?;
    if employee.leave_history.is_empty() {
        return Err(LeaveError::NoLeaveHistory {
            name: name.to_string(),
        });
    }
    let type_input = present(leave_type, Field::LeaveType)?;
    let date_input = present(start_date, Field::StartDate)?;
    // Stored requests may carry types no longer configured; match those verbatim.
    let kind = catalog
        .resolve(type_input)
        .unwrap_or_else(|| LeaveType::from(type_input.to_string()));
    let start_date = valid_date(date_input, today)?;

    let position = employee
        .leave_history
        .iter()
        .position(|request| {
            request.leave_type == kind
                && request.start_date == start_date
                && request.status.is_live()
        })
        .ok_or_else(|| LeaveError::NoMatchingLeave {
            leave_type: kind.clone(),
            start_date,
        })?;

    let employee = find_employee_mut(doc, name)?;
    settle(employee, position, LeaveStatus::Cancelled)?;
    Ok(Change {
        message: "Leave request cancelled successfully.".to_string(),
        note: format!("{name} cancelled leave for {kind} on {start_date}."),
    })
}

/// Every request in stored order, one per line.
pub fn view_history(doc: &StoreDocument, name: &str) -> Result<String, LeaveError> {
    let employee = find_employee(doc, name)?;
    if employee.leave_history.is_empty() {
        return Ok("No leave history found.".to_string());
    }
    Ok(employee
        .leave_history
        .iter()
        .map(LeaveRequest::summary)
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Manager self-service: approve every pending request of `target` at once.
pub fn approve_leave(
    doc: &mut StoreDocument,
    actor: &str,
    target: &str,
) -> Result<Change, LeaveError> {
    if !find_employee(doc, actor)?.is_manager {
        return Err(LeaveError::Unauthorized {
            actor: actor.to_string(),
        });
    }
    let target_employee = find_employee_mut(doc, target)?;
    let pending: Vec<&mut LeaveRequest> = target_employee
        .leave_history
        .iter_mut()
        .filter(|request| request.status == LeaveStatus::Pending)
        .collect();
    if pending.is_empty() {
        return Err(LeaveError::NoPendingRequests {
            name: target.to_string(),
        });
    }

    let count = pending.len();
    for request in pending {
        request.transition(LeaveStatus::Approved)?;
    }
    Ok(Change {
        message: format!("All pending leaves approved for {target} ({count} request(s))."),
        note: format!("{actor} approved all pending leave requests for {target}."),
    })
}

/// Names of employees with at least one pending request.
pub fn employees_with_pending(doc: &StoreDocument) -> Vec<&str> {
    doc.employees
        .iter()
        .filter(|(_, employee)| employee.has_pending())
        .map(|(name, _)| name.as_str())
        .collect()
}

pub fn pending_requests<'a>(
    doc: &'a StoreDocument,
    name: &str,
) -> Result<Vec<PendingEntry<'a>>, LeaveError> {
    Ok(find_employee(doc, name)?
        .leave_history
        .iter()
        .enumerate()
        .filter(|(_, request)| request.status == LeaveStatus::Pending)
        .map(|(index, request)| PendingEntry {
            number: index + 1,
            request,
        })
        .collect())
}

/// Admin review of a single request, addressed by its 1-based history number.
///
/// Approval keeps the balance as is (days were deducted at submission);
/// denial refunds them.
pub fn review_request(
    doc: &mut StoreDocument,
    name: &str,
    number: usize,
    decision: ReviewDecision,
) -> Result<Change, LeaveError> {
    let employee = find_employee_mut(doc, name)?;
    let index = number
        .checked_sub(1)
        .filter(|index| *index < employee.leave_history.len())
        .ok_or_else(|| LeaveError::RequestNotFound {
            name: name.to_string(),
            number,
        })?;

    let (next, message, verb) = match decision {
        ReviewDecision::Approve => (LeaveStatus::Approved, "Request approved.", "approved"),
        ReviewDecision::Deny => (
            LeaveStatus::Denied,
            "Request denied; leave balance refunded.",
            "denied",
        ),
    };
    settle(employee, index, next)?;
    let request = &employee.leave_history[index];
    Ok(Change {
        message: message.to_string(),
        note: format!(
            "Leave {verb}: {} days {} for {name} starting {}",
            request.days, request.leave_type, request.start_date
        ),
    })
}

/// Transition one request and refund its days when the new state requires it.
fn settle(employee: &mut Employee, index: usize, next: LeaveStatus) -> Result<(), LeaveError> {
    let request = &mut employee.leave_history[index];
    request.transition(next)?;
    if next.refunds() {
        let (kind, days) = (request.leave_type.clone(), request.days);
        let balance = employee.leave_balance.entry(kind).or_insert(0);
        *balance = balance.saturating_add(days);
    }
    Ok(())
}

fn find_employee<'a>(doc: &'a StoreDocument, name: &str) -> Result<&'a Employee, LeaveError> {
    doc.employees.get(name).ok_or_else(|| not_found(name))
}

fn find_employee_mut<'a>(doc: &'a mut StoreDocument, name: &str) -> Result<&'a mut Employee, LeaveError> {
    doc.employees.get_mut(name).ok_or_else(|| not_found(name))
}

fn not_found(name: &str) -> LeaveError {
    LeaveError::NotFound {
        name: name.to_string(),
    }
}

fn present(value: Option<&str>, field: Field) -> Result<&str, LeaveError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(LeaveError::MissingField { field })
}

fn resolve(catalog: &LeaveCatalog, input: &str) -> Result<LeaveType, LeaveError> {
    catalog
        .resolve(input)
        .ok_or_else(|| LeaveError::UnknownLeaveType {
            input: input.to_string(),
        })
}

fn valid_date(input: &str, today: NaiveDate) -> Result<NaiveDate, LeaveError> {
    parse_iso_date(input)
        .filter(|_| is_valid_future_date_on(input, today))
        .ok_or_else(|| LeaveError::InvalidDate {
            input: input.to_string(),
        })
}

pub fn format_balances(balances: &Balances) -> String {
    if balances.is_empty() {
        return "none".to_string();
    }
    balances
        .iter()
        .map(|(kind, days)| format!("{kind}={days}"))
        .collect::<Vec<_>>()
        .join(", ")
}
