//! Semantic invariants not expressible via JSON Schema.

use crate::core::types::{LeaveType, StoreDocument};

/// Check semantic invariants of a loaded store document:
/// - Employee names are non-blank and carry no surrounding whitespace
/// - Leave type names are not whitespace-only (the schema only bounds length,
///   and balance keys not at all)
///
/// Returns a list of stable error messages (empty on success).
pub fn validate_invariants(doc: &StoreDocument) -> Vec<String> {
    let mut errors = Vec::new();

    for (name, employee) in &doc.employees {
        if name.trim().is_empty() || name.trim() != name {
            errors.push(format!("employee name '{}' must be non-blank and trimmed", name));
        }

        for kind in employee.leave_balance.keys() {
            if is_blank(kind) {
                errors.push(format!("{}: leave_balance has a blank leave type", name));
            }
        }

        for (index, request) in employee.leave_history.iter().enumerate() {
            if is_blank(&request.leave_type) {
                errors.push(format!("{}/leave_history[{}]: blank leave type", name, index));
            }
        }
    }

    errors
}

fn is_blank(kind: &LeaveType) -> bool {
    kind.name().trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{LeaveRequest, LeaveStatus};
    use crate::test_support::{TODAY, day, document_with, employee};

    #[test]
    fn valid_document_has_no_errors() {
        let doc = document_with("Alice", employee(&[(LeaveType::Annual, 5)], false));
        assert!(validate_invariants(&doc).is_empty());
    }

    #[test]
    fn reports_whitespace_types_and_untrimmed_names() {
        let mut alice = employee(&[(LeaveType::Other(" ".to_string()), 1)], false);
        alice.leave_history.push(LeaveRequest {
            leave_type: LeaveType::Other("  ".to_string()),
            days: 1,
            start_date: day("2999-01-01"),
            status: LeaveStatus::Pending,
            requested_on: day(TODAY),
        });
        let doc = document_with(" Alice", alice);

        let errors = validate_invariants(&doc);
        assert!(errors.iter().any(|err| err.contains("non-blank and trimmed")));
        assert!(errors.iter().any(|err| err.contains("leave_balance has a blank")));
        assert!(
            errors
                .iter()
                .any(|err| err == " Alice/leave_history[0]: blank leave type")
        );
    }
}
