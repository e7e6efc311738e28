//! Orchestration for leave commands.
//!
//! [`LeaveController`] binds a [`RecordStore`] to the pure ledger in
//! [`crate::core::ledger`]. A successful mutation is followed by exactly one
//! `save()` and one audit `log()`; a rejected one touches neither. Only I/O
//! failures surface as `Err`; business rejections come back as
//! [`Outcome::Rejected`].

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::core::catalog::LeaveCatalog;
use crate::core::date;
use crate::core::error::LeaveError;
use crate::core::ledger::{self, Change, LeaveApplication, ReviewDecision};
use crate::core::types::{Balances, Outcome};
use crate::io::store::{Persist, RecordStore};

pub struct LeaveController<'s, P: Persist> {
    store: &'s mut RecordStore<P>,
    catalog: LeaveCatalog,
    today: NaiveDate,
}

impl<'s, P: Persist> LeaveController<'s, P> {
    pub fn new(store: &'s mut RecordStore<P>, catalog: LeaveCatalog) -> Self {
        Self {
            store,
            catalog,
            today: date::today(),
        }
    }

    /// Pin the calendar date used for validation and `requested_on`.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn store(&self) -> &RecordStore<P> {
        self.store
    }

    pub fn catalog(&self) -> &LeaveCatalog {
        &self.catalog
    }

    pub fn register(
        &mut self,
        name: &str,
        initial_balances: Balances,
        is_manager: bool,
    ) -> Result<Outcome> {
        let result = ledger::register(
            self.store.document_mut(),
            name,
            initial_balances,
            is_manager,
        );
        self.commit("register", result)
    }

    pub fn edit(
        &mut self,
        name: &str,
        new_balances: Option<Balances>,
        is_manager: Option<bool>,
    ) -> Result<Outcome> {
        let result = ledger::edit(self.store.document_mut(), name, new_balances, is_manager);
        self.commit("edit", result)
    }

    pub fn remove(&mut self, name: &str) -> Result<Outcome> {
        let result = ledger::remove(self.store.document_mut(), name);
        self.commit("remove", result)
    }

    pub fn add_holiday(&mut self, date: &str) -> Result<Outcome> {
        let result = ledger::add_holiday(self.store.document_mut(), date, self.today);
        self.commit("add_holiday", result)
    }

    pub fn request_leave(
        &mut self,
        name: &str,
        application: LeaveApplication<'_>,
    ) -> Result<Outcome> {
        let result = ledger::request_leave(
            self.store.document_mut(),
            &self.catalog,
            self.today,
            name,
            application,
        );
        self.commit("request_leave", result)
    }

    pub fn cancel_leave(
        &mut self,
        name: &str,
        leave_type: Option<&str>,
        start_date: Option<&str>,
    ) -> Result<Outcome> {
        let result = ledger::cancel_leave(
            self.store.document_mut(),
            &self.catalog,
            self.today,
            name,
            leave_type,
            start_date,
        );
        self.commit("cancel_leave", result)
    }

    /// Manager bulk approval of every pending request of `target`.
    pub fn approve_leave(&mut self, actor: &str, target: &str) -> Result<Outcome> {
        let result = ledger::approve_leave(self.store.document_mut(), actor, target);
        self.commit("approve_leave", result)
    }

    /// Admin decision on a single request (1-based history number).
    pub fn review_request(
        &mut self,
        name: &str,
        number: usize,
        decision: ReviewDecision,
    ) -> Result<Outcome> {
        let result = ledger::review_request(self.store.document_mut(), name, number, decision);
        self.commit("review_request", result)
    }

    pub fn check_balance(&self, name: &str, leave_type: Option<&str>) -> Outcome {
        ledger::check_balance(self.store.document(), &self.catalog, name, leave_type).into()
    }

    pub fn view_history(&self, name: &str) -> Outcome {
        ledger::view_history(self.store.document(), name).into()
    }

    /// Pending requests of one employee, numbered for `review_request`.
    pub fn pending_requests(&self, name: &str) -> Outcome {
        let entries = match ledger::pending_requests(self.store.document(), name) {
            Ok(entries) => entries,
            Err(err) => return Outcome::Rejected(err),
        };
        if entries.is_empty() {
            return Outcome::Success(format!("{name} has no pending leave requests."));
        }
        Outcome::Success(
            entries
                .iter()
                .map(|entry| {
                    format!(
                        "#{}: {} day(s) of {} starting {}",
                        entry.number,
                        entry.request.days,
                        entry.request.leave_type,
                        entry.request.start_date
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    /// Employees waiting on admin review.
    pub fn pending_queue(&self) -> Outcome {
        let names = ledger::employees_with_pending(self.store.document());
        if names.is_empty() {
            return Outcome::Success("No pending leave requests at the moment.".to_string());
        }
        Outcome::Success(names.join("\n"))
    }

    pub fn list_employees(&self) -> Outcome {
        let employees = &self.store.document().employees;
        if employees.is_empty() {
            return Outcome::Success("No employees registered.".to_string());
        }
        Outcome::Success(
            employees
                .iter()
                .map(|(name, employee)| {
                    if employee.is_manager {
                        format!("{name} (manager)")
                    } else {
                        name.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    pub fn list_holidays(&self) -> Outcome {
        let holidays = &self.store.document().holidays;
        if holidays.is_empty() {
            return Outcome::Success("No holidays registered.".to_string());
        }
        Outcome::Success(
            holidays
                .iter()
                .map(|date| date.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    fn commit(&mut self, action: &str, result: Result<Change, LeaveError>) -> Result<Outcome> {
        match result {
            Ok(change) => {
                self.store.save()?;
                self.store.log(&change.note)?;
                info!(action, "change applied");
                Ok(Outcome::Success(change.message))
            }
            Err(err) => {
                debug!(action, kind = err.kind(), "change rejected");
                Ok(Outcome::Rejected(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{LeaveStatus, LeaveType};
    use crate::test_support::{MemoryBackend, TODAY, balances, day, document_with, employee};

    fn store_with_alice() -> RecordStore<MemoryBackend> {
        RecordStore::with_backend(
            document_with("Alice", employee(&[(LeaveType::Annual, 5)], false)),
            MemoryBackend::default(),
        )
    }

    fn annual(days: &'static str, start: &'static str) -> LeaveApplication<'static> {
        LeaveApplication {
            leave_type: Some("Annual Leave"),
            days: Some(days),
            start_date: Some(start),
        }
    }

    #[test]
    fn successful_mutation_saves_and_logs_once() {
        let mut store = store_with_alice();
        let mut controller =
            LeaveController::new(&mut store, LeaveCatalog::default()).with_today(day(TODAY));

        let outcome = controller
            .request_leave("Alice", annual("3", "2999-01-01"))
            .expect("request");
        assert!(outcome.is_success());

        let backend = store.backend();
        assert_eq!(backend.saved.len(), 1);
        assert_eq!(backend.notes.len(), 1);
        let saved = &backend.saved[0].employees["Alice"];
        assert_eq!(saved.balance(&LeaveType::Annual), 2);
        assert_eq!(saved.leave_history[0].status, LeaveStatus::Pending);
    }

    #[test]
    fn rejection_neither_saves_nor_logs() {
        let mut store = store_with_alice();
        let mut controller =
            LeaveController::new(&mut store, LeaveCatalog::default()).with_today(day(TODAY));

        let outcome = controller
            .request_leave("Alice", annual("10", "2999-01-01"))
            .expect("request");
        assert_eq!(
            outcome.error().map(LeaveError::kind),
            Some("insufficient_balance")
        );
        let outcome = controller
            .register("Alice", balances(&[]), false)
            .expect("register");
        assert_eq!(outcome.error().map(LeaveError::kind), Some("already_exists"));

        assert!(store.backend().saved.is_empty());
        assert!(store.backend().notes.is_empty());
        assert_eq!(
            store.document().employees["Alice"].balance(&LeaveType::Annual),
            5
        );
    }

    #[test]
    fn deny_round_trip_is_balance_neutral() {
        let mut store = store_with_alice();
        let mut controller =
            LeaveController::new(&mut store, LeaveCatalog::default()).with_today(day(TODAY));

        controller
            .request_leave("Alice", annual("4", "2999-03-01"))
            .expect("request");
        let outcome = controller
            .review_request("Alice", 1, ReviewDecision::Deny)
            .expect("review");
        assert_eq!(outcome.to_string(), "Request denied; leave balance refunded.");

        assert_eq!(
            store.document().employees["Alice"].balance(&LeaveType::Annual),
            5
        );
        assert_eq!(
            store.backend().notes[1],
            "Leave denied: 4 days Annual Leave for Alice starting 2999-03-01"
        );
    }

    #[test]
    fn read_only_queries_do_not_persist() {
        let mut store = store_with_alice();
        let controller = LeaveController::new(&mut store, LeaveCatalog::default());

        assert_eq!(
            controller.check_balance("Alice", Some("annual")).to_string(),
            "You have 5 Annual Leave day(s) remaining."
        );
        assert_eq!(
            controller.view_history("Alice").to_string(),
            "No leave history found."
        );
        assert_eq!(
            controller.pending_queue().to_string(),
            "No pending leave requests at the moment."
        );
        assert_eq!(
            controller.check_balance("Nobody", None).error().map(LeaveError::kind),
            Some("not_found")
        );
        assert!(store.backend().saved.is_empty());
    }

    #[test]
    fn pending_listing_numbers_match_review() {
        let mut store = store_with_alice();
        let mut controller =
            LeaveController::new(&mut store, LeaveCatalog::default()).with_today(day(TODAY));
        controller
            .request_leave("Alice", annual("1", "2999-01-01"))
            .expect("first");
        controller
            .request_leave("Alice", annual("2", "2999-02-01"))
            .expect("second");
        controller
            .review_request("Alice", 1, ReviewDecision::Approve)
            .expect("approve");

        assert_eq!(
            controller.pending_requests("Alice").to_string(),
            "#2: 2 day(s) of Annual Leave starting 2999-02-01"
        );
        assert_eq!(controller.pending_queue().to_string(), "Alice");
    }

    #[test]
    fn configured_leave_type_can_be_requested() {
        let mut store = RecordStore::with_backend(
            document_with(
                "Alice",
                employee(&[(LeaveType::Other("Study Leave".to_string()), 2)], false),
            ),
            MemoryBackend::default(),
        );
        let mut controller =
            LeaveController::new(&mut store, LeaveCatalog::new(["Study Leave"]))
                .with_today(day(TODAY));

        let outcome = controller
            .request_leave(
                "Alice",
                LeaveApplication {
                    leave_type: Some("study leave"),
                    days: Some("2"),
                    start_date: Some("2999-05-01"),
                },
            )
            .expect("request");
        assert!(outcome.is_success(), "{outcome}");
    }
}
