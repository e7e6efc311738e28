//! Strict `YYYY-MM-DD` parsing and the "today or later" check.

use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));

/// Parse a zero-padded ISO calendar date, rejecting any other shape.
pub fn parse_iso_date(input: &str) -> Option<NaiveDate> {
    if !ISO_DATE.is_match(input) {
        return None;
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

/// True iff `input` is a well-formed date on or after `today`.
pub fn is_valid_future_date_on(input: &str, today: NaiveDate) -> bool {
    parse_iso_date(input).is_some_and(|date| date >= today)
}

/// [`is_valid_future_date_on`] against the local calendar date.
pub fn is_valid_future_date(input: &str) -> bool {
    is_valid_future_date_on(input, today())
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(value: &str) -> NaiveDate {
        parse_iso_date(value).expect("date")
    }

    #[test]
    fn today_counts_as_valid() {
        let today = day("2026-10-16");
        assert!(is_valid_future_date_on("2026-10-16", today));
        assert!(is_valid_future_date_on("2026-10-17", today));
        assert!(!is_valid_future_date_on("2026-10-15", today));
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let today = day("2026-10-16");
        for input in [
            "",
            "2999-1-01",
            "2999/01/01",
            "2999-02-30",
            "2999-13-01",
            " 2999-01-01",
            "01-01-2999",
            "tomorrow",
        ] {
            assert!(!is_valid_future_date_on(input, today), "accepted {input:?}");
        }
    }

    #[test]
    fn far_future_is_valid_against_local_clock() {
        assert!(is_valid_future_date("2999-01-01"));
        assert!(!is_valid_future_date("2000-01-01"));
    }
}
