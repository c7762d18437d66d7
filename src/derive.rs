//! Date parsing and payment-delay derivation for installment records.
//!
//! Snapshot exports carry dates in several spellings (ISO date-times,
//! `2024-1-5`, `1/5/24`, `05-01-2024`), so parsing tries a fixed format
//! ladder and the first success wins. All downstream comparison is on
//! calendar days; "today" is captured once per ingestion and passed in
//! explicitly so derivation stays deterministic.

use std::{fmt, sync::OnceLock};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::record::InstallmentRecord;

/// Derived tri-state payment classification, distinct from the raw origin
/// status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Overdue,
    Upcoming,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Overdue => "Overdue",
            PaymentStatus::Upcoming => "Upcoming",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn ymd_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Trailing content after the day (a time suffix, stray text) is ignored.
    RE.get_or_init(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})").expect("static pattern"))
}

fn mdy_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2}|\d{4})$").expect("static pattern"))
}

fn dmy_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2})-(\d{1,2})-(\d{4})$").expect("static pattern"))
}

/// Parses a date string under the supported format ladder, truncating any
/// time-of-day component to the calendar day. Returns `None` for anything
/// unparsable; callers treat `None` as "absent".
pub fn parse_flexible_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed.date());
        }
    }
    if let Some(caps) = ymd_re().captures(trimmed) {
        if let Some(date) = date_from_parts(&caps[1], &caps[2], &caps[3]) {
            return Some(date);
        }
    }
    if let Some(caps) = mdy_re().captures(trimmed) {
        let year = if caps[3].len() == 2 {
            (2000 + caps[3].parse::<i32>().ok()?).to_string()
        } else {
            caps[3].to_string()
        };
        if let Some(date) = date_from_parts(&year, &caps[1], &caps[2]) {
            return Some(date);
        }
    }
    if let Some(caps) = dmy_re().captures(trimmed) {
        if let Some(date) = date_from_parts(&caps[3], &caps[2], &caps[1]) {
            return Some(date);
        }
    }
    None
}

fn date_from_parts(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Computes the delay-in-days figure for one installment.
///
/// Paid installments report how late the payment landed (never negative, 0
/// when the due date is missing). Unpaid installments report how many days
/// overdue they are, or `None` when upcoming or undated. An installment due
/// exactly today is not yet overdue.
pub fn compute_delay(due_date: &str, paid_date: &str, today: NaiveDate) -> Option<i64> {
    let due = parse_flexible_date(due_date);
    match parse_flexible_date(paid_date) {
        Some(paid) => Some(match due {
            Some(due) => (paid - due).num_days().max(0),
            None => 0,
        }),
        None => match due {
            Some(due) if due < today => Some((today - due).num_days()),
            _ => None,
        },
    }
}

/// Classifies an installment as Paid/Overdue/Upcoming.
///
/// Payment evidence wins over the due-date comparison: a non-empty
/// `paid_date` (parsable or not) or an origin status of "paid" always
/// classifies as Paid.
pub fn classify_status(
    raw_status: &str,
    due_date: &str,
    paid_date: &str,
    today: NaiveDate,
) -> PaymentStatus {
    if !paid_date.trim().is_empty() || raw_status.trim().eq_ignore_ascii_case("paid") {
        return PaymentStatus::Paid;
    }
    match parse_flexible_date(due_date) {
        Some(due) if due < today => PaymentStatus::Overdue,
        _ => PaymentStatus::Upcoming,
    }
}

/// Stamps both derived fields on a freshly normalized installment.
pub fn annotate(record: &mut InstallmentRecord, today: NaiveDate) {
    record.computed_delay_days = compute_delay(&record.due_date, &record.paid_date, today);
    record.display_status =
        classify_status(&record.status, &record.due_date, &record.paid_date, today);
}
