// ⏰ Month Filter - "this month" as a calendar value
//
// Dates are `NaiveDate`: local calendar days with no time-of-day, so a
// date near a month boundary can never drift into the neighbouring month.
// "Today" is always passed in; nothing here reads the clock.

use chrono::{Datelike, NaiveDate};

use crate::entities::Expense;
use crate::error::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// True when `date` is in the same month and year as `today`
pub fn in_month(date: NaiveDate, today: NaiveDate) -> bool {
    date.year() == today.year() && date.month() == today.month()
}

/// Expenses dated in the current calendar month, order preserved
pub fn current_month(expenses: &[Expense], today: NaiveDate) -> Vec<Expense> {
    expenses
        .iter()
        .filter(|e| in_month(e.date, today))
        .cloned()
        .collect()
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// e.g. "October 2026"
pub fn month_label(today: NaiveDate) -> String {
    today.format("%B %Y").to_string()
}

/// Parse a `YYYY-MM-DD` date as a local calendar date
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingDate);
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
