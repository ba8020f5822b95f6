// 📊 Aggregators - chart series derived from the month-filtered set
//
// Both functions are pure and take expenses already filtered to the current
// month. Results are recomputed on every read and never stored.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::entities::{Category, Expense};
use crate::temporal::days_in_month;

/// Categories shown individually before the rest are folded into "Other"
pub const TOP_CATEGORIES: usize = 3;

pub const FOLDED_LABEL: &str = "Other";

// ============================================================================
// DAILY SERIES
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct DailyPoint {
    /// Day of month, 1-based
    pub day: u32,
    pub amount: f64,
}

impl DailyPoint {
    /// Zero-padded day, e.g. "07"
    pub fn label(&self) -> String {
        format!("{:02}", self.day)
    }
}

/// Spending per day, ascending, days without spending omitted
pub fn daily_series(month_expenses: &[Expense], today: NaiveDate) -> Vec<DailyPoint> {
    let last_day = days_in_month(today.year(), today.month());
    let mut by_day: BTreeMap<u32, f64> = BTreeMap::new();

    for expense in month_expenses {
        *by_day.entry(expense.day()).or_insert(0.0) += expense.amount;
    }

    by_day
        .into_iter()
        .filter(|(day, amount)| (1..=last_day).contains(day) && *amount > 0.0)
        .map(|(day, amount)| DailyPoint { day, amount })
        .collect()
}

// ============================================================================
// CATEGORY BREAKDOWN
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CategorySlice {
    Category(Category),
    /// Everything past the top categories, summed
    Folded,
}

impl CategorySlice {
    pub fn label(&self) -> &'static str {
        match self {
            CategorySlice::Category(c) => c.name(),
            CategorySlice::Folded => FOLDED_LABEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPoint {
    pub slice: CategorySlice,
    pub amount: f64,
}

/// Per-category totals, largest first, with everything past the top three
/// folded into a single "Other" slice
pub fn category_breakdown(month_expenses: &[Expense]) -> Vec<CategoryPoint> {
    // First-appearance order, so equal totals keep input order after the stable sort
    let mut totals: Vec<(Category, f64)> = Vec::new();
    for expense in month_expenses {
        match totals.iter_mut().find(|(c, _)| *c == expense.category) {
            Some((_, sum)) => *sum += expense.amount,
            None => totals.push((expense.category, expense.amount)),
        }
    }

    totals.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut points: Vec<CategoryPoint> = totals
        .iter()
        .take(TOP_CATEGORIES)
        .map(|(category, amount)| CategoryPoint {
            slice: CategorySlice::Category(*category),
            amount: *amount,
        })
        .collect();

    if totals.len() > TOP_CATEGORIES {
        let rest: f64 = totals[TOP_CATEGORIES..].iter().map(|(_, amount)| amount).sum();
        points.push(CategoryPoint {
            slice: CategorySlice::Folded,
            amount: rest,
        });
    }

    points
}

/// Percentage of `total` this point represents (0 when nothing was spent)
pub fn share(point: &CategoryPoint, total: f64) -> f64 {
    if total > 0.0 {
        point.amount / total * 100.0
    } else {
        0.0
    }
}
