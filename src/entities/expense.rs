// 💸 Expense Entity - a single dated, categorized spending record
//
// Identity is the integer `id` assigned at creation. Everything else is a
// value: edits replace the whole record, never individual fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::category::Category;
use crate::error::ValidationError;

/// Persisted as `{id, description, amount, category, date: "YYYY-MM-DD"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub date: NaiveDate,
}

/// An expense that passed validation but has no identity yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub date: NaiveDate,
}

impl NewExpense {
    pub fn new(
        description: &str,
        amount: f64,
        category: Category,
        date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let description = validate_description(description)?;
        validate_amount(amount)?;

        Ok(NewExpense {
            description,
            amount,
            category,
            date,
        })
    }

    /// Attach an identity
    pub fn with_id(self, id: i64) -> Expense {
        Expense {
            id,
            description: self.description,
            amount: self.amount,
            category: self.category,
            date: self.date,
        }
    }
}

impl Expense {
    /// Check the record invariants (non-empty description, positive amount)
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_description(&self.description)?;
        validate_amount(self.amount)
    }

    /// Day of month (1-based)
    pub fn day(&self) -> u32 {
        use chrono::Datelike;
        self.date.day()
    }
}

fn validate_description(description: &str) -> Result<String, ValidationError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}

fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidAmount(amount.to_string()))
    }
}

/// Parse user-typed amount text (`"45.50"`, `"$12"`, `"1,200"`)
pub fn parse_amount(input: &str) -> Result<f64, ValidationError> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(ValidationError::InvalidAmount(input.trim().to_string())),
    }
}
