// 💼 Tracker - income + expenses bound to a persisted store
//
// Each mutation builds the candidate state, writes it through the store, and
// only then commits it in memory. A failed write leaves the tracker unchanged.

use chrono::{NaiveDate, Utc};

use crate::entities::{Expense, NewExpense};
use crate::error::{Result, ValidationError};
use crate::repository::ExpenseRepository;
use crate::store::{self, KeyValueStore, EXPENSES_KEY, SALARY_KEY};
use crate::summary::Dashboard;

/// Proof that the user confirmed deleting `id`. Only `Tracker::request_delete` makes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteRequest {
    id: i64,
}

impl DeleteRequest {
    pub fn id(&self) -> i64 {
        self.id
    }
}

pub struct Tracker<S: KeyValueStore> {
    store: S,
    repository: ExpenseRepository,
    income: f64,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Load state, falling back to 0 income and no expenses
    pub fn load(store: S) -> Self {
        let stored_income: f64 = store::get(&store, SALARY_KEY, 0.0);
        let income = if stored_income.is_finite() && stored_income >= 0.0 {
            stored_income
        } else {
            tracing::warn!(stored_income, "ignoring invalid stored income");
            0.0
        };

        let expenses: Vec<Expense> = store::get(&store, EXPENSES_KEY, Vec::new());
        let repository = ExpenseRepository::from_vec(expenses);

        tracing::info!(income, expenses = repository.len(), "loaded budget");

        Tracker {
            store,
            repository,
            income,
        }
    }

    pub fn income(&self) -> f64 {
        self.income
    }

    pub fn expenses(&self) -> &[Expense] {
        self.repository.as_slice()
    }

    pub fn get(&self, id: i64) -> Option<&Expense> {
        self.repository.get(id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace the income scalar
    pub fn set_income(&mut self, income: f64) -> Result<()> {
        if !income.is_finite() || income < 0.0 {
            return Err(ValidationError::InvalidIncome(income.to_string()).into());
        }

        store::set(&mut self.store, SALARY_KEY, &income)?;
        self.income = income;

        tracing::info!(income, "income updated");
        Ok(())
    }

    /// Append an expense, returning its new id
    pub fn add_expense(&mut self, new: NewExpense) -> Result<i64> {
        let mut candidate = self.repository.clone();
        let id = candidate.add(new, Utc::now().timestamp_millis())?;

        self.commit(candidate)?;
        tracing::info!(id, "expense added");
        Ok(id)
    }

    /// Replace an existing expense by id. `Ok(false)` when the id is unknown.
    pub fn update_expense(&mut self, expense: Expense) -> Result<bool> {
        let id = expense.id;
        let mut candidate = self.repository.clone();
        if !candidate.update(expense)? {
            tracing::debug!(id, "update for unknown expense ignored");
            return Ok(false);
        }

        self.commit(candidate)?;
        tracing::info!(id, "expense updated");
        Ok(true)
    }

    /// First half of a delete: `None` when there is nothing to delete
    pub fn request_delete(&self, id: i64) -> Option<DeleteRequest> {
        self.repository.get(id).map(|_| DeleteRequest { id })
    }

    /// Second half of a delete, after the user confirmed
    pub fn delete_expense(&mut self, request: DeleteRequest) -> Result<Option<Expense>> {
        let mut candidate = self.repository.clone();
        let removed = match candidate.delete(request.id) {
            Some(expense) => expense,
            None => return Ok(None),
        };

        self.commit(candidate)?;
        tracing::info!(id = request.id, "expense deleted");
        Ok(Some(removed))
    }

    /// Derived views for `today`, recomputed on every call
    pub fn dashboard(&self, today: NaiveDate) -> Dashboard {
        Dashboard::derive(self.income, self.repository.as_slice(), today)
    }

    fn commit(&mut self, candidate: ExpenseRepository) -> Result<()> {
        store::set(&mut self.store, EXPENSES_KEY, candidate.as_slice())?;
        self.repository = candidate;
        Ok(())
    }
}
