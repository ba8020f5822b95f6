// 📒 Expense Repository - the ordered, in-memory expense list
//
// Ids are unique within the list. Updates replace whole records by id;
// deletes remove exactly one record. Order is insertion order.

use crate::entities::{Expense, NewExpense};
use crate::error::ValidationError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseRepository {
    expenses: Vec<Expense>,
}

impl ExpenseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a loaded list, dropping invalid records and any record whose id
    /// was already seen
    pub fn from_vec(expenses: Vec<Expense>) -> Self {
        let mut repo = ExpenseRepository::new();
        for expense in expenses {
            if let Err(err) = expense.validate() {
                tracing::warn!(id = expense.id, error = %err, "dropping invalid stored expense");
                continue;
            }
            if repo.get(expense.id).is_some() {
                tracing::warn!(id = expense.id, "dropping expense with duplicate id");
                continue;
            }
            repo.expenses.push(expense);
        }
        repo
    }

    /// Fresh id: the creation timestamp, bumped past any existing id
    pub fn next_id(&self, now_millis: i64) -> Result<i64, ValidationError> {
        match self.expenses.iter().map(|e| e.id).max() {
            Some(max) if max >= now_millis => {
                max.checked_add(1).ok_or(ValidationError::IdsExhausted)
            }
            _ => Ok(now_millis),
        }
    }

    /// Append a validated expense, returning its assigned id
    pub fn add(&mut self, new: NewExpense, now_millis: i64) -> Result<i64, ValidationError> {
        let id = self.next_id(now_millis)?;
        self.expenses.push(new.with_id(id));
        Ok(id)
    }

    /// Replace the record with the same id. `Ok(false)` when no record matches.
    pub fn update(&mut self, expense: Expense) -> Result<bool, ValidationError> {
        expense.validate()?;

        match self.expenses.iter_mut().find(|e| e.id == expense.id) {
            Some(slot) => {
                *slot = expense;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn delete(&mut self, id: i64) -> Option<Expense> {
        let index = self.expenses.iter().position(|e| e.id == id)?;
        Some(self.expenses.remove(index))
    }

    pub fn get(&self, id: i64) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Expense> {
        self.expenses.iter()
    }

    pub fn as_slice(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Category;
    use chrono::NaiveDate;

    fn new_expense(description: &str, amount: f64) -> NewExpense {
        NewExpense::new(
            description,
            amount,
            Category::Food,
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        )
        .unwrap()
    }

    fn seeded() -> ExpenseRepository {
        let mut repo = ExpenseRepository::new();
        repo.add(new_expense("Lunch", 12.0), 1_000).unwrap();
        repo.add(new_expense("Dinner", 30.0), 2_000).unwrap();
        repo
    }

    #[test]
    fn test_add_assigns_unique_ids() {
        let mut repo = ExpenseRepository::new();

        // Same clock reading three times
        let a = repo.add(new_expense("A", 1.0), 5_000).unwrap();
        let b = repo.add(new_expense("B", 1.0), 5_000).unwrap();
        let c = repo.add(new_expense("C", 1.0), 4_000).unwrap();

        assert_eq!(a, 5_000);
        assert_eq!(b, 5_001);
        assert_eq!(c, 5_002);
        assert_eq!(repo.len(), 3);
    }

    #[test]
    fn test_add_then_delete_round_trip() {
        let mut repo = seeded();
        let before = repo.clone();

        let id = repo.add(new_expense("Snack", 3.5), 3_000).unwrap();
        assert_eq!(repo.len(), 3);

        let removed = repo.delete(id).unwrap();
        assert_eq!(removed.description, "Snack");
        assert_eq!(repo, before);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut repo = seeded();
        let mut edited = repo.get(1_000).unwrap().clone();
        edited.amount = 15.0;
        edited.category = Category::Entertainment;

        assert!(repo.update(edited.clone()).unwrap());

        assert_eq!(repo.as_slice()[0], edited);
        assert_eq!(repo.as_slice()[1].description, "Dinner");
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut once = seeded();
        let mut twice = seeded();
        let mut edited = once.get(2_000).unwrap().clone();
        edited.description = "Late dinner".to_string();

        once.update(edited.clone()).unwrap();
        twice.update(edited.clone()).unwrap();
        twice.update(edited).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut repo = seeded();
        let before = repo.clone();
        let mut ghost = repo.get(1_000).unwrap().clone();
        ghost.id = 42;

        assert!(!repo.update(ghost).unwrap());
        assert_eq!(repo, before);
    }

    #[test]
    fn test_update_rejects_invalid_record() {
        let mut repo = seeded();
        let before = repo.clone();
        let mut bad = repo.get(1_000).unwrap().clone();
        bad.amount = 0.0;

        assert!(repo.update(bad).is_err());
        assert_eq!(repo, before);
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let mut repo = seeded();

        assert!(repo.delete(999).is_none());
        assert_eq!(repo.len(), 2);

        repo.delete(1_000).unwrap();
        let ids: Vec<i64> = repo.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2_000]);
    }

    #[test]
    fn test_from_vec_drops_duplicate_ids() {
        let repo = seeded();
        let mut list = repo.as_slice().to_vec();
        list.push(list[0].clone());

        let loaded = ExpenseRepository::from_vec(list);
        assert_eq!(loaded, repo);
    }

    #[test]
    fn test_from_vec_drops_invalid_records() {
        let blank = Expense {
            id: 1,
            description: String::new(),
            amount: -5.0,
            category: Category::Shopping,
            date: NaiveDate::from_ymd_opt(2026, 10, 3).unwrap(),
        };
        let lunch = Expense {
            id: 2,
            description: "Lunch".to_string(),
            amount: 10.0,
            category: Category::Food,
            date: NaiveDate::from_ymd_opt(2026, 10, 4).unwrap(),
        };

        let loaded = ExpenseRepository::from_vec(vec![blank, lunch.clone()]);
        assert_eq!(loaded.as_slice(), &[lunch]);
    }

    #[test]
    fn test_next_id_at_max_is_rejected() {
        let mut lunch = seeded().get(1_000).unwrap().clone();
        lunch.id = i64::MAX;
        let mut repo = ExpenseRepository::from_vec(vec![lunch]);

        assert_eq!(repo.next_id(5_000), Err(ValidationError::IdsExhausted));
        assert_eq!(
            repo.add(new_expense("Snack", 3.5), 5_000),
            Err(ValidationError::IdsExhausted)
        );
        assert_eq!(repo.len(), 1);
    }
}
