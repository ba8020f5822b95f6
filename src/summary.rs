// 🧮 Summary Calculator + Dashboard snapshot
//
// One `Dashboard` is everything a render needs. It is rebuilt from the income
// scalar and the full expense list every time; nothing here is cached.

use chrono::NaiveDate;

use crate::aggregation::{category_breakdown, daily_series, CategoryPoint, DailyPoint};
use crate::entities::Expense;
use crate::temporal::current_month;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub income: f64,
    pub total_spent: f64,
    /// `income - total_spent`, negative when overspent
    pub money_left: f64,
}

impl Summary {
    pub fn compute(income: f64, month_expenses: &[Expense]) -> Self {
        let total_spent: f64 = month_expenses.iter().map(|e| e.amount).sum();

        Summary {
            income,
            total_spent,
            money_left: income - total_spent,
        }
    }

    pub fn is_overspent(&self) -> bool {
        self.money_left < 0.0
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub today: NaiveDate,
    /// Current-month expenses in stored order
    pub month_expenses: Vec<Expense>,
    pub summary: Summary,
    pub daily: Vec<DailyPoint>,
    pub categories: Vec<CategoryPoint>,
}

impl Dashboard {
    pub fn derive(income: f64, expenses: &[Expense], today: NaiveDate) -> Self {
        let month_expenses = current_month(expenses, today);
        let summary = Summary::compute(income, &month_expenses);
        let daily = daily_series(&month_expenses, today);
        let categories = category_breakdown(&month_expenses);

        tracing::debug!(
            month_count = month_expenses.len(),
            total_spent = summary.total_spent,
            "derived dashboard"
        );

        Dashboard {
            today,
            month_expenses,
            summary,
            daily,
            categories,
        }
    }

    /// Current-month expenses for the list view, largest amount first
    pub fn list_view(&self) -> Vec<Expense> {
        let mut sorted = self.month_expenses.clone();
        sorted.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        sorted
    }
}
