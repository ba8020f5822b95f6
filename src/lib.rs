// Monthly Budget - Core Library
// Exposes the derived-state core for the dashboard binary and tests

pub mod aggregation;
pub mod config;
pub mod entities;
pub mod error;
pub mod forms;
pub mod repository;
pub mod store;
pub mod summary;
pub mod temporal;
pub mod tracker;

// Re-export commonly used types
pub use aggregation::{
    category_breakdown, daily_series, share, CategoryPoint, CategorySlice, DailyPoint,
    TOP_CATEGORIES,
};
pub use config::{Command, Settings};
pub use entities::{Category, Expense, NewExpense};
pub use error::{StoreError, TrackerError, ValidationError};
pub use forms::{format_money, ExpenseForm, FormField, IncomeForm, Mode, Outcome, Session};
pub use repository::ExpenseRepository;
pub use store::{KeyValueStore, MemoryStore, SqliteStore, EXPENSES_KEY, SALARY_KEY};
pub use summary::{Dashboard, Summary};
pub use temporal::{current_month, days_in_month, in_month, month_label, parse_date};
pub use tracker::{DeleteRequest, Tracker};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
