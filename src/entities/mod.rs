// Entity Models
//
// Expense records are the only stored entity; categories are a closed set of
// values attached to them.

pub mod category;
pub mod expense;

pub use category::Category;
pub use expense::{parse_amount, Expense, NewExpense};
