//! Types that represent the core data model, such as `Expense` and `Category`.
mod amount;
mod category;
mod expense;
mod period;
mod settings;

pub use amount::{Amount, AmountError};
pub use category::{Category, CategoryFilter};
pub use expense::{
    Expense, ExpenseFields, ExpenseForm, ExpenseId, Expenses, ValidationError, DATE_FORMAT,
};
pub use period::Period;
pub use settings::Settings;
