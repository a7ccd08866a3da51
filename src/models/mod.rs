//! Core data models for budgetbook
//!
//! Budgets, expenses, tags, typed IDs and the money type.

pub mod budget;
pub mod expense;
pub mod ids;
pub mod money;
pub mod tag;

pub use budget::{Budget, BudgetValidationError};
pub use expense::{Expense, ExpenseDraft, ExpenseValidationError};
pub use ids::{BudgetId, ExpenseId, TagId};
pub use money::{Money, MoneyParseError};
pub use tag::{Tag, TagValidationError, DEFAULT_TAGS};
