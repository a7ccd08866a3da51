//! Service layer for budgetbook
//!
//! Business rules on top of the storage layer: validation, title uniqueness,
//! derived budget figures and cross-entity operations. Every mutation goes
//! through [`Storage::write`](crate::storage::Storage::write) and is recorded
//! in the audit log.

pub mod aggregate;
pub mod budget;
pub mod expense;
pub mod tag;
pub mod validator;

pub use aggregate::BudgetSummary;
pub use budget::BudgetService;
pub use expense::{ExpenseService, NewExpense};
pub use tag::TagService;
pub use validator::{title_exists, EntityKind};
