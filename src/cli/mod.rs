//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer.

pub mod budget;
pub mod expense;
pub mod tag;

pub use budget::{handle_budget_command, BudgetCommands};
pub use expense::{handle_expense_command, ExpenseCommands, ListArgs};
pub use tag::{handle_tag_command, TagCommands};
