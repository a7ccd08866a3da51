//! budgetbook - expense tracking against named budgets
//!
//! Budgets are named spending limits; expenses are tagged purchases that may
//! belong to a budget. The library computes what each budget has spent and
//! has left, and answers filtered and sorted queries over expenses.
//!
//! # Architecture
//!
//! - `config`: paths and user settings
//! - `error`: the crate error type
//! - `models`: budgets, expenses, tags, money and IDs
//! - `storage`: JSON file storage and the [`storage::EntityStore`] fetch interface
//! - `query`: filter/sort criteria and the query executor
//! - `services`: validation, aggregation and cross-entity operations
//! - `audit`: append-only audit log
//! - `display`: terminal formatting
//! - `cli`: clap subcommands and their handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use budgetbook::config::paths::BudgetPaths;
//! use budgetbook::models::Money;
//! use budgetbook::services::BudgetService;
//! use budgetbook::storage::Storage;
//!
//! let mut storage = Storage::new(BudgetPaths::new()?)?;
//! storage.load_all()?;
//!
//! let budget = BudgetService::new(&storage).create("Groceries", Money::from_cents(20000))?;
//! let summary = BudgetService::new(&storage).summary(budget.id)?;
//! println!("{} left", summary.remaining);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod query;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
