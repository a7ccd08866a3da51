//! Typed fetch interface over the entity store
//!
//! The query executor and the uniqueness validator only need predicate-based
//! reads. They take any [`EntityStore`], so the JSON-backed [`Storage`] can be
//! swapped for another backend (or a failing one in tests).
//!
//! [`Storage`]: super::Storage

use crate::error::BudgetResult;
use crate::models::{Budget, BudgetId, Expense, Tag};
use crate::query::{FilterCriteria, SortCriteria};

/// Selects budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetPredicate {
    All,
    TitleEquals(String),
}

/// Selects expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpensePredicate {
    All,
    TitleEquals(String),
    InBudget(BudgetId),
    Matching(FilterCriteria),
}

/// Read access to budgets, expenses and tags
pub trait EntityStore {
    fn fetch_budgets(&self, predicate: &BudgetPredicate) -> BudgetResult<Vec<Budget>>;

    /// Fetch expenses matching `predicate`, in `sort` order or in the store's
    /// natural order when `sort` is `None`
    fn fetch_expenses(
        &self,
        predicate: &ExpensePredicate,
        sort: Option<SortCriteria>,
    ) -> BudgetResult<Vec<Expense>>;

    fn fetch_tags(&self) -> BudgetResult<Vec<Tag>>;
}
