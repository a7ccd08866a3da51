//! Title uniqueness checks
//!
//! Budgets and expenses must have titles that are unique within their kind
//! when they are created. The check is a plain fetch against the store and
//! fails open: if the store cannot answer, the title is treated as free.

use tracing::warn;

use crate::storage::{BudgetPredicate, EntityStore, ExpensePredicate};

/// Entity kinds whose titles are checked for uniqueness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Budget,
    Expense,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Budget => write!(f, "Budget"),
            EntityKind::Expense => write!(f, "Expense"),
        }
    }
}

/// Whether at least one entity of `kind` already has exactly `title`
pub fn title_exists<S: EntityStore + ?Sized>(store: &S, kind: EntityKind, title: &str) -> bool {
    let found = match kind {
        EntityKind::Budget => store
            .fetch_budgets(&BudgetPredicate::TitleEquals(title.to_string()))
            .map(|budgets| !budgets.is_empty()),
        EntityKind::Expense => store
            .fetch_expenses(&ExpensePredicate::TitleEquals(title.to_string()), None)
            .map(|expenses| !expenses.is_empty()),
    };

    found.unwrap_or_else(|err| {
        warn!(kind = %kind, title, error = %err, "title check failed, treating title as unused");
        false
    })
}
