//! Budget service
//!
//! Creation with the title uniqueness gate, lookups, spent/remaining
//! summaries and cascading deletion.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Budget, BudgetId, Expense, Money};
use crate::storage::Storage;

use super::aggregate::{self, BudgetSummary};
use super::validator::{title_exists, EntityKind};

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a budget
    ///
    /// Refused with [`BudgetError::Duplicate`] if another budget already has
    /// this title, and with [`BudgetError::Validation`] for an empty title or
    /// a negative limit. Nothing is written in either case.
    pub fn create(&self, title: &str, limit: Money) -> BudgetResult<Budget> {
        let budget = Budget::new(title.trim(), limit);

        budget
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        if title_exists(self.storage, EntityKind::Budget, &budget.title) {
            return Err(BudgetError::Duplicate {
                entity_type: "Budget",
                identifier: budget.title,
            });
        }

        self.storage
            .write(&self.storage.budgets, |repo| repo.upsert(budget.clone()))?;

        self.storage.log_create(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.title.clone()),
            &budget,
        );

        info!(budget = %budget.title, limit = %budget.limit, "created budget");
        Ok(budget)
    }

    pub fn get(&self, id: BudgetId) -> BudgetResult<Option<Budget>> {
        self.storage.budgets.get(id)
    }

    /// Find a budget by title, short ID (`bud-1234abcd`) or full UUID
    pub fn find(&self, identifier: &str) -> BudgetResult<Option<Budget>> {
        let by_title = self.storage.budgets.find_by_title(identifier)?;
        if let Some(budget) = by_title.into_iter().next() {
            return Ok(Some(budget));
        }

        if let Some(budget) = self
            .storage
            .budgets
            .get_all()?
            .into_iter()
            .find(|b| b.id.to_string() == identifier)
        {
            return Ok(Some(budget));
        }

        match identifier.parse::<BudgetId>() {
            Ok(id) => self.storage.budgets.get(id),
            Err(_) => Ok(None),
        }
    }

    /// Like [`find`](Self::find), but a missing budget is an error
    pub fn require(&self, identifier: &str) -> BudgetResult<Budget> {
        self.find(identifier)?
            .ok_or_else(|| BudgetError::budget_not_found(identifier))
    }

    /// All budgets in creation order
    pub fn list(&self) -> BudgetResult<Vec<Budget>> {
        self.storage.budgets.get_all()
    }

    /// Expenses attached to a budget
    pub fn expenses(&self, id: BudgetId) -> BudgetResult<Vec<Expense>> {
        self.storage.expenses.get_by_budget(id)
    }

    /// Spent and remaining for one budget, from its current expenses
    pub fn summary(&self, id: BudgetId) -> BudgetResult<BudgetSummary> {
        let budget = self
            .get(id)?
            .ok_or_else(|| BudgetError::budget_not_found(id.to_string()))?;
        let expenses = self.expenses(id)?;
        Ok(BudgetSummary::new(budget, &expenses))
    }

    /// Summaries for every budget, in creation order
    pub fn summaries(&self) -> BudgetResult<Vec<BudgetSummary>> {
        self.list()?
            .into_iter()
            .map(|budget| {
                let expenses = self.expenses(budget.id)?;
                Ok(BudgetSummary::new(budget, &expenses))
            })
            .collect()
    }

    /// Sum of all budget limits
    pub fn total_limit(&self) -> BudgetResult<Money> {
        Ok(aggregate::total_limit(&self.list()?))
    }

    /// Delete a budget together with its expenses
    ///
    /// Returns the deleted budget and the expenses removed with it. If either
    /// save fails, both repositories are left as they were.
    pub fn delete(&self, id: BudgetId) -> BudgetResult<(Budget, Vec<Expense>)> {
        let budget = self
            .get(id)?
            .ok_or_else(|| BudgetError::budget_not_found(id.to_string()))?;

        let removed = self.storage.write_both(
            &self.storage.expenses,
            &self.storage.budgets,
            |expenses, budgets| {
                let removed = expenses.delete_by_budget(id)?;
                budgets.delete(id)?;
                Ok(removed)
            },
        )?;

        for expense in &removed {
            self.storage.log_delete(
                EntityType::Expense,
                expense.id.to_string(),
                Some(expense.title.clone()),
                expense,
            );
        }
        self.storage.log_delete(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.title.clone()),
            &budget,
        );

        info!(budget = %budget.title, expenses = removed.len(), "deleted budget");
        Ok((budget, removed))
    }
}
