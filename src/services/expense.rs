//! Expense service
//!
//! Creation with the title uniqueness gate, attaching to budgets, draft-based
//! editing and filtered/sorted listing.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    BudgetId, Expense, ExpenseDraft, ExpenseId, ExpenseValidationError, Money, TagId,
};
use crate::query::ExpenseQuery;
use crate::storage::Storage;

use super::validator::{title_exists, EntityKind};

/// Input for creating a new expense
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub title: String,
    pub amount: Money,
    pub quantity: u32,
    pub tag_ids: BTreeSet<TagId>,
    pub budget_id: Option<BudgetId>,
}

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create an expense, standalone or attached to a budget
    ///
    /// The expense needs at least one tag, every tag and the budget (if given)
    /// must exist, and no other expense may already have the title.
    pub fn create(&self, input: NewExpense) -> BudgetResult<Expense> {
        if input.tag_ids.is_empty() {
            return Err(BudgetError::Validation(
                ExpenseValidationError::NoTags.to_string(),
            ));
        }
        self.verify_tags(&input.tag_ids)?;

        let mut expense = Expense::new(input.title.trim(), input.amount, input.quantity)
            .with_tags(input.tag_ids);

        if let Some(budget_id) = input.budget_id {
            self.verify_budget(budget_id)?;
            expense = expense.with_budget(budget_id);
        }

        expense
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        if title_exists(self.storage, EntityKind::Expense, &expense.title) {
            return Err(BudgetError::Duplicate {
                entity_type: "Expense",
                identifier: expense.title,
            });
        }

        self.storage
            .write(&self.storage.expenses, |repo| repo.upsert(expense.clone()))?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.title.clone()),
            &expense,
        );

        info!(expense = %expense.title, total = %expense.total(), "created expense");
        Ok(expense)
    }

    pub fn get(&self, id: ExpenseId) -> BudgetResult<Option<Expense>> {
        self.storage.expenses.get(id)
    }

    /// Find an expense by title, short ID (`exp-1234abcd`) or full UUID
    pub fn find(&self, identifier: &str) -> BudgetResult<Option<Expense>> {
        let by_title = self.storage.expenses.find_by_title(identifier)?;
        if let Some(expense) = by_title.into_iter().next() {
            return Ok(Some(expense));
        }

        if let Some(expense) = self
            .storage
            .expenses
            .get_all()?
            .into_iter()
            .find(|e| e.id.to_string() == identifier)
        {
            return Ok(Some(expense));
        }

        match identifier.parse::<ExpenseId>() {
            Ok(id) => self.storage.expenses.get(id),
            Err(_) => Ok(None),
        }
    }

    pub fn require(&self, identifier: &str) -> BudgetResult<Expense> {
        self.find(identifier)?
            .ok_or_else(|| BudgetError::expense_not_found(identifier))
    }

    /// All expenses in store order
    pub fn list(&self) -> BudgetResult<Vec<Expense>> {
        self.storage.expenses.get_all()
    }

    /// Run a filter-then-sort query; store failures give an empty list
    pub fn query(&self, query: &ExpenseQuery) -> Vec<Expense> {
        crate::query::run(query, self.storage)
    }

    /// Attach an existing expense to a budget, replacing any previous owner
    pub fn attach_to_budget(&self, id: ExpenseId, budget_id: BudgetId) -> BudgetResult<Expense> {
        let mut expense = self
            .get(id)?
            .ok_or_else(|| BudgetError::expense_not_found(id.to_string()))?;
        self.verify_budget(budget_id)?;

        let before = expense.clone();
        expense.budget_id = Some(budget_id);
        expense.updated_at = chrono::Utc::now();

        self.storage
            .write(&self.storage.expenses, |repo| repo.upsert(expense.clone()))?;

        self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.title.clone()),
            &before,
            &expense,
        );

        Ok(expense)
    }

    /// Start an edit of an expense
    pub fn draft(&self, id: ExpenseId) -> BudgetResult<ExpenseDraft> {
        let expense = self
            .get(id)?
            .ok_or_else(|| BudgetError::expense_not_found(id.to_string()))?;
        Ok(ExpenseDraft::from_expense(&expense))
    }

    /// Merge a draft into the store, all fields at once
    ///
    /// The draft overwrites whatever is currently stored (last write wins)
    /// in a single save. A rename onto another expense's title is refused.
    /// A draft with no changes is a no-op.
    pub fn merge_draft(&self, draft: ExpenseDraft) -> BudgetResult<Expense> {
        let id = draft.expense_id();
        let before = self
            .get(id)?
            .ok_or_else(|| BudgetError::expense_not_found(id.to_string()))?;

        if !draft.is_dirty(&before) {
            debug!(expense = %before.title, "draft has no changes");
            return Ok(before);
        }

        let mut expense = before.clone();
        draft.apply_to(&mut expense);
        expense.title = expense.title.trim().to_string();

        expense
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;
        self.verify_tags(&expense.tag_ids)?;
        if let Some(budget_id) = expense.budget_id.filter(|b| Some(*b) != before.budget_id) {
            self.verify_budget(budget_id)?;
        }

        if expense.title != before.title {
            let taken = self
                .storage
                .expenses
                .find_by_title(&expense.title)?
                .iter()
                .any(|other| other.id != id);
            if taken {
                return Err(BudgetError::Duplicate {
                    entity_type: "Expense",
                    identifier: expense.title,
                });
            }
        }

        self.storage
            .write(&self.storage.expenses, |repo| repo.upsert(expense.clone()))?;

        self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.title.clone()),
            &before,
            &expense,
        );

        Ok(expense)
    }

    pub fn delete(&self, id: ExpenseId) -> BudgetResult<Expense> {
        let expense = self
            .storage
            .write(&self.storage.expenses, |repo| repo.delete(id))?
            .ok_or_else(|| BudgetError::expense_not_found(id.to_string()))?;

        self.storage.log_delete(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.title.clone()),
            &expense,
        );

        info!(expense = %expense.title, "deleted expense");
        Ok(expense)
    }

    fn verify_tags(&self, tag_ids: &BTreeSet<TagId>) -> BudgetResult<()> {
        for tag_id in tag_ids {
            self.storage
                .tags
                .get(*tag_id)?
                .ok_or_else(|| BudgetError::tag_not_found(tag_id.to_string()))?;
        }
        Ok(())
    }

    fn verify_budget(&self, budget_id: BudgetId) -> BudgetResult<()> {
        self.storage
            .budgets
            .get(budget_id)?
            .ok_or_else(|| BudgetError::budget_not_found(budget_id.to_string()))?;
        Ok(())
    }
}
