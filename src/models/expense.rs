//! Expense model
//!
//! An expense is a single purchase: a unit price, a quantity, a set of tags
//! and an optional owning budget. Edits go through [`ExpenseDraft`], a copy of
//! the editable fields that is either merged back into the store as a whole or
//! dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::ids::{BudgetId, ExpenseId, TagId};
use super::money::Money;

/// A recorded purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// Expense title (unique across all expenses at creation time)
    pub title: String,

    /// Unit price
    #[serde(default)]
    pub amount: Money,

    /// Number of units purchased
    #[serde(default)]
    pub quantity: u32,

    /// Tags attached to this expense
    #[serde(default)]
    pub tag_ids: BTreeSet<TagId>,

    /// Owning budget, if attached
    #[serde(default)]
    pub budget_id: Option<BudgetId>,

    /// When the expense was created
    pub created_at: DateTime<Utc>,

    /// When the expense was last modified
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Create a standalone expense with no tags and no budget
    pub fn new(title: impl Into<String>, amount: Money, quantity: u32) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            title: title.into(),
            amount,
            quantity,
            tag_ids: BTreeSet::new(),
            budget_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach to a budget
    pub fn with_budget(mut self, budget_id: BudgetId) -> Self {
        self.budget_id = Some(budget_id);
        self
    }

    pub fn with_tags(mut self, tag_ids: impl IntoIterator<Item = TagId>) -> Self {
        self.tag_ids = tag_ids.into_iter().collect();
        self
    }

    /// Override the creation timestamp (imports, fixtures)
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = created_at;
        self
    }

    /// Line-item total: unit price times quantity
    pub fn total(&self) -> Money {
        self.amount.times(self.quantity)
    }

    pub fn has_tag(&self, tag_id: TagId) -> bool {
        self.tag_ids.contains(&tag_id)
    }

    /// Validate the expense fields
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.title.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyTitle);
        }

        if self.amount.is_negative() {
            return Err(ExpenseValidationError::NegativeAmount(self.amount));
        }

        if self.amount.checked_times(self.quantity).is_none() {
            return Err(ExpenseValidationError::TotalTooLarge);
        }

        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.quantity)
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyTitle,
    NegativeAmount(Money),
    TotalTooLarge,
    NoTags,
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Expense title cannot be empty"),
            Self::NegativeAmount(amount) => {
                write!(f, "Expense amount cannot be negative (got {})", amount)
            }
            Self::TotalTooLarge => write!(f, "Expense total is too large"),
            Self::NoTags => write!(f, "Expense must have at least one tag"),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

/// Isolated working copy of an expense's editable fields
///
/// Changes made to a draft are invisible to the store until the draft is
/// merged. Dropping the draft (or calling [`ExpenseDraft::discard`]) abandons
/// the edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    expense_id: ExpenseId,
    pub title: String,
    pub amount: Money,
    pub quantity: u32,
    pub tag_ids: BTreeSet<TagId>,
    pub budget_id: Option<BudgetId>,
}

impl ExpenseDraft {
    /// Copy the editable fields of an expense into a new draft
    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            expense_id: expense.id,
            title: expense.title.clone(),
            amount: expense.amount,
            quantity: expense.quantity,
            tag_ids: expense.tag_ids.clone(),
            budget_id: expense.budget_id,
        }
    }

    /// The expense this draft was taken from
    pub fn expense_id(&self) -> ExpenseId {
        self.expense_id
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self
    }

    pub fn set_amount(&mut self, amount: Money) -> &mut Self {
        self.amount = amount;
        self
    }

    pub fn set_quantity(&mut self, quantity: u32) -> &mut Self {
        self.quantity = quantity;
        self
    }

    pub fn set_tags(&mut self, tag_ids: impl IntoIterator<Item = TagId>) -> &mut Self {
        self.tag_ids = tag_ids.into_iter().collect();
        self
    }

    pub fn add_tag(&mut self, tag_id: TagId) -> &mut Self {
        self.tag_ids.insert(tag_id);
        self
    }

    pub fn remove_tag(&mut self, tag_id: TagId) -> &mut Self {
        self.tag_ids.remove(&tag_id);
        self
    }

    /// Move the expense to another budget
    pub fn set_budget(&mut self, budget_id: BudgetId) -> &mut Self {
        self.budget_id = Some(budget_id);
        self
    }

    /// Check whether the draft differs from the given expense
    pub fn is_dirty(&self, expense: &Expense) -> bool {
        self.title != expense.title
            || self.amount != expense.amount
            || self.quantity != expense.quantity
            || self.tag_ids != expense.tag_ids
            || self.budget_id != expense.budget_id
    }

    /// Overwrite the editable fields of `expense` with the draft's values
    pub fn apply_to(&self, expense: &mut Expense) {
        expense.title = self.title.clone();
        expense.amount = self.amount;
        expense.quantity = self.quantity;
        expense.tag_ids = self.tag_ids.clone();
        expense.budget_id = self.budget_id;
        expense.updated_at = Utc::now();
    }

    /// Abandon the edit
    pub fn discard(self) {}
}
