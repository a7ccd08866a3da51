//! Budget model
//!
//! A budget is a named spending limit. Its expenses are not stored on the
//! budget itself; the expense repository indexes expenses by budget, and
//! derived figures (spent, remaining) are computed from that index on demand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BudgetId;
use super::money::Money;

/// A named spending limit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier
    pub id: BudgetId,

    /// Budget title (unique across budgets at creation time)
    pub title: String,

    /// Spending limit
    pub limit: Money,

    /// When the budget was created
    pub created_at: DateTime<Utc>,
}

impl Budget {
    /// Create a new budget
    pub fn new(title: impl Into<String>, limit: Money) -> Self {
        Self {
            id: BudgetId::new(),
            title: title.into(),
            limit,
            created_at: Utc::now(),
        }
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.title.trim().is_empty() {
            return Err(BudgetValidationError::EmptyTitle);
        }

        if self.limit.is_negative() {
            return Err(BudgetValidationError::NegativeLimit(self.limit));
        }

        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    EmptyTitle,
    NegativeLimit(Money),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Budget title cannot be empty"),
            Self::NegativeLimit(limit) => {
                write!(f, "Budget limit cannot be negative (got {})", limit)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_budget() {
        let budget = Budget::new("Groceries", Money::from_cents(20000));
        assert_eq!(budget.title, "Groceries");
        assert_eq!(budget.limit.cents(), 20000);
        assert!(budget.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut budget = Budget::new("   ", Money::zero());
        assert_eq!(budget.validate(), Err(BudgetValidationError::EmptyTitle));

        budget.title = "Fun".into();
        assert!(budget.validate().is_ok());

        budget.limit = Money::from_cents(-1);
        assert!(matches!(
            budget.validate(),
            Err(BudgetValidationError::NegativeLimit(_))
        ));
    }
}
