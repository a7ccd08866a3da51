//! Budget arithmetic
//!
//! Spent and remaining figures are always recomputed from live expense data;
//! nothing here is cached or persisted.

use crate::models::{Budget, Expense, Money};

/// Line-item total of one expense (`amount × quantity`)
pub fn line_total(expense: &Expense) -> Money {
    expense.total()
}

/// Sum of the line totals of a budget's expenses
pub fn spent<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Money {
    expenses.into_iter().map(line_total).sum()
}

/// `limit − spent`; negative when the budget is overspent
pub fn remaining(budget: &Budget, spent: Money) -> Money {
    budget.limit - spent
}

pub fn is_over_budget(remaining: Money) -> bool {
    remaining.is_negative()
}

/// Sum of the limits of all given budgets
pub fn total_limit<'a>(budgets: impl IntoIterator<Item = &'a Budget>) -> Money {
    budgets.into_iter().map(|b| b.limit).sum()
}

/// Derived figures for one budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetSummary {
    pub budget: Budget,
    pub spent: Money,
    pub remaining: Money,
    pub expense_count: usize,
}

impl BudgetSummary {
    /// Build a summary from a budget and its expenses
    pub fn new(budget: Budget, expenses: &[Expense]) -> Self {
        let spent = spent(expenses);
        let remaining = remaining(&budget, spent);
        Self {
            budget,
            spent,
            remaining,
            expense_count: expenses.len(),
        }
    }

    pub fn is_over_budget(&self) -> bool {
        is_over_budget(self.remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groceries() -> Budget {
        Budget::new("Groceries", Money::from_cents(20000))
    }

    #[test]
    fn test_line_total() {
        let expense = Expense::new("Milk", Money::from_cents(250), 3);
        assert_eq!(line_total(&expense), Money::from_cents(750));
    }

    #[test]
    fn test_zero_quantity_totals_zero() {
        let expense = Expense::new("Gum", Money::from_cents(199), 0);
        assert!(line_total(&expense).is_zero());
    }

    #[test]
    fn test_empty_budget_has_spent_nothing() {
        let summary = BudgetSummary::new(groceries(), &[]);
        assert!(summary.spent.is_zero());
        assert_eq!(summary.remaining, Money::from_cents(20000));
        assert_eq!(summary.expense_count, 0);
    }

    #[test]
    fn test_groceries_milk() {
        let budget = groceries();
        let milk = Expense::new("Milk", Money::from_cents(545), 1).with_budget(budget.id);

        let summary = BudgetSummary::new(budget, &[milk]);
        assert_eq!(summary.spent, Money::from_cents(545));
        assert_eq!(summary.remaining, Money::from_cents(19455));
        assert!(!summary.is_over_budget());
    }

    #[test]
    fn test_spent_plus_remaining_is_limit() {
        let budget = groceries();
        let expenses = vec![
            Expense::new("Bread", Money::from_cents(300), 2),
            Expense::new("Cheese", Money::from_cents(1299), 1),
            Expense::new("Gum", Money::from_cents(99), 0),
        ];

        let spent = spent(&expenses);
        assert_eq!(spent, Money::from_cents(1899));
        assert_eq!(spent + remaining(&budget, spent), budget.limit);
    }

    #[test]
    fn test_overspent_budget() {
        let budget = Budget::new("Dining", Money::from_cents(1000));
        let dinner = Expense::new("Dinner", Money::from_cents(1250), 1);

        let summary = BudgetSummary::new(budget, &[dinner]);
        assert_eq!(summary.remaining, Money::from_cents(-250));
        assert!(summary.is_over_budget());
    }

    #[test]
    fn test_total_limit() {
        let budgets = [
            groceries(),
            Budget::new("Travel", Money::from_cents(50000)),
        ];
        assert_eq!(total_limit(&budgets), Money::from_cents(70000));
        assert!(total_limit(&[]).is_zero());
    }
}
