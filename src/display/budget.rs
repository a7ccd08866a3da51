//! Budget display formatting

use crate::models::{Expense, Money};
use crate::services::BudgetSummary;

use super::expense::format_expense_list;

/// Format budgets with their limits and derived figures as a table
pub fn format_budget_list(summaries: &[BudgetSummary], symbol: &str) -> String {
    if summaries.is_empty() {
        return "No budgets found.\n".to_string();
    }

    let title_width = summaries
        .iter()
        .map(|s| s.budget.title.chars().count())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<title_width$}  {:>12}  {:>12}  {:>12}  {:>8}\n",
        "Title",
        "Limit",
        "Spent",
        "Remaining",
        "Expenses",
        title_width = title_width,
    ));
    output.push_str(&format!(
        "{:-<title_width$}  {:->12}  {:->12}  {:->12}  {:->8}\n",
        "",
        "",
        "",
        "",
        "",
        title_width = title_width,
    ));

    for summary in summaries {
        let marker = if summary.is_over_budget() { "  over" } else { "" };
        output.push_str(&format!(
            "{:<title_width$}  {:>12}  {:>12}  {:>12}  {:>8}{}\n",
            summary.budget.title,
            summary.budget.limit.format_with_symbol(symbol),
            summary.spent.format_with_symbol(symbol),
            summary.remaining.format_with_symbol(symbol),
            summary.expense_count,
            marker,
            title_width = title_width,
        ));
    }

    let total_limit: Money = summaries.iter().map(|s| s.budget.limit).sum();
    let total_spent: Money = summaries.iter().map(|s| s.spent).sum();
    output.push_str(&format!(
        "\nTotal limit: {}  Total spent: {}\n",
        total_limit.format_with_symbol(symbol),
        total_spent.format_with_symbol(symbol)
    ));

    output
}

/// Format one budget with its expenses
pub fn format_budget_details(
    summary: &BudgetSummary,
    expenses: &[Expense],
    symbol: &str,
    date_format: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Budget:    {}\n", summary.budget.title));
    output.push_str(&format!("ID:        {}\n", summary.budget.id));
    output.push_str(&format!(
        "Created:   {}\n",
        summary.budget.created_at.format(date_format)
    ));
    output.push_str(&format!(
        "Limit:     {}\n",
        summary.budget.limit.format_with_symbol(symbol)
    ));
    output.push_str(&format!("Spent:     {}\n", summary.spent.format_with_symbol(symbol)));
    output.push_str(&format!(
        "Remaining: {}{}\n",
        summary.remaining.format_with_symbol(symbol),
        if summary.is_over_budget() { " (over budget)" } else { "" }
    ));

    output.push('\n');
    output.push_str(&format_expense_list(expenses, symbol, date_format));

    output
}
