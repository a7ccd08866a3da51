//! Expense and tag display formatting

use std::collections::HashMap;

use crate::models::{Expense, Tag, TagId};

use super::fit;

/// Format expenses as a table, in the order given
pub fn format_expense_list(expenses: &[Expense], symbol: &str, date_format: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:10}  {:24}  {:>10}  {:>4}  {:>12}\n",
        "Date", "Title", "Price", "Qty", "Total"
    ));
    output.push_str(&"-".repeat(68));
    output.push('\n');

    for expense in expenses {
        output.push_str(&format!(
            "{:10}  {}  {:>10}  {:>4}  {:>12}\n",
            expense.created_at.format(date_format).to_string(),
            fit(&expense.title, 24),
            expense.amount.format_with_symbol(symbol),
            expense.quantity,
            expense.total().format_with_symbol(symbol),
        ));
    }

    output
}

/// Format one expense with its tag names and owning budget
pub fn format_expense_details(
    expense: &Expense,
    tag_names: &HashMap<TagId, String>,
    budget_title: Option<&str>,
    symbol: &str,
    date_format: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:  {}\n", expense.title));
    output.push_str(&format!("ID:       {}\n", expense.id));
    output.push_str(&format!("Created:  {}\n", expense.created_at.format(date_format)));
    output.push_str(&format!(
        "Price:    {}\n",
        expense.amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!("Quantity: {}\n", expense.quantity));
    output.push_str(&format!(
        "Total:    {}\n",
        expense.total().format_with_symbol(symbol)
    ));

    let mut names: Vec<&str> = expense
        .tag_ids
        .iter()
        .filter_map(|id| tag_names.get(id).map(String::as_str))
        .collect();
    names.sort_unstable();
    if names.is_empty() {
        output.push_str("Tags:     (none)\n");
    } else {
        output.push_str(&format!("Tags:     {}\n", names.join(", ")));
    }

    output.push_str(&format!(
        "Budget:   {}\n",
        budget_title.unwrap_or("(unassigned)")
    ));

    output
}

pub fn format_tag_list(tags: &[Tag]) -> String {
    if tags.is_empty() {
        return "No tags found.\n".to_string();
    }

    let mut output = String::new();
    for tag in tags {
        output.push_str(&format!("{}  {}\n", tag.id, tag.name));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_empty_list() {
        assert_eq!(format_expense_list(&[], "$", "%Y-%m-%d"), "No expenses found.\n");
    }

    #[test]
    fn test_list_rows_keep_order() {
        let expenses = vec![
            Expense::new("Milk", Money::from_cents(545), 2),
            Expense::new("Cookie", Money::from_cents(845), 1),
        ];

        let output = format_expense_list(&expenses, "$", "%Y-%m-%d");
        let milk = output.find("Milk").unwrap();
        let cookie = output.find("Cookie").unwrap();
        assert!(milk < cookie);
        assert!(output.contains("$10.90"));
    }

    #[test]
    fn test_details_resolve_tags() {
        let food = Tag::new("Food");
        let dairy = Tag::new("Dairy");
        let expense =
            Expense::new("Milk", Money::from_cents(545), 1).with_tags([food.id, dairy.id]);
        let names: HashMap<_, _> = [(food.id, food.name), (dairy.id, dairy.name)].into();

        let output = format_expense_details(&expense, &names, Some("Groceries"), "$", "%Y-%m-%d");
        assert!(output.contains("Tags:     Dairy, Food"));
        assert!(output.contains("Budget:   Groceries"));

        let bare = Expense::new("Gum", Money::from_cents(99), 0);
        let output = format_expense_details(&bare, &names, None, "$", "%Y-%m-%d");
        assert!(output.contains("Tags:     (none)"));
        assert!(output.contains("(unassigned)"));
    }
}
