//! Display formatting for terminal output
//!
//! Plain-text tables and detail views. Amounts are printed with the currency
//! symbol from the user's settings.

pub mod budget;
pub mod expense;

pub use budget::{format_budget_details, format_budget_list};
pub use expense::{format_expense_details, format_expense_list, format_tag_list};

/// Pad or cut `s` to exactly `width` characters
pub(crate) fn fit(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        format!("{:width$}", s, width = width)
    } else if width <= 3 {
        ".".repeat(width)
    } else {
        let head: String = s.chars().take(width - 3).collect();
        format!("{}...", head)
    }
}
