//! Budget CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_budget_details, format_budget_list};
use crate::error::{BudgetError, BudgetResult};
use crate::models::Money;
use crate::services::BudgetService;
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create a budget
    Add {
        /// Budget title (must be unique)
        title: String,
        /// Spending limit (e.g. "200" or "200.00")
        limit: String,
    },
    /// List budgets with spent and remaining amounts
    List,
    /// Show a budget and its expenses
    Show {
        /// Budget title or ID
        budget: String,
    },
    /// Delete a budget and all of its expenses
    Delete {
        /// Budget title or ID
        budget: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Parse a user-entered amount
pub(crate) fn parse_money(input: &str) -> BudgetResult<Money> {
    Money::parse(input).map_err(|e| BudgetError::Validation(e.to_string()))
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> BudgetResult<()> {
    let service = BudgetService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::Add { title, limit } => {
            let budget = service.create(&title, parse_money(&limit)?)?;
            println!(
                "Created budget: {} (limit {})",
                budget.title,
                budget.limit.format_with_symbol(symbol)
            );
        }

        BudgetCommands::List => {
            print!("{}", format_budget_list(&service.summaries()?, symbol));
        }

        BudgetCommands::Show { budget } => {
            let b = service.require(&budget)?;
            let summary = service.summary(b.id)?;
            let expenses = service.expenses(b.id)?;
            print!(
                "{}",
                format_budget_details(&summary, &expenses, symbol, &settings.date_format)
            );
        }

        BudgetCommands::Delete { budget, force } => {
            let b = service.require(&budget)?;

            if !force {
                let count = service.expenses(b.id)?.len();
                println!(
                    "About to delete budget '{}' and its {} expense(s)",
                    b.title, count
                );
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let (deleted, removed) = service.delete(b.id)?;
            println!(
                "Deleted budget: {} ({} expense(s) removed)",
                deleted.title,
                removed.len()
            );
        }
    }

    Ok(())
}
