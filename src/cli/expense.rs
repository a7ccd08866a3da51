//! Expense CLI commands

use chrono::NaiveDate;
use clap::{ArgGroup, Args, Subcommand, ValueEnum};

use crate::config::settings::Settings;
use crate::display::{format_expense_details, format_expense_list};
use crate::error::{BudgetError, BudgetResult};
use crate::query::{ExpenseQuery, FilterCriteria, SortCriteria, SortDirection, SortField};
use crate::services::{BudgetService, ExpenseService, NewExpense, TagService};
use crate::storage::Storage;

use super::budget::parse_money;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Expense title (must be unique)
        title: String,
        /// Unit price (e.g. "5.45")
        price: String,
        /// Number of units
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
        /// Tag name; repeat for several tags (at least one)
        #[arg(short, long = "tag", required = true)]
        tags: Vec<String>,
        /// Budget title or ID to attach the expense to
        #[arg(short, long)]
        budget: Option<String>,
    },
    /// Edit an expense; all changes are applied together
    Edit {
        /// Expense title or ID
        expense: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New unit price
        #[arg(long)]
        price: Option<String>,
        /// New quantity
        #[arg(short, long)]
        quantity: Option<u32>,
        /// Replace the tags; repeat for several tags
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        /// Attach to this budget (title or ID)
        #[arg(short, long)]
        budget: Option<String>,
    },
    /// Show expense details
    Show {
        /// Expense title or ID
        expense: String,
    },
    /// Delete an expense
    Delete {
        /// Expense title or ID
        expense: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// List expenses, optionally filtered and sorted
    List(ListArgs),
}

/// At most one filter; the sort applies to whatever the filter matched
#[derive(Args, Debug, Default)]
#[command(group(ArgGroup::new("filter").multiple(false)))]
pub struct ListArgs {
    /// Expenses carrying any of these tags; repeat for several
    #[arg(long = "tag", group = "filter")]
    pub tags: Vec<String>,

    /// Unit price between MIN and MAX, inclusive
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], group = "filter")]
    pub price: Option<Vec<String>>,

    /// Title starts with this text (case-sensitive)
    #[arg(long, group = "filter")]
    pub prefix: Option<String>,

    /// Created between FROM and TO (YYYY-MM-DD), both days included
    #[arg(long, num_args = 2, value_names = ["FROM", "TO"], group = "filter")]
    pub dates: Option<Vec<String>>,

    /// Sort field
    #[arg(short, long, value_enum)]
    pub sort: Option<SortArg>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Title,
    Date,
}

impl ListArgs {
    /// Build the filter-then-sort query these flags describe
    pub fn to_query(&self) -> BudgetResult<ExpenseQuery> {
        let filter = if !self.tags.is_empty() {
            FilterCriteria::by_tags(self.tags.iter().cloned())
        } else if let Some([min, max]) = self.price.as_deref() {
            FilterCriteria::by_price_range(parse_money(min)?, parse_money(max)?)
        } else if let Some(prefix) = &self.prefix {
            FilterCriteria::by_title_prefix(prefix.clone())
        } else if let Some([from, to]) = self.dates.as_deref() {
            FilterCriteria::by_days(parse_date(from)?, parse_date(to)?)
        } else {
            FilterCriteria::None
        };

        let direction = if self.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        let sort = self.sort.map(|field| {
            let field = match field {
                SortArg::Title => SortField::Title,
                SortArg::Date => SortField::DateCreated,
            };
            SortCriteria::new(field, direction)
        });

        Ok(ExpenseQuery::new(filter, sort))
    }
}

fn parse_date(input: &str) -> BudgetResult<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        BudgetError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", input))
    })
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> BudgetResult<()> {
    let service = ExpenseService::new(storage);
    let budget_service = BudgetService::new(storage);
    let tag_service = TagService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            title,
            price,
            quantity,
            tags,
            budget,
        } => {
            let budget_id = match budget {
                Some(b) => Some(budget_service.require(&b)?.id),
                None => None,
            };

            let expense = service.create(NewExpense {
                title,
                amount: parse_money(&price)?,
                quantity,
                tag_ids: tag_service.resolve_names(&tags)?.into_iter().collect(),
                budget_id,
            })?;

            println!(
                "Created expense: {} ({} x {} = {})",
                expense.title,
                expense.quantity,
                expense.amount.format_with_symbol(symbol),
                expense.total().format_with_symbol(symbol)
            );
        }

        ExpenseCommands::Edit {
            expense,
            title,
            price,
            quantity,
            tags,
            budget,
        } => {
            let target = service.require(&expense)?;

            let mut draft = service.draft(target.id)?;
            if let Some(title) = title {
                draft.set_title(title);
            }
            if let Some(price) = price {
                draft.set_amount(parse_money(&price)?);
            }
            if let Some(quantity) = quantity {
                draft.set_quantity(quantity);
            }
            if !tags.is_empty() {
                draft.set_tags(tag_service.resolve_names(&tags)?);
            }
            if let Some(budget) = budget {
                draft.set_budget(budget_service.require(&budget)?.id);
            }

            let updated = service.merge_draft(draft)?;

            println!("Updated expense: {}", updated.title);
        }

        ExpenseCommands::Show { expense } => {
            let e = service.require(&expense)?;
            let tag_names = storage.tags.names_by_id()?;
            let budget_title = match e.budget_id {
                Some(id) => budget_service.get(id)?.map(|b| b.title),
                None => None,
            };

            print!(
                "{}",
                format_expense_details(
                    &e,
                    &tag_names,
                    budget_title.as_deref(),
                    symbol,
                    &settings.date_format
                )
            );
        }

        ExpenseCommands::Delete { expense, force } => {
            let e = service.require(&expense)?;

            if !force {
                println!("About to delete expense: {}", e.title);
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let deleted = service.delete(e.id)?;
            println!("Deleted expense: {}", deleted.title);
        }

        ExpenseCommands::List(args) => {
            let query = args.to_query()?;
            let expenses = service.query(&query);
            print!(
                "{}",
                format_expense_list(&expenses, symbol, &settings.date_format)
            );
        }
    }

    Ok(())
}
