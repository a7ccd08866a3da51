use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use budgetbook::cli::{handle_budget_command, handle_expense_command, handle_tag_command};
use budgetbook::config::{paths::BudgetPaths, settings::Settings};
use budgetbook::storage::{dedupe_expense_titles, initialize_storage, seed_default_tags, Storage};

/// Environment variable holding the log filter
const LOG_ENV: &str = "BUDGETBOOK_LOG";

#[derive(Parser)]
#[command(
    name = "budgetbook",
    version,
    about = "Track expenses against named budgets",
    long_about = "budgetbook records tagged expenses, groups them into budgets \
                  with spending limits, and shows what each budget has spent \
                  and has left."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Budget management commands
    #[command(subcommand)]
    Budget(budgetbook::cli::BudgetCommands),

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(budgetbook::cli::ExpenseCommands),

    /// Tag management commands
    #[command(subcommand)]
    Tag(budgetbook::cli::TagCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Set up storage, seed default tags and repair duplicate titles
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("budgetbook=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = BudgetPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Tag(cmd)) => {
            handle_tag_command(&storage, cmd)?;
        }
        Some(Commands::Audit { limit }) => {
            let entries = storage.audit().read_recent(limit)?;
            if entries.is_empty() {
                println!("No audit entries.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Init) => {
            println!("Initializing budgetbook at: {}", paths.base_dir().display());
            settings = initialize_storage(&paths)?;

            let seeded = seed_default_tags(&storage, &mut settings, &paths)?;
            if seeded > 0 {
                println!("Created {} default tags.", seeded);
            }

            let renamed = dedupe_expense_titles(&storage)?;
            if renamed > 0 {
                println!("Renamed {} expense(s) with duplicate titles.", renamed);
            }

            println!("Initialization complete!");
            println!("Run 'budgetbook tag list' to see available tags.");
        }
        Some(Commands::Config) => {
            println!("budgetbook Configuration");
            println!("========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!("  Tags seeded:     {}", settings.tags_seeded);
        }
        None => {
            println!("budgetbook - track expenses against named budgets");
            println!();
            println!("Run 'budgetbook init' to get started.");
            println!("Run 'budgetbook --help' for usage information.");
        }
    }

    Ok(())
}
