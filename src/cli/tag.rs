//! Tag CLI commands

use clap::Subcommand;

use crate::display::format_tag_list;
use crate::error::BudgetResult;
use crate::services::TagService;
use crate::storage::Storage;

/// Tag subcommands
#[derive(Subcommand)]
pub enum TagCommands {
    /// Create a tag
    Add {
        /// Tag name
        name: String,
    },
    /// List all tags
    List,
}

/// Handle a tag command
pub fn handle_tag_command(storage: &Storage, cmd: TagCommands) -> BudgetResult<()> {
    let service = TagService::new(storage);

    match cmd {
        TagCommands::Add { name } => {
            let tag = service.create(&name)?;
            println!("Created tag: {} ({})", tag.name, tag.id);
        }
        TagCommands::List => {
            print!("{}", format_tag_list(&service.list()?));
        }
    }

    Ok(())
}
