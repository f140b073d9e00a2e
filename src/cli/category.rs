//! Category CLI commands

use clap::Subcommand;

use crate::display::format_category_table;
use crate::error::KuberiumResult;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories
    List,

    /// Create a new category
    Add {
        /// Category name
        name: String,
        /// Short readable ID such as "pets" (a UUID is generated otherwise)
        #[arg(long)]
        id: Option<String>,
        /// Icon name
        #[arg(short, long, default_value = "tag")]
        icon: String,
        /// Display color (hex)
        #[arg(short, long, default_value = "#64748b")]
        color: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> KuberiumResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            println!("{}", format_category_table(&service.list()?));
        }
        CategoryCommands::Add {
            name,
            id,
            icon,
            color,
        } => {
            let category = service.create(&name, &icon, &color, id.as_deref())?;
            println!("Created category: {} ({})", category.name, category.id.short());
        }
    }

    Ok(())
}
