//! dealerbot CLI — the main entry point.
//!
//! Commands:
//! - `init`     — Write a default config file
//! - `status`   — Show configuration and data locations
//! - `resolve`  — Match a name against the asset folders
//! - `stock`    — Decode the stock sheet
//! - `prices`   — Decode the price sheets
//! - `report`   — Render the catalog report
//! - `prompt`   — Show the prompt a message would produce
//! - `greeting` — Greeting tracker maintenance
//! - `topics`   — List remembered topics

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "dealerbot",
    about = "dealerbot — sales assistant for a motorcycle dealership",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file to ~/.dealerbot/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show configuration and data locations
    Status,

    /// Match a free-text name against the asset folders or price lists
    Resolve {
        name: String,

        #[arg(short, long, value_enum, default_value_t = Category::Motors)]
        category: Category,
    },

    /// Decode stock sheets into unit records
    Stock {
        /// Workbook file (defaults to catalog.workbook)
        #[arg(short, long)]
        workbook: Option<PathBuf>,

        /// Only this sheet
        #[arg(short, long)]
        sheet: Option<String>,
    },

    /// Decode price sheets into priced items
    Prices {
        #[arg(short, long)]
        workbook: Option<PathBuf>,

        #[arg(short, long)]
        sheet: Option<String>,
    },

    /// Render the catalog report sent to the assistant
    Report {
        #[arg(short, long)]
        workbook: Option<PathBuf>,
    },

    /// Show the full prompt a customer message would produce
    Prompt {
        /// Customer identifier
        #[arg(short, long, default_value = "cli")]
        user: String,

        message: String,
    },

    /// Greeting tracker maintenance
    Greeting {
        #[command(subcommand)]
        action: GreetingAction,
    },

    /// List remembered topics
    Topics,
}

#[derive(Subcommand)]
enum GreetingAction {
    /// Forget that customers were greeted
    Reset {
        /// Only this customer (all customers when omitted)
        #[arg(short, long)]
        user: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Category {
    Motors,
    PriceLists,
}

impl From<Category> for dealerbot_core::AssetCategory {
    fn from(category: Category) -> Self {
        match category {
            Category::Motors => Self::Motors,
            Category::PriceLists => Self::PriceLists,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init { force } => commands::status::init(force)?,
        Commands::Status => commands::status::run()?,
        Commands::Resolve { name, category } => commands::catalog::resolve(&name, category.into())?,
        Commands::Stock { workbook, sheet } => commands::catalog::stock(workbook, sheet).await?,
        Commands::Prices { workbook, sheet } => commands::catalog::prices(workbook, sheet).await?,
        Commands::Report { workbook } => commands::catalog::report(workbook).await?,
        Commands::Prompt { user, message } => commands::prompt::run(&user, &message).await?,
        Commands::Greeting {
            action: GreetingAction::Reset { user },
        } => commands::conversations::reset_greeting(user).await?,
        Commands::Topics => commands::conversations::topics().await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_greeting_reset_for_one_user() {
        let cli = Cli::try_parse_from(["dealerbot", "greeting", "reset", "--user", "62812@c.us"]).unwrap();
        match cli.command {
            Commands::Greeting {
                action: GreetingAction::Reset { user },
            } => assert_eq!(user.as_deref(), Some("62812@c.us")),
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn resolve_defaults_to_motor_folders() {
        let cli = Cli::try_parse_from(["dealerbot", "resolve", "beat street"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Resolve { category: Category::Motors, .. }
        ));
    }
}
