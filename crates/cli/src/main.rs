//! Smart Cart CLI - Database migrations and maintenance.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! smart-cart-cli migrate
//!
//! # Delete expired cash intents
//! smart-cart-cli intents sweep
//!
//! # Show what a sweep would delete
//! smart-cart-cli intents sweep --dry-run
//! ```
//!
//! Both commands read `SMART_CART_DATABASE_URL` (or `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "smart-cart-cli")]
#[command(author, version, about = "Smart Cart backend tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Maintain pending cash intents
    Intents {
        #[command(subcommand)]
        action: IntentsAction,
    },
}

#[derive(Subcommand)]
enum IntentsAction {
    /// Delete cash intents whose cashier code has expired
    Sweep {
        /// Count expired intents without deleting them
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Intents { action } => match action {
            IntentsAction::Sweep { dry_run } => commands::intents::sweep(dry_run).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sweep_dry_run() {
        let cli = Cli::try_parse_from(["smart-cart-cli", "intents", "sweep", "--dry-run"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Intents {
                action: IntentsAction::Sweep { dry_run: true }
            })
        ));
    }
}
