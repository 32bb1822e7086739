//! Roya CLI - Database migrations and account maintenance.
//!
//! # Usage
//!
//! ```bash
//! # Apply schema migrations and create the session table
//! roya-cli migrate
//!
//! # Reset a password (new password read from stdin)
//! roya-cli admin set-password -u admin
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "roya-cli")]
#[command(author, version, about = "Roya CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Maintain admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Replace a user's password, reading the new one from stdin
    SetPassword {
        /// Username to update
        #[arg(short, long)]
        username: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::SetPassword { username } => {
                commands::admin::set_password(&username).await?;
            }
        },
    }
    Ok(())
}
