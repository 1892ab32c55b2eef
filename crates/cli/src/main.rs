//! Customer registry CLI - Database migrations and address tools.
//!
//! # Usage
//!
//! ```bash
//! # Run registry database migrations
//! cr-cli migrate
//!
//! # Resolve a postal code through the address cache and print it
//! cr-cli lookup 37540-000
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `lookup` - Resolve a postal code (cache first, `ViaCEP` on a miss)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cr-cli")]
#[command(author, version, about = "Customer registry CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Resolve a postal code and print the stored address as JSON
    Lookup {
        /// Postal code, with or without the hyphen (e.g. 37540-000)
        postal_code: String,
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
        Commands::Lookup { postal_code } => {
            commands::lookup::run(&postal_code).await?;
        }
    }
    Ok(())
}
