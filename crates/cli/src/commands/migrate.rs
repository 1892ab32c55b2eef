//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! cr-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `REGISTRY_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! # Migration Files
//!
//! `crates/server/migrations/`, embedded at build time.

use customer_registry_server::config::{ConfigError, RegistryConfig};
use customer_registry_server::db;
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run registry database migrations.
pub async fn run() -> Result<(), MigrationError> {
    let config = RegistryConfig::from_env()?;

    tracing::info!("Connecting to registry database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running registry migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Registry migrations complete!");
    Ok(())
}
