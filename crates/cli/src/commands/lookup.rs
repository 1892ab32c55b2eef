//! Postal code lookup command.
//!
//! Runs the same cache-aside resolution the server uses on customer writes:
//! a cached address is printed as is, a miss is fetched from `ViaCEP` and
//! stored first.
//!
//! # Usage
//!
//! ```bash
//! cr-cli lookup 37540-000
//! ```

use customer_registry_core::{Address, PostalCode, PostalCodeError};
use customer_registry_server::config::{ConfigError, RegistryConfig};
use customer_registry_server::db;
use customer_registry_server::services::CustomerServiceError;
use customer_registry_server::state::AppState;
use customer_registry_server::viacep::ViaCepError;
use thiserror::Error;

/// Errors that can occur during a lookup.
#[derive(Debug, Error)]
pub enum LookupCommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// The argument is not a postal code.
    #[error("Invalid postal code: {0}")]
    InvalidPostalCode(#[from] PostalCodeError),

    /// The `ViaCEP` client could not be built.
    #[error("ViaCEP client error: {0}")]
    Client(#[from] ViaCepError),

    /// Resolution failed.
    #[error("{0}")]
    Resolve(#[from] CustomerServiceError),

    /// The address could not be rendered.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Resolve `postal_code` and print the stored address as JSON.
pub async fn run(postal_code: &str) -> Result<Address, LookupCommandError> {
    // Reject bad input before opening any connection
    let postal_code = PostalCode::parse(postal_code)?;
    let config = RegistryConfig::from_env()?;

    tracing::info!("Connecting to registry database...");
    let pool = db::create_pool(&config.database_url).await?;
    let state = AppState::new(&config, pool)?;

    tracing::info!("Resolving postal code {}...", postal_code.formatted());
    let address = state.customers().resolve_address(&postal_code).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&address)?);
    }

    Ok(address)
}
