//! Database operations for the registry `PostgreSQL`.
//!
//! # Schema: `registry`
//!
//! ## Tables
//!
//! - `address` - Resolved addresses, keyed by postal code (the lookup cache)
//! - `customer` - Customers, each referencing one address by postal code
//!
//! # Stores
//!
//! The customer service talks to the database only through the
//! [`AddressStore`] and [`CustomerStore`] traits, so tests can swap in the
//! in-memory stores from [`memory`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p customer-registry-cli -- migrate
//! ```

pub mod addresses;
pub mod customers;
#[cfg(test)]
pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use customer_registry_core::{Address, Customer, CustomerDraft, CustomerId, PostalCode};

pub use addresses::AddressRepository;
pub use customers::CustomerRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., customer referencing an unknown address).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Address records keyed by postal code.
///
/// A missing address is `Ok(None)`, never an error.
#[async_trait]
pub trait AddressStore: Send + Sync {
    /// Look up the cached address for a postal code.
    async fn get(&self, postal_code: &PostalCode) -> Result<Option<Address>, RepositoryError>;

    /// Store an address and return the record resident under its postal code.
    ///
    /// If another writer already stored this postal code, that record is kept
    /// and returned; a duplicate key is not an error.
    async fn put(&self, address: &Address) -> Result<Address, RepositoryError>;
}

/// Customer records keyed by numeric ID.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// All customers, ordered by ID.
    async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError>;

    /// Look up one customer.
    async fn get(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;

    /// Insert (`draft.id == None`) or insert-or-overwrite by ID.
    async fn save(&self, draft: CustomerDraft) -> Result<Customer, RepositoryError>;

    /// Delete a customer. Returns `false` if there was nothing to delete.
    async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map constraint violations to [`RepositoryError::Conflict`].
fn map_constraint_error(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && (db_err.is_foreign_key_violation() || db_err.is_unique_violation())
    {
        return RepositoryError::Conflict(what.to_owned());
    }
    RepositoryError::Database(e)
}
