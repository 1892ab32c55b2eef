//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::RegistryConfig;
use crate::db::{AddressRepository, CustomerRepository};
use crate::services::CustomerService;
use crate::viacep::{ViaCepClient, ViaCepError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: PgPool,
    customers: CustomerService,
}

impl AppState {
    /// Create a new application state backed by `PostgreSQL` and `ViaCEP`.
    ///
    /// # Arguments
    ///
    /// * `config` - Registry configuration
    /// * `pool` - `PostgreSQL` connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the `ViaCEP` HTTP client cannot be built.
    pub fn new(config: &RegistryConfig, pool: PgPool) -> Result<Self, ViaCepError> {
        let viacep = ViaCepClient::new(&config.viacep)?;
        let customers = CustomerService::new(
            Arc::new(AddressRepository::new(pool.clone())),
            Arc::new(CustomerRepository::new(pool.clone())),
            Arc::new(viacep),
        );

        Ok(Self::from_parts(pool, customers))
    }

    /// Assemble state from an already wired customer service.
    #[must_use]
    pub fn from_parts(pool: PgPool, customers: CustomerService) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                pool,
                customers,
            }),
        }
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the customer service.
    #[must_use]
    pub fn customers(&self) -> &CustomerService {
        &self.inner.customers
    }
}
