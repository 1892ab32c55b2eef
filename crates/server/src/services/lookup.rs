//! Postal code lookup, the authoritative source behind the address cache.

use async_trait::async_trait;
use thiserror::Error;

use customer_registry_core::{Address, PostalCode};

use crate::viacep::{ViaCepClient, ViaCepError};

/// Errors a postal code lookup can surface to the customer service.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The lookup service could not be reached or gave an unusable answer.
    #[error("postal code lookup unavailable: {0}")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The lookup service does not know this postal code.
    #[error("unknown postal code: {0}")]
    UnknownPostalCode(PostalCode),
}

impl From<ViaCepError> for LookupError {
    fn from(err: ViaCepError) -> Self {
        match err {
            ViaCepError::NotFound(postal_code) => Self::UnknownPostalCode(postal_code),
            other => Self::Unavailable(Box::new(other)),
        }
    }
}

/// Resolves a postal code to an address on a cache miss.
#[async_trait]
pub trait PostalCodeLookup: Send + Sync {
    /// Resolve `postal_code`. Called at most once per cache miss; never retried.
    async fn resolve(&self, postal_code: &PostalCode) -> Result<Address, LookupError>;
}

#[async_trait]
impl PostalCodeLookup for ViaCepClient {
    async fn resolve(&self, postal_code: &PostalCode) -> Result<Address, LookupError> {
        Ok(self.lookup(postal_code).await?)
    }
}
