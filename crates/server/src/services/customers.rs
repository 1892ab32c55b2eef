//! Customer service: CRUD over the customer store with cache-aside address
//! resolution.
//!
//! Every write resolves the customer's postal code first. A code already in
//! the address store is used as is; a miss is resolved through the lookup
//! service and written back before the customer is saved, so a stored
//! customer always references a store-resident address.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument};

use customer_registry_core::{
    Address, Customer, CustomerDraft, CustomerId, CustomerName, CustomerNameError, PostalCode,
    PostalCodeError,
};

use super::lookup::{LookupError, PostalCodeLookup};
use crate::db::{AddressStore, CustomerStore, RepositoryError};

/// Errors that can occur during customer operations.
#[derive(Debug, Error)]
pub enum CustomerServiceError {
    /// No customer with this ID.
    #[error("customer {0} not found")]
    NotFound(CustomerId),

    /// The customer name failed validation.
    #[error("invalid name: {0}")]
    InvalidName(#[from] CustomerNameError),

    /// The postal code failed validation.
    #[error("invalid postal code: {0}")]
    InvalidPostalCode(#[from] PostalCodeError),

    /// Resolving the postal code failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Unvalidated customer fields as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerInput {
    pub name: String,
    pub postal_code: String,
}

impl CustomerInput {
    fn validate(&self) -> Result<(CustomerName, PostalCode), CustomerServiceError> {
        let name = CustomerName::parse(&self.name)?;
        let postal_code = PostalCode::parse(&self.postal_code)?;
        Ok((name, postal_code))
    }
}

/// Customer operations over injected stores and lookup.
#[derive(Clone)]
pub struct CustomerService {
    addresses: Arc<dyn AddressStore>,
    customers: Arc<dyn CustomerStore>,
    lookup: Arc<dyn PostalCodeLookup>,
}

impl CustomerService {
    /// Create a new customer service.
    #[must_use]
    pub fn new(
        addresses: Arc<dyn AddressStore>,
        customers: Arc<dyn CustomerStore>,
        lookup: Arc<dyn PostalCodeLookup>,
    ) -> Self {
        Self {
            addresses,
            customers,
            lookup,
        }
    }

    /// All customers, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Customer>, CustomerServiceError> {
        Ok(self.customers.list_all().await?)
    }

    /// Fetch one customer.
    ///
    /// # Errors
    ///
    /// Returns `CustomerServiceError::NotFound` if no customer has this ID.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Customer, CustomerServiceError> {
        self.customers
            .get(id)
            .await?
            .ok_or(CustomerServiceError::NotFound(id))
    }

    /// Create a customer; the store assigns its ID.
    ///
    /// # Errors
    ///
    /// Returns a validation error before touching any store, or the lookup or
    /// repository error that stopped the write.
    #[instrument(skip(self, input), fields(postal_code = %input.postal_code))]
    pub async fn insert(&self, input: CustomerInput) -> Result<Customer, CustomerServiceError> {
        let (name, postal_code) = input.validate()?;
        let customer = self.save_with_address(None, name, &postal_code).await?;
        info!(id = %customer.id, "customer created");
        Ok(customer)
    }

    /// Overwrite customer `id`.
    ///
    /// Returns `Ok(None)` without validating, resolving or writing anything
    /// when `id` does not exist.
    ///
    /// # Errors
    ///
    /// Same as [`Self::insert`] when `id` exists.
    #[instrument(skip(self, input), fields(postal_code = %input.postal_code))]
    pub async fn update(
        &self,
        id: CustomerId,
        input: CustomerInput,
    ) -> Result<Option<Customer>, CustomerServiceError> {
        if self.customers.get(id).await?.is_none() {
            debug!("update of missing customer ignored");
            return Ok(None);
        }

        let (name, postal_code) = input.validate()?;
        let customer = self.save_with_address(Some(id), name, &postal_code).await?;
        info!("customer updated");
        Ok(Some(customer))
    }

    /// Delete a customer. Deleting a missing ID succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: CustomerId) -> Result<(), CustomerServiceError> {
        let removed = self.customers.delete(id).await?;
        debug!(removed, "customer delete");
        Ok(())
    }

    /// Return the stored address for `postal_code`, fetching and storing it
    /// on a miss.
    ///
    /// # Errors
    ///
    /// Returns the lookup error on a failed miss, or a repository error.
    #[instrument(skip(self), fields(postal_code = %postal_code))]
    pub async fn resolve_address(
        &self,
        postal_code: &PostalCode,
    ) -> Result<Address, CustomerServiceError> {
        if let Some(address) = self.addresses.get(postal_code).await? {
            debug!("address cache hit");
            return Ok(address);
        }

        let fetched = self.lookup.resolve(postal_code).await?;
        let stored = self.addresses.put(&fetched).await?;
        info!(
            street = %stored.street,
            complement = %stored.complement,
            unit = %stored.unit,
            neighborhood = %stored.neighborhood,
            city = %stored.city,
            state = %stored.state,
            ibge_code = %stored.ibge_code,
            gia_code = %stored.gia_code,
            area_code = %stored.area_code,
            tax_system_code = %stored.tax_system_code,
            "address fetched and stored"
        );

        Ok(stored)
    }

    async fn save_with_address(
        &self,
        id: Option<CustomerId>,
        name: CustomerName,
        postal_code: &PostalCode,
    ) -> Result<Customer, CustomerServiceError> {
        let address = self.resolve_address(postal_code).await?;
        let draft = CustomerDraft { id, name, address };
        Ok(self.customers.save(draft).await?)
    }
}
