//! In-memory stores for tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use customer_registry_core::{Address, Customer, CustomerDraft, CustomerId, PostalCode};

use super::{AddressStore, CustomerStore, RepositoryError};

#[derive(Default)]
pub struct MemoryAddressStore {
    addresses: Mutex<BTreeMap<PostalCode, Address>>,
}

impl MemoryAddressStore {
    pub fn with(addresses: impl IntoIterator<Item = Address>) -> Self {
        let store = Self::default();
        store.lock().extend(
            addresses
                .into_iter()
                .map(|a| (a.postal_code.clone(), a)),
        );
        store
    }

    pub fn snapshot(&self) -> BTreeMap<PostalCode, Address> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<PostalCode, Address>> {
        self.addresses
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl AddressStore for MemoryAddressStore {
    async fn get(&self, postal_code: &PostalCode) -> Result<Option<Address>, RepositoryError> {
        Ok(self.lock().get(postal_code).cloned())
    }

    async fn put(&self, address: &Address) -> Result<Address, RepositoryError> {
        Ok(self
            .lock()
            .entry(address.postal_code.clone())
            .or_insert_with(|| address.clone())
            .clone())
    }
}

#[derive(Default)]
pub struct MemoryCustomerStore {
    state: Mutex<CustomerState>,
}

#[derive(Default, Clone)]
struct CustomerState {
    last_id: i32,
    customers: BTreeMap<CustomerId, Customer>,
}

impl MemoryCustomerStore {
    pub fn snapshot(&self) -> BTreeMap<CustomerId, Customer> {
        self.lock().customers.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CustomerState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl CustomerStore for MemoryCustomerStore {
    async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        Ok(self.lock().customers.values().cloned().collect())
    }

    async fn get(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.lock().customers.get(&id).cloned())
    }

    async fn save(&self, draft: CustomerDraft) -> Result<Customer, RepositoryError> {
        let mut state = self.lock();
        let id = if let Some(id) = draft.id {
            state.last_id = state.last_id.max(id.as_i32());
            id
        } else {
            state.last_id += 1;
            CustomerId::new(state.last_id)
        };

        let customer = draft.into_customer(id);
        state.customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        Ok(self.lock().customers.remove(&id).is_some())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_keeps_first_writer() {
        let code = PostalCode::parse("37540000").unwrap();
        let mut first = Address::bare(code.clone());
        first.city = "Ouro Fino".to_string();
        let mut second = Address::bare(code.clone());
        second.city = "Somewhere Else".to_string();
        let store = MemoryAddressStore::with([first.clone()]);

        let kept = store.put(&second).await.unwrap();

        assert_eq!(kept, first);
        assert_eq!(store.get(&code).await.unwrap(), Some(first));
        assert_eq!(store.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_save_assigns_ids_after_explicit_ones() {
        let store = MemoryCustomerStore::default();
        let address = Address::bare(PostalCode::parse("01001000").unwrap());
        let name = customer_registry_core::CustomerName::parse("Ana").unwrap();

        let explicit = store
            .save(CustomerDraft {
                id: Some(CustomerId::new(5)),
                name: name.clone(),
                address: address.clone(),
            })
            .await
            .unwrap();
        let assigned = store
            .save(CustomerDraft {
                id: None,
                name,
                address,
            })
            .await
            .unwrap();

        assert_eq!(explicit.id, CustomerId::new(5));
        assert_eq!(assigned.id, CustomerId::new(6));
    }
}
