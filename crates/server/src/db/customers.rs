//! Customer repository for database operations.
//!
//! Customers are always read joined with their address, so a stored customer
//! comes back with the full resolved address attached.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use customer_registry_core::{Customer, CustomerDraft, CustomerId, CustomerName};

use super::addresses::AddressRow;
use super::{CustomerStore, RepositoryError, map_constraint_error};

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: CustomerId,
    name: String,
    #[sqlx(flatten)]
    address: AddressRow,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let name = CustomerName::parse(&row.name).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid name for customer {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            name,
            address: row.address.into(),
        })
    }
}

const SELECT_CUSTOMER: &str = r"
    SELECT c.id, c.name,
           a.postal_code, a.street, a.complement, a.unit, a.neighborhood, a.city,
           a.state, a.ibge_code, a.gia_code, a.area_code, a.tax_system_code
    FROM registry.customer c
    JOIN registry.address a ON a.postal_code = c.postal_code
";

/// `PostgreSQL`-backed [`CustomerStore`].
#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerStore for CustomerRepository {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!("{SELECT_CUSTOMER} ORDER BY c.id"))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Customer::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn get(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!("{SELECT_CUSTOMER} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Customer::try_from).transpose()
    }

    #[instrument(skip(self, draft), fields(id = ?draft.id, postal_code = %draft.address.postal_code))]
    async fn save(&self, draft: CustomerDraft) -> Result<Customer, RepositoryError> {
        let query = match draft.id {
            None => sqlx::query_scalar::<_, CustomerId>(
                r"
                INSERT INTO registry.customer (name, postal_code)
                VALUES ($1, $2)
                RETURNING id
                ",
            )
            .bind(draft.name.as_str())
            .bind(&draft.address.postal_code),
            Some(id) => sqlx::query_scalar::<_, CustomerId>(
                r"
                INSERT INTO registry.customer (id, name, postal_code)
                VALUES ($3, $1, $2)
                ON CONFLICT (id) DO UPDATE
                SET name = EXCLUDED.name,
                    postal_code = EXCLUDED.postal_code,
                    updated_at = NOW()
                RETURNING id
                ",
            )
            .bind(draft.name.as_str())
            .bind(&draft.address.postal_code)
            .bind(id),
        };

        let id = query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_constraint_error(e, "customer address is not stored"))?;

        Ok(draft.into_customer(id))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM registry.customer WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
