//! Address repository: the local cache of resolved postal codes.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use customer_registry_core::{Address, PostalCode};

use super::{AddressStore, RepositoryError, map_constraint_error};

/// Row shape shared by every address query (also flattened into customer rows).
#[derive(Debug, sqlx::FromRow)]
pub(super) struct AddressRow {
    pub postal_code: PostalCode,
    pub street: String,
    pub complement: String,
    pub unit: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub ibge_code: String,
    pub gia_code: String,
    pub area_code: String,
    pub tax_system_code: String,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            postal_code: row.postal_code,
            street: row.street,
            complement: row.complement,
            unit: row.unit,
            neighborhood: row.neighborhood,
            city: row.city,
            state: row.state,
            ibge_code: row.ibge_code,
            gia_code: row.gia_code,
            area_code: row.area_code,
            tax_system_code: row.tax_system_code,
        }
    }
}

/// `PostgreSQL`-backed [`AddressStore`].
#[derive(Clone)]
pub struct AddressRepository {
    pool: PgPool,
}

impl AddressRepository {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AddressStore for AddressRepository {
    #[instrument(skip(self), fields(postal_code = %postal_code))]
    async fn get(&self, postal_code: &PostalCode) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(
            r"
            SELECT postal_code, street, complement, unit, neighborhood, city, state,
                   ibge_code, gia_code, area_code, tax_system_code
            FROM registry.address
            WHERE postal_code = $1
            ",
        )
        .bind(postal_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Address::from))
    }

    #[instrument(skip(self, address), fields(postal_code = %address.postal_code))]
    async fn put(&self, address: &Address) -> Result<Address, RepositoryError> {
        // First writer wins: a concurrent insert of the same postal code is kept.
        sqlx::query(
            r"
            INSERT INTO registry.address (
                postal_code, street, complement, unit, neighborhood, city, state,
                ibge_code, gia_code, area_code, tax_system_code
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (postal_code) DO NOTHING
            ",
        )
        .bind(&address.postal_code)
        .bind(&address.street)
        .bind(&address.complement)
        .bind(&address.unit)
        .bind(&address.neighborhood)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.ibge_code)
        .bind(&address.gia_code)
        .bind(&address.area_code)
        .bind(&address.tax_system_code)
        .execute(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, "address could not be stored"))?;

        self.get(&address.postal_code).await?.ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "address {} missing right after insert",
                address.postal_code
            ))
        })
    }
}
