//! Customer CRUD handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use customer_registry_core::{Customer, CustomerId};

use crate::error::Result;
use crate::services::CustomerInput;
use crate::state::AppState;

/// Customer as submitted on create/update.
///
/// Only `name` and `address.postalCode` are read; the address itself always
/// comes from the resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CustomerId>,
    pub name: String,
    pub address: AddressRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    pub postal_code: String,
}

impl CustomerRequest {
    fn to_input(&self) -> CustomerInput {
        CustomerInput {
            name: self.name.clone(),
            postal_code: self.address.postal_code.clone(),
        }
    }
}

/// List all customers.
#[tracing::instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Customer>>> {
    Ok(Json(state.customers().list_all().await?))
}

/// Show one customer.
#[tracing::instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Json<Customer>> {
    Ok(Json(state.customers().get_by_id(id).await?))
}

/// Create a customer.
#[tracing::instrument(skip(state, request))]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CustomerRequest>,
) -> Result<(StatusCode, Json<Customer>)> {
    let customer = state.customers().insert(request.to_input()).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Overwrite a customer.
///
/// A missing ID is not an error: nothing is written and the request body is
/// echoed back.
#[tracing::instrument(skip(state, request))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
    Json(request): Json<CustomerRequest>,
) -> Result<Response> {
    let response = match state.customers().update(id, request.to_input()).await? {
        Some(customer) => Json(customer).into_response(),
        None => Json(request).into_response(),
    };
    Ok(response)
}

/// Delete a customer.
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<StatusCode> {
    state.customers().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
