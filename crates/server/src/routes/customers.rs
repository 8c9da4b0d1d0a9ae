//! Customer handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use smart_cart_core::Mobile;

use super::extract::{ApiJson, non_blank};
use crate::error::{AppError, Result};
use crate::models::{Customer, NewCustomer};
use crate::state::AppState;

/// Body of `POST /customers`.
#[derive(Debug, Deserialize)]
pub struct UpsertCustomerRequest {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub success: bool,
    pub customer: Customer,
}

#[derive(Debug, Serialize)]
pub struct CustomersResponse {
    pub success: bool,
    pub customers: Vec<Customer>,
}

pub(super) fn parse_mobile(raw: &str) -> Result<Mobile> {
    Mobile::parse(raw).map_err(|e| AppError::Validation(e.to_string()))
}

/// List customers, newest first.
///
/// GET /customers
#[tracing::instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<CustomersResponse>> {
    let customers = state.store().list_customers().await?;
    Ok(Json(CustomersResponse {
        success: true,
        customers,
    }))
}

/// Look up a customer by mobile number.
///
/// GET /customers/{mobile}
#[tracing::instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(mobile): Path<String>,
) -> Result<Json<CustomerResponse>> {
    let mobile = parse_mobile(&mobile)?;
    let customer = state
        .store()
        .find_customer_by_mobile(&mobile)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_owned()))?;

    Ok(Json(CustomerResponse {
        success: true,
        customer,
    }))
}

/// Create a customer, or update the name and email of the one with this
/// mobile number.
///
/// POST /customers
#[tracing::instrument(skip(state, body))]
pub async fn upsert(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<UpsertCustomerRequest>,
) -> Result<Json<CustomerResponse>> {
    let (Some(name), Some(mobile)) = (non_blank(body.name), non_blank(body.mobile)) else {
        return Err(AppError::Validation("Name and mobile are required".to_owned()));
    };
    let customer = NewCustomer {
        name,
        mobile: parse_mobile(&mobile)?,
        email: non_blank(body.email),
    };

    let customer = state
        .store()
        .upsert_customer(&customer, state.clock().now())
        .await?;

    Ok(Json(CustomerResponse {
        success: true,
        customer,
    }))
}
