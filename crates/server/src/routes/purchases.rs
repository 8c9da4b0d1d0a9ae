//! Purchase handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use smart_cart_core::{CashierCode, PaymentMethod};

use super::customers::parse_mobile;
use super::extract::{ApiJson, non_blank};
use crate::error::{AppError, Result};
use crate::models::{NewPurchase, Purchase, PurchaseItem};
use crate::services::record_purchase;
use crate::state::AppState;

/// Body of `POST /purchases`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseRequest {
    pub customer_name: Option<String>,
    pub mobile: Option<String>,
    #[serde(default)]
    pub items: Vec<PurchaseItem>,
    pub payment_method: Option<PaymentMethod>,
    pub cashier_code: Option<CashierCode>,
}

impl CreatePurchaseRequest {
    fn validate(self) -> Result<NewPurchase> {
        let (Some(customer_name), Some(mobile), Some(payment_method)) = (
            non_blank(self.customer_name),
            non_blank(self.mobile),
            self.payment_method,
        ) else {
            return Err(AppError::Validation(
                "Customer name, mobile and payment method are required".to_owned(),
            ));
        };
        if self.items.is_empty() {
            return Err(AppError::Validation(
                "A purchase needs at least one item".to_owned(),
            ));
        }
        if let Some(item) = self.items.iter().find(|item| item.quantity == 0) {
            return Err(AppError::Validation(format!(
                "Quantity for {} must be at least 1",
                item.barcode
            )));
        }

        NewPurchase::new(
            customer_name,
            parse_mobile(&mobile)?,
            self.items,
            payment_method,
            self.cashier_code,
        )
        .map_err(|e| AppError::Validation(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub success: bool,
    pub purchase: Purchase,
}

#[derive(Debug, Serialize)]
pub struct PurchasesResponse {
    pub success: bool,
    pub purchases: Vec<Purchase>,
}

/// List all purchases, newest first.
///
/// GET /purchases
#[tracing::instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<PurchasesResponse>> {
    let purchases = state.store().list_purchases(None).await?;
    Ok(Json(PurchasesResponse {
        success: true,
        purchases,
    }))
}

/// List one customer's purchases, newest first.
///
/// GET /purchases/{mobile}
#[tracing::instrument(skip(state))]
pub async fn for_mobile(
    State(state): State<AppState>,
    Path(mobile): Path<String>,
) -> Result<Json<PurchasesResponse>> {
    let mobile = parse_mobile(&mobile)?;
    let purchases = state.store().list_purchases(Some(&mobile)).await?;
    Ok(Json(PurchasesResponse {
        success: true,
        purchases,
    }))
}

/// Save a finalized purchase. The total is computed from the items.
///
/// POST /purchases
#[tracing::instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreatePurchaseRequest>,
) -> Result<(StatusCode, Json<PurchaseResponse>)> {
    let new_purchase = body.validate()?;
    let purchase = record_purchase(
        state.store(),
        state.verification(),
        state.clock(),
        &new_purchase,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(PurchaseResponse {
            success: true,
            purchase,
        }),
    ))
}
