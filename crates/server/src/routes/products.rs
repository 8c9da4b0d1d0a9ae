//! Product catalog handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use smart_cart_core::Price;

use super::extract::{ApiJson, non_blank};
use crate::error::{AppError, Result};
use crate::models::{NewProduct, Product};
use crate::state::AppState;

/// Body of `POST /products`.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub barcode: Option<String>,
    pub name: Option<String>,
    pub price: Option<Price>,
    pub category: Option<String>,
    pub stock: Option<i32>,
}

impl CreateProductRequest {
    fn validate(self) -> Result<NewProduct> {
        let (Some(barcode), Some(name), Some(price)) =
            (non_blank(self.barcode), non_blank(self.name), self.price)
        else {
            return Err(AppError::Validation(
                "Barcode, name and price are required".to_owned(),
            ));
        };
        if self.stock.is_some_and(|stock| stock < 0) {
            return Err(AppError::Validation("Stock cannot be negative".to_owned()));
        }

        Ok(NewProduct {
            barcode,
            name,
            price,
            category: non_blank(self.category),
            stock: self.stock,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub success: bool,
    pub products: Vec<Product>,
}

/// List the catalog, ordered by name.
///
/// GET /products
#[tracing::instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<ProductsResponse>> {
    let products = state.store().list_products().await?;
    Ok(Json(ProductsResponse {
        success: true,
        products,
    }))
}

/// Look up a scanned barcode.
///
/// GET /products/{barcode}
#[tracing::instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> Result<Json<ProductResponse>> {
    let product = state
        .store()
        .find_product_by_barcode(barcode.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_owned()))?;

    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}

/// Add a product to the catalog.
///
/// POST /products
#[tracing::instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    let new_product = body.validate()?;
    let product = state
        .store()
        .create_product(&new_product, state.clock().now())
        .await?;

    tracing::info!(barcode = %product.barcode, "Product created");
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            success: true,
            product,
        }),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(barcode: &str, stock: Option<i32>) -> CreateProductRequest {
        CreateProductRequest {
            barcode: Some(barcode.to_owned()),
            name: Some("Milk 1L".to_owned()),
            price: Some(Price::ZERO),
            category: Some("  ".to_owned()),
            stock,
        }
    }

    #[test]
    fn test_validate_trims_and_drops_blank_category() {
        let product = request(" 8901234567890 ", Some(3)).validate().unwrap();
        assert_eq!(product.barcode, "8901234567890");
        assert_eq!(product.category, None);
        assert_eq!(product.stock, Some(3));
    }

    #[test]
    fn test_validate_rejects_blank_barcode() {
        assert!(matches!(
            request("  ", None).validate(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_negative_stock() {
        assert!(matches!(
            request("8901234567890", Some(-1)).validate(),
            Err(AppError::Validation(_))
        ));
    }
}
