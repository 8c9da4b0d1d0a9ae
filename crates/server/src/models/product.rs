//! Products looked up by barcode at the cart.

use chrono::{DateTime, Utc};
use serde::Serialize;

use smart_cart_core::{Price, ProductId};

/// A product in the store catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    /// Scanned barcode (unique).
    pub barcode: String,
    pub name: String,
    pub price: Price,
    pub category: Option<String>,
    /// Units on hand, if the store tracks stock for this product.
    pub stock: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub barcode: String,
    pub name: String,
    pub price: Price,
    pub category: Option<String>,
    pub stock: Option<i32>,
}
