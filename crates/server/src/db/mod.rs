//! Data access for the Smart Cart backend.
//!
//! Handlers and services never talk to a database directly: they go through
//! the [`Store`] trait, which mirrors the small set of document-store
//! operations the backend needs (find-by-filter, upsert, delete-one,
//! update-one, create). Each call is atomic on its own; nothing here spans
//! a transaction across calls.
//!
//! # Implementations
//!
//! - [`PgStore`] - `PostgreSQL` via sqlx (production)
//! - [`MemoryStore`] - in-process maps (tests, `SMART_CART_STORE=memory`)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p smart-cart-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use smart_cart_core::{CashierCode, Mobile};

use crate::models::{
    CashIntent, CashierCodeRecord, Customer, NewCustomer, NewProduct, NewPurchase, Product,
    Purchase,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., duplicate barcode).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// The data store behind every handler.
///
/// Timestamps are always supplied by the caller so that expiry logic runs
/// against one injected clock regardless of backend.
#[async_trait]
pub trait Store: Send + Sync + std::fmt::Debug {
    /// Check the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    // -------------------------------------------------------------------------
    // Cash intents
    // -------------------------------------------------------------------------

    /// Insert the intent, or replace the existing one for the same mobile.
    async fn upsert_cash_intent(&self, intent: &CashIntent) -> Result<(), StoreError>;

    /// Find the intent for `mobile` whose code is `code`.
    async fn find_cash_intent(
        &self,
        mobile: &Mobile,
        code: &CashierCode,
    ) -> Result<Option<CashIntent>, StoreError>;

    /// Find the intent for `mobile`, whatever its code.
    async fn find_cash_intent_by_mobile(
        &self,
        mobile: &Mobile,
    ) -> Result<Option<CashIntent>, StoreError>;

    /// Delete the intent for `mobile`. Returns whether one existed.
    async fn delete_cash_intent(&self, mobile: &Mobile) -> Result<bool, StoreError>;

    /// Delete the intent for `mobile` only if its code is still `code`.
    /// Returns whether one was deleted.
    async fn delete_cash_intent_with_code(
        &self,
        mobile: &Mobile,
        code: &CashierCode,
    ) -> Result<bool, StoreError>;

    /// All intents, newest first.
    async fn list_cash_intents(&self) -> Result<Vec<CashIntent>, StoreError>;

    /// Delete every intent that expired before `now`. Returns the count.
    async fn delete_expired_cash_intents(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;

    // -------------------------------------------------------------------------
    // Cashier code history
    // -------------------------------------------------------------------------

    /// Append an unverified history record.
    async fn insert_code_history(
        &self,
        mobile: &Mobile,
        code: &CashierCode,
        created_at: DateTime<Utc>,
    ) -> Result<CashierCodeRecord, StoreError>;

    /// Mark the most recent unverified record for `mobile` + `code` as
    /// verified. Older unverified duplicates are left alone.
    ///
    /// Returns whether a record was updated.
    async fn mark_code_verified(
        &self,
        mobile: &Mobile,
        code: &CashierCode,
        verified_at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// All history records, newest first.
    async fn list_code_history(&self) -> Result<Vec<CashierCodeRecord>, StoreError>;

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    /// Create a product.
    ///
    /// Returns [`StoreError::Conflict`] if the barcode is already taken.
    async fn create_product(
        &self,
        product: &NewProduct,
        created_at: DateTime<Utc>,
    ) -> Result<Product, StoreError>;

    async fn find_product_by_barcode(&self, barcode: &str) -> Result<Option<Product>, StoreError>;

    /// All products, ordered by name.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    // -------------------------------------------------------------------------
    // Customers
    // -------------------------------------------------------------------------

    /// Insert a customer, or refresh name and email of the existing customer
    /// with the same mobile.
    async fn upsert_customer(
        &self,
        customer: &NewCustomer,
        now: DateTime<Utc>,
    ) -> Result<Customer, StoreError>;

    async fn find_customer_by_mobile(&self, mobile: &Mobile)
    -> Result<Option<Customer>, StoreError>;

    /// All customers, newest first.
    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError>;

    // -------------------------------------------------------------------------
    // Purchases
    // -------------------------------------------------------------------------

    async fn create_purchase(
        &self,
        purchase: &NewPurchase,
        created_at: DateTime<Utc>,
    ) -> Result<Purchase, StoreError>;

    /// Purchases newest first, optionally only those for `mobile`.
    async fn list_purchases(&self, mobile: Option<&Mobile>) -> Result<Vec<Purchase>, StoreError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
