//! `PostgreSQL` implementation of [`Store`].
//!
//! Queries are checked at runtime rather than through `sqlx::query!` so the
//! crate builds without a live database or an offline query cache.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use smart_cart_core::{CashierCode, Mobile, PaymentMethod, Price, PurchaseId};

use super::{Store, StoreError};
use crate::models::{
    CashIntent, CashierCodeRecord, Customer, NewCustomer, NewProduct, NewPurchase, Product,
    Purchase, PurchaseItem,
};

/// Store backed by a `PostgreSQL` connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Row shape of the `purchase` table; items live in a JSONB column.
#[derive(sqlx::FromRow)]
struct PurchaseRow {
    id: PurchaseId,
    customer_name: String,
    mobile: Mobile,
    items: Json<Vec<PurchaseItem>>,
    total: Price,
    payment_method: PaymentMethod,
    cashier_code: Option<CashierCode>,
    created_at: DateTime<Utc>,
}

impl From<PurchaseRow> for Purchase {
    fn from(row: PurchaseRow) -> Self {
        Self {
            id: row.id,
            customer_name: row.customer_name,
            mobile: row.mobile,
            items: row.items.0,
            total: row.total,
            payment_method: row.payment_method,
            cashier_code: row.cashier_code,
            created_at: row.created_at,
        }
    }
}

/// Turn a unique violation into [`StoreError::Conflict`].
fn conflict_on_unique(e: sqlx::Error, what: &str) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return StoreError::Conflict(format!("{what} already exists"));
    }
    StoreError::Database(e)
}

const CASH_INTENT_COLUMNS: &str = "mobile, name, code, created_at, expires_at";
const HISTORY_COLUMNS: &str = "id, mobile, code, verified, verified_at, created_at";
const PRODUCT_COLUMNS: &str = "id, barcode, name, price, category, stock, created_at";
const CUSTOMER_COLUMNS: &str = "id, name, mobile, email, created_at";
const PURCHASE_COLUMNS: &str =
    "id, customer_name, mobile, items, total, payment_method, cashier_code, created_at";

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn upsert_cash_intent(&self, intent: &CashIntent) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO cash_intent (mobile, name, code, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (mobile) DO UPDATE
            SET name = EXCLUDED.name,
                code = EXCLUDED.code,
                created_at = EXCLUDED.created_at,
                expires_at = EXCLUDED.expires_at
            ",
        )
        .bind(&intent.mobile)
        .bind(&intent.name)
        .bind(&intent.code)
        .bind(intent.created_at)
        .bind(intent.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_cash_intent(
        &self,
        mobile: &Mobile,
        code: &CashierCode,
    ) -> Result<Option<CashIntent>, StoreError> {
        let intent = sqlx::query_as::<_, CashIntent>(&format!(
            "SELECT {CASH_INTENT_COLUMNS} FROM cash_intent WHERE mobile = $1 AND code = $2"
        ))
        .bind(mobile)
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(intent)
    }

    async fn find_cash_intent_by_mobile(
        &self,
        mobile: &Mobile,
    ) -> Result<Option<CashIntent>, StoreError> {
        let intent = sqlx::query_as::<_, CashIntent>(&format!(
            "SELECT {CASH_INTENT_COLUMNS} FROM cash_intent WHERE mobile = $1"
        ))
        .bind(mobile)
        .fetch_optional(&self.pool)
        .await?;

        Ok(intent)
    }

    async fn delete_cash_intent(&self, mobile: &Mobile) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM cash_intent WHERE mobile = $1")
            .bind(mobile)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_cash_intent_with_code(
        &self,
        mobile: &Mobile,
        code: &CashierCode,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM cash_intent WHERE mobile = $1 AND code = $2")
            .bind(mobile)
            .bind(code)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_cash_intents(&self) -> Result<Vec<CashIntent>, StoreError> {
        let intents = sqlx::query_as::<_, CashIntent>(&format!(
            "SELECT {CASH_INTENT_COLUMNS} FROM cash_intent ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(intents)
    }

    async fn delete_expired_cash_intents(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM cash_intent WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn insert_code_history(
        &self,
        mobile: &Mobile,
        code: &CashierCode,
        created_at: DateTime<Utc>,
    ) -> Result<CashierCodeRecord, StoreError> {
        let record = sqlx::query_as::<_, CashierCodeRecord>(&format!(
            r"
            INSERT INTO cashier_code_history (mobile, code, created_at)
            VALUES ($1, $2, $3)
            RETURNING {HISTORY_COLUMNS}
            "
        ))
        .bind(mobile)
        .bind(code)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn mark_code_verified(
        &self,
        mobile: &Mobile,
        code: &CashierCode,
        verified_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r"
            UPDATE cashier_code_history
            SET verified = TRUE, verified_at = $3
            WHERE id = (
                SELECT id FROM cashier_code_history
                WHERE mobile = $1 AND code = $2 AND verified = FALSE
                ORDER BY created_at DESC, id DESC
                LIMIT 1
            )
            ",
        )
        .bind(mobile)
        .bind(code)
        .bind(verified_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_code_history(&self) -> Result<Vec<CashierCodeRecord>, StoreError> {
        let records = sqlx::query_as::<_, CashierCodeRecord>(&format!(
            "SELECT {HISTORY_COLUMNS} FROM cashier_code_history ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn create_product(
        &self,
        product: &NewProduct,
        created_at: DateTime<Utc>,
    ) -> Result<Product, StoreError> {
        sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO product (barcode, name, price, category, stock, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&product.barcode)
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.category)
        .bind(product.stock)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "barcode"))
    }

    async fn find_product_by_barcode(&self, barcode: &str) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE barcode = $1"
        ))
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn upsert_customer(
        &self,
        customer: &NewCustomer,
        now: DateTime<Utc>,
    ) -> Result<Customer, StoreError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            r"
            INSERT INTO customer (name, mobile, email, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (mobile) DO UPDATE
            SET name = EXCLUDED.name,
                email = COALESCE(EXCLUDED.email, customer.email)
            RETURNING {CUSTOMER_COLUMNS}
            "
        ))
        .bind(&customer.name)
        .bind(&customer.mobile)
        .bind(&customer.email)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn find_customer_by_mobile(
        &self,
        mobile: &Mobile,
    ) -> Result<Option<Customer>, StoreError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer WHERE mobile = $1"
        ))
        .bind(mobile)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    async fn create_purchase(
        &self,
        purchase: &NewPurchase,
        created_at: DateTime<Utc>,
    ) -> Result<Purchase, StoreError> {
        let row = sqlx::query_as::<_, PurchaseRow>(&format!(
            r"
            INSERT INTO purchase
                (customer_name, mobile, items, total, payment_method, cashier_code, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PURCHASE_COLUMNS}
            "
        ))
        .bind(&purchase.customer_name)
        .bind(&purchase.mobile)
        .bind(Json(&purchase.items))
        .bind(purchase.total())
        .bind(purchase.payment_method)
        .bind(&purchase.cashier_code)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list_purchases(&self, mobile: Option<&Mobile>) -> Result<Vec<Purchase>, StoreError> {
        let rows = match mobile {
            Some(mobile) => {
                sqlx::query_as::<_, PurchaseRow>(&format!(
                    r"
                    SELECT {PURCHASE_COLUMNS} FROM purchase
                    WHERE mobile = $1
                    ORDER BY created_at DESC, id DESC
                    "
                ))
                .bind(mobile)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, PurchaseRow>(&format!(
                    "SELECT {PURCHASE_COLUMNS} FROM purchase ORDER BY created_at DESC, id DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Purchase::from).collect())
    }
}
