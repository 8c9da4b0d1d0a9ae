//! In-memory implementation of [`Store`].
//!
//! Keeps everything in plain collections behind one async mutex, so every
//! trait call is atomic just like a single SQL statement. Used by the test
//! suites and for `SMART_CART_STORE=memory` development runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard};

use smart_cart_core::{CashierCode, CodeHistoryId, CustomerId, Mobile, ProductId, PurchaseId};

use super::{Store, StoreError};
use crate::models::{
    CashIntent, CashierCodeRecord, Customer, NewCustomer, NewProduct, NewPurchase, Product,
    Purchase,
};

#[derive(Debug, Default)]
struct Collections {
    intents: HashMap<Mobile, CashIntent>,
    history: Vec<CashierCodeRecord>,
    products: Vec<Product>,
    customers: Vec<Customer>,
    purchases: Vec<Purchase>,
    last_id: i64,
}

impl Collections {
    const fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

/// Store that lives entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<Collections>,
    offline: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the database were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    async fn collections(&self) -> Result<MutexGuard<'_, Collections>, StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.collections.lock().await)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.collections().await.map(|_| ())
    }

    async fn upsert_cash_intent(&self, intent: &CashIntent) -> Result<(), StoreError> {
        let mut c = self.collections().await?;
        c.intents.insert(intent.mobile.clone(), intent.clone());
        Ok(())
    }

    async fn find_cash_intent(
        &self,
        mobile: &Mobile,
        code: &CashierCode,
    ) -> Result<Option<CashIntent>, StoreError> {
        let c = self.collections().await?;
        Ok(c.intents
            .get(mobile)
            .filter(|intent| &intent.code == code)
            .cloned())
    }

    async fn find_cash_intent_by_mobile(
        &self,
        mobile: &Mobile,
    ) -> Result<Option<CashIntent>, StoreError> {
        let c = self.collections().await?;
        Ok(c.intents.get(mobile).cloned())
    }

    async fn delete_cash_intent(&self, mobile: &Mobile) -> Result<bool, StoreError> {
        let mut c = self.collections().await?;
        Ok(c.intents.remove(mobile).is_some())
    }

    async fn delete_cash_intent_with_code(
        &self,
        mobile: &Mobile,
        code: &CashierCode,
    ) -> Result<bool, StoreError> {
        let mut c = self.collections().await?;
        if c.intents.get(mobile).is_some_and(|intent| &intent.code == code) {
            c.intents.remove(mobile);
            return Ok(true);
        }
        Ok(false)
    }

    async fn list_cash_intents(&self) -> Result<Vec<CashIntent>, StoreError> {
        let c = self.collections().await?;
        let mut intents: Vec<_> = c.intents.values().cloned().collect();
        intents.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.mobile.cmp(&b.mobile))
        });
        Ok(intents)
    }

    async fn delete_expired_cash_intents(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut c = self.collections().await?;
        let before = c.intents.len();
        c.intents.retain(|_, intent| intent.expires_at >= now);
        Ok(u64::try_from(before - c.intents.len()).unwrap_or(u64::MAX))
    }

    async fn insert_code_history(
        &self,
        mobile: &Mobile,
        code: &CashierCode,
        created_at: DateTime<Utc>,
    ) -> Result<CashierCodeRecord, StoreError> {
        let mut c = self.collections().await?;
        let record = CashierCodeRecord {
            id: CodeHistoryId::new(c.next_id()),
            mobile: mobile.clone(),
            code: code.clone(),
            verified: false,
            verified_at: None,
            created_at,
        };
        c.history.push(record.clone());
        Ok(record)
    }

    async fn mark_code_verified(
        &self,
        mobile: &Mobile,
        code: &CashierCode,
        verified_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut c = self.collections().await?;
        let newest = c
            .history
            .iter_mut()
            .filter(|r| !r.verified && &r.mobile == mobile && &r.code == code)
            .max_by_key(|r| (r.created_at, r.id));

        let Some(record) = newest else {
            return Ok(false);
        };
        record.verified = true;
        record.verified_at = Some(verified_at);
        Ok(true)
    }

    async fn list_code_history(&self) -> Result<Vec<CashierCodeRecord>, StoreError> {
        let c = self.collections().await?;
        let mut records = c.history.clone();
        records.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(records)
    }

    async fn create_product(
        &self,
        product: &NewProduct,
        created_at: DateTime<Utc>,
    ) -> Result<Product, StoreError> {
        let mut c = self.collections().await?;
        if c.products.iter().any(|p| p.barcode == product.barcode) {
            return Err(StoreError::Conflict("barcode already exists".to_owned()));
        }
        let product = Product {
            id: ProductId::new(c.next_id()),
            barcode: product.barcode.clone(),
            name: product.name.clone(),
            price: product.price,
            category: product.category.clone(),
            stock: product.stock,
            created_at,
        };
        c.products.push(product.clone());
        Ok(product)
    }

    async fn find_product_by_barcode(&self, barcode: &str) -> Result<Option<Product>, StoreError> {
        let c = self.collections().await?;
        Ok(c.products.iter().find(|p| p.barcode == barcode).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let c = self.collections().await?;
        let mut products = c.products.clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn upsert_customer(
        &self,
        customer: &NewCustomer,
        now: DateTime<Utc>,
    ) -> Result<Customer, StoreError> {
        let mut c = self.collections().await?;
        if let Some(existing) = c.customers.iter_mut().find(|x| x.mobile == customer.mobile) {
            existing.name.clone_from(&customer.name);
            if customer.email.is_some() {
                existing.email.clone_from(&customer.email);
            }
            return Ok(existing.clone());
        }
        let created = Customer {
            id: CustomerId::new(c.next_id()),
            name: customer.name.clone(),
            mobile: customer.mobile.clone(),
            email: customer.email.clone(),
            created_at: now,
        };
        c.customers.push(created.clone());
        Ok(created)
    }

    async fn find_customer_by_mobile(
        &self,
        mobile: &Mobile,
    ) -> Result<Option<Customer>, StoreError> {
        let c = self.collections().await?;
        Ok(c.customers.iter().find(|x| &x.mobile == mobile).cloned())
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError> {
        let c = self.collections().await?;
        let mut customers = c.customers.clone();
        customers.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(customers)
    }

    async fn create_purchase(
        &self,
        purchase: &NewPurchase,
        created_at: DateTime<Utc>,
    ) -> Result<Purchase, StoreError> {
        let mut c = self.collections().await?;
        let created = Purchase {
            id: PurchaseId::new(c.next_id()),
            customer_name: purchase.customer_name.clone(),
            mobile: purchase.mobile.clone(),
            items: purchase.items.clone(),
            total: purchase.total(),
            payment_method: purchase.payment_method,
            cashier_code: purchase.cashier_code.clone(),
            created_at,
        };
        c.purchases.push(created.clone());
        Ok(created)
    }

    async fn list_purchases(&self, mobile: Option<&Mobile>) -> Result<Vec<Purchase>, StoreError> {
        let c = self.collections().await?;
        let mut purchases: Vec<_> = c
            .purchases
            .iter()
            .filter(|p| mobile.is_none_or(|m| &p.mobile == m))
            .cloned()
            .collect();
        purchases.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(purchases)
    }
}
