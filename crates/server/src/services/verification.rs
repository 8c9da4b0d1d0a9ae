//! Cash-intent and cashier-code verification flow.
//!
//! A customer who wants to pay cash requests an intent; the backend issues a
//! short code valid for 15 minutes. The cashier types the code back in and
//! it is consumed exactly once.
//!
//! ```text
//!   request_intent ──► [pending] ──verify (in time)──► deleted, history verified
//!                          │
//!                          ├─verify (late)──────────► deleted, rejected as expired
//!                          ├─cash purchase saved────► deleted (finalize)
//!                          └─request again─────────► replaced with a new code
//! ```
//!
//! Each step is a separate store call; nothing is transactional across them.

use std::sync::Arc;

use smart_cart_core::{CashierCode, Mobile};

use super::clock::Clock;
use super::codes::CodeGenerator;
use crate::db::{Store, StoreError};
use crate::models::{CashIntent, CashierCodeRecord};

/// Result of checking a cashier code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Code matched a live intent, which is now consumed.
    Verified,
    /// No intent for this mobile carries this code.
    Invalid,
    /// The code matched but its intent had expired; the intent is removed.
    Expired,
}

/// Issues and consumes cashier codes.
///
/// Cheap to clone; all collaborators are shared.
#[derive(Debug, Clone)]
pub struct CashierVerification {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    codes: Arc<dyn CodeGenerator>,
}

impl CashierVerification {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, codes: Arc<dyn CodeGenerator>) -> Self {
        Self {
            store,
            clock,
            codes,
        }
    }

    /// Issue a fresh code for `mobile`, replacing any pending intent.
    ///
    /// Always appends a history record, even when an unexpired intent for the
    /// same mobile already existed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if either store write fails. If the history
    /// insert fails the intent has already been written.
    pub async fn request_intent(
        &self,
        name: String,
        mobile: Mobile,
    ) -> Result<CashIntent, StoreError> {
        let now = self.clock.now();
        let intent = CashIntent::new(name, mobile, self.codes.generate(), now);

        self.store.upsert_cash_intent(&intent).await?;
        self.store
            .insert_code_history(&intent.mobile, &intent.code, now)
            .await?;

        tracing::info!(
            mobile = %intent.mobile,
            expires_at = %intent.expires_at,
            "Cash intent issued"
        );
        Ok(intent)
    }

    /// Check `code` against the pending intent for `mobile`, consuming it on
    /// success.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if a store call fails. A failure after the intent
    /// was deleted leaves the history record unverified.
    pub async fn verify_code(
        &self,
        mobile: &Mobile,
        code: &CashierCode,
    ) -> Result<VerifyOutcome, StoreError> {
        let Some(intent) = self.store.find_cash_intent(mobile, code).await? else {
            tracing::debug!(mobile = %mobile, "Cashier code rejected: no matching intent");
            return Ok(VerifyOutcome::Invalid);
        };

        let now = self.clock.now();
        if intent.is_expired_at(now) {
            self.store.delete_cash_intent_with_code(mobile, code).await?;
            tracing::info!(
                mobile = %mobile,
                expired_at = %intent.expires_at,
                "Cashier code rejected: intent expired"
            );
            return Ok(VerifyOutcome::Expired);
        }

        // Whoever deletes the intent owns the verification. The code filter
        // keeps a stale code from consuming an intent re-issued meanwhile.
        if !self.store.delete_cash_intent_with_code(mobile, code).await? {
            tracing::debug!(mobile = %mobile, "Cashier code rejected: intent consumed concurrently");
            return Ok(VerifyOutcome::Invalid);
        }

        if !self.store.mark_code_verified(mobile, code, now).await? {
            tracing::warn!(mobile = %mobile, "Verified cash intent had no unverified history record");
        }

        tracing::info!(mobile = %mobile, "Cashier code verified");
        Ok(VerifyOutcome::Verified)
    }

    /// Drop any pending intent for `mobile` because a cash purchase was saved.
    ///
    /// Does not require the code to have been verified first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the delete fails.
    pub async fn finalize(&self, mobile: &Mobile) -> Result<bool, StoreError> {
        let removed = self.store.delete_cash_intent(mobile).await?;
        if removed {
            tracing::debug!(mobile = %mobile, "Cash intent cleared by purchase");
        }
        Ok(removed)
    }

    /// Whether `mobile` has an intent that is still within its validity
    /// window.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the lookup fails.
    pub async fn has_live_intent(&self, mobile: &Mobile) -> Result<bool, StoreError> {
        let now = self.clock.now();
        Ok(self
            .store
            .find_cash_intent_by_mobile(mobile)
            .await?
            .is_some_and(|intent| !intent.is_expired_at(now)))
    }

    /// All pending intents, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn list_intents(&self) -> Result<Vec<CashIntent>, StoreError> {
        self.store.list_cash_intents().await
    }

    /// All issued codes, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn list_history(&self) -> Result<Vec<CashierCodeRecord>, StoreError> {
        self.store.list_code_history().await
    }

    /// Delete every intent whose expiry has passed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the delete fails.
    pub async fn sweep_expired(&self) -> Result<u64, StoreError> {
        self.store.delete_expired_cash_intents(self.clock.now()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{Customer, NewCustomer, NewProduct, NewPurchase, Product, Purchase};
    use crate::services::{ManualClock, SequenceCodeGenerator};

    struct Harness {
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
        flow: CashierVerification,
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap()
    }

    fn harness(codes: &[&str]) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(t0()));
        let flow = CashierVerification::new(
            store.clone(),
            clock.clone(),
            Arc::new(SequenceCodeGenerator::new(codes.iter().copied())),
        );
        Harness { store, clock, flow }
    }

    fn alice() -> Mobile {
        Mobile::parse("9990001111").unwrap()
    }

    fn code(s: &str) -> CashierCode {
        CashierCode::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_request_creates_single_intent_with_fifteen_minute_expiry() {
        let h = harness(&["482913"]);
        let intent = h.flow.request_intent("Alice".into(), alice()).await.unwrap();

        let intents = h.flow.list_intents().await.unwrap();
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0], intent);
        assert_eq!(intent.created_at, t0());
        assert_eq!(intent.expires_at, t0() + Duration::minutes(15));
    }

    #[tokio::test]
    async fn test_verify_then_replay_is_invalid() {
        let h = harness(&["482913"]);
        h.flow.request_intent("Alice".into(), alice()).await.unwrap();

        let first = h.flow.verify_code(&alice(), &code("482913")).await.unwrap();
        assert_eq!(first, VerifyOutcome::Verified);
        assert!(h.flow.list_intents().await.unwrap().is_empty());

        let second = h.flow.verify_code(&alice(), &code("482913")).await.unwrap();
        assert_eq!(second, VerifyOutcome::Invalid);
    }

    #[tokio::test]
    async fn test_verified_history_records_timestamp() {
        let h = harness(&["482913"]);
        h.flow.request_intent("Alice".into(), alice()).await.unwrap();
        h.clock.advance(Duration::minutes(3));
        h.flow.verify_code(&alice(), &code("482913")).await.unwrap();

        let history = h.flow.list_history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].verified);
        assert_eq!(history[0].verified_at, Some(t0() + Duration::minutes(3)));
    }

    #[tokio::test]
    async fn test_wrong_code_leaves_intent_untouched() {
        let h = harness(&["482913"]);
        let intent = h.flow.request_intent("Alice".into(), alice()).await.unwrap();

        let outcome = h.flow.verify_code(&alice(), &code("000000")).await.unwrap();
        assert_eq!(outcome, VerifyOutcome::Invalid);
        assert_eq!(h.flow.list_intents().await.unwrap(), vec![intent]);
    }

    #[tokio::test]
    async fn test_late_verification_expires_and_removes_intent() {
        let h = harness(&["482913"]);
        h.flow.request_intent("Alice".into(), alice()).await.unwrap();
        h.clock.advance(Duration::minutes(16));

        let outcome = h.flow.verify_code(&alice(), &code("482913")).await.unwrap();
        assert_eq!(outcome, VerifyOutcome::Expired);
        assert!(h.flow.list_intents().await.unwrap().is_empty());
        assert!(!h.flow.list_history().await.unwrap()[0].verified);
    }

    #[tokio::test]
    async fn test_verification_at_exact_expiry_succeeds() {
        let h = harness(&["482913"]);
        h.flow.request_intent("Alice".into(), alice()).await.unwrap();
        h.clock.advance(Duration::minutes(15));

        let outcome = h.flow.verify_code(&alice(), &code("482913")).await.unwrap();
        assert_eq!(outcome, VerifyOutcome::Verified);
    }

    #[tokio::test]
    async fn test_re_request_replaces_code_and_accumulates_history() {
        let h = harness(&["111111", "222222"]);
        h.flow.request_intent("Alice".into(), alice()).await.unwrap();
        h.clock.advance(Duration::minutes(1));
        h.flow.request_intent("Alice".into(), alice()).await.unwrap();

        assert_eq!(h.flow.list_history().await.unwrap().len(), 2);
        assert_eq!(
            h.flow.verify_code(&alice(), &code("111111")).await.unwrap(),
            VerifyOutcome::Invalid
        );
        assert_eq!(
            h.flow.verify_code(&alice(), &code("222222")).await.unwrap(),
            VerifyOutcome::Verified
        );
    }

    #[tokio::test]
    async fn test_duplicate_codes_verify_only_most_recent_history_row() {
        let h = harness(&["482913"]);
        h.flow.request_intent("Alice".into(), alice()).await.unwrap();
        h.clock.advance(Duration::minutes(2));
        h.flow.request_intent("Alice".into(), alice()).await.unwrap();

        h.flow.verify_code(&alice(), &code("482913")).await.unwrap();

        let history = h.flow.list_history().await.unwrap();
        assert_eq!(history.len(), 2);
        // Newest first.
        assert!(history[0].verified);
        assert_eq!(history[0].created_at, t0() + Duration::minutes(2));
        assert!(!history[1].verified);
    }

    #[tokio::test]
    async fn test_finalize_clears_intent_without_verification() {
        let h = harness(&["482913"]);
        h.flow.request_intent("Alice".into(), alice()).await.unwrap();

        assert!(h.flow.finalize(&alice()).await.unwrap());
        assert!(!h.flow.finalize(&alice()).await.unwrap());
        assert_eq!(
            h.flow.verify_code(&alice(), &code("482913")).await.unwrap(),
            VerifyOutcome::Invalid
        );
        assert!(!h.flow.list_history().await.unwrap()[0].verified);
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired() {
        let h = harness(&["111111", "222222"]);
        h.flow.request_intent("Alice".into(), alice()).await.unwrap();
        h.clock.advance(Duration::minutes(10));
        let bob = Mobile::parse("8880002222").unwrap();
        h.flow.request_intent("Bob".into(), bob.clone()).await.unwrap();
        h.clock.advance(Duration::minutes(6));

        assert_eq!(h.flow.sweep_expired().await.unwrap(), 1);
        assert!(h.flow.has_live_intent(&bob).await.unwrap());
        assert!(!h.flow.has_live_intent(&alice()).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_failure_surfaces() {
        let h = harness(&["482913"]);
        h.store.set_offline(true);
        assert!(h.flow.request_intent("Alice".into(), alice()).await.is_err());
        assert!(h.flow.verify_code(&alice(), &code("482913")).await.is_err());
    }

    /// Memory store that re-issues the intent with a new code right after
    /// every lookup, as a concurrent request from the cart would.
    #[derive(Debug)]
    struct ReissuingStore {
        inner: MemoryStore,
        reissued: CashIntent,
    }

    #[async_trait::async_trait]
    impl Store for ReissuingStore {
        async fn ping(&self) -> Result<(), StoreError> {
            self.inner.ping().await
        }

        async fn upsert_cash_intent(&self, intent: &CashIntent) -> Result<(), StoreError> {
            self.inner.upsert_cash_intent(intent).await
        }

        async fn find_cash_intent(
            &self,
            mobile: &Mobile,
            code: &CashierCode,
        ) -> Result<Option<CashIntent>, StoreError> {
            let found = self.inner.find_cash_intent(mobile, code).await?;
            self.inner.upsert_cash_intent(&self.reissued).await?;
            Ok(found)
        }

        async fn find_cash_intent_by_mobile(
            &self,
            mobile: &Mobile,
        ) -> Result<Option<CashIntent>, StoreError> {
            self.inner.find_cash_intent_by_mobile(mobile).await
        }

        async fn delete_cash_intent(&self, mobile: &Mobile) -> Result<bool, StoreError> {
            self.inner.delete_cash_intent(mobile).await
        }

        async fn delete_cash_intent_with_code(
            &self,
            mobile: &Mobile,
            code: &CashierCode,
        ) -> Result<bool, StoreError> {
            self.inner.delete_cash_intent_with_code(mobile, code).await
        }

        async fn list_cash_intents(&self) -> Result<Vec<CashIntent>, StoreError> {
            self.inner.list_cash_intents().await
        }

        async fn delete_expired_cash_intents(
            &self,
            now: DateTime<Utc>,
        ) -> Result<u64, StoreError> {
            self.inner.delete_expired_cash_intents(now).await
        }

        async fn insert_code_history(
            &self,
            mobile: &Mobile,
            code: &CashierCode,
            created_at: DateTime<Utc>,
        ) -> Result<CashierCodeRecord, StoreError> {
            self.inner.insert_code_history(mobile, code, created_at).await
        }

        async fn mark_code_verified(
            &self,
            mobile: &Mobile,
            code: &CashierCode,
            verified_at: DateTime<Utc>,
        ) -> Result<bool, StoreError> {
            self.inner.mark_code_verified(mobile, code, verified_at).await
        }

        async fn list_code_history(&self) -> Result<Vec<CashierCodeRecord>, StoreError> {
            self.inner.list_code_history().await
        }

        async fn create_product(
            &self,
            product: &NewProduct,
            created_at: DateTime<Utc>,
        ) -> Result<Product, StoreError> {
            self.inner.create_product(product, created_at).await
        }

        async fn find_product_by_barcode(
            &self,
            barcode: &str,
        ) -> Result<Option<Product>, StoreError> {
            self.inner.find_product_by_barcode(barcode).await
        }

        async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
            self.inner.list_products().await
        }

        async fn upsert_customer(
            &self,
            customer: &NewCustomer,
            now: DateTime<Utc>,
        ) -> Result<Customer, StoreError> {
            self.inner.upsert_customer(customer, now).await
        }

        async fn find_customer_by_mobile(
            &self,
            mobile: &Mobile,
        ) -> Result<Option<Customer>, StoreError> {
            self.inner.find_customer_by_mobile(mobile).await
        }

        async fn list_customers(&self) -> Result<Vec<Customer>, StoreError> {
            self.inner.list_customers().await
        }

        async fn create_purchase(
            &self,
            purchase: &NewPurchase,
            created_at: DateTime<Utc>,
        ) -> Result<Purchase, StoreError> {
            self.inner.create_purchase(purchase, created_at).await
        }

        async fn list_purchases(
            &self,
            mobile: Option<&Mobile>,
        ) -> Result<Vec<Purchase>, StoreError> {
            self.inner.list_purchases(mobile).await
        }
    }

    #[tokio::test]
    async fn test_stale_code_does_not_consume_reissued_intent() {
        let reissued = CashIntent::new(
            "Alice".into(),
            alice(),
            code("222222"),
            t0() + Duration::minutes(1),
        );
        let store = Arc::new(ReissuingStore {
            inner: MemoryStore::new(),
            reissued: reissued.clone(),
        });
        let flow = CashierVerification::new(
            store,
            Arc::new(ManualClock::new(t0())),
            Arc::new(SequenceCodeGenerator::new(["111111"])),
        );
        flow.request_intent("Alice".into(), alice()).await.unwrap();

        let outcome = flow.verify_code(&alice(), &code("111111")).await.unwrap();

        assert_eq!(outcome, VerifyOutcome::Invalid);
        assert_eq!(flow.list_intents().await.unwrap(), vec![reissued]);
        assert!(!flow.list_history().await.unwrap()[0].verified);
    }
}
