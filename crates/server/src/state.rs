//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::Store;
use crate::services::{CashierVerification, Clock, CodeGenerator};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The store, clock and code
/// generator are injected so tests can swap in in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    verification: CashierVerification,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
        codes: Arc<dyn CodeGenerator>,
    ) -> Self {
        let verification = CashierVerification::new(store.clone(), clock.clone(), codes);

        Self {
            inner: Arc::new(AppStateInner {
                store,
                clock,
                verification,
            }),
        }
    }

    /// Get a reference to the data store.
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }

    /// Get a reference to the clock.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.inner.clock.as_ref()
    }

    /// Get a reference to the cashier-code verification flow.
    #[must_use]
    pub fn verification(&self) -> &CashierVerification {
        &self.inner.verification
    }
}
