//! Periodic removal of expired cash intents.
//!
//! Expiry is otherwise only noticed when someone tries to verify the code,
//! so intents nobody comes back for stay in the store. The sweeper is off
//! unless `CASH_INTENT_SWEEP_INTERVAL_SECS` is set.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::CashierVerification;

/// Spawn a background task that sweeps expired intents every `every`.
#[must_use]
pub fn spawn_sweeper(verification: CashierVerification, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match verification.sweep_expired().await {
                Ok(0) => tracing::debug!("Cash intent sweep found nothing to remove"),
                Ok(removed) => tracing::info!(removed, "Swept expired cash intents"),
                Err(e) => tracing::warn!(error = %e, "Cash intent sweep failed"),
            }
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use smart_cart_core::Mobile;

    use super::*;
    use crate::db::{MemoryStore, Store};
    use crate::services::{ManualClock, SequenceCodeGenerator};

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_reaps_expired_intents() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
        ));
        let verification = CashierVerification::new(
            store.clone(),
            clock.clone(),
            Arc::new(SequenceCodeGenerator::new(["482913"])),
        );
        let mobile = Mobile::parse("9990001111").unwrap();
        verification
            .request_intent("Alice".into(), mobile.clone())
            .await
            .unwrap();
        clock.advance(chrono::Duration::minutes(20));

        let handle = spawn_sweeper(verification, Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(store.find_cash_intent_by_mobile(&mobile).await.unwrap().is_none());
        handle.abort();
    }
}
