//! Cash intent maintenance.

use chrono::Utc;
use smart_cart_server::db::{PgStore, Store};

use super::{CommandError, connect};

/// Delete every cash intent whose code has expired.
///
/// With `dry_run`, only counts them.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the delete fails.
pub async fn sweep(dry_run: bool) -> Result<(), CommandError> {
    let store = PgStore::new(connect().await?);
    let now = Utc::now();

    if dry_run {
        let expired = store
            .list_cash_intents()
            .await?
            .iter()
            .filter(|intent| intent.is_expired_at(now))
            .count();
        tracing::info!(expired, "Dry run: no intents deleted");
        return Ok(());
    }

    let removed = store.delete_expired_cash_intents(now).await?;
    tracing::info!(removed, "Expired cash intents deleted");
    Ok(())
}
