//! Saving finalized purchases.

use crate::db::{Store, StoreError};
use crate::models::{NewPurchase, Purchase};
use crate::services::{CashierVerification, Clock};

/// Record a purchase and, for cash payments, clear the customer's pending
/// cash intent.
///
/// The intent is cleared whether or not its code was ever verified.
///
/// # Errors
///
/// Returns `StoreError` if saving the purchase or clearing the intent fails.
/// A failure while clearing leaves the purchase saved.
pub async fn record_purchase(
    store: &dyn Store,
    verification: &CashierVerification,
    clock: &dyn Clock,
    purchase: &NewPurchase,
) -> Result<Purchase, StoreError> {
    let is_cash = purchase.payment_method.is_cash();

    if is_cash
        && purchase.cashier_code.is_none()
        && verification.has_live_intent(&purchase.mobile).await?
    {
        tracing::warn!(
            mobile = %purchase.mobile,
            "Cash purchase saved while an unverified cash intent is pending"
        );
    }

    let saved = store.create_purchase(purchase, clock.now()).await?;

    if is_cash {
        verification.finalize(&saved.mobile).await?;
    }

    tracing::info!(
        purchase_id = %saved.id,
        mobile = %saved.mobile,
        payment_method = %saved.payment_method,
        total = %saved.total,
        "Purchase recorded"
    );
    Ok(saved)
}
