//! Cash intents and the cashier-code audit trail.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use smart_cart_core::{CASH_INTENT_TTL_MINUTES, CashierCode, CodeHistoryId, Mobile};

/// A pending cash payment waiting for a cashier to confirm it.
///
/// Keyed by mobile: requesting a new intent for the same mobile replaces
/// this one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CashIntent {
    /// Customer's mobile number (natural key).
    pub mobile: Mobile,
    /// Customer's name as given at the cart.
    pub name: String,
    /// Code the cashier must enter.
    #[serde(rename = "cashierCode")]
    pub code: CashierCode,
    /// When the intent was (last) requested.
    pub created_at: DateTime<Utc>,
    /// After this instant the code is rejected as expired.
    pub expires_at: DateTime<Utc>,
}

impl CashIntent {
    /// Build an intent requested at `now`, expiring
    /// [`CASH_INTENT_TTL_MINUTES`] later.
    #[must_use]
    pub fn new(name: String, mobile: Mobile, code: CashierCode, now: DateTime<Utc>) -> Self {
        Self {
            mobile,
            name,
            code,
            created_at: now,
            expires_at: now + Duration::minutes(CASH_INTENT_TTL_MINUTES),
        }
    }

    /// Whether the code is no longer accepted at `now`.
    ///
    /// The expiry instant itself is still valid.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// One issued cashier code and whether it was ever verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CashierCodeRecord {
    pub id: CodeHistoryId,
    pub mobile: Mobile,
    #[serde(rename = "cashierCode")]
    pub code: CashierCode,
    pub verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn intent_at(now: DateTime<Utc>) -> CashIntent {
        CashIntent::new(
            "Alice".to_owned(),
            Mobile::parse("9990001111").unwrap(),
            CashierCode::parse("482913").unwrap(),
            now,
        )
    }

    #[test]
    fn test_expiry_is_fifteen_minutes_after_creation() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let intent = intent_at(now);
        assert_eq!(intent.expires_at - intent.created_at, Duration::minutes(15));
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let intent = intent_at(now);
        assert!(!intent.is_expired_at(intent.expires_at));
        assert!(intent.is_expired_at(intent.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_serializes_camel_case() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let json = serde_json::to_value(intent_at(now)).unwrap();
        assert_eq!(json["cashierCode"], "482913");
        assert_eq!(json["mobile"], "9990001111");
        assert!(json.get("expiresAt").is_some());
    }
}
