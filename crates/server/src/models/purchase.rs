//! Finalized purchases.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use smart_cart_core::{CashierCode, Mobile, PaymentMethod, Price, PriceError, PurchaseId};

/// One line of a purchase, as scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub barcode: String,
    pub name: String,
    /// Unit price at the time of purchase.
    pub price: Price,
    pub quantity: u32,
}

impl PurchaseItem {
    /// Unit price times quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::TooLarge`] if the line total is out of range.
    pub fn line_total(&self) -> Result<Price, PriceError> {
        self.price.checked_times(self.quantity)
    }
}

/// A finalized purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: PurchaseId,
    pub customer_name: String,
    pub mobile: Mobile,
    pub items: Vec<PurchaseItem>,
    pub total: Price,
    pub payment_method: PaymentMethod,
    /// The code the cashier verified, for cash purchases.
    pub cashier_code: Option<CashierCode>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for recording a purchase, with its total already
/// computed.
#[derive(Debug, Clone)]
pub struct NewPurchase {
    pub customer_name: String,
    pub mobile: Mobile,
    pub items: Vec<PurchaseItem>,
    pub payment_method: PaymentMethod,
    pub cashier_code: Option<CashierCode>,
    total: Price,
}

impl NewPurchase {
    /// Build a purchase, summing its line totals.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::TooLarge`] if a line total or the purchase total
    /// is out of range.
    pub fn new(
        customer_name: String,
        mobile: Mobile,
        items: Vec<PurchaseItem>,
        payment_method: PaymentMethod,
        cashier_code: Option<CashierCode>,
    ) -> Result<Self, PriceError> {
        let line_totals = items
            .iter()
            .map(PurchaseItem::line_total)
            .collect::<Result<Vec<_>, _>>()?;
        let total = Price::checked_sum(line_totals)?;

        Ok(Self {
            customer_name,
            mobile,
            items,
            payment_method,
            cashier_code,
            total,
        })
    }

    /// Sum of all line totals.
    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;

    fn item(price: &str, quantity: u32) -> PurchaseItem {
        PurchaseItem {
            barcode: "8901234567890".to_owned(),
            name: "Milk".to_owned(),
            price: Price::new(Decimal::from_str(price).unwrap()).unwrap(),
            quantity,
        }
    }

    fn purchase(items: Vec<PurchaseItem>) -> Result<NewPurchase, PriceError> {
        NewPurchase::new(
            "Alice".to_owned(),
            Mobile::parse("9990001111").unwrap(),
            items,
            PaymentMethod::Card,
            None,
        )
    }

    #[test]
    fn test_total_sums_line_totals() {
        let purchase = purchase(vec![item("30.50", 2), item("12.00", 1)]).unwrap();
        assert_eq!(purchase.total().amount(), Decimal::from_str("73.00").unwrap());
    }

    #[test]
    fn test_line_total_out_of_range() {
        assert_eq!(
            purchase(vec![item("9999999999.99", 2)]).err(),
            Some(PriceError::TooLarge)
        );
    }

    #[test]
    fn test_total_out_of_range() {
        assert_eq!(
            purchase(vec![item("6000000000.00", 1), item("6000000000.00", 1)]).err(),
            Some(PriceError::TooLarge)
        );
    }

    #[test]
    fn test_item_accepts_numeric_price() {
        let parsed: PurchaseItem = serde_json::from_str(
            r#"{"barcode":"1","name":"Bread","price":40,"quantity":3}"#,
        )
        .unwrap();
        assert_eq!(parsed.line_total().unwrap().amount(), Decimal::from(120));
    }
}
