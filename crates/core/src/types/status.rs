//! Status enums for point-of-sale entities.

use serde::{Deserialize, Serialize};

/// How a purchase was paid for.
///
/// Only `Cash` purchases go through the cashier-code flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "payment_method", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
}

impl PaymentMethod {
    /// Whether a cashier has to confirm this payment by hand.
    #[must_use]
    pub const fn is_cash(self) -> bool {
        matches!(self, Self::Cash)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::Card => write!(f, "card"),
            Self::Upi => write!(f, "upi"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "upi" => Ok(Self::Upi),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}
