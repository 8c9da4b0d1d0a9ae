//! Newtype IDs for type-safe entity references.
//!
//! Every table uses a `BIGSERIAL` primary key; the `define_id!` macro wraps
//! it so a purchase ID can never be passed where a product ID is expected.

/// Define a type-safe `i64` ID wrapper.
///
/// The generated type is `Copy`, serializes as a bare number and, with the
/// `postgres` feature, encodes as `BIGINT`.
///
/// ```rust
/// # use smart_cart_core::define_id;
/// define_id!(ReceiptId);
///
/// let id = ReceiptId::new(7);
/// assert_eq!(id.as_i64(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type), sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw database ID.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// The raw database ID.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(ProductId);
define_id!(CustomerId);
define_id!(PurchaseId);
define_id!(CodeHistoryId);
