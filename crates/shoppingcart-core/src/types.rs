//! # Domain Types
//!
//! Records persisted by the shopping cart stores.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐                        │
//! │  │    Product      │        │    CartItem     │                        │
//! │  │  ─────────────  │        │  ─────────────  │                        │
//! │  │  id (generated) │◄───────│  product_id     │                        │
//! │  │  name           │        │  customer_id    │                        │
//! │  │  price          │        │  id (generated) │                        │
//! │  │  image_url      │        └─────────────────┘                        │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ProductId, CartItemId and CustomerId are distinct newtypes over i64   │
//! │  so one kind of id can never be passed where another is expected.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ids are assigned by the database on insert. Nothing in this crate ever
//! mints a new one.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
        #[cfg_attr(feature = "sqlx", sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw database id.
            #[inline]
            pub const fn new(raw: i64) -> Self {
                $name(raw)
            }

            /// Returns the raw database id.
            #[inline]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                $name(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a persisted product.
    ProductId
);

id_type!(
    /// Identifier of a persisted cart row.
    CartItemId
);

id_type!(
    /// Identifier of a customer. Customers live outside this workspace, so
    /// the value is stored as given and never checked.
    CustomerId
);

// =============================================================================
// Product
// =============================================================================

/// A persisted, sellable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Generated on insert.
    pub id: ProductId,

    /// Display name. Not unique.
    pub name: String,

    /// Price in the smallest currency unit.
    pub price: i64,

    /// Reference to the product image (usually a URL).
    pub image_url: String,
}

/// A product that has not been saved yet.
///
/// This is the request shape accepted by the product store. See
/// [`NewProduct::validate`] for the field rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: i64,
    pub image_url: String,
}

impl NewProduct {
    /// Creates a product request.
    pub fn new(name: impl Into<String>, price: i64, image_url: impl Into<String>) -> Self {
        NewProduct {
            name: name.into(),
            price,
            image_url: image_url.into(),
        }
    }

    /// Attaches the id the store generated for this request.
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            image_url: self.image_url,
        }
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A persisted association between a customer and a product in their cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CartItem {
    /// Generated on insert, strictly increasing, never reused.
    pub id: CartItemId,

    pub customer_id: CustomerId,

    pub product_id: ProductId,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_order_by_raw_value() {
        let mut ids = vec![CartItemId::new(3), CartItemId::new(1), CartItemId::new(2)];
        ids.sort();

        assert_eq!(ids, vec![CartItemId::new(1), CartItemId::new(2), CartItemId::new(3)]);
        assert_eq!(i64::from(ids[2]), 3);
    }

    #[test]
    fn test_ids_serialize_as_plain_integers() {
        let item = CartItem {
            id: CartItemId::new(7),
            customer_id: CustomerId::new(1),
            product_id: ProductId::new(2),
        };

        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"id":7,"customer_id":1,"product_id":2}"#);

        let back: CartItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_into_product_keeps_fields() {
        let product = NewProduct::new("apple", 2_000, "woowa2.com").into_product(ProductId::new(2));

        assert_eq!(product.id.get(), 2);
        assert_eq!(product.name, "apple");
        assert_eq!(product.price, 2_000);
        assert_eq!(product.image_url, "woowa2.com");
        assert_eq!(product.id.to_string(), "2");
    }
}
