//! # Repository Module
//!
//! The product and cart stores.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Caller                                                                 │
//! │       │  db.carts().find_ids_by_customer_id(customer)                  │
//! │       ▼                                                                 │
//! │  CartRepository / ProductRepository                                    │
//! │       │  one SQL statement per call                                    │
//! │       ▼                                                                 │
//! │  SQLite (product, cart tables)                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`ProductRepository`](product::ProductRepository) - saving and reading products
//! - [`CartRepository`](cart::CartRepository) - adding, listing and deleting cart rows

pub mod cart;
pub mod product;
