//! # shoppingcart-core: Domain Types for the Shopping Cart
//!
//! Pure types shared by every layer of the shopping cart backend. Nothing in
//! this crate touches a database, a socket or the file system.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Shopping Cart Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        Web controllers / services (outside this workspace)      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ shoppingcart-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐       │   │
//! │  │   │    types     │   │  validation  │   │    error     │       │   │
//! │  │   │  ProductId   │   │  NewProduct  │   │ Validation-  │       │   │
//! │  │   │  CartItem    │   │  rules       │   │ Error        │       │   │
//! │  │   └──────────────┘   └──────────────┘   └──────────────┘       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               shoppingcart-db (Database Layer)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Id newtypes, `Product`, `NewProduct`, `CartItem`
//! - [`validation`] - Input checks applied before a write
//! - [`error`] - Validation error type
//!
//! ## Example Usage
//!
//! ```rust
//! use shoppingcart_core::NewProduct;
//!
//! let banana = NewProduct::new("banana", 1_000, "woowa1.com");
//! assert!(banana.validate().is_ok());
//!
//! let nameless = NewProduct::new("  ", 1_000, "woowa1.com");
//! assert!(nameless.validate().is_err());
//! ```

pub mod error;
pub mod types;
pub mod validation;

pub use error::ValidationError;
pub use types::*;

/// Maximum length of a product name, in characters.
pub const MAX_PRODUCT_NAME_LEN: usize = 255;

/// Maximum length of a product image reference, in characters.
pub const MAX_IMAGE_URL_LEN: usize = 2048;
