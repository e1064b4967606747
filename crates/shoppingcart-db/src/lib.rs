//! # shoppingcart-db: Database Layer for the Shopping Cart
//!
//! SQLite persistence for products and cart rows, built on sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     shoppingcart-db (THIS CRATE)                        │
//! │                                                                         │
//! │   ┌───────────────┐    ┌─────────────────┐    ┌────────────────────┐   │
//! │   │   Database    │    │  Repositories   │    │    Migrations      │   │
//! │   │   (pool.rs)   │    │                 │    │    (embedded)      │   │
//! │   │               │    │ ProductRepo     │    │                    │   │
//! │   │ SqlitePool    │◄───│ CartRepo        │    │ 001_initial_schema │   │
//! │   └───────┬───────┘    └─────────────────┘    └────────────────────┘   │
//! │           │                                                             │
//! │   ┌───────┴───────┐                                                     │
//! │   │  StoreConfig  │  file + environment settings                        │
//! │   └───────────────┘                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`config`] - File and environment configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - The persistence error type
//! - [`fixture`] - Reference sample data for the `seed` binary
//! - [`repository`] - Product and cart stores
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shoppingcart_core::{CustomerId, NewProduct};
//! use shoppingcart_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/shoppingcart.db")).await?;
//!
//! let banana = db.products().save(&NewProduct::new("banana", 1_000, "woowa1.com")).await?;
//! let cart_id = db.carts().add_cart_item(CustomerId::new(1), banana).await?;
//! ```

pub mod config;
pub mod error;
pub mod fixture;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use config::{CartSettings, DeleteMode, StoreConfig};
pub use error::{PersistenceError, PersistenceResult};
pub use pool::{Database, DbConfig};

pub use repository::cart::CartRepository;
pub use repository::product::ProductRepository;
