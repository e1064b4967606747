//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  StoreConfig::load() / DbConfig::new(path)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.products() / db.carts() ← cheap handles sharing the pool           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every store call is one round trip on a pooled connection. The stores
//! hold no state of their own between calls.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{CartSettings, DeleteMode, StoreConfig};
use crate::error::{PersistenceError, PersistenceResult};
use crate::migrations;
use crate::repository::cart::CartRepository;
use crate::repository::product::ProductRepository;

const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("./data/shoppingcart.db")
///     .max_connections(5)
///     .delete_mode(DeleteMode::Strict);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection acquire timeout.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,

    /// Behaviour switches handed to every cart store.
    pub cart: CartSettings,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
            cart: CartSettings::default(),
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Sets how deleting a missing cart row is reported.
    pub fn delete_mode(mut self, mode: DeleteMode) -> Self {
        self.cart.delete_mode = mode;
        self
    }

    /// Sets whether cart rows must reference an existing product.
    pub fn enforce_product_reference(mut self, enforce: bool) -> Self {
        self.cart.enforce_product_reference = enforce;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// Each call yields a separate, empty database.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
            cart: CartSettings::default(),
        }
    }

    /// Returns true when this configuration targets an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(IN_MEMORY_PATH)
    }

    /// Checks the pool bounds before any connection is attempted.
    pub fn validate(&self) -> PersistenceResult<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(PersistenceError::InvalidConfig(
                "database path must not be empty".into(),
            ));
        }

        if self.max_connections == 0 {
            return Err(PersistenceError::InvalidConfig(
                "max_connections must be greater than 0".into(),
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(PersistenceError::InvalidConfig(format!(
                "min_connections ({}) exceeds max_connections ({})",
                self.min_connections, self.max_connections
            )));
        }

        Ok(())
    }

    fn connect_options(&self) -> PersistenceResult<SqliteConnectOptions> {
        if self.is_in_memory() {
            // A fresh named in-memory database per parse; WAL does not apply.
            let options = SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| PersistenceError::ConnectionFailed(e.to_string()))?;
            return Ok(options.foreign_keys(true));
        }

        // Passed as a filename, not a URL: `?` and `%XX` stay literal
        let options = SqliteConnectOptions::new()
            .filename(&self.database_path)
            // Readers don't block writers, writers don't block readers
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // SQLite has them disabled by default for backwards compatibility
            .foreign_keys(true)
            .create_if_missing(true);

        Ok(options)
    }
}

impl From<&StoreConfig> for DbConfig {
    fn from(config: &StoreConfig) -> Self {
        let db = &config.database;
        DbConfig {
            database_path: db.path.clone(),
            max_connections: db.max_connections,
            min_connections: db.min_connections,
            connect_timeout: Duration::from_secs(db.connect_timeout_secs),
            idle_timeout: Duration::from_secs(db.idle_timeout_secs),
            run_migrations: db.run_migrations,
            cart: config.cart,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing store access.
///
/// Cloning is cheap: clones share the same pool.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./shoppingcart.db")).await?;
///
/// let banana = db.products().save(&NewProduct::new("banana", 1_000, "woowa1.com")).await?;
/// let cart_id = db.carts().add_cart_item(CustomerId::new(1), banana).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    cart: CartSettings,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite: WAL mode, NORMAL synchronous, foreign keys on
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: DbConfig) -> PersistenceResult<Self> {
        config.validate()?;

        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_options = config.connect_options()?;

        debug!("Connection options configured");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout);

        // Dropping the last connection to an in-memory database discards it
        pool_options = if config.is_in_memory() {
            pool_options
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            pool_options.idle_timeout(Some(config.idle_timeout))
        };

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| PersistenceError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            delete_mode = %config.cart.delete_mode,
            enforce_product_reference = config.cart.enforce_product_reference,
            "Database pool created"
        );

        let db = Database {
            pool,
            cart: config.cart,
        };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Opens the database described by a loaded [`StoreConfig`].
    pub async fn from_config(config: &StoreConfig) -> PersistenceResult<Self> {
        config.validate()?;
        Self::new(DbConfig::from(config)).await
    }

    /// Runs database migrations.
    ///
    /// Called by `new()` when `run_migrations` is set; call it by hand
    /// otherwise.
    pub async fn run_migrations(&self) -> PersistenceResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the cart settings this database was opened with.
    pub fn cart_settings(&self) -> CartSettings {
        self.cart
    }

    /// Returns the product store.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Returns the cart store, configured from this database's settings.
    pub fn carts(&self) -> CartRepository {
        CartRepository::with_settings(self.pool.clone(), self.cart)
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all store operations fail with
    /// `PersistenceError::ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use shoppingcart_core::NewProduct;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_in_memory_databases_are_isolated() {
        let first = Database::new(DbConfig::in_memory()).await.unwrap();
        let second = Database::new(DbConfig::in_memory()).await.unwrap();

        first
            .products()
            .save(&NewProduct::new("banana", 1_000, "woowa1.com"))
            .await
            .unwrap();

        assert_eq!(first.products().count().await.unwrap(), 1);
        assert_eq!(second.products().count().await.unwrap(), 0);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .delete_mode(DeleteMode::Strict)
            .enforce_product_reference(true);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.cart.delete_mode, DeleteMode::Strict);
        assert!(config.cart.enforce_product_reference);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }

    #[test]
    fn test_config_from_store_config() {
        let mut store = StoreConfig::default();
        store.database.path = PathBuf::from("cart.db");
        store.database.connect_timeout_secs = 7;
        store.cart.delete_mode = DeleteMode::Strict;

        let config = DbConfig::from(&store);
        assert_eq!(config.database_path, PathBuf::from("cart.db"));
        assert_eq!(config.connect_timeout, Duration::from_secs(7));
        assert_eq!(config.cart.delete_mode, DeleteMode::Strict);
    }

    #[tokio::test]
    async fn test_from_config_validates_first() {
        let mut store = StoreConfig::default();
        store.database.max_connections = 0;

        let err = Database::from_config(&store).await.unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_new_rejects_bad_pool_bounds() {
        let err = Database::new(DbConfig::in_memory().max_connections(0))
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidConfig(_)));

        let err = Database::new(DbConfig::in_memory().min_connections(3).max_connections(2))
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidConfig(_)));

        assert!(DbConfig::new("").validate().is_err());
        assert!(DbConfig::new("cart.db").validate().is_ok());
    }

    #[tokio::test]
    async fn test_file_name_is_not_parsed_as_url() {
        let dir = tempfile::tempdir().unwrap();

        for name in ["cart?v2.db", "cart%41.db"] {
            let path = dir.path().join(name);

            let db = Database::new(DbConfig::new(&path)).await.unwrap();
            assert!(db.health_check().await);
            db.close().await;

            assert!(path.exists(), "{} was not created", name);
        }

        // %41 must not have been decoded to "A"
        assert!(!dir.path().join("cartA.db").exists());
    }

    #[tokio::test]
    async fn test_file_database_persists_across_pools() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shoppingcart.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.products()
            .save(&NewProduct::new("banana", 1_000, "woowa1.com"))
            .await
            .unwrap();
        db.close().await;

        let reopened = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(reopened.products().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_closed_pool_reports_connection_failure() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        let err = db.products().count().await.unwrap_err();
        assert!(matches!(err, PersistenceError::ConnectionFailed(_)));
        assert!(!db.health_check().await);
    }
}
