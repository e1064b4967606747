//! # Persistence Error Types
//!
//! The single error type surfaced by the product and cart stores.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError (core)        sqlx::Error / MigrateError              │
//! │       │                               │                                 │
//! │       └───────────────┬───────────────┘                                 │
//! │                       ▼                                                 │
//! │  PersistenceError (this module) ← categorized, passed up unchanged     │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │  Caller (service / controller layer)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No variant is retried inside this crate.

use shoppingcart_core::ValidationError;
use thiserror::Error;

/// Persistence operation errors.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - Deleting a missing cart row in strict delete mode
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Reference to a row that does not exist.
    ///
    /// ## When This Occurs
    /// - Adding a cart row for a missing product with reference checks on
    /// - A FOREIGN KEY constraint reported by SQLite
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Request rejected before reaching the database.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created or opened
    /// - Pool already closed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed (including CHECK and NOT NULL constraints).
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (no connection within the acquire timeout).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Store configuration could not be loaded or is inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl PersistenceError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        PersistenceError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Returns true for the NotFound variant.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistenceError::NotFound { .. })
    }
}

/// Convert sqlx errors to PersistenceError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → PersistenceError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → PersistenceError::PoolExhausted
/// sqlx::Error::PoolClosed     → PersistenceError::ConnectionFailed
/// Other                       → PersistenceError::Internal
/// ```
impl From<sqlx::Error> for PersistenceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => PersistenceError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: <table>.<column>"
                // "FOREIGN KEY constraint failed"
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    PersistenceError::UniqueViolation {
                        field: field.to_string(),
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    PersistenceError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    PersistenceError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => PersistenceError::PoolExhausted,

            sqlx::Error::PoolClosed => {
                PersistenceError::ConnectionFailed("Pool is closed".to_string())
            }

            _ => PersistenceError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for PersistenceError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        PersistenceError::MigrationFailed(err.to_string())
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        PersistenceError::InvalidConfig(err.to_string())
    }
}

impl From<toml::de::Error> for PersistenceError {
    fn from(err: toml::de::Error) -> Self {
        PersistenceError::InvalidConfig(err.to_string())
    }
}

/// Result type for persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;
