//! # Error Types
//!
//! Validation errors raised before anything reaches the database.
//!
//! ```text
//! ValidationError (this crate) → PersistenceError::InvalidInput (shoppingcart-db)
//! ```

use thiserror::Error;

/// Input validation errors.
///
/// Produced by [`crate::validation`] when a request does not meet the
/// field rules. The database layer wraps these so callers only ever see one
/// error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative, got {value}")]
    Negative { field: String, value: i64 },
}
