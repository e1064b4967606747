//! # Validation Module
//!
//! Field rules checked before a product request is written.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: THIS MODULE                                                   │
//! │  ├── Blank and length checks on text fields                            │
//! │  └── Sign check on price                                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK (price >= 0)                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shoppingcart_core::validation::{validate_price, validate_product_name};
//!
//! assert!(validate_product_name("banana").is_ok());
//! assert!(validate_price(-1).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::NewProduct;
use crate::{MAX_IMAGE_URL_LEN, MAX_PRODUCT_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be blank
/// - At most [`MAX_PRODUCT_NAME_LEN`] characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, MAX_PRODUCT_NAME_LEN)
}

/// Validates a product image reference.
pub fn validate_image_url(image_url: &str) -> ValidationResult<()> {
    validate_text("image_url", image_url, MAX_IMAGE_URL_LEN)
}

/// Validates a price in minor currency units. Zero is allowed.
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price < 0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
            value: price,
        });
    }

    Ok(())
}

impl NewProduct {
    /// Checks every field, reporting the first violation found.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_product_name(&self.name)?;
        validate_price(self.price)?;
        validate_image_url(&self.image_url)?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
