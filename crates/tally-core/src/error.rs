//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Cart, sale and stock rule violations           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tally-store errors (separate crate)                                   │
//! │  └── StoreError       - Lookups, sentinel protection, configuration    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → caller banner        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. Each variant carries
/// enough context (title, size, counts) to render a cashier-facing message.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The product has no stock in any size.
    #[error("{title} is out of stock")]
    OutOfStock { title: String },

    /// The line already holds every unit available for its size.
    ///
    /// ## User Workflow
    /// ```text
    /// Click "Wireless Mouse" (stock 1) twice
    ///      │
    ///      ▼
    /// second add finds the line at quantity 1 == stock
    ///      │
    ///      ▼
    /// MaxStockReached { title: "Wireless Mouse", size: "One Size", stock: 1 }
    /// ```
    #[error("Max stock ({stock}) reached for {title} (Size: {size})")]
    MaxStockReached {
        title: String,
        size: String,
        stock: i64,
    },

    /// The requested size does not exist on the product.
    #[error("Size '{size}' not found for product {product_id}")]
    SizeNotFound { product_id: String, size: String },

    /// No cart line with this id.
    #[error("Cart line not found: {0}")]
    LineNotFound(String),

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Submitting a sale without any lines.
    #[error("Cannot submit an empty sale")]
    EmptySale,

    /// An edited sale line asks for more than stock plus what the sale already holds.
    #[error("Line {line}: max quantity is {max} (current stock + original sale qty), got {requested}")]
    EditQuantityTooLarge {
        line: usize,
        max: i64,
        requested: i64,
    },

    /// The edit does not line up with the stored sale.
    #[error("Sale {sale_id} has {expected} lines, edit supplied {actual}")]
    EditShapeMismatch {
        sale_id: String,
        expected: usize,
        actual: usize,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed decimal, invalid sizes JSON).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A change request that changes nothing.
    #[error("{field}: no changes requested")]
    NoChanges { field: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::InvalidFormat`].
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::EditQuantityTooLarge {
            line: 2,
            max: 5,
            requested: 6,
        };
        assert_eq!(
            err.to_string(),
            "Line 2: max quantity is 5 (current stock + original sale qty), got 6"
        );

        let err = CoreError::MaxStockReached {
            title: "Wireless Mouse".to_string(),
            size: "One Size".to_string(),
            stock: 1,
        };
        assert_eq!(
            err.to_string(),
            "Max stock (1) reached for Wireless Mouse (Size: One Size)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("title").to_string(), "title is required");
        assert_eq!(
            ValidationError::invalid_format("price", "not a number").to_string(),
            "price has invalid format: not a number"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("code").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
