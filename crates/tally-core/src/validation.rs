//! # Validation Module
//!
//! Input validation for admin forms, import rows and search.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end                                                    │
//! │  └── Required markers, numeric inputs                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Drafts (title, code, price, image)                                │
//! │  └── Category / manufacturer names                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: tally-store                                                  │
//! │  └── Referenced ids exist, sentinels protected                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{validate_code, validate_name};
//!
//! assert!(validate_code("WM001").is_ok());
//! assert!(validate_name("category name", "  ").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::ProductDraft;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_TITLE_LEN: usize = 200;
const MAX_CODE_LEN: usize = 50;
const MAX_NAME_LEN: usize = 100;
const MAX_QUERY_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product title: non-empty after trimming, at most 200 chars.
pub fn validate_title(title: &str) -> ValidationResult<()> {
    validate_text("title", title, MAX_TITLE_LEN)
}

/// Validates a product code: non-empty after trimming, at most 50 chars.
///
/// Uniqueness is not checked; codes are unique by convention only.
pub fn validate_code(code: &str) -> ValidationResult<()> {
    validate_text("code", code, MAX_CODE_LEN)
}

/// Validates a category or manufacturer name.
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_name;
///
/// assert!(validate_name("manufacturer name", "FitGear").is_ok());
/// assert!(validate_name("manufacturer name", "").is_err());
/// ```
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    validate_text(field, name, MAX_NAME_LEN)
}

/// Validates a search query and returns it trimmed.
///
/// Empty queries are allowed (no text filter).
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price: zero is allowed (free items), negative is not.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a price that must be strictly positive (import rows).
pub fn validate_positive_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates every free-text and numeric field of a product draft.
///
/// Category and manufacturer ids are checked by the store, which knows
/// which rows exist.
pub fn validate_draft(draft: &ProductDraft) -> ValidationResult<()> {
    validate_title(&draft.title)?;
    validate_code(&draft.code)?;
    validate_price(draft.price)?;
    if draft.image.trim().is_empty() {
        return Err(ValidationError::required("image"));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
