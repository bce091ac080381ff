//! # Store Error Types
//!
//! Error types for store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Rule violation (tally_core::CoreError / ValidationError)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds lookups, sentinels, stock policy      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Front end displays the message                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tally_core::{CoreError, ValidationError};
use thiserror::Error;

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found in the catalog.
    ///
    /// ## When This Occurs
    /// - Unknown id
    /// - Hidden product requested through the POS view
    /// - Sale line referencing a deleted product
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Product exists but has no size with this name.
    #[error("Size '{size}' not found for product {product_id}")]
    SizeNotFound { product_id: String, size: String },

    /// Attempt to rename or delete a fallback row.
    #[error("{0}")]
    SentinelProtected(String),

    /// Strict stock policy refused a decrement.
    #[error("Insufficient stock for {code} (Size: {size}): available {available}, requested {requested}")]
    InsufficientStock {
        code: String,
        size: String,
        available: i64,
        requested: i64,
    },

    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Business rule violation from tally-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Config file could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config could not be serialized.
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a SizeNotFound error.
    pub fn size_not_found(product_id: impl Into<String>, size: impl Into<String>) -> Self {
        StoreError::SizeNotFound {
            product_id: product_id.into(),
            size: size.into(),
        }
    }

    /// True for lookups that missed.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. } | StoreError::SizeNotFound { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
