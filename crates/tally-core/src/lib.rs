//! # tally-core: Pure Business Logic for Tally POS
//!
//! This crate holds every rule of the point-of-sale and back-office domain
//! as plain functions over owned data. It never sleeps, locks or logs; the
//! `tally-store` crate wraps it with state and simulated latency.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             POS screen / Admin pages (front end)                │   │
//! │  │    Search ──► Cart ──► Submit     Products ──► Sales ──► Stats  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ async facade                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tally-store (Store + repositories)              │   │
//! │  │     catalog store • stock ledger • sale recorder • import       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐  │   │
//! │  │   │  types  │ │  money  │ │  cart   │ │   sale   │ │  rows  │  │   │
//! │  │   │ Product │ │  Money  │ │  Cart   │ │  edits   │ │ import │  │   │
//! │  │   │ Sizes   │ │ parsing │ │  lines  │ │ records  │ │ export │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘  │   │
//! │  │            analytics • inventory summary • validation           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, SubmittedSale, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`sizes`] - Per-size stock lists and the sizes JSON format
//! - [`cart`] - Cart lines and their clamping rules
//! - [`sale`] - Sale record snapshots and the admin edit rules
//! - [`analytics`] - Sales analytics over a date range
//! - [`inventory`] - Inventory overview counters
//! - [`rows`] - Product rows for spreadsheet import/export
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::money::Money;
//!
//! let price = Money::parse_decimal("10.00").unwrap();
//! let line = price.multiply_quantity(2) - Money::parse_decimal("1").unwrap();
//!
//! assert_eq!(line.cents(), 1900);
//! assert_eq!(line.to_decimal_string(), "19.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod cart;
pub mod error;
pub mod inventory;
pub mod money;
pub mod rows;
pub mod sale;
pub mod sizes;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Id of the fallback category that absorbs products of deleted categories.
pub const UNCATEGORIZED_ID: &str = "cat_uncategorized";

/// Display name of the fallback category.
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";

/// Id of the fallback manufacturer that absorbs products of deleted manufacturers.
pub const UNKNOWN_MANUFACTURER_ID: &str = "man_unknown";

/// Display name of the fallback manufacturer.
pub const UNKNOWN_MANUFACTURER_NAME: &str = "Unknown Manufacturer";

/// Size name used when a product is created from a bare stock count.
pub const DEFAULT_SIZE_NAME: &str = "One Size";

/// Maximum lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and keeps a receipt printable.
pub const MAX_CART_ITEMS: usize = 100;

/// Total stock at or below which a product counts as "low stock".
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Number of entries in the analytics "top products" rankings.
pub const TOP_PRODUCTS_LIMIT: usize = 5;
