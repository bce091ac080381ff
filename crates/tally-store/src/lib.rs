//! # tally-store: In-Memory Store for Tally POS
//!
//! This crate keeps the catalog, the sales history and the stock ledger in
//! memory and exposes them through async repositories that behave like a
//! remote back end (each call waits out a simulated latency first).
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Data Flow                              │
//! │                                                                         │
//! │  POS screen / Admin page                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   tally-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Store      │    │  Repositories │    │   Ledger     │  │   │
//! │  │   │  (store.rs)   │    │ (repository/) │    │ (ledger.rs)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ RwLock        │◄───│ CategoryRepo  │    │ set / adjust │  │   │
//! │  │   │ <Catalog>     │    │ ProductRepo   │───►│ sale decr.   │  │   │
//! │  │   │ StoreConfig   │    │ SaleRepo      │    │ reconcile    │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tally-core (rules: cart, sale edits, sizes, analytics, rows)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - Store handle and catalog
//! - [`repository`] - Category, manufacturer, product and sale repositories
//! - [`config`] - Store configuration (TOML + environment)
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_store::{Store, StoreConfig};
//! use tally_core::{cart::Cart, PaymentMethod};
//!
//! let store = Store::new(StoreConfig::load_or_default(None));
//!
//! let mouse = store.products().get_visible("prod1").await?;
//! let mut cart = Cart::new();
//! cart.add_product(&mouse)?;
//!
//! let sale = store.sales().submit(&cart, PaymentMethod::Cash, None).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
mod ledger;
pub mod repository;
mod seed;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{LatencyKind, StockPolicy, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use store::Store;

// Repository re-exports for convenience
pub use repository::{
    BulkUpdateReport, CategoryRepository, DeleteOutcome, ImportReport, ManufacturerRepository,
    ProductRepository, SaleRepository,
};
