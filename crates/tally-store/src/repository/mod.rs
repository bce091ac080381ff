//! # Repository Module
//!
//! Query and mutation facade over the in-memory catalog.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Facade                                    │
//! │                                                                         │
//! │  Front end / tool                                                      │
//! │       │                                                                 │
//! │       │  store.products().search("mouse", None)                        │
//! │       ▼                                                                 │
//! │  ProductRepository (holds a Store clone)                               │
//! │  ├── search / get_visible          (POS)                               │
//! │  ├── list_all / add / update ...   (admin)                             │
//! │  └── set_size_stock / adjust_stock (stock ledger)                      │
//! │       │                                                                 │
//! │       │  latency, then RwLock<Catalog>                                  │
//! │       ▼                                                                 │
//! │  Catalog                                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`] - Category CRUD with reassignment on delete
//! - [`ManufacturerRepository`] - Manufacturer CRUD with reassignment on delete
//! - [`ProductRepository`] - POS search, admin CRUD, stock, import/export
//! - [`SaleRepository`] - Sale submission, history, edits, analytics

use serde::{Deserialize, Serialize};

pub mod category;
pub mod import;
pub mod manufacturer;
pub mod product;
pub mod reference;
pub mod sale;

pub use category::CategoryRepository;
pub use import::ImportReport;
pub use manufacturer::ManufacturerRepository;
pub use product::{BulkUpdateReport, ProductRepository};
pub use reference::{ReferenceKind, ReferenceRepository};
pub use sale::SaleRepository;

/// Result of deleting a category or manufacturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    /// False when no row had that id.
    pub removed: bool,

    /// Products moved to the fallback row.
    pub reassigned: usize,

    pub message: String,
}
