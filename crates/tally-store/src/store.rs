//! # Store Handle
//!
//! The shared in-memory catalog and the entry point to every repository.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      In-Memory Store                                    │
//! │                                                                         │
//! │  Store::new(config)                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │  Arc<Shared>                             │                           │
//! │  │  ├── config: StoreConfig                 │                           │
//! │  │  └── catalog: RwLock<Catalog>            │                           │
//! │  │        ├── categories                    │                           │
//! │  │        ├── manufacturers                 │                           │
//! │  │        ├── products                      │                           │
//! │  │        └── sales (newest first)          │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │  store.products() / .sales() / .categories() ...               │
//! │       ▼                                                                 │
//! │  Repository call                                                       │
//! │  1. sleep(simulated latency)   ← no lock held                          │
//! │  2. take read or write lock                                            │
//! │  3. run the whole operation, release                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation holds the write lock for its full duration, so callers
//! never observe a half-applied sale, deletion or edit.

use std::sync::Arc;
use tally_core::{
    Category, Manufacturer, Product, ProductView, SubmittedSale, UNCATEGORIZED_ID,
    UNCATEGORIZED_NAME, UNKNOWN_MANUFACTURER_ID, UNKNOWN_MANUFACTURER_NAME,
};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

use crate::config::{LatencyKind, StoreConfig};
use crate::error::{StoreError, StoreResult};
use crate::repository::category::CategoryRepository;
use crate::repository::manufacturer::ManufacturerRepository;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;
use crate::seed;

// =============================================================================
// Catalog
// =============================================================================

/// Everything the store knows. Only ever touched under the store lock.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) categories: Vec<Category>,
    pub(crate) manufacturers: Vec<Manufacturer>,
    pub(crate) products: Vec<Product>,
    /// Newest first.
    pub(crate) sales: Vec<SubmittedSale>,
}

impl Catalog {
    /// A catalog holding only the two fallback rows.
    pub(crate) fn with_sentinels() -> Self {
        Catalog {
            categories: vec![Category {
                id: UNCATEGORIZED_ID.to_string(),
                name: UNCATEGORIZED_NAME.to_string(),
            }],
            manufacturers: vec![Manufacturer {
                id: UNKNOWN_MANUFACTURER_ID.to_string(),
                name: UNKNOWN_MANUFACTURER_NAME.to_string(),
            }],
            products: Vec::new(),
            sales: Vec::new(),
        }
    }

    /// Category name for display, falling back to the sentinel name.
    pub(crate) fn category_name(&self, id: &str) -> &str {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
            .unwrap_or(UNCATEGORIZED_NAME)
    }

    /// Manufacturer name for display, falling back to the sentinel name.
    pub(crate) fn manufacturer_name(&self, id: &str) -> &str {
        self.manufacturers
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.name.as_str())
            .unwrap_or(UNKNOWN_MANUFACTURER_NAME)
    }

    pub(crate) fn has_category(&self, id: &str) -> bool {
        self.categories.iter().any(|c| c.id == id)
    }

    pub(crate) fn has_manufacturer(&self, id: &str) -> bool {
        self.manufacturers.iter().any(|m| m.id == id)
    }

    /// Enriches a product with its stock total and resolved names.
    pub(crate) fn view(&self, product: &Product) -> ProductView {
        ProductView::new(
            product.clone(),
            self.category_name(&product.category_id),
            self.manufacturer_name(&product.manufacturer_id),
        )
    }

    /// Every product, enriched, in catalog order.
    pub(crate) fn views(&self) -> Vec<ProductView> {
        self.products.iter().map(|p| self.view(p)).collect()
    }

    pub(crate) fn product(&self, id: &str) -> StoreResult<&Product> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("Product", id))
    }

    pub(crate) fn product_mut(&mut self, id: &str) -> StoreResult<&mut Product> {
        self.products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("Product", id))
    }

    /// Enriched view of a product by id.
    pub(crate) fn view_of(&self, id: &str) -> StoreResult<ProductView> {
        self.product(id).map(|p| self.view(p))
    }

    /// Fails unless both referenced rows exist.
    pub(crate) fn check_references(&self, category_id: &str, manufacturer_id: &str) -> StoreResult<()> {
        if !self.has_category(category_id) {
            return Err(StoreError::not_found("Category", category_id));
        }
        if !self.has_manufacturer(manufacturer_id) {
            return Err(StoreError::not_found("Manufacturer", manufacturer_id));
        }
        Ok(())
    }
}

// =============================================================================
// Store
// =============================================================================

struct Shared {
    config: StoreConfig,
    catalog: RwLock<Catalog>,
}

/// Handle to the in-memory store.
///
/// Cheap to clone; every clone shares the same catalog.
///
/// ## Usage
/// ```rust,no_run
/// use tally_store::{Store, StoreConfig};
///
/// # async fn demo() -> tally_store::StoreResult<()> {
/// let store = Store::new(StoreConfig::instant());
/// let products = store.products().search("mouse", None).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Arc<Shared>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("config", &self.inner.config).finish_non_exhaustive()
    }
}

impl Store {
    /// Creates a store. The demo catalog is loaded when `config.seed.enabled`.
    pub fn new(config: StoreConfig) -> Self {
        let catalog = if config.seed.enabled {
            seed::catalog()
        } else {
            Catalog::with_sentinels()
        };

        info!(
            products = catalog.products.len(),
            categories = catalog.categories.len(),
            manufacturers = catalog.manufacturers.len(),
            latency_ms = config.latency.base_ms,
            policy = %config.stock.policy,
            "Store initialized"
        );

        Store {
            inner: Arc::new(Shared {
                config,
                catalog: RwLock::new(catalog),
            }),
        }
    }

    /// Seeded store with the default configuration.
    pub fn seeded() -> Self {
        Self::new(StoreConfig::default())
    }

    /// Store with only the fallback rows and no latency.
    pub fn empty() -> Self {
        Self::new(StoreConfig::instant().with_seed(false))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Returns the category repository.
    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.clone())
    }

    /// Returns the manufacturer repository.
    pub fn manufacturers(&self) -> ManufacturerRepository {
        ManufacturerRepository::new(self.clone())
    }

    /// Returns the product repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let products = store.products().search("mouse", None).await?;
    /// ```
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.clone())
    }

    /// Returns the sale repository.
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.clone())
    }

    // =========================================================================
    // Lock Access
    // =========================================================================

    /// Waits out the simulated latency, then takes the read lock.
    pub(crate) async fn read(&self, kind: LatencyKind) -> RwLockReadGuard<'_, Catalog> {
        self.simulate(kind).await;
        self.inner.catalog.read().await
    }

    /// Waits out the simulated latency, then takes the write lock.
    pub(crate) async fn write(&self, kind: LatencyKind) -> RwLockWriteGuard<'_, Catalog> {
        self.simulate(kind).await;
        self.inner.catalog.write().await
    }

    async fn simulate(&self, kind: LatencyKind) {
        let delay = self.inner.config.delay(kind);
        if !delay.is_zero() {
            debug!(?kind, ?delay, "Simulating latency");
            tokio::time::sleep(delay).await;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
