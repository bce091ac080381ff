//! # Product Repository
//!
//! Catalog operations for the POS screen and the admin pages.
//!
//! ## Key Operations
//! - POS search over visible, in-stock products
//! - Admin CRUD, duplicate, bulk update
//! - Per-size stock updates
//!
//! ## POS Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    search("logi", Some("cat1"))                         │
//! │                                                                         │
//! │  all products                                                          │
//! │       │  is_visible                                                     │
//! │       ▼                                                                 │
//! │  category_id == "cat1"   (skipped for None / "All Categories")         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  "logi" in title | code | manufacturer name   (case-insensitive)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  total_stock > 0                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tally_core::inventory::{summarize, InventorySummary};
use tally_core::sizes::resolve_sizes;
use tally_core::validation::{validate_draft, validate_search_query};
use tally_core::{BulkProductChanges, Product, ProductDraft, ProductView, ValidationError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::LatencyKind;
use crate::error::{StoreError, StoreResult};
use crate::store::{Catalog, Store};

/// Category filter value the POS screen sends for "no filter".
pub const ALL_CATEGORIES: &str = "All Categories";

/// Outcome of a bulk update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateReport {
    /// Ids that were changed.
    pub updated: Vec<String>,

    /// Ids with no matching product.
    pub missing: Vec<String>,
}

/// Repository for product operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = store.products();
///
/// // POS search
/// let results = repo.search("mouse", None).await?;
///
/// // Admin stock update
/// let product = repo.set_size_stock("prod2", "M", 12).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pub(crate) store: Store,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(store: Store) -> Self {
        ProductRepository { store }
    }

    // =========================================================================
    // POS
    // =========================================================================

    /// Searches the products a cashier can sell.
    ///
    /// ## Arguments
    /// * `query` - Matched against title, code and manufacturer name; blank matches all
    /// * `category_id` - Restricts to one category; `None` or [`ALL_CATEGORIES`] for all
    ///
    /// A query over the length limit matches nothing.
    pub async fn search(&self, query: &str, category_id: Option<&str>) -> StoreResult<Vec<ProductView>> {
        let Ok(query) = validate_search_query(query) else {
            debug!("Search query too long, no matches");
            return Ok(Vec::new());
        };
        let query = query.to_lowercase();
        let category_id = category_id.filter(|c| !c.is_empty() && *c != ALL_CATEGORIES);

        debug!(query = %query, category = ?category_id, "Searching products");

        let catalog = self.store.read(LatencyKind::Standard).await;
        let products: Vec<ProductView> = catalog
            .products
            .iter()
            .filter(|p| p.is_visible)
            .filter(|p| category_id.map_or(true, |c| p.category_id == c))
            .map(|p| catalog.view(p))
            .filter(|view| {
                query.is_empty()
                    || view.product.title.to_lowercase().contains(&query)
                    || view.product.code.to_lowercase().contains(&query)
                    || view.manufacturer_name.to_lowercase().contains(&query)
            })
            .filter(ProductView::is_in_stock)
            .collect();

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Gets a product the POS may show. Hidden products are not found.
    pub async fn get_visible(&self, id: &str) -> StoreResult<ProductView> {
        debug!(id = %id, "Getting visible product");
        let catalog = self.store.read(LatencyKind::Standard).await;
        catalog
            .products
            .iter()
            .find(|p| p.id == id && p.is_visible)
            .map(|p| catalog.view(p))
            .ok_or_else(|| StoreError::not_found("Product", id))
    }

    // =========================================================================
    // Admin
    // =========================================================================

    /// Every product, hidden ones included.
    pub async fn list_all(&self) -> Vec<ProductView> {
        debug!("Listing all products");
        self.store.read(LatencyKind::List).await.views()
    }

    /// Gets any product by id.
    pub async fn get(&self, id: &str) -> StoreResult<ProductView> {
        debug!(id = %id, "Getting product");
        self.store.read(LatencyKind::Standard).await.view_of(id)
    }

    /// Adds a product from the admin form.
    ///
    /// Sizes JSON that cannot be parsed is logged and stored as no sizes.
    pub async fn add(&self, draft: ProductDraft) -> StoreResult<ProductView> {
        validate_draft(&draft)?;

        let mut catalog = self.store.write(LatencyKind::Standard).await;
        let product = build_product(&catalog, Uuid::new_v4().to_string(), draft)?;
        let view = catalog.view(&product);
        catalog.products.push(product);

        info!(id = %view.id(), code = %view.product.code, total_stock = view.total_stock, "Product added");
        Ok(view)
    }

    /// Replaces every editable field of a product.
    pub async fn update(&self, id: &str, draft: ProductDraft) -> StoreResult<ProductView> {
        validate_draft(&draft)?;

        let mut catalog = self.store.write(LatencyKind::Standard).await;
        catalog.product(id)?;
        let product = build_product(&catalog, id.to_string(), draft)?;
        let view = catalog.view(&product);
        *catalog.product_mut(id)? = product;

        info!(id = %id, code = %view.product.code, "Product updated");
        Ok(view)
    }

    /// Removes a product. Stored sales keep their snapshots.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut catalog = self.store.write(LatencyKind::Standard).await;
        let before = catalog.products.len();
        catalog.products.retain(|p| p.id != id);

        if catalog.products.len() == before {
            return Err(StoreError::not_found("Product", id));
        }

        info!(id = %id, "Product deleted");
        Ok(())
    }

    /// Flips `is_visible`.
    pub async fn toggle_visibility(&self, id: &str) -> StoreResult<ProductView> {
        let mut catalog = self.store.write(LatencyKind::Standard).await;
        let product = catalog.product_mut(id)?;
        product.is_visible = !product.is_visible;
        let is_visible = product.is_visible;

        info!(id = %id, is_visible, "Product visibility toggled");
        catalog.view_of(id)
    }

    /// Copies a product as a hidden draft.
    ///
    /// ## Copy Rules
    /// - new id
    /// - title + ` (Copy)`
    /// - code + `-COPY` + 4 digits (epoch millis mod 10000)
    /// - hidden, sizes copied
    pub async fn duplicate(&self, id: &str) -> StoreResult<ProductView> {
        let mut catalog = self.store.write(LatencyKind::Standard).await;
        let original = catalog.product(id)?;

        let suffix = Utc::now().timestamp_millis().rem_euclid(10_000);
        let copy = Product {
            id: Uuid::new_v4().to_string(),
            title: format!("{} (Copy)", original.title),
            code: format!("{}-COPY{:04}", original.code, suffix),
            is_visible: false,
            ..original.clone()
        };

        let view = catalog.view(&copy);
        catalog.products.push(copy);

        info!(original = %id, copy = %view.id(), code = %view.product.code, "Product duplicated");
        Ok(view)
    }

    /// Applies the same field changes to many products.
    ///
    /// Unknown ids are reported in [`BulkUpdateReport::missing`] and skipped.
    pub async fn bulk_update(&self, ids: &[String], changes: &BulkProductChanges) -> StoreResult<BulkUpdateReport> {
        if changes.is_empty() {
            return Err(ValidationError::NoChanges {
                field: "bulk update".to_string(),
            }
            .into());
        }

        let mut catalog = self.store.write(LatencyKind::Standard).await;

        if let Some(category_id) = &changes.category_id {
            if !catalog.has_category(category_id) {
                return Err(StoreError::not_found("Category", category_id));
            }
        }
        if let Some(manufacturer_id) = &changes.manufacturer_id {
            if !catalog.has_manufacturer(manufacturer_id) {
                return Err(StoreError::not_found("Manufacturer", manufacturer_id));
            }
        }

        let mut report = BulkUpdateReport::default();
        for id in ids {
            match catalog.product_mut(id) {
                Ok(product) => {
                    changes.apply_to(product);
                    report.updated.push(id.clone());
                }
                Err(_) => report.missing.push(id.clone()),
            }
        }

        if !report.missing.is_empty() {
            warn!(missing = ?report.missing, "Bulk update skipped unknown products");
        }
        info!(updated = report.updated.len(), "Bulk update applied");
        Ok(report)
    }

    // =========================================================================
    // Stock
    // =========================================================================

    /// Sets one size's stock. Negative values are stored as 0.
    pub async fn set_size_stock(&self, id: &str, size: &str, new_stock: i64) -> StoreResult<ProductView> {
        debug!(id = %id, size = %size, new_stock, "Setting size stock");
        let mut catalog = self.store.write(LatencyKind::Stock).await;
        let stored = catalog.set_size_stock(id, size, new_stock)?;

        info!(id = %id, size = %size, stock = stored, "Stock set");
        catalog.view_of(id)
    }

    /// Adds `delta` (possibly negative) to one size's stock, flooring at 0.
    pub async fn adjust_stock(&self, id: &str, size: &str, delta: i64) -> StoreResult<ProductView> {
        debug!(id = %id, size = %size, delta, "Adjusting size stock");
        let mut catalog = self.store.write(LatencyKind::Stock).await;
        let stored = catalog.adjust_size_stock(id, size, delta)?;

        info!(id = %id, size = %size, stock = stored, "Stock adjusted");
        catalog.view_of(id)
    }

    /// Removes sold units for a single line, honoring the stock policy.
    pub async fn record_sale_decrement(&self, id: &str, size: &str, quantity: i64) -> StoreResult<ProductView> {
        if quantity <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }

        let policy = self.store.config().stock.policy;
        let mut catalog = self.store.write(LatencyKind::Stock).await;
        let remaining = catalog.decrement_for_sale(id, size, quantity, policy)?;

        debug!(id = %id, size = %size, quantity, remaining, "Sale decrement recorded");
        catalog.view_of(id)
    }

    /// Inventory counters, optionally for products matching `filter`.
    pub async fn inventory_summary(&self, filter: Option<&str>) -> InventorySummary {
        let threshold = self.store.config().stock.low_stock_threshold;
        let views = self.store.read(LatencyKind::List).await.views();
        summarize(&views, filter, threshold)
    }
}

/// Turns a validated draft into a product, checking its references.
pub(crate) fn build_product(catalog: &Catalog, id: String, draft: ProductDraft) -> StoreResult<Product> {
    catalog.check_references(&draft.category_id, &draft.manufacturer_id)?;

    let resolved = resolve_sizes(&draft.sizes);
    if let Some(warning) = &resolved.warning {
        warn!(code = %draft.code, "{}", warning);
    }

    Ok(Product {
        id,
        title: draft.title.trim().to_string(),
        code: draft.code.trim().to_string(),
        price: draft.price,
        image: draft.image.trim().to_string(),
        sizes: resolved.sizes,
        category_id: draft.category_id,
        manufacturer_id: draft.manufacturer_id,
        is_visible: draft.is_visible,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
