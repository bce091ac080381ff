//! # Reference Rows
//!
//! Shared CRUD for the two lookup tables products point at: categories and
//! manufacturers. Each table has a fallback row (the sentinel) that can be
//! neither renamed nor deleted.
//!
//! ## Delete With Reassignment
//! ```text
//! delete("cat2")
//!   ├── cat2 == sentinel?  → SentinelProtected
//!   ├── products with cat2 → cat_uncategorized   ┐ one write lock
//!   └── remove cat2 row                          ┘
//! ```

use std::marker::PhantomData;
use tally_core::validation::validate_name;
use tally_core::{Category, Manufacturer, Product};
use tracing::{debug, info};
use uuid::Uuid;

use super::DeleteOutcome;
use crate::config::LatencyKind;
use crate::error::{StoreError, StoreResult};
use crate::store::{Catalog, Store};

/// Describes one lookup table.
pub trait ReferenceKind {
    type Row: Clone + Send + Sync;

    /// Entity name used in errors, e.g. `"Category"`.
    const ENTITY: &'static str;

    /// Field name used in validation errors.
    const NAME_FIELD: &'static str;

    const SENTINEL_ID: &'static str;

    /// Returned when a delete of the sentinel is attempted.
    const SENTINEL_DELETE_MESSAGE: &'static str;

    /// Returned after a successful delete.
    const DELETED_MESSAGE: &'static str;

    fn rows(catalog: &Catalog) -> &Vec<Self::Row>;
    fn rows_mut(catalog: &mut Catalog) -> &mut Vec<Self::Row>;
    fn id(row: &Self::Row) -> &str;
    fn build(id: String, name: String) -> Self::Row;
    fn rename(row: &mut Self::Row, name: String);

    /// The product field that references this table.
    fn reference_of(product: &mut Product) -> &mut String;
}

/// Repository over one lookup table.
pub struct ReferenceRepository<K> {
    store: Store,
    kind: PhantomData<K>,
}

impl<K> Clone for ReferenceRepository<K> {
    fn clone(&self) -> Self {
        ReferenceRepository {
            store: self.store.clone(),
            kind: PhantomData,
        }
    }
}

impl<K> std::fmt::Debug for ReferenceRepository<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceRepository").finish_non_exhaustive()
    }
}

impl<K: ReferenceKind> ReferenceRepository<K> {
    pub fn new(store: Store) -> Self {
        ReferenceRepository {
            store,
            kind: PhantomData,
        }
    }

    /// Lists every row except the sentinel.
    pub async fn list(&self) -> Vec<K::Row> {
        debug!(entity = K::ENTITY, "Listing rows");
        let catalog = self.store.read(LatencyKind::List).await;
        K::rows(&catalog)
            .iter()
            .filter(|row| K::id(row) != K::SENTINEL_ID)
            .cloned()
            .collect()
    }

    /// Gets a row by id. The sentinel is reachable here.
    pub async fn get(&self, id: &str) -> StoreResult<K::Row> {
        debug!(entity = K::ENTITY, id = %id, "Getting row");
        let catalog = self.store.read(LatencyKind::Standard).await;
        K::rows(&catalog)
            .iter()
            .find(|row| K::id(row) == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(K::ENTITY, id))
    }

    /// Adds a row with a generated id.
    pub async fn add(&self, name: &str) -> StoreResult<K::Row> {
        validate_name(K::NAME_FIELD, name)?;

        let row = K::build(Uuid::new_v4().to_string(), name.trim().to_string());
        let mut catalog = self.store.write(LatencyKind::Standard).await;
        K::rows_mut(&mut catalog).push(row.clone());

        info!(entity = K::ENTITY, id = %K::id(&row), name = %name.trim(), "Row added");
        Ok(row)
    }

    /// Renames a row. Products pick up the new name on their next read.
    pub async fn update(&self, id: &str, name: &str) -> StoreResult<K::Row> {
        validate_name(K::NAME_FIELD, name)?;

        if id == K::SENTINEL_ID {
            return Err(StoreError::SentinelProtected(format!(
                "The default {} row cannot be renamed.",
                K::ENTITY.to_lowercase()
            )));
        }

        let mut catalog = self.store.write(LatencyKind::Standard).await;
        let row = K::rows_mut(&mut catalog)
            .iter_mut()
            .find(|row| K::id(row) == id)
            .ok_or_else(|| StoreError::not_found(K::ENTITY, id))?;
        K::rename(row, name.trim().to_string());

        info!(entity = K::ENTITY, id = %id, name = %name.trim(), "Row renamed");
        Ok(row.clone())
    }

    /// Deletes a row, moving every product that referenced it to the sentinel.
    pub async fn delete(&self, id: &str) -> StoreResult<DeleteOutcome> {
        if id == K::SENTINEL_ID {
            return Err(StoreError::SentinelProtected(K::SENTINEL_DELETE_MESSAGE.to_string()));
        }

        let mut catalog = self.store.write(LatencyKind::Standard).await;

        let mut reassigned = 0;
        for product in catalog.products.iter_mut() {
            let reference = K::reference_of(product);
            if *reference == id {
                *reference = K::SENTINEL_ID.to_string();
                reassigned += 1;
            }
        }

        let rows = K::rows_mut(&mut catalog);
        let before = rows.len();
        rows.retain(|row| K::id(row) != id);
        let removed = rows.len() < before;

        info!(entity = K::ENTITY, id = %id, removed, reassigned, "Row deleted");
        Ok(DeleteOutcome {
            removed,
            reassigned,
            message: K::DELETED_MESSAGE.to_string(),
        })
    }
}

// =============================================================================
// Kinds
// =============================================================================

/// Category table.
#[derive(Debug, Clone, Copy)]
pub struct Categories;

impl ReferenceKind for Categories {
    type Row = Category;

    const ENTITY: &'static str = "Category";
    const NAME_FIELD: &'static str = "category name";
    const SENTINEL_ID: &'static str = tally_core::UNCATEGORIZED_ID;
    const SENTINEL_DELETE_MESSAGE: &'static str = "Cannot delete the default 'Uncategorized' category.";
    const DELETED_MESSAGE: &'static str =
        "Category deleted. Associated products (if any) have been moved to 'Uncategorized'.";

    fn rows(catalog: &Catalog) -> &Vec<Category> {
        &catalog.categories
    }

    fn rows_mut(catalog: &mut Catalog) -> &mut Vec<Category> {
        &mut catalog.categories
    }

    fn id(row: &Category) -> &str {
        &row.id
    }

    fn build(id: String, name: String) -> Category {
        Category { id, name }
    }

    fn rename(row: &mut Category, name: String) {
        row.name = name;
    }

    fn reference_of(product: &mut Product) -> &mut String {
        &mut product.category_id
    }
}

/// Manufacturer table.
#[derive(Debug, Clone, Copy)]
pub struct Manufacturers;

impl ReferenceKind for Manufacturers {
    type Row = Manufacturer;

    const ENTITY: &'static str = "Manufacturer";
    const NAME_FIELD: &'static str = "manufacturer name";
    const SENTINEL_ID: &'static str = tally_core::UNKNOWN_MANUFACTURER_ID;
    const SENTINEL_DELETE_MESSAGE: &'static str = "Cannot delete the default 'Unknown Manufacturer'.";
    const DELETED_MESSAGE: &'static str =
        "Manufacturer deleted. Associated products (if any) have been set to 'Unknown Manufacturer'.";

    fn rows(catalog: &Catalog) -> &Vec<Manufacturer> {
        &catalog.manufacturers
    }

    fn rows_mut(catalog: &mut Catalog) -> &mut Vec<Manufacturer> {
        &mut catalog.manufacturers
    }

    fn id(row: &Manufacturer) -> &str {
        &row.id
    }

    fn build(id: String, name: String) -> Manufacturer {
        Manufacturer { id, name }
    }

    fn rename(row: &mut Manufacturer, name: String) {
        row.name = name;
    }

    fn reference_of(product: &mut Product) -> &mut String {
        &mut product.manufacturer_id
    }
}
