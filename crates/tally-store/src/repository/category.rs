//! # Category Repository
//!
//! Categories group products on the POS screen. `Uncategorized` is the
//! fallback every orphaned product lands in.

use super::reference::{Categories, ReferenceRepository};

/// Repository for categories.
///
/// ## Usage
/// ```rust,ignore
/// let categories = store.categories().list().await;
/// let outcome = store.categories().delete("cat2").await?;
/// ```
pub type CategoryRepository = ReferenceRepository<Categories>;
