//! # Product Import / Export
//!
//! Bulk product rows in and out of the catalog.
//!
//! ## Import Flow
//! ```text
//! rows ──► parse_import_row (tally-core) ──► validate_draft
//!            │ Err: "Row N: ..."               │ Err: "Row N: ..."
//!            ▼                                 ▼
//!         errors[]                     code already in catalog?
//!                                        ├── yes → update in place
//!                                        └── no  → add
//! ```
//!
//! A bad row never stops the import; it is reported and skipped. The whole
//! import runs under one write lock.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tally_core::rows::{export_rows, parse_import_row, ImportRow, NameLookup, ProductRow, FIRST_DATA_ROW};
use tally_core::validation::validate_draft;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::product::{build_product, ProductRepository};
use crate::config::LatencyKind;

/// Outcome of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// New products added.
    pub imported: usize,

    /// Existing products (matched by code) overwritten.
    pub updated: usize,

    /// One message per skipped row.
    pub errors: Vec<String>,

    /// Rows imported with a caveat (e.g. no stock information).
    pub warnings: Vec<String>,
}

impl ImportReport {
    /// Rows that made it into the catalog.
    pub fn applied(&self) -> usize {
        self.imported + self.updated
    }
}

impl ProductRepository {
    /// Imports product rows, matching existing products by code
    /// (case-insensitive).
    ///
    /// Row numbers in messages start at 2, as in the sheet.
    pub async fn import_rows(&self, rows: Vec<ImportRow>) -> ImportReport {
        debug!(rows = rows.len(), "Importing product rows");

        let mut catalog = self.store.write(LatencyKind::Standard).await;
        let lookup = NameLookup::new(&catalog.categories, &catalog.manufacturers);
        let mut by_code: HashMap<String, String> = catalog
            .products
            .iter()
            .map(|p| (p.code.trim().to_lowercase(), p.id.clone()))
            .collect();

        let mut report = ImportReport::default();

        for (index, row) in rows.iter().enumerate() {
            let row_number = FIRST_DATA_ROW + index;

            let parsed = match parse_import_row(row, row_number, &lookup) {
                Ok(parsed) => parsed,
                Err(message) => {
                    warn!(row = row_number, "{}", message);
                    report.errors.push(message);
                    continue;
                }
            };

            if let Err(err) = validate_draft(&parsed.draft) {
                let message = format!("Row {}: {}", row_number, err);
                warn!(row = row_number, "{}", message);
                report.errors.push(message);
                continue;
            }

            let code_key = parsed.draft.code.trim().to_lowercase();
            let existing = by_code.get(&code_key).cloned();
            let id = existing.clone().unwrap_or_else(|| Uuid::new_v4().to_string());

            let product = match build_product(&catalog, id.clone(), parsed.draft) {
                Ok(product) => product,
                Err(err) => {
                    report.errors.push(format!("Row {}: {}", row_number, err));
                    continue;
                }
            };

            match existing {
                Some(existing_id) => match catalog.product_mut(&existing_id) {
                    Ok(slot) => {
                        *slot = product;
                        report.updated += 1;
                    }
                    Err(err) => {
                        report.errors.push(format!("Row {}: {}", row_number, err));
                        continue;
                    }
                },
                None => {
                    catalog.products.push(product);
                    by_code.insert(code_key, id);
                    report.imported += 1;
                }
            }

            if let Some(warning) = parsed.warning {
                report.warnings.push(warning);
            }
        }

        info!(
            imported = report.imported,
            updated = report.updated,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "Product import finished"
        );
        report
    }

    /// Every product as an export row, in catalog order.
    pub async fn export_rows(&self) -> Vec<ProductRow> {
        debug!("Exporting product rows");
        let views = self.store.read(LatencyKind::List).await.views();
        export_rows(&views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::store::Store;
    use tally_core::{Money, SizeStock};

    fn row(title: &str, code: &str, price: &str) -> ImportRow {
        ImportRow {
            title: Some(title.to_string()),
            code: Some(code.to_string()),
            category: Some("sports".to_string()),
            manufacturer: Some("FITGEAR".to_string()),
            price: Some(price.to_string()),
            image_url: Some("https://picsum.photos/seed/x/100/100".to_string()),
            sizes_stock_json: Some(r#"[{"size":"M","stock":4}]"#.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_import_skips_incomplete_rows_and_continues() {
        let store = Store::new(StoreConfig::instant());
        let mut incomplete = row("Kettlebell", "KB010", "39.90");
        incomplete.image_url = None;

        let report = store
            .products()
            .import_rows(vec![incomplete, row("Jump Rope", "JR011", "7.50")])
            .await;

        assert_eq!(report.imported, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("Row 2: Missing required fields"));

        let added = store.products().search("jump rope", None).await.unwrap();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].product.price, Money::from_cents(750));
        assert_eq!(added[0].product.category_id, "cat7");
        assert_eq!(added[0].product.manufacturer_id, "man8");
    }

    #[tokio::test]
    async fn test_import_updates_by_code_case_insensitive() {
        let store = Store::new(StoreConfig::instant());
        let mut update = row("Wireless Mouse v2", "wm001", "27.00");
        update.category = Some("Electronics".to_string());

        let report = store.products().import_rows(vec![update]).await;
        assert_eq!(report.updated, 1);
        assert_eq!(report.imported, 0);

        let mouse = store.products().get("prod1").await.unwrap();
        assert_eq!(mouse.product.title, "Wireless Mouse v2");
        assert_eq!(mouse.product.sizes, vec![SizeStock::new("M", 4)]);
        assert_eq!(store.products().list_all().await.len(), 8);
    }

    #[tokio::test]
    async fn test_import_reports_bad_rows() {
        let store = Store::new(StoreConfig::instant());

        let mut unknown_category = row("A", "A1", "1.00");
        unknown_category.category = Some("Garden".to_string());
        let bad_price = row("B", "B1", "-3");
        let mut bad_json = row("C", "C1", "1.00");
        bad_json.sizes_stock_json = Some("[oops".to_string());
        let mut no_stock = row("D", "D1", "1.00");
        no_stock.sizes_stock_json = None;
        let mut total_stock = row("E", "E1", "1.00");
        total_stock.sizes_stock_json = None;
        total_stock.total_stock = Some("12".to_string());

        let report = store
            .products()
            .import_rows(vec![unknown_category, bad_price, bad_json, no_stock, total_stock])
            .await;

        assert_eq!(report.imported, 2);
        assert_eq!(report.errors.len(), 3);
        assert!(report.errors[0].contains("Category \"Garden\" not found"));
        assert!(report.errors[1].starts_with("Row 3: Invalid Price"));
        assert!(report.errors[2].starts_with("Row 4: 'SizesStockJSON'"));
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("Row 5:"));

        let e1 = store.products().search("E1", None).await.unwrap();
        assert_eq!(e1[0].product.sizes, vec![SizeStock::new("One Size", 12)]);
    }

    #[tokio::test]
    async fn test_import_cannot_target_sentinel_rows() {
        let store = Store::new(StoreConfig::instant());
        let mut fallback = row("Mystery Box", "MB012", "5.00");
        fallback.category = Some("Uncategorized".to_string());

        let report = store.products().import_rows(vec![fallback]).await;
        assert_eq!(report.applied(), 0);
        assert!(report.errors[0].contains("Category \"Uncategorized\" not found"));
    }

    #[tokio::test]
    async fn test_duplicate_codes_in_one_import_update_the_first() {
        let store = Store::new(StoreConfig::instant());
        let report = store
            .products()
            .import_rows(vec![row("First", "NEW1", "1.00"), row("Second", "new1", "2.00")])
            .await;

        assert_eq!(report.imported, 1);
        assert_eq!(report.updated, 1);
        assert_eq!(report.applied(), 2);
    }

    #[tokio::test]
    async fn test_export_then_import_is_stable() {
        let store = Store::new(StoreConfig::instant());
        let rows = store.products().export_rows().await;
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[7].is_visible, "No");

        let report = store
            .products()
            .import_rows(rows.into_iter().map(ImportRow::from).collect())
            .await;
        assert_eq!(report.updated, 8);
        assert!(report.errors.is_empty());

        let shirt = store.products().get("prod2").await.unwrap();
        assert_eq!(shirt.total_stock, 120);
        assert!(!store.products().get("prod8").await.unwrap().product.is_visible);
    }
}
