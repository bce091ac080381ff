//! # Product Rows
//!
//! Row-level mapping between products and spreadsheet columns. Reading and
//! writing the workbook itself is the caller's business; this module only
//! deals with one row at a time.
//!
//! ## Columns
//! ```text
//! ┌────┬───────┬──────┬──────────┬──────────────┬───────┬────────────┬────────────────┬───────────┬────────────┐
//! │ ID │ Title │ Code │ Category │ Manufacturer │ Price │ TotalStock │ SizesStockJSON │ Image URL │ Is Visible │
//! └────┴───────┴──────┴──────────┴──────────────┴───────┴────────────┴────────────────┴───────────┴────────────┘
//! ```
//!
//! ## Import Rules (per row)
//! 1. Title, Code, Price, Category, Manufacturer and Image URL are required
//! 2. Category / Manufacturer are resolved by case-insensitive name
//! 3. Price must parse as a positive decimal
//! 4. Sizes come from `SizesStockJSON`; otherwise `TotalStock` (or `Stock`)
//!    becomes a single "One Size" entry; otherwise the product gets no sizes
//!    and the row carries a warning
//! 5. Invalid `SizesStockJSON` skips the row
//! 6. `Is Visible` is "yes"/"true" (any case); blank means visible
//!
//! Rows are numbered as in the sheet: the first data row is row 2.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::sizes::{parse_sizes_json, to_sizes_json};
use crate::types::{Category, Manufacturer, ProductDraft, ProductView, SizeStock, SizesInput};
use crate::validation::validate_positive_price;
use crate::{DEFAULT_SIZE_NAME, UNCATEGORIZED_ID, UNKNOWN_MANUFACTURER_ID};

/// Sheet row number of the first data row (row 1 holds the headers).
pub const FIRST_DATA_ROW: usize = 2;

// =============================================================================
// Export
// =============================================================================

/// One exported product, keyed by the sheet's column headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "TotalStock")]
    pub total_stock: i64,
    #[serde(rename = "SizesStockJSON")]
    pub sizes_stock_json: String,
    #[serde(rename = "Image URL")]
    pub image_url: String,
    /// "Yes" / "No".
    #[serde(rename = "Is Visible")]
    pub is_visible: String,
}

impl From<&ProductView> for ProductRow {
    fn from(view: &ProductView) -> Self {
        let product = &view.product;
        ProductRow {
            id: product.id.clone(),
            title: product.title.clone(),
            code: product.code.clone(),
            category: view.category_name.clone(),
            manufacturer: view.manufacturer_name.clone(),
            price: product.price.to_decimal_string(),
            total_stock: view.total_stock,
            sizes_stock_json: to_sizes_json(&product.sizes),
            image_url: product.image.clone(),
            is_visible: if product.is_visible { "Yes" } else { "No" }.to_string(),
        }
    }
}

/// Maps products to rows, in the given order.
pub fn export_rows(products: &[ProductView]) -> Vec<ProductRow> {
    products.iter().map(ProductRow::from).collect()
}

// =============================================================================
// Import
// =============================================================================

/// One sheet row as read for import. Every cell may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportRow {
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Code")]
    pub code: Option<String>,
    #[serde(rename = "Category")]
    pub category: Option<String>,
    #[serde(rename = "Manufacturer")]
    pub manufacturer: Option<String>,
    #[serde(rename = "Price")]
    pub price: Option<String>,
    #[serde(rename = "TotalStock")]
    pub total_stock: Option<String>,
    /// Older sheets name the column `Stock`.
    #[serde(rename = "Stock")]
    pub stock: Option<String>,
    #[serde(rename = "SizesStockJSON")]
    pub sizes_stock_json: Option<String>,
    #[serde(rename = "Image URL")]
    pub image_url: Option<String>,
    #[serde(rename = "Is Visible")]
    pub is_visible: Option<String>,
}

impl From<ProductRow> for ImportRow {
    fn from(row: ProductRow) -> Self {
        ImportRow {
            title: Some(row.title),
            code: Some(row.code),
            category: Some(row.category),
            manufacturer: Some(row.manufacturer),
            price: Some(row.price),
            total_stock: Some(row.total_stock.to_string()),
            stock: None,
            sizes_stock_json: Some(row.sizes_stock_json),
            image_url: Some(row.image_url),
            is_visible: Some(row.is_visible),
        }
    }
}

/// Case-insensitive name → id maps for category and manufacturer cells.
#[derive(Debug, Clone, Default)]
pub struct NameLookup {
    categories: HashMap<String, String>,
    manufacturers: HashMap<String, String>,
}

impl NameLookup {
    /// Sentinel rows are left out; a row cannot name them.
    pub fn new(categories: &[Category], manufacturers: &[Manufacturer]) -> Self {
        NameLookup {
            categories: categories
                .iter()
                .filter(|c| c.id != UNCATEGORIZED_ID)
                .map(|c| (c.name.to_lowercase(), c.id.clone()))
                .collect(),
            manufacturers: manufacturers
                .iter()
                .filter(|m| m.id != UNKNOWN_MANUFACTURER_ID)
                .map(|m| (m.name.to_lowercase(), m.id.clone()))
                .collect(),
        }
    }

    pub fn category_id(&self, name: &str) -> Option<&str> {
        self.categories.get(&name.trim().to_lowercase()).map(String::as_str)
    }

    pub fn manufacturer_id(&self, name: &str) -> Option<&str> {
        self.manufacturers.get(&name.trim().to_lowercase()).map(String::as_str)
    }
}

/// A row that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub row_number: usize,
    pub draft: ProductDraft,
    /// Non-fatal problem worth reporting (e.g. no stock information).
    pub warning: Option<String>,
}

/// Validates one import row.
///
/// ## Returns
/// - `Ok(ParsedRow)` with a product draft ready for add/update
/// - `Err(message)` with a `"Row N: ..."` message when the row must be skipped
pub fn parse_import_row(row: &ImportRow, row_number: usize, lookup: &NameLookup) -> Result<ParsedRow, String> {
    let (Some(title), Some(code), Some(price_text), Some(category), Some(manufacturer), Some(image)) = (
        present(&row.title),
        present(&row.code),
        present(&row.price),
        present(&row.category),
        present(&row.manufacturer),
        present(&row.image_url),
    ) else {
        return Err(format!(
            "Row {row_number}: Missing required fields (Title, Code, Price, Category, Manufacturer, Image URL)."
        ));
    };

    let category_id = lookup
        .category_id(category)
        .ok_or_else(|| format!("Row {row_number}: Category \"{category}\" not found."))?;
    let manufacturer_id = lookup
        .manufacturer_id(manufacturer)
        .ok_or_else(|| format!("Row {row_number}: Manufacturer \"{manufacturer}\" not found."))?;

    let price = Money::parse_decimal(price_text)
        .and_then(|price| validate_positive_price(price).map(|()| price))
        .map_err(|_| format!("Row {row_number}: Invalid Price \"{price_text}\". Must be a positive number."))?;

    let mut warning = None;
    let sizes = match present(&row.sizes_stock_json) {
        Some(json) => parse_sizes_json(json)
            .map_err(|err| format!("Row {row_number}: 'SizesStockJSON' (\"{json}\") {err}"))?,
        None => match fallback_stock(row) {
            Some(stock) => vec![SizeStock::new(DEFAULT_SIZE_NAME, stock)],
            None => {
                warning = Some(format!(
                    "Row {row_number}: Missing 'SizesStockJSON' or valid 'TotalStock'/'Stock' field. Product will have no stock/sizes."
                ));
                Vec::new()
            }
        },
    };

    let is_visible = present(&row.is_visible).map_or(true, |v| {
        let v = v.to_lowercase();
        v == "yes" || v == "true"
    });

    Ok(ParsedRow {
        row_number,
        draft: ProductDraft {
            title: title.to_string(),
            code: code.to_string(),
            price,
            image: image.to_string(),
            sizes: SizesInput::List(sizes),
            category_id: category_id.to_string(),
            manufacturer_id: manufacturer_id.to_string(),
            is_visible,
        },
        warning,
    })
}

/// Trimmed cell content, `None` when missing or blank.
fn present(cell: &Option<String>) -> Option<&str> {
    cell.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// `TotalStock` if the column is present, else `Stock`; must be a
/// non-negative whole number (fractions are truncated).
fn fallback_stock(row: &ImportRow) -> Option<i64> {
    let cell = present(&row.total_stock).or_else(|| present(&row.stock))?;
    let stock = cell
        .parse::<i64>()
        .ok()
        .or_else(|| cell.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?;
    (stock >= 0).then_some(stock)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Product;

    fn lookup() -> NameLookup {
        NameLookup::new(
            &[Category { id: "cat2".into(), name: "Clothing".into() }],
            &[Manufacturer { id: "man2".into(), name: "FashionCo".into() }],
        )
    }

    fn row() -> ImportRow {
        ImportRow {
            title: Some("Linen Shirt".into()),
            code: Some("LS100".into()),
            category: Some("clothing".into()),
            manufacturer: Some("FASHIONCO".into()),
            price: Some("24.5".into()),
            sizes_stock_json: Some(r#"[{"size":"M","stock":4}]"#.into()),
            image_url: Some("https://picsum.photos/seed/linen/100/100".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_row() {
        let parsed = parse_import_row(&row(), 2, &lookup()).unwrap();
        assert_eq!(parsed.draft.category_id, "cat2");
        assert_eq!(parsed.draft.manufacturer_id, "man2");
        assert_eq!(parsed.draft.price.cents(), 2450);
        assert_eq!(parsed.draft.sizes, SizesInput::List(vec![SizeStock::new("M", 4)]));
        assert!(parsed.draft.is_visible);
        assert!(parsed.warning.is_none());
    }

    #[test]
    fn test_missing_required_field() {
        let mut missing = row();
        missing.image_url = Some("   ".into());
        let err = parse_import_row(&missing, 5, &lookup()).unwrap_err();
        assert!(err.starts_with("Row 5: Missing required fields"));
    }

    #[test]
    fn test_unknown_names_and_bad_price() {
        let mut unknown = row();
        unknown.category = Some("Garden".into());
        assert_eq!(
            parse_import_row(&unknown, 3, &lookup()).unwrap_err(),
            "Row 3: Category \"Garden\" not found."
        );

        let mut unknown = row();
        unknown.manufacturer = Some("Acme".into());
        assert!(parse_import_row(&unknown, 3, &lookup()).unwrap_err().contains("Manufacturer \"Acme\""));

        for bad in ["0", "-3", "abc"] {
            let mut priced = row();
            priced.price = Some(bad.into());
            let err = parse_import_row(&priced, 4, &lookup()).unwrap_err();
            assert!(err.contains("Invalid Price"), "{bad}: {err}");
        }
    }

    #[test]
    fn test_stock_fallbacks() {
        let mut total = row();
        total.sizes_stock_json = None;
        total.total_stock = Some("12".into());
        let parsed = parse_import_row(&total, 2, &lookup()).unwrap();
        assert_eq!(parsed.draft.sizes, SizesInput::List(vec![SizeStock::new("One Size", 12)]));

        let mut legacy = row();
        legacy.sizes_stock_json = Some("".into());
        legacy.stock = Some("7".into());
        let parsed = parse_import_row(&legacy, 2, &lookup()).unwrap();
        assert_eq!(parsed.draft.sizes, SizesInput::List(vec![SizeStock::new("One Size", 7)]));

        let mut none = row();
        none.sizes_stock_json = None;
        none.total_stock = Some("-1".into());
        let parsed = parse_import_row(&none, 9, &lookup()).unwrap();
        assert_eq!(parsed.draft.sizes, SizesInput::List(vec![]));
        assert!(parsed.warning.unwrap().starts_with("Row 9: Missing 'SizesStockJSON'"));
    }

    #[test]
    fn test_sentinel_names_are_not_importable() {
        let lookup = NameLookup::new(
            &[
                Category { id: UNCATEGORIZED_ID.into(), name: "Uncategorized".into() },
                Category { id: "cat2".into(), name: "Clothing".into() },
            ],
            &[
                Manufacturer { id: UNKNOWN_MANUFACTURER_ID.into(), name: "Unknown Manufacturer".into() },
                Manufacturer { id: "man2".into(), name: "FashionCo".into() },
            ],
        );
        assert_eq!(lookup.category_id("clothing"), Some("cat2"));

        let mut r = row();
        r.category = Some("Uncategorized".into());
        assert!(parse_import_row(&r, 2, &lookup).unwrap_err().contains("Category \"Uncategorized\" not found"));

        let mut r = row();
        r.manufacturer = Some("unknown manufacturer".into());
        assert!(parse_import_row(&r, 3, &lookup).unwrap_err().contains("not found"));
    }

    #[test]
    fn test_invalid_sizes_json_skips_row() {
        let mut broken = row();
        broken.sizes_stock_json = Some("[{oops".into());
        assert!(parse_import_row(&broken, 2, &lookup()).unwrap_err().contains("is not valid JSON"));

        let mut negative = row();
        negative.sizes_stock_json = Some(r#"[{"size":"M","stock":-2}]"#.into());
        assert!(parse_import_row(&negative, 2, &lookup()).unwrap_err().contains("is not a valid array"));
    }

    #[test]
    fn test_visibility_cell() {
        for (cell, expected) in [("Yes", true), ("TRUE", true), ("No", false), ("0", false), ("", true)] {
            let mut r = row();
            r.is_visible = Some(cell.into());
            assert_eq!(parse_import_row(&r, 2, &lookup()).unwrap().draft.is_visible, expected, "{cell}");
        }
    }

    #[test]
    fn test_export_row() {
        let product = Product {
            id: "prod8".into(),
            title: "Running Shoes".into(),
            code: "RS008".into(),
            price: Money::from_cents(9950),
            image: "img".into(),
            sizes: vec![SizeStock::new("8", 15), SizeStock::new("9", 25)],
            category_id: "cat2".into(),
            manufacturer_id: "man8".into(),
            is_visible: false,
        };
        let rows = export_rows(&[ProductView::new(product, "Clothing", "FitGear")]);
        let row = &rows[0];
        assert_eq!(row.price, "99.50");
        assert_eq!(row.total_stock, 40);
        assert_eq!(row.is_visible, "No");
        assert_eq!(row.sizes_stock_json, r#"[{"size":"8","stock":15},{"size":"9","stock":25}]"#);

        let json = serde_json::to_value(row).unwrap();
        assert_eq!(json["Image URL"], "img");
        assert_eq!(json["SizesStockJSON"], row.sizes_stock_json.as_str());
    }
}
