//! # Inventory Overview
//!
//! Stock counters for the admin inventory page.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::ProductView;

/// Stock state of a single product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    /// `0 < total <= threshold`.
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn of(total_stock: i64, low_stock_threshold: i64) -> Self {
        if total_stock <= 0 {
            StockStatus::OutOfStock
        } else if total_stock <= low_stock_threshold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

/// Counters shown above the inventory table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub product_count: usize,
    pub total_items_in_stock: i64,
    pub out_of_stock_count: usize,
    pub low_stock_count: usize,
}

/// Products whose title or code contains `filter` (case-insensitive).
///
/// A blank filter keeps everything.
pub fn filter_products<'a>(products: &'a [ProductView], filter: Option<&str>) -> Vec<&'a ProductView> {
    let needle = filter.map(str::trim).filter(|f| !f.is_empty()).map(str::to_lowercase);
    products
        .iter()
        .filter(|p| match &needle {
            Some(needle) => {
                p.product.title.to_lowercase().contains(needle) || p.product.code.to_lowercase().contains(needle)
            }
            None => true,
        })
        .collect()
}

/// Summarizes the (optionally filtered) catalog.
pub fn summarize(products: &[ProductView], filter: Option<&str>, low_stock_threshold: i64) -> InventorySummary {
    filter_products(products, filter)
        .into_iter()
        .fold(InventorySummary::default(), |mut summary, product| {
            summary.product_count += 1;
            summary.total_items_in_stock = summary.total_items_in_stock.saturating_add(product.total_stock);
            match StockStatus::of(product.total_stock, low_stock_threshold) {
                StockStatus::OutOfStock => summary.out_of_stock_count += 1,
                StockStatus::LowStock => summary.low_stock_count += 1,
                StockStatus::InStock => {}
            }
            summary
        })
}
