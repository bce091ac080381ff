//! # Sizes Module
//!
//! Per-size stock lists and the sizes JSON text used by the admin form and
//! the product spreadsheet (`[{"size":"S","stock":10}, ...]`).
//!
//! ## Normalization Rules
//! ```text
//! raw entries ──► trim names ──► drop empty names ──► first occurrence wins
//!                                                          │
//!                                                          ▼
//!                                               stock clamped to >= 0
//! ```
//!
//! Two parsing modes exist:
//! - [`resolve_sizes`] is lenient: anything unparseable (negative stock
//!   included) becomes an empty list plus a warning, like the admin form.
//! - [`parse_sizes_json`] is strict: import rejects the row instead.

use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;

use crate::types::{SizeStock, SizesInput};

/// Why a sizes JSON text was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizesJsonError {
    #[error("is not valid JSON. {0}")]
    Syntax(String),

    #[error("is not a valid array of {{size: string, stock: number (>=0)}}")]
    Shape,
}

/// Result of the lenient parse: the sizes plus an optional warning.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedSizes {
    pub sizes: Vec<SizeStock>,
    pub warning: Option<String>,
}

/// Sum of stock over all sizes, saturating at `i64::MAX`.
pub fn total_stock(sizes: &[SizeStock]) -> i64 {
    sizes.iter().fold(0i64, |acc, s| acc.saturating_add(s.stock))
}

/// Trims names, drops empty ones, keeps the first of duplicates and clamps
/// stock at zero.
///
/// ## Example
/// ```rust
/// use tally_core::sizes::normalize_sizes;
/// use tally_core::SizeStock;
///
/// let sizes = normalize_sizes(vec![
///     SizeStock::new(" S ", 5),
///     SizeStock::new("", 3),
///     SizeStock::new("S", 9),
///     SizeStock::new("M", -2),
/// ]);
/// assert_eq!(sizes, vec![SizeStock::new("S", 5), SizeStock::new("M", 0)]);
/// ```
pub fn normalize_sizes(raw: Vec<SizeStock>) -> Vec<SizeStock> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|entry| {
            let name = entry.size.trim().to_string();
            if name.is_empty() || !seen.insert(name.clone()) {
                return None;
            }
            Some(SizeStock::new(name, entry.stock.max(0)))
        })
        .collect()
}

/// Strict parse used by the product import.
///
/// Every entry must be an object with a string `size` and a non-negative
/// numeric `stock`; fractional stock is truncated.
pub fn parse_sizes_json(text: &str) -> Result<Vec<SizeStock>, SizesJsonError> {
    parse_entries(text).map(normalize_sizes)
}

/// Lenient parse used by the admin add/update operations.
///
/// Empty text and `"[]"` are an empty list without warning. Anything that
/// fails to parse, or any entry with negative stock, turns the whole text
/// into an empty list with a warning. A [`SizesInput::List`] is clamped
/// instead.
pub fn resolve_sizes(input: &SizesInput) -> ResolvedSizes {
    match input {
        SizesInput::List(list) => ResolvedSizes {
            sizes: normalize_sizes(list.clone()),
            warning: None,
        },
        SizesInput::Json(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return ResolvedSizes::default();
            }
            match parse_entries(trimmed) {
                Ok(entries) => ResolvedSizes {
                    sizes: normalize_sizes(entries),
                    warning: None,
                },
                Err(err) => ResolvedSizes {
                    sizes: Vec::new(),
                    warning: Some(format!("Sizes JSON '{trimmed}' {err}; product saved with no sizes")),
                },
            }
        }
    }
}

/// Renders sizes as the compact JSON text the spreadsheet carries.
pub fn to_sizes_json(sizes: &[SizeStock]) -> String {
    serde_json::to_string(sizes).unwrap_or_else(|_| "[]".to_string())
}

fn parse_entries(text: &str) -> Result<Vec<SizeStock>, SizesJsonError> {
    let value: Value = serde_json::from_str(text).map_err(|e| SizesJsonError::Syntax(e.to_string()))?;
    let items = value.as_array().ok_or(SizesJsonError::Shape)?;

    items
        .iter()
        .map(|item| {
            let size = item.get("size").and_then(Value::as_str).ok_or(SizesJsonError::Shape)?;
            let stock = item
                .get("stock")
                .and_then(Value::as_f64)
                .filter(|s| s.is_finite())
                .ok_or(SizesJsonError::Shape)?;
            if stock < 0.0 {
                return Err(SizesJsonError::Shape);
            }
            Ok(SizeStock::new(size, stock.trunc() as i64))
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
