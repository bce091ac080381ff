//! # Domain Types
//!
//! Core domain types used throughout Tally POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  SubmittedSale  │   │ SaleItemRecord  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, code       │   │  id             │   │  product_id     │       │
//! │  │  title, price   │   │  items ─────────┼──►│  title, code    │       │
//! │  │  sizes ──┐      │   │  total_amount   │   │  selected_size  │       │
//! │  │  category_id    │   │  payment_method │   │  quantity       │       │
//! │  │  manufacturer_id│   │  submission_date│   │  unit_price     │       │
//! │  │  is_visible     │   │  notes          │   │  final_price    │       │
//! │  └─────────┼───────┘   └─────────────────┘   └─────────────────┘       │
//! │            ▼                                                            │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   SizeStock     │   │ Category /      │   │ PaymentMethod   │       │
//! │  │  size: "M"      │   │ Manufacturer    │   │  Cash, Credit   │       │
//! │  │  stock: 40      │   │  id, name       │   │  Card, ...      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stored vs Read Model
//! `Product` is what the catalog stores. `ProductView` is what every read
//! returns: the product plus `total_stock` and the resolved category and
//! manufacturer names, recomputed on each read so they can never drift.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Size Stock
// =============================================================================

/// Stock counter for one size of a product (e.g. `"M"` with 40 units).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SizeStock {
    pub size: String,
    pub stock: i64,
}

impl SizeStock {
    pub fn new(size: impl Into<String>, stock: i64) -> Self {
        SizeStock {
            size: size.into(),
            stock,
        }
    }
}

// =============================================================================
// Category / Manufacturer
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// A product manufacturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Manufacturer {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,

    /// Display name shown to cashier and on the sale record.
    pub title: String,

    /// Business code. Expected to be unique, but never enforced.
    pub code: String,

    /// Unit price in cents.
    pub price: Money,

    /// Image URL.
    pub image: String,

    /// Per-size stock counters. Never negative.
    pub sizes: Vec<SizeStock>,

    pub category_id: String,

    pub manufacturer_id: String,

    /// Hidden products never show up on the POS screen.
    pub is_visible: bool,
}

impl Product {
    /// Sum of every size's stock.
    pub fn total_stock(&self) -> i64 {
        crate::sizes::total_stock(&self.sizes)
    }

    /// Stock of a single size, `None` when the product has no such size.
    pub fn size_stock(&self, size: &str) -> Option<i64> {
        self.sizes.iter().find(|s| s.size == size).map(|s| s.stock)
    }

    /// Mutable access to a single size entry.
    pub fn size_mut(&mut self, size: &str) -> Option<&mut SizeStock> {
        self.sizes.iter_mut().find(|s| s.size == size)
    }
}

/// A product enriched for display: derived stock total and resolved names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,

    /// Always `sum(product.sizes[].stock)`.
    pub total_stock: i64,

    pub category_name: String,

    pub manufacturer_name: String,
}

impl ProductView {
    /// Builds a view from a product and already resolved display names.
    pub fn new(
        product: Product,
        category_name: impl Into<String>,
        manufacturer_name: impl Into<String>,
    ) -> Self {
        let total_stock = product.total_stock();
        ProductView {
            product,
            total_stock,
            category_name: category_name.into(),
            manufacturer_name: manufacturer_name.into(),
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.product.id
    }

    #[inline]
    pub fn is_in_stock(&self) -> bool {
        self.total_stock > 0
    }
}

/// Product form input for the admin add/update operations.
///
/// Sizes arrive either as a list or as the JSON text the admin form edits,
/// e.g. `[{"size":"S","stock":10},{"size":"M","stock":5}]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub title: String,
    pub code: String,
    pub price: Money,
    pub image: String,
    pub sizes: SizesInput,
    pub category_id: String,
    pub manufacturer_id: String,
    pub is_visible: bool,
}

/// Either a structured size list or its JSON text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum SizesInput {
    List(Vec<SizeStock>),
    Json(String),
}

impl Default for SizesInput {
    fn default() -> Self {
        SizesInput::List(Vec::new())
    }
}

impl From<Vec<SizeStock>> for SizesInput {
    fn from(sizes: Vec<SizeStock>) -> Self {
        SizesInput::List(sizes)
    }
}

impl From<&str> for SizesInput {
    fn from(text: &str) -> Self {
        SizesInput::Json(text.to_string())
    }
}

/// Field changes applied to many products at once.
///
/// `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BulkProductChanges {
    pub category_id: Option<String>,
    pub manufacturer_id: Option<String>,
    pub is_visible: Option<bool>,
}

impl BulkProductChanges {
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none() && self.manufacturer_id.is_none() && self.is_visible.is_none()
    }

    /// Applies every set field to the product.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(category_id) = &self.category_id {
            product.category_id = category_id.clone();
        }
        if let Some(manufacturer_id) = &self.manufacturer_id {
            product.manufacturer_id = manufacturer_id.clone();
        }
        if let Some(is_visible) = self.is_visible {
            product.is_visible = is_visible;
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid. Serialized with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PaymentMethod {
    #[serde(rename = "Cash")]
    Cash,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    DebitCard,
    #[serde(rename = "Mobile Payment")]
    MobilePayment,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
}

impl PaymentMethod {
    /// Every method, in the order the POS screen offers them.
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::MobilePayment,
        PaymentMethod::BankTransfer,
    ];

    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::MobilePayment => "Mobile Payment",
            PaymentMethod::BankTransfer => "Bank Transfer",
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    /// Case-insensitive match on the display label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "payment method",
                    format!("'{wanted}' is not one of Cash, Credit Card, Debit Card, Mobile Payment, Bank Transfer"),
                )
            })
    }
}

// =============================================================================
// Sales
// =============================================================================

/// One line of a submitted sale, frozen at submission time.
///
/// Snapshot pattern: title, code, image and unit price are copied from the
/// product so later catalog edits never rewrite sales history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemRecord {
    pub product_id: String,
    pub title: String,
    pub code: String,
    pub image: String,
    pub selected_size: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub discount: Money,
    /// `unit_price × quantity − discount`.
    pub final_price: Money,
}

/// A completed sale as kept by the sale recorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedSale {
    pub id: String,
    pub items: Vec<SaleItemRecord>,
    /// Always the sum of the items' final prices.
    pub total_amount: Money,
    pub payment_method: PaymentMethod,
    #[ts(as = "String")]
    pub submission_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub notes: Option<String>,
}

impl SubmittedSale {
    /// Number of units across all lines.
    pub fn items_sold(&self) -> i64 {
        self.items.iter().fold(0i64, |acc, i| acc.saturating_add(i.quantity))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
