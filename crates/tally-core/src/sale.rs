//! # Sale Records
//!
//! Turning a cart into immutable sale lines, and the rules for the admin
//! "edit sale" operation.
//!
//! ## Edit Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For every line i of the stored sale:                                   │
//! │                                                                         │
//! │    bound = current stock of (product, size) + original quantity        │
//! │                                                                         │
//! │    new quantity > bound            → EditQuantityTooLarge              │
//! │    new quantity <= 0 and bound > 0 → quantity must be positive         │
//! │    discount                        → clamped to [0, price × quantity]  │
//! │    final price                     → price × quantity − discount       │
//! │                                                                         │
//! │  total_amount = Σ final price      (never taken from the caller)       │
//! │  stock delta  = original − new     (applied only when reconciling)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Id and submission date of the sale never change on edit.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{Cart, CartItem};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{PaymentMethod, SaleItemRecord, SubmittedSale};
use crate::validation::validate_price;

// =============================================================================
// Records
// =============================================================================

impl SaleItemRecord {
    /// Freezes a cart line into a sale record.
    ///
    /// The discount is re-clamped into `[0, unit_price × quantity]`.
    pub fn from_cart_item(item: &CartItem) -> Self {
        let product = &item.product.product;
        let subtotal = product.price.multiply_quantity(item.quantity).max(Money::zero());
        let discount = item.discount.clamp(Money::zero(), subtotal);
        SaleItemRecord {
            product_id: product.id.clone(),
            title: product.title.clone(),
            code: product.code.clone(),
            image: product.image.clone(),
            selected_size: item.selected_size.clone(),
            quantity: item.quantity,
            unit_price: product.price,
            discount,
            final_price: subtotal - discount,
        }
    }
}

/// Snapshots every cart line.
///
/// An empty cart is rejected, and so is any line with fewer than one unit
/// (e.g. a line switched to a sold-out size).
pub fn records_from_cart(cart: &Cart) -> CoreResult<Vec<SaleItemRecord>> {
    if cart.is_empty() {
        return Err(CoreError::EmptySale);
    }
    cart.items()
        .iter()
        .enumerate()
        .map(|(index, item)| {
            if item.quantity < 1 {
                return Err(ValidationError::MustBePositive {
                    field: format!("line {} quantity", index + 1),
                }
                .into());
            }
            Ok(SaleItemRecord::from_cart_item(item))
        })
        .collect()
}

/// Sum of the lines' final prices.
pub fn sale_total(items: &[SaleItemRecord]) -> Money {
    items.iter().map(|i| i.final_price).sum()
}

// =============================================================================
// Edits
// =============================================================================

/// New values for one line of a stored sale. Lines are matched by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineEdit {
    pub quantity: i64,
    pub discount: Money,
    pub unit_price: Money,
}

impl From<&SaleItemRecord> for SaleLineEdit {
    fn from(record: &SaleItemRecord) -> Self {
        SaleLineEdit {
            quantity: record.quantity,
            discount: record.discount,
            unit_price: record.unit_price,
        }
    }
}

/// An admin edit of a stored sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleEdit {
    pub sale_id: String,
    pub items: Vec<SaleLineEdit>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    #[ts(optional)]
    pub notes: Option<String>,
}

impl SaleEdit {
    /// An edit that starts out identical to the stored sale.
    pub fn from_sale(sale: &SubmittedSale) -> Self {
        SaleEdit {
            sale_id: sale.id.clone(),
            items: sale.items.iter().map(SaleLineEdit::from).collect(),
            payment_method: sale.payment_method,
            notes: sale.notes.clone(),
        }
    }
}

/// Stock to give back (positive) or take (negative) for one product size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockDelta {
    pub product_id: String,
    pub size: String,
    pub delta: i64,
}

/// The edited sale plus the stock movements it implies.
#[derive(Debug, Clone, PartialEq)]
pub struct EditedSale {
    pub sale: SubmittedSale,
    pub stock_deltas: Vec<StockDelta>,
}

/// Applies an edit to a stored sale.
///
/// ## Arguments
/// * `original` - the sale as currently stored
/// * `edit` - new line values, payment method and notes
/// * `current_stock` - stock of `(product_id, size)` right now, 0 if gone
///
/// ## Returns
/// The recomputed sale and the per-line `original − new` quantity deltas
/// (zero deltas omitted). Nothing is mutated here.
pub fn apply_edit<F>(original: &SubmittedSale, edit: &SaleEdit, current_stock: F) -> CoreResult<EditedSale>
where
    F: Fn(&str, &str) -> i64,
{
    if edit.items.len() != original.items.len() {
        return Err(CoreError::EditShapeMismatch {
            sale_id: original.id.clone(),
            expected: original.items.len(),
            actual: edit.items.len(),
        });
    }

    let mut items = Vec::with_capacity(original.items.len());
    let mut stock_deltas = Vec::new();

    for (index, (record, line)) in original.items.iter().zip(&edit.items).enumerate() {
        let line_no = index + 1;
        validate_price(line.unit_price)?;

        let bound = current_stock(&record.product_id, &record.selected_size)
            .max(0)
            .saturating_add(record.quantity);
        if line.quantity > bound {
            return Err(CoreError::EditQuantityTooLarge {
                line: line_no,
                max: bound,
                requested: line.quantity,
            });
        }
        if line.quantity < 0 || (line.quantity == 0 && bound > 0) {
            return Err(ValidationError::MustBePositive {
                field: format!("line {line_no} quantity"),
            }
            .into());
        }

        let subtotal = line.unit_price.multiply_quantity(line.quantity);
        let discount = line.discount.clamp(Money::zero(), subtotal);

        let delta = record.quantity - line.quantity;
        if delta != 0 {
            stock_deltas.push(StockDelta {
                product_id: record.product_id.clone(),
                size: record.selected_size.clone(),
                delta,
            });
        }

        items.push(SaleItemRecord {
            quantity: line.quantity,
            unit_price: line.unit_price,
            discount,
            final_price: subtotal - discount,
            ..record.clone()
        });
    }

    let total_amount = sale_total(&items);
    let sale = SubmittedSale {
        id: original.id.clone(),
        items,
        total_amount,
        payment_method: edit.payment_method,
        submission_date: original.submission_date,
        notes: edit.notes.clone(),
    };

    Ok(EditedSale { sale, stock_deltas })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Product, ProductView, SizeStock};
    use chrono::Utc;

    fn record(product_id: &str, size: &str, qty: i64, unit: i64, discount: i64) -> SaleItemRecord {
        SaleItemRecord {
            product_id: product_id.to_string(),
            title: format!("Title {product_id}"),
            code: format!("CODE-{product_id}"),
            image: String::new(),
            selected_size: size.to_string(),
            quantity: qty,
            unit_price: Money::from_cents(unit),
            discount: Money::from_cents(discount),
            final_price: Money::from_cents(unit * qty - discount),
        }
    }

    fn sale(items: Vec<SaleItemRecord>) -> SubmittedSale {
        SubmittedSale {
            id: "sale-1".to_string(),
            total_amount: sale_total(&items),
            items,
            payment_method: PaymentMethod::Cash,
            submission_date: Utc::now(),
            notes: None,
        }
    }

    #[test]
    fn test_records_from_cart() {
        let mut cart = Cart::new();
        let id = cart.add_product(&thing(vec![SizeStock::new("M", 5)])).unwrap().id.clone();
        cart.set_quantity(&id, 2).unwrap();
        cart.set_discount(&id, Money::from_cents(100)).unwrap();

        let records = records_from_cart(&cart).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].final_price.cents(), 1900);
        assert_eq!(records[0].selected_size, "M");
        assert_eq!(sale_total(&records).cents(), 1900);

        assert!(matches!(records_from_cart(&Cart::new()), Err(CoreError::EmptySale)));
    }

    fn thing(sizes: Vec<SizeStock>) -> ProductView {
        let product = Product {
            id: "p".to_string(),
            title: "Thing".to_string(),
            code: "TH1".to_string(),
            price: Money::from_cents(1000),
            image: "img".to_string(),
            sizes,
            category_id: "c".to_string(),
            manufacturer_id: "m".to_string(),
            is_visible: true,
        };
        ProductView::new(product, "C", "M")
    }

    /// Round-trips a cart through JSON with the first line patched, the way
    /// a front end would send it.
    fn wire_cart(patch: impl FnOnce(&mut serde_json::Value)) -> Cart {
        let mut cart = Cart::new();
        cart.add_product(&thing(vec![SizeStock::new("M", 5)])).unwrap();
        let mut value = serde_json::to_value(&cart).unwrap();
        patch(&mut value["items"][0]);
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_records_reject_negative_quantity() {
        let cart = wire_cart(|line| line["quantity"] = serde_json::json!(-5));
        assert!(matches!(
            records_from_cart(&cart),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
    }

    #[test]
    fn test_records_reject_line_on_sold_out_size() {
        let mut cart = Cart::new();
        let id = cart
            .add_product(&thing(vec![SizeStock::new("M", 5), SizeStock::new("XL", 0)]))
            .unwrap()
            .id
            .clone();
        cart.set_size(&id, "XL").unwrap();
        assert_eq!(cart.items()[0].quantity, 0);

        let err = records_from_cart(&cart).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: line 1 quantity must be positive");
    }

    #[test]
    fn test_records_clamp_wire_discount() {
        let cart = wire_cart(|line| line["discount"] = serde_json::json!(50_000));
        let records = records_from_cart(&cart).unwrap();
        assert_eq!(records[0].discount.cents(), 1000);
        assert_eq!(records[0].final_price, Money::zero());

        let cart = wire_cart(|line| line["discount"] = serde_json::json!(-300));
        let records = records_from_cart(&cart).unwrap();
        assert_eq!(records[0].discount, Money::zero());
        assert_eq!(sale_total(&records).cents(), 1000);
    }

    #[test]
    fn test_edit_bound_saturates() {
        let original = sale(vec![record("a", "S", 2, 1000, 0)]);
        let mut edit = SaleEdit::from_sale(&original);
        edit.items[0].quantity = 3;
        assert!(apply_edit(&original, &edit, |_, _| i64::MAX).is_ok());
    }

    #[test]
    fn test_edit_recomputes_total_and_deltas() {
        let original = sale(vec![record("a", "S", 2, 1000, 100), record("b", "M", 1, 500, 0)]);
        let mut edit = SaleEdit::from_sale(&original);
        edit.items[0].quantity = 1;
        edit.items[1].quantity = 3;
        edit.payment_method = PaymentMethod::DebitCard;
        edit.notes = Some("corrected".to_string());

        let edited = apply_edit(&original, &edit, |_, _| 10).unwrap();
        assert_eq!(edited.sale.items[0].final_price.cents(), 900);
        assert_eq!(edited.sale.items[1].final_price.cents(), 1500);
        assert_eq!(edited.sale.total_amount.cents(), 2400);
        assert_eq!(edited.sale.id, original.id);
        assert_eq!(edited.sale.submission_date, original.submission_date);
        assert_eq!(edited.sale.payment_method, PaymentMethod::DebitCard);
        assert_eq!(
            edited.stock_deltas,
            vec![
                StockDelta { product_id: "a".into(), size: "S".into(), delta: 1 },
                StockDelta { product_id: "b".into(), size: "M".into(), delta: -2 },
            ]
        );
    }

    #[test]
    fn test_edit_quantity_bound_is_stock_plus_original() {
        let original = sale(vec![record("a", "S", 2, 1000, 0)]);
        let mut edit = SaleEdit::from_sale(&original);

        edit.items[0].quantity = 5;
        assert!(apply_edit(&original, &edit, |_, _| 3).is_ok());

        edit.items[0].quantity = 6;
        let err = apply_edit(&original, &edit, |_, _| 3).unwrap_err();
        assert!(matches!(err, CoreError::EditQuantityTooLarge { max: 5, requested: 6, .. }));
    }

    #[test]
    fn test_edit_zero_quantity_rules() {
        let original = sale(vec![record("a", "S", 2, 1000, 0)]);
        let mut edit = SaleEdit::from_sale(&original);
        edit.items[0].quantity = 0;

        assert!(matches!(
            apply_edit(&original, &edit, |_, _| 0),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));

        let empty = sale(vec![record("a", "S", 0, 1000, 0)]);
        let mut edit = SaleEdit::from_sale(&empty);
        edit.items[0].quantity = 0;
        assert!(apply_edit(&empty, &edit, |_, _| 0).is_ok());
    }

    #[test]
    fn test_edit_discount_clamped() {
        let original = sale(vec![record("a", "S", 2, 1000, 0)]);
        let mut edit = SaleEdit::from_sale(&original);
        edit.items[0].discount = Money::from_cents(99_999);
        let edited = apply_edit(&original, &edit, |_, _| 0).unwrap();
        assert_eq!(edited.sale.items[0].discount.cents(), 2000);
        assert_eq!(edited.sale.total_amount, Money::zero());

        edit.items[0].discount = Money::from_cents(-10);
        let edited = apply_edit(&original, &edit, |_, _| 0).unwrap();
        assert_eq!(edited.sale.items[0].discount, Money::zero());
        assert!(edited.stock_deltas.is_empty());
    }

    #[test]
    fn test_edit_shape_and_price_checks() {
        let original = sale(vec![record("a", "S", 2, 1000, 0)]);
        let mut edit = SaleEdit::from_sale(&original);
        edit.items.clear();
        assert!(matches!(
            apply_edit(&original, &edit, |_, _| 0),
            Err(CoreError::EditShapeMismatch { expected: 1, actual: 0, .. })
        ));

        let mut edit = SaleEdit::from_sale(&original);
        edit.items[0].unit_price = Money::from_cents(-1);
        assert!(matches!(apply_edit(&original, &edit, |_, _| 0), Err(CoreError::Validation(_))));
    }
}
