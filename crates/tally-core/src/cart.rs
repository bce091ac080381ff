//! # Cart
//!
//! The cashier's in-progress sale: lines referencing a product snapshot, a
//! selected size, a quantity, a discount and a free-text note.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cashier Action             Cart Method            Effect               │
//! │  ──────────────             ───────────            ──────               │
//! │                                                                         │
//! │  Click search result ─────► add_product() ───────► new line (qty 1)    │
//! │                                                  or existing line +1    │
//! │                                                                         │
//! │  Change quantity ─────────► set_quantity() ──────► clamp [1, stock]    │
//! │                                                                         │
//! │  Pick another size ───────► set_size() ──────────► qty reset if over   │
//! │                                                                         │
//! │  Type discount ───────────► set_discount() ──────► clamp [0, subtotal] │
//! │                                                                         │
//! │  Submit ──────────────────► SalesRepository::submit(&cart, ...)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `0 <= discount <= unit_price × quantity` on every line, so a line's
//!   final price is never negative
//! - quantity never exceeds the selected size's stock in the snapshot
//! - at most [`MAX_CART_ITEMS`] lines

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::ProductView;
use crate::MAX_CART_ITEMS;

// =============================================================================
// Cart Item
// =============================================================================

/// One cart line.
///
/// `product` is the snapshot taken when the line was created; the price on
/// the final sale record comes from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub product: ProductView,
    pub selected_size: String,
    pub quantity: i64,
    pub discount: Money,
    pub note: String,
}

impl CartItem {
    fn new(product: &ProductView, size: &str) -> Self {
        CartItem {
            id: Uuid::new_v4().to_string(),
            product: product.clone(),
            selected_size: size.to_string(),
            quantity: 1,
            discount: Money::zero(),
            note: String::new(),
        }
    }

    /// Stock of the selected size in the snapshot (0 if the size is gone).
    pub fn size_stock(&self) -> i64 {
        self.product.product.size_stock(&self.selected_size).unwrap_or(0)
    }

    /// `unit_price × quantity`.
    pub fn subtotal(&self) -> Money {
        self.product.product.price.multiply_quantity(self.quantity)
    }

    /// `unit_price × quantity − discount`.
    pub fn final_price(&self) -> Money {
        self.subtotal() - self.discount
    }

    fn clamp_discount(&mut self) {
        self.discount = self.discount.clamp(Money::zero(), self.subtotal().max(Money::zero()));
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of lines (not units).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, line_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == line_id)
    }

    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - Products with no stock at all are rejected
    /// - The line's size defaults to the first size that has stock
    /// - A line for the same product and size is incremented, up to that
    ///   size's stock in `product` (the freshest data the caller has)
    ///
    /// ## Returns
    /// The line that was created or incremented.
    pub fn add_product(&mut self, product: &ProductView) -> CoreResult<&CartItem> {
        let title = &product.product.title;
        let default_size = product
            .product
            .sizes
            .iter()
            .find(|s| s.stock > 0)
            .ok_or_else(|| CoreError::OutOfStock {
                title: title.clone(),
            })?;

        let existing = self
            .items
            .iter()
            .position(|i| i.product.id() == product.id() && i.selected_size == default_size.size);

        let index = match existing {
            Some(index) => {
                let line = &mut self.items[index];
                if line.quantity >= default_size.stock {
                    return Err(CoreError::MaxStockReached {
                        title: title.clone(),
                        size: default_size.size.clone(),
                        stock: default_size.stock,
                    });
                }
                line.quantity += 1;
                index
            }
            None => {
                if self.items.len() >= MAX_CART_ITEMS {
                    return Err(CoreError::CartTooLarge { max: MAX_CART_ITEMS });
                }
                self.items.push(CartItem::new(product, &default_size.size));
                self.items.len() - 1
            }
        };

        Ok(&self.items[index])
    }

    /// Sets a line's quantity, clamped to `[1, size stock]`.
    ///
    /// A line whose size has no stock is pinned at 0. The discount is
    /// re-clamped against the new subtotal.
    ///
    /// ## Returns
    /// The quantity actually stored.
    pub fn set_quantity(&mut self, line_id: &str, quantity: i64) -> CoreResult<i64> {
        let line = self.line_mut(line_id)?;
        let stock = line.size_stock();
        line.quantity = if stock <= 0 { 0 } else { quantity.clamp(1, stock) };
        line.clamp_discount();
        Ok(line.quantity)
    }

    /// Switches a line to another size of the same product.
    ///
    /// If the current quantity exceeds the new size's stock it drops to 1,
    /// or to 0 when the new size is sold out.
    pub fn set_size(&mut self, line_id: &str, size: &str) -> CoreResult<()> {
        let line = self.line_mut(line_id)?;
        let new_stock = line
            .product
            .product
            .size_stock(size)
            .ok_or_else(|| CoreError::SizeNotFound {
                product_id: line.product.id().to_string(),
                size: size.to_string(),
            })?;

        line.selected_size = size.to_string();
        if line.quantity > new_stock {
            line.quantity = if new_stock > 0 { 1 } else { 0 };
        }
        line.clamp_discount();
        Ok(())
    }

    /// Sets a line's discount, clamped to `[0, unit_price × quantity]`.
    pub fn set_discount(&mut self, line_id: &str, discount: Money) -> CoreResult<Money> {
        let line = self.line_mut(line_id)?;
        line.discount = discount;
        line.clamp_discount();
        Ok(line.discount)
    }

    pub fn set_note(&mut self, line_id: &str, note: impl Into<String>) -> CoreResult<()> {
        self.line_mut(line_id)?.note = note.into();
        Ok(())
    }

    pub fn remove(&mut self, line_id: &str) -> CoreResult<CartItem> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == line_id)
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))?;
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of every line's final price.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::final_price).sum()
    }

    /// Number of units across all lines.
    pub fn units(&self) -> i64 {
        self.items.iter().fold(0i64, |acc, i| acc.saturating_add(i.quantity))
    }

    fn line_mut(&mut self, line_id: &str) -> CoreResult<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|i| i.id == line_id)
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Product, SizeStock};

    fn view(id: &str, price_cents: i64, sizes: Vec<SizeStock>) -> ProductView {
        let product = Product {
            id: id.to_string(),
            title: format!("Product {id}"),
            code: format!("CODE-{id}"),
            price: Money::from_cents(price_cents),
            image: String::new(),
            sizes,
            category_id: "cat1".to_string(),
            manufacturer_id: "man1".to_string(),
            is_visible: true,
        };
        ProductView::new(product, "Electronics", "LogiTech")
    }

    #[test]
    fn test_add_defaults_to_first_size_with_stock() {
        let mut cart = Cart::new();
        let shoes = view("p8", 9950, vec![SizeStock::new("8", 0), SizeStock::new("9", 25)]);

        let line = cart.add_product(&shoes).unwrap();
        assert_eq!(line.selected_size, "9");
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn test_add_out_of_stock_rejected() {
        let mut cart = Cart::new();
        let blocks = view("p6", 2999, vec![SizeStock::new("500 Pieces", 0)]);
        assert!(matches!(cart.add_product(&blocks), Err(CoreError::OutOfStock { .. })));

        let no_sizes = view("p9", 100, vec![]);
        assert!(matches!(cart.add_product(&no_sizes), Err(CoreError::OutOfStock { .. })));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_twice_increments_until_max_stock() {
        let mut cart = Cart::new();
        let mouse = view("p1", 2599, vec![SizeStock::new("One Size", 2)]);

        cart.add_product(&mouse).unwrap();
        let line = cart.add_product(&mouse).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(cart.len(), 1);

        let err = cart.add_product(&mouse).unwrap_err();
        assert!(matches!(err, CoreError::MaxStockReached { stock: 2, .. }));
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_quantity_clamps_to_stock() {
        let mut cart = Cart::new();
        let tshirt = view("p2", 1999, vec![SizeStock::new("S", 3)]);
        let id = cart.add_product(&tshirt).unwrap().id.clone();

        assert_eq!(cart.set_quantity(&id, 10).unwrap(), 3);
        assert_eq!(cart.set_quantity(&id, 0).unwrap(), 1);
        assert_eq!(cart.set_quantity(&id, -4).unwrap(), 1);
        assert_eq!(cart.set_quantity(&id, 2).unwrap(), 2);
    }

    #[test]
    fn test_size_change_resets_quantity() {
        let mut cart = Cart::new();
        let tshirt = view(
            "p2",
            1999,
            vec![SizeStock::new("S", 30), SizeStock::new("XL", 2), SizeStock::new("XXL", 0)],
        );
        let id = cart.add_product(&tshirt).unwrap().id.clone();
        cart.set_quantity(&id, 5).unwrap();

        cart.set_size(&id, "XL").unwrap();
        assert_eq!(cart.get(&id).unwrap().quantity, 1);

        cart.set_size(&id, "XXL").unwrap();
        assert_eq!(cart.get(&id).unwrap().quantity, 0);

        assert!(matches!(cart.set_size(&id, "XS"), Err(CoreError::SizeNotFound { .. })));
    }

    #[test]
    fn test_size_change_within_stock_keeps_quantity() {
        let mut cart = Cart::new();
        let tshirt = view("p2", 1999, vec![SizeStock::new("S", 30), SizeStock::new("M", 40)]);
        let id = cart.add_product(&tshirt).unwrap().id.clone();
        cart.set_quantity(&id, 5).unwrap();

        cart.set_size(&id, "M").unwrap();
        assert_eq!(cart.get(&id).unwrap().quantity, 5);
    }

    #[test]
    fn test_discount_clamped_and_totals() {
        let mut cart = Cart::new();
        let item = view("p1", 1000, vec![SizeStock::new("One Size", 5)]);
        let id = cart.add_product(&item).unwrap().id.clone();
        cart.set_quantity(&id, 2).unwrap();

        assert_eq!(cart.set_discount(&id, Money::from_cents(100)).unwrap().cents(), 100);
        assert_eq!(cart.total().cents(), 1900);

        assert_eq!(cart.set_discount(&id, Money::from_cents(5000)).unwrap().cents(), 2000);
        assert_eq!(cart.set_discount(&id, Money::from_cents(-5)).unwrap().cents(), 0);

        cart.set_discount(&id, Money::from_cents(2000)).unwrap();
        cart.set_quantity(&id, 1).unwrap();
        assert_eq!(cart.get(&id).unwrap().discount.cents(), 1000);
        assert_eq!(cart.units(), 1);
    }

    #[test]
    fn test_note_remove_clear() {
        let mut cart = Cart::new();
        let a = view("a", 100, vec![SizeStock::new("One Size", 1)]);
        let b = view("b", 200, vec![SizeStock::new("One Size", 1)]);
        let id_a = cart.add_product(&a).unwrap().id.clone();
        cart.add_product(&b).unwrap();

        cart.set_note(&id_a, "gift wrap").unwrap();
        assert_eq!(cart.get(&id_a).unwrap().note, "gift wrap");

        let removed = cart.remove(&id_a).unwrap();
        assert_eq!(removed.product.id(), "a");
        assert!(matches!(cart.remove(&id_a), Err(CoreError::LineNotFound(_))));

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::zero());
    }
}
