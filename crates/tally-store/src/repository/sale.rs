//! # Sale Repository
//!
//! Sale submission, history, admin edits and analytics.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    submit(cart, method, notes)                          │
//! │                                                                         │
//! │  Cart lines ──► SaleItemRecord snapshots (title, code, price frozen)   │
//! │       │                                                                 │
//! │       ▼         ┌──────────── write lock ─────────────┐                │
//! │  apply_sale     │ check every line, decrement stock   │                │
//! │       │         │ insert sale at the front of history │                │
//! │       ▼         └─────────────────────────────────────┘                │
//! │  SubmittedSale                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tally_core::analytics::{compute_analytics, DateRange, SalesAnalytics};
use tally_core::cart::Cart;
use tally_core::sale::{apply_edit, records_from_cart, sale_total, SaleEdit};
use tally_core::{PaymentMethod, SubmittedSale};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::LatencyKind;
use crate::error::{StoreError, StoreResult};
use crate::store::Store;

/// Repository for sale operations.
///
/// ## Usage
/// ```rust,ignore
/// let sale = store.sales().submit(&cart, PaymentMethod::Cash, None).await?;
/// let history = store.sales().list().await;
/// ```
#[derive(Debug, Clone)]
pub struct SaleRepository {
    store: Store,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(store: Store) -> Self {
        SaleRepository { store }
    }

    /// Records a sale from the cart and takes its units out of stock.
    ///
    /// ## Errors
    /// * `Core(EmptySale)` - the cart has no lines
    /// * `NotFound` / `SizeNotFound` - a line's product or size is gone
    /// * `InsufficientStock` - strict policy and a line asks for too much
    ///
    /// On any error neither stock nor history changes.
    pub async fn submit(
        &self,
        cart: &Cart,
        payment_method: PaymentMethod,
        notes: Option<String>,
    ) -> StoreResult<SubmittedSale> {
        let items = records_from_cart(cart)?;
        let total_amount = sale_total(&items);
        let notes = notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());

        debug!(lines = items.len(), total = %total_amount, method = %payment_method, "Submitting sale");

        let policy = self.store.config().stock.policy;
        let mut catalog = self.store.write(LatencyKind::Standard).await;
        catalog.apply_sale(&items, policy)?;

        let sale = SubmittedSale {
            id: Uuid::new_v4().to_string(),
            items,
            total_amount,
            payment_method,
            submission_date: Utc::now(),
            notes,
        };
        catalog.sales.insert(0, sale.clone());

        info!(
            sale_id = %sale.id,
            total = %sale.total_amount,
            items = sale.items_sold(),
            "Sale submitted"
        );
        Ok(sale)
    }

    /// Sales history, newest first.
    pub async fn list(&self) -> Vec<SubmittedSale> {
        debug!("Listing sales");
        self.store.read(LatencyKind::Standard).await.sales.clone()
    }

    /// Gets a sale by id.
    pub async fn get(&self, id: &str) -> StoreResult<SubmittedSale> {
        debug!(id = %id, "Getting sale");
        self.store
            .read(LatencyKind::Standard)
            .await
            .sales
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Sale", id))
    }

    /// Applies an admin edit to a stored sale.
    ///
    /// Id and submission date are kept; line prices and the total are
    /// recomputed. When `stock.reconcile_on_edit` is set, `original − edited`
    /// units per line go back into stock under the same lock.
    pub async fn update(&self, edit: SaleEdit) -> StoreResult<SubmittedSale> {
        let reconcile = self.store.config().stock.reconcile_on_edit;
        let mut catalog = self.store.write(LatencyKind::Standard).await;

        let index = catalog
            .sales
            .iter()
            .position(|s| s.id == edit.sale_id)
            .ok_or_else(|| StoreError::not_found("Sale", &edit.sale_id))?;

        let edited = apply_edit(&catalog.sales[index], &edit, |product_id, size| {
            catalog
                .product(product_id)
                .ok()
                .and_then(|p| p.size_stock(size))
                .unwrap_or(0)
        })?;

        if reconcile {
            catalog.apply_stock_deltas(&edited.stock_deltas);
        } else if !edited.stock_deltas.is_empty() {
            debug!(sale_id = %edit.sale_id, deltas = edited.stock_deltas.len(), "Stock left unchanged by edit");
        }

        let sale = edited.sale;
        catalog.sales[index] = sale.clone();

        info!(sale_id = %sale.id, total = %sale.total_amount, reconcile, "Sale updated");
        Ok(sale)
    }

    /// Sales analytics over an inclusive day range.
    pub async fn analytics(&self, range: &DateRange) -> SalesAnalytics {
        debug!(from = ?range.from, to = ?range.to, "Computing analytics");
        let catalog = self.store.read(LatencyKind::Standard).await;
        compute_analytics(&catalog.sales, &catalog.views(), range)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StockPolicy, StoreConfig};
    use tally_core::sale::SaleLineEdit;
    use tally_core::{CoreError, Money, ProductDraft, ProductView, SizeStock, SizesInput};

    fn store() -> Store {
        Store::new(StoreConfig::instant())
    }

    async fn ten_euro_item(store: &Store, stock: i64) -> ProductView {
        store
            .products()
            .add(ProductDraft {
                title: "Ten".to_string(),
                code: "TEN".to_string(),
                price: Money::from_cents(1000),
                image: "img".to_string(),
                sizes: SizesInput::List(vec![SizeStock::new("One Size", stock)]),
                category_id: "cat1".to_string(),
                manufacturer_id: "man1".to_string(),
                is_visible: true,
            })
            .await
            .unwrap()
    }

    fn cart_with(product: &ProductView, quantity: i64, discount_cents: i64) -> Cart {
        let mut cart = Cart::new();
        let line = cart.add_product(product).unwrap().id.clone();
        cart.set_quantity(&line, quantity).unwrap();
        cart.set_discount(&line, Money::from_cents(discount_cents)).unwrap();
        cart
    }

    #[tokio::test]
    async fn test_submit_totals_and_decrements() {
        let store = store();
        let product = ten_euro_item(&store, 5).await;
        let cart = cart_with(&product, 2, 100);

        let sale = store.sales().submit(&cart, PaymentMethod::Cash, None).await.unwrap();

        assert_eq!(sale.total_amount, Money::from_cents(1900));
        assert_eq!(sale.items[0].final_price, Money::from_cents(1900));
        assert_eq!(sale.items[0].unit_price, Money::from_cents(1000));

        let after = store.products().get(product.id()).await.unwrap();
        assert_eq!(after.product.size_stock("One Size"), Some(3));
    }

    #[tokio::test]
    async fn test_submit_floors_stock_at_zero() {
        let store = store();
        let product = ten_euro_item(&store, 2).await;
        let cart = cart_with(&product, 2, 0);

        // Stock drops behind the cart's back before checkout.
        store.products().set_size_stock(product.id(), "One Size", 1).await.unwrap();
        store.sales().submit(&cart, PaymentMethod::Cash, None).await.unwrap();

        let after = store.products().get(product.id()).await.unwrap();
        assert_eq!(after.total_stock, 0);
    }

    #[tokio::test]
    async fn test_submit_strict_rejects_oversell() {
        let store = Store::new(StoreConfig::instant().with_stock_policy(StockPolicy::Strict));
        let product = ten_euro_item(&store, 2).await;
        let cart = cart_with(&product, 2, 0);
        store.products().set_size_stock(product.id(), "One Size", 1).await.unwrap();

        let err = store.sales().submit(&cart, PaymentMethod::Cash, None).await.unwrap_err();
        assert!(matches!(err, StoreError::InsufficientStock { available: 1, requested: 2, .. }));
        assert!(store.sales().list().await.is_empty());
        assert_eq!(store.products().get(product.id()).await.unwrap().total_stock, 1);
    }

    #[tokio::test]
    async fn test_submit_with_deleted_product_changes_nothing() {
        let store = store();
        let mouse = store.products().get("prod1").await.unwrap();
        let lamp = store.products().get("prod5").await.unwrap();

        let mut cart = Cart::new();
        cart.add_product(&mouse).unwrap();
        cart.add_product(&lamp).unwrap();
        store.products().delete("prod5").await.unwrap();

        let err = store.sales().submit(&cart, PaymentMethod::Cash, None).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.products().get("prod1").await.unwrap().total_stock, 50);
        assert!(store.sales().list().await.is_empty());
    }

    #[tokio::test]
    async fn test_submit_rejects_negative_quantity_from_wire() {
        let store = store();
        let mouse = store.products().get("prod1").await.unwrap();
        let mut cart = Cart::new();
        cart.add_product(&mouse).unwrap();

        let mut value = serde_json::to_value(&cart).unwrap();
        value["items"][0]["quantity"] = serde_json::json!(-5);
        let cart: Cart = serde_json::from_value(value).unwrap();

        let err = store.sales().submit(&cart, PaymentMethod::Cash, None).await.unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::Validation(_))));
        assert_eq!(store.products().get("prod1").await.unwrap().total_stock, 50);
        assert!(store.sales().list().await.is_empty());
    }

    #[tokio::test]
    async fn test_submit_rejects_zero_unit_line() {
        let store = store();
        store.products().set_size_stock("prod2", "XL", 0).await.unwrap();
        let shirt = store.products().get("prod2").await.unwrap();

        let mut cart = Cart::new();
        let line = cart.add_product(&shirt).unwrap().id.clone();
        cart.set_size(&line, "XL").unwrap();
        assert_eq!(cart.items()[0].quantity, 0);

        let err = store.sales().submit(&cart, PaymentMethod::Cash, None).await.unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::Validation(_))));
        assert!(store.sales().list().await.is_empty());
        assert_eq!(store.products().get("prod2").await.unwrap().total_stock, 100);
    }

    #[tokio::test]
    async fn test_submit_empty_cart() {
        let err = store().sales().submit(&Cart::new(), PaymentMethod::Cash, None).await.unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::EmptySale)));
    }

    #[tokio::test]
    async fn test_history_newest_first_and_snapshots() {
        let store = store();
        let mouse = store.products().get("prod1").await.unwrap();
        let lamp = store.products().get("prod5").await.unwrap();

        let first = store
            .sales()
            .submit(&cart_with(&mouse, 1, 0), PaymentMethod::CreditCard, Some("  ".to_string()))
            .await
            .unwrap();
        let second = store
            .sales()
            .submit(&cart_with(&lamp, 1, 0), PaymentMethod::Cash, Some(" gift ".to_string()))
            .await
            .unwrap();

        assert_eq!(first.notes, None);
        assert_eq!(second.notes.as_deref(), Some("gift"));

        let history = store.sales().list().await;
        assert_eq!(history[0].id, second.id);
        assert_eq!(history[1].id, first.id);

        // Renaming the product does not rewrite history.
        let draft = ProductDraft {
            title: "Mouse Pro".to_string(),
            code: mouse.product.code.clone(),
            price: Money::from_cents(9999),
            image: mouse.product.image.clone(),
            sizes: SizesInput::List(mouse.product.sizes.clone()),
            category_id: "cat1".to_string(),
            manufacturer_id: "man1".to_string(),
            is_visible: true,
        };
        store.products().update("prod1", draft).await.unwrap();

        let stored = store.sales().get(&first.id).await.unwrap();
        assert_eq!(stored.items[0].title, "Wireless Mouse");
        assert_eq!(stored.items[0].unit_price, Money::from_cents(2599));
        assert!(store.sales().get("sale404").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_edit_recomputes_and_keeps_identity() {
        let store = store();
        let shirt = store.products().get("prod2").await.unwrap();
        let sale = store
            .sales()
            .submit(&cart_with(&shirt, 3, 0), PaymentMethod::Cash, None)
            .await
            .unwrap();

        let mut edit = SaleEdit::from_sale(&sale);
        edit.items[0] = SaleLineEdit {
            quantity: 2,
            discount: Money::from_cents(99_999),
            unit_price: Money::from_cents(1500),
        };
        edit.payment_method = PaymentMethod::MobilePayment;
        edit.notes = Some("corrected".to_string());

        let edited = store.sales().update(edit).await.unwrap();
        assert_eq!(edited.id, sale.id);
        assert_eq!(edited.submission_date, sale.submission_date);
        assert_eq!(edited.items[0].discount, Money::from_cents(3000));
        assert_eq!(edited.total_amount, Money::zero());
        assert_eq!(edited.payment_method, PaymentMethod::MobilePayment);

        // Reconciliation is off by default.
        assert_eq!(store.products().get("prod2").await.unwrap().product.size_stock("S"), Some(27));
    }

    #[tokio::test]
    async fn test_edit_with_reconciliation_returns_stock() {
        let store = Store::new(StoreConfig::instant().with_reconcile_on_edit(true));
        let shirt = store.products().get("prod2").await.unwrap();
        let sale = store
            .sales()
            .submit(&cart_with(&shirt, 3, 0), PaymentMethod::Cash, None)
            .await
            .unwrap();

        let mut edit = SaleEdit::from_sale(&sale);
        edit.items[0].quantity = 1;
        store.sales().update(edit).await.unwrap();

        assert_eq!(store.products().get("prod2").await.unwrap().product.size_stock("S"), Some(29));
    }

    #[tokio::test]
    async fn test_edit_rejects_quantity_above_bound() {
        let store = store();
        let shirt = store.products().get("prod2").await.unwrap();
        let sale = store
            .sales()
            .submit(&cart_with(&shirt, 3, 0), PaymentMethod::Cash, None)
            .await
            .unwrap();

        // bound = 27 in stock + 3 sold
        let mut edit = SaleEdit::from_sale(&sale);
        edit.items[0].quantity = 31;
        let err = store.sales().update(edit).await.unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::EditQuantityTooLarge { max: 30, .. })));

        let mut edit = SaleEdit::from_sale(&sale);
        edit.sale_id = "sale404".to_string();
        assert!(store.sales().update(edit).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_analytics_over_history() {
        let store = store();
        let mouse = store.products().get("prod1").await.unwrap();
        let lamp = store.products().get("prod5").await.unwrap();

        store
            .sales()
            .submit(&cart_with(&mouse, 2, 0), PaymentMethod::Cash, None)
            .await
            .unwrap();
        store
            .sales()
            .submit(&cart_with(&lamp, 1, 500), PaymentMethod::CreditCard, None)
            .await
            .unwrap();

        let analytics = store.sales().analytics(&DateRange::all()).await;
        assert_eq!(analytics.total_sales_count, 2);
        assert_eq!(analytics.total_items_sold, 3);
        assert_eq!(analytics.total_revenue, Money::from_cents(2 * 2599 + 3000));
        assert_eq!(analytics.top_products_by_quantity[0].id, "prod1");
        assert_eq!(analytics.payment_method_distribution.len(), PaymentMethod::ALL.len());
        assert_eq!(analytics.daily_sales.len(), 1);

        let tomorrow = Utc::now().date_naive().succ_opt();
        let empty = store.sales().analytics(&DateRange::new(tomorrow, None)).await;
        assert_eq!(empty.total_sales_count, 0);
    }
}
