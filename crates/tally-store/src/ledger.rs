//! # Stock Ledger
//!
//! Per-size stock mutations on the catalog. Callers hold the write lock.
//!
//! ## Sale Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    apply_sale(items, policy)                            │
//! │                                                                         │
//! │  Phase 1: check (nothing mutated yet)                                  │
//! │  ├── every product id exists          else NotFound                    │
//! │  ├── every size exists                else SizeNotFound                │
//! │  └── Strict: summed qty <= stock      else InsufficientStock           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Phase 2: decrement                                                    │
//! │  └── stock = max(0, stock - qty)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock never goes below zero on any path.

use std::collections::BTreeMap;
use tally_core::sale::StockDelta;
use tally_core::SaleItemRecord;
use tracing::{debug, warn};

use crate::config::StockPolicy;
use crate::error::{StoreError, StoreResult};
use crate::store::Catalog;

impl Catalog {
    /// Sets one size's stock. Negative input is stored as 0.
    ///
    /// Returns the stored value.
    pub(crate) fn set_size_stock(&mut self, product_id: &str, size: &str, new_stock: i64) -> StoreResult<i64> {
        let product = self.product_mut(product_id)?;
        let entry = product
            .size_mut(size)
            .ok_or_else(|| StoreError::size_not_found(product_id, size))?;

        if new_stock < 0 {
            warn!(product_id = %product_id, size = %size, requested = new_stock, "Negative stock clamped to 0");
        }
        entry.stock = new_stock.max(0);
        Ok(entry.stock)
    }

    /// Adds `delta` to one size's stock, flooring at 0.
    ///
    /// Returns the stored value.
    pub(crate) fn adjust_size_stock(&mut self, product_id: &str, size: &str, delta: i64) -> StoreResult<i64> {
        let product = self.product_mut(product_id)?;
        let entry = product
            .size_mut(size)
            .ok_or_else(|| StoreError::size_not_found(product_id, size))?;

        let target = entry.stock.saturating_add(delta);
        if target < 0 {
            warn!(
                product_id = %product_id,
                size = %size,
                stock = entry.stock,
                delta,
                "Stock adjustment would go negative, clamped to 0"
            );
        }
        entry.stock = target.max(0);
        Ok(entry.stock)
    }

    /// Removes `quantity` units of one size for a sold line.
    pub(crate) fn decrement_for_sale(
        &mut self,
        product_id: &str,
        size: &str,
        quantity: i64,
        policy: StockPolicy,
    ) -> StoreResult<i64> {
        let product = self.product(product_id)?;
        let available = product
            .size_stock(size)
            .ok_or_else(|| StoreError::size_not_found(product_id, size))?;

        if policy == StockPolicy::Strict && quantity > available {
            return Err(StoreError::InsufficientStock {
                code: product.code.clone(),
                size: size.to_string(),
                available,
                requested: quantity,
            });
        }

        self.adjust_size_stock(product_id, size, quantity.saturating_neg())
    }

    /// Checks every line, then decrements all of them.
    ///
    /// Either every line is applied or none is.
    pub(crate) fn apply_sale(&mut self, items: &[SaleItemRecord], policy: StockPolicy) -> StoreResult<()> {
        let mut requested: BTreeMap<(&str, &str), i64> = BTreeMap::new();
        for item in items {
            let total = requested
                .entry((item.product_id.as_str(), item.selected_size.as_str()))
                .or_default();
            *total = total.saturating_add(item.quantity);
        }

        for (&(product_id, size), &quantity) in &requested {
            let product = self.product(product_id)?;
            let available = product
                .size_stock(size)
                .ok_or_else(|| StoreError::size_not_found(product_id, size))?;

            if policy == StockPolicy::Strict && quantity > available {
                return Err(StoreError::InsufficientStock {
                    code: product.code.clone(),
                    size: size.to_string(),
                    available,
                    requested: quantity,
                });
            }
        }

        for (&(product_id, size), &quantity) in &requested {
            let remaining = self.adjust_size_stock(product_id, size, quantity.saturating_neg())?;
            debug!(product_id = %product_id, size = %size, quantity, remaining, "Stock decremented");
        }

        Ok(())
    }

    /// Gives back (or takes) stock after a sale edit.
    ///
    /// Lines whose product or size has since disappeared are skipped.
    pub(crate) fn apply_stock_deltas(&mut self, deltas: &[StockDelta]) {
        for delta in deltas {
            match self.adjust_size_stock(&delta.product_id, &delta.size, delta.delta) {
                Ok(remaining) => debug!(
                    product_id = %delta.product_id,
                    size = %delta.size,
                    delta = delta.delta,
                    remaining,
                    "Stock reconciled"
                ),
                Err(e) => warn!(error = %e, "Skipping stock reconciliation for missing line"),
            }
        }
    }
}
