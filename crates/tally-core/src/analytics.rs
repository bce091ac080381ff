//! # Sales Analytics
//!
//! Aggregates over the sales history for the admin dashboard.
//!
//! ```text
//! sales ──► filter by DateRange (inclusive, UTC days)
//!             │
//!             ├──► totals: revenue, count, items, average
//!             ├──► per product ──► top 5 by quantity / by revenue
//!             ├──► per category / manufacturer id (current names)
//!             ├──► per payment method (every method, with share)
//!             └──► per day, newest first
//! ```
//!
//! Revenue is always the sum of line final prices. Category and
//! manufacturer attribution uses the product as it is *now*; lines whose
//! product has been deleted still count towards totals and product
//! rankings but not towards category/manufacturer revenue.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{format_percentage, Money};
use crate::types::{PaymentMethod, ProductView, SubmittedSale};
use crate::TOP_PRODUCTS_LIMIT;

// =============================================================================
// Inputs
// =============================================================================

/// Inclusive range of calendar days (UTC). Open ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[ts(as = "Option<String>")]
    pub from: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Everything.
    pub fn all() -> Self {
        DateRange::default()
    }

    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        DateRange { from, to }
    }

    /// Whether the instant falls on a day inside the range.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let day = at.date_naive();
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }
}

// =============================================================================
// Outputs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub id: String,
    pub title: String,
    pub code: String,
    pub quantity: i64,
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RevenueShare {
    pub name: String,
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentShare {
    pub method: PaymentMethod,
    pub count: usize,
    /// One decimal, e.g. `"33.3%"`.
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub sales_count: usize,
    pub total_revenue: Money,
}

/// Everything the analytics page shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesAnalytics {
    pub total_revenue: Money,
    pub total_sales_count: usize,
    pub total_items_sold: i64,
    /// Rounded half up to the cent.
    pub average_sale_value: Money,
    pub top_products_by_quantity: Vec<ProductSales>,
    pub top_products_by_revenue: Vec<ProductSales>,
    pub revenue_by_category: Vec<RevenueShare>,
    pub revenue_by_manufacturer: Vec<RevenueShare>,
    pub payment_method_distribution: Vec<PaymentShare>,
    /// Newest day first.
    pub daily_sales: Vec<DailySales>,
}

// =============================================================================
// Computation
// =============================================================================

/// Computes the analytics for sales inside `range`.
///
/// ## Arguments
/// * `sales` - the sales history, any order
/// * `products` - the current catalog (for names and category attribution)
/// * `range` - inclusive day range
pub fn compute_analytics(sales: &[SubmittedSale], products: &[ProductView], range: &DateRange) -> SalesAnalytics {
    let catalog: HashMap<&str, &ProductView> = products.iter().map(|p| (p.id(), p)).collect();

    let mut analytics = SalesAnalytics::default();
    let mut per_product: BTreeMap<&str, ProductSales> = BTreeMap::new();
    // Keyed by id; the name rides along for display.
    let mut per_category: BTreeMap<&str, (&str, Money)> = BTreeMap::new();
    let mut per_manufacturer: BTreeMap<&str, (&str, Money)> = BTreeMap::new();
    let mut per_method: HashMap<PaymentMethod, usize> = HashMap::new();
    let mut per_day: BTreeMap<NaiveDate, DailySales> = BTreeMap::new();

    for sale in sales.iter().filter(|s| range.contains(s.submission_date)) {
        analytics.total_sales_count += 1;
        analytics.total_revenue += sale.total_amount;
        analytics.total_items_sold = analytics.total_items_sold.saturating_add(sale.items_sold());

        *per_method.entry(sale.payment_method).or_default() += 1;

        let day = sale.submission_date.date_naive();
        let daily = per_day.entry(day).or_insert_with(|| DailySales {
            date: day,
            sales_count: 0,
            total_revenue: Money::zero(),
        });
        daily.sales_count += 1;
        daily.total_revenue += sale.total_amount;

        for item in &sale.items {
            let current = catalog.get(item.product_id.as_str());
            let entry = per_product.entry(item.product_id.as_str()).or_insert_with(|| ProductSales {
                id: item.product_id.clone(),
                title: current.map_or_else(|| item.title.clone(), |p| p.product.title.clone()),
                code: current.map_or_else(|| item.code.clone(), |p| p.product.code.clone()),
                quantity: 0,
                revenue: Money::zero(),
            });
            entry.quantity = entry.quantity.saturating_add(item.quantity);
            entry.revenue += item.final_price;

            if let Some(product) = current {
                per_category
                    .entry(product.product.category_id.as_str())
                    .or_insert((product.category_name.as_str(), Money::zero()))
                    .1 += item.final_price;
                per_manufacturer
                    .entry(product.product.manufacturer_id.as_str())
                    .or_insert((product.manufacturer_name.as_str(), Money::zero()))
                    .1 += item.final_price;
            }
        }
    }

    if analytics.total_sales_count > 0 {
        let count = analytics.total_sales_count as i128;
        let average = (i128::from(analytics.total_revenue.cents()) * 2 + count) / (count * 2);
        analytics.average_sale_value = Money::from_cents(average as i64);
    }

    let ranked: Vec<ProductSales> = per_product.into_values().collect();

    let mut by_quantity = ranked.clone();
    by_quantity.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    by_quantity.truncate(TOP_PRODUCTS_LIMIT);
    analytics.top_products_by_quantity = by_quantity;

    let mut by_revenue = ranked;
    by_revenue.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    by_revenue.truncate(TOP_PRODUCTS_LIMIT);
    analytics.top_products_by_revenue = by_revenue;

    analytics.revenue_by_category = rank_revenue(per_category);
    analytics.revenue_by_manufacturer = rank_revenue(per_manufacturer);

    let total = analytics.total_sales_count as i64;
    analytics.payment_method_distribution = PaymentMethod::ALL
        .into_iter()
        .map(|method| {
            let count = per_method.get(&method).copied().unwrap_or(0);
            PaymentShare {
                method,
                count,
                percentage: format_percentage(count as i64, total),
            }
        })
        .collect();

    analytics.daily_sales = per_day.into_values().rev().collect();

    analytics
}

fn rank_revenue(totals: BTreeMap<&str, (&str, Money)>) -> Vec<RevenueShare> {
    let mut shares: Vec<RevenueShare> = totals
        .into_values()
        .map(|(name, revenue)| RevenueShare {
            name: name.to_string(),
            revenue,
        })
        .collect();
    shares.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    shares
}

// =============================================================================
// Unit Tests
// =============================================================================
