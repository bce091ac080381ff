//! # Inventory Report
//!
//! Builds a store from config (seeded by default) and prints the inventory
//! overview, or the product rows as JSON.
//!
//! ## Usage
//! ```bash
//! # Inventory summary + per-product stock table
//! cargo run -p tally-store --bin tally-report
//!
//! # Only products matching "shirt"
//! cargo run -p tally-store --bin tally-report -- --filter shirt
//!
//! # Export rows as JSON
//! cargo run -p tally-store --bin tally-report -- --rows
//!
//! # Use a specific config file
//! cargo run -p tally-store --bin tally-report -- --config ./store.toml
//! ```
//!
//! Logging follows `RUST_LOG` (default `info,tally=debug`).

use std::env;
use std::path::PathBuf;
use tally_core::inventory::{filter_products, StockStatus};
use tally_store::{Store, StoreConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut filter: Option<String> = None;
    let mut rows = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--filter" | "-f" => {
                if i + 1 < args.len() {
                    filter = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--rows" | "-r" => rows = true,
            "--help" | "-h" => {
                println!("Tally POS Inventory Report");
                println!();
                println!("Usage: tally-report [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>   Store config file (default: platform config dir)");
                println!("  -f, --filter <TEXT>   Only products whose title or code matches");
                println!("  -r, --rows            Print product rows as JSON");
                println!("  -h, --help            Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    let config = StoreConfig::load(config_path)?;
    let store = Store::new(config);
    info!("Store ready");

    if rows {
        let rows = store.products().export_rows().await;
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let summary = store.products().inventory_summary(filter.as_deref()).await;
    let threshold = store.config().stock.low_stock_threshold;

    println!("📦 Tally POS Inventory");
    println!("======================");
    println!("Products:        {}", summary.product_count);
    println!("Items in stock:  {}", summary.total_items_in_stock);
    println!("Out of stock:    {}", summary.out_of_stock_count);
    println!("Low stock (≤{}): {}", threshold, summary.low_stock_count);
    println!();

    let products = store.products().list_all().await;
    for product in filter_products(&products, filter.as_deref()) {
        let marker = match StockStatus::of(product.total_stock, threshold) {
            StockStatus::InStock => "✓",
            StockStatus::LowStock => "⚠",
            StockStatus::OutOfStock => "✗",
        };
        let sizes: Vec<String> = product
            .product
            .sizes
            .iter()
            .map(|s| format!("{}:{}", s.size, s.stock))
            .collect();

        println!(
            "{} {:<10} {:<28} {:>10} {:>5}  [{}]{}",
            marker,
            product.product.code,
            product.product.title,
            store.config().format_currency(product.product.price),
            product.total_stock,
            sizes.join(", "),
            if product.product.is_visible { "" } else { " (hidden)" },
        );
    }

    Ok(())
}

/// Installs the fmt subscriber, honoring `RUST_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();
}
