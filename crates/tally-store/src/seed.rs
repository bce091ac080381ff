//! # Seed Data
//!
//! The demo catalog a fresh store starts with.
//!
//! ## Contents
//! - 7 categories + `Uncategorized`
//! - 10 manufacturers + `Unknown Manufacturer`
//! - 8 products, one of them hidden (`prod8`) and one sold out (`prod6`)
//! - no sales

use tally_core::{
    Category, Manufacturer, Money, Product, SizeStock, UNCATEGORIZED_ID, UNCATEGORIZED_NAME,
    UNKNOWN_MANUFACTURER_ID, UNKNOWN_MANUFACTURER_NAME,
};

use crate::store::Catalog;

const CATEGORIES: &[(&str, &str)] = &[
    ("cat1", "Electronics"),
    ("cat2", "Clothing"),
    ("cat3", "Groceries"),
    ("cat4", "Books"),
    ("cat5", "Home Goods"),
    ("cat6", "Toys"),
    ("cat7", "Sports"),
    (UNCATEGORIZED_ID, UNCATEGORIZED_NAME),
];

const MANUFACTURERS: &[(&str, &str)] = &[
    ("man1", "LogiTech"),
    ("man2", "FashionCo"),
    ("man3", "FreshFarms"),
    ("man4", "PubHouse"),
    ("man5", "LightUp"),
    ("man6", "PlayFun"),
    ("man7", "SoundWave"),
    ("man8", "FitGear"),
    ("man9", "TechGiant Inc."),
    ("man10", "HomeEssentials Ltd."),
    (UNKNOWN_MANUFACTURER_ID, UNKNOWN_MANUFACTURER_NAME),
];

/// (id, title, price cents, code, image seed, sizes, category, manufacturer, visible)
type ProductSeed = (
    &'static str,
    &'static str,
    i64,
    &'static str,
    &'static str,
    &'static [(&'static str, i64)],
    &'static str,
    &'static str,
    bool,
);

const PRODUCTS: &[ProductSeed] = &[
    ("prod1", "Wireless Mouse", 2599, "WM001", "mouse", &[("One Size", 50)], "cat1", "man1", true),
    (
        "prod2",
        "Cotton T-Shirt",
        1999,
        "CT002",
        "tshirt",
        &[("S", 30), ("M", 40), ("L", 30), ("XL", 20)],
        "cat2",
        "man2",
        true,
    ),
    ("prod3", "Organic Apples (1kg)", 450, "GA003", "apples", &[("1kg Bag", 200)], "cat3", "man3", true),
    ("prod4", "Sci-Fi Novel: \"Galaxy\"", 1275, "BK004", "book", &[("Hardcover", 30)], "cat4", "man4", true),
    ("prod5", "LED Desk Lamp", 3500, "HL005", "lamp", &[("Standard", 45)], "cat5", "man5", true),
    ("prod6", "Building Blocks Set", 2999, "TY006", "blocks", &[("500 Pieces", 0)], "cat6", "man6", true),
    ("prod7", "Bluetooth Headphones", 7999, "EH007", "headphones", &[("One Size", 60)], "cat1", "man7", true),
    (
        "prod8",
        "Running Shoes",
        9950,
        "RS008",
        "shoes",
        &[("8", 15), ("9", 25), ("10", 20), ("11", 10)],
        "cat2",
        "man8",
        false,
    ),
];

fn image_url(seed: &str) -> String {
    format!("https://picsum.photos/seed/{}/100/100", seed)
}

/// Builds the demo catalog.
pub(crate) fn catalog() -> Catalog {
    let categories = CATEGORIES
        .iter()
        .map(|(id, name)| Category {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect();

    let manufacturers = MANUFACTURERS
        .iter()
        .map(|(id, name)| Manufacturer {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect();

    let products = PRODUCTS
        .iter()
        .map(
            |&(id, title, cents, code, image, sizes, category_id, manufacturer_id, is_visible)| Product {
                id: id.to_string(),
                title: title.to_string(),
                code: code.to_string(),
                price: Money::from_cents(cents),
                image: image_url(image),
                sizes: sizes.iter().map(|&(size, stock)| SizeStock::new(size, stock)).collect(),
                category_id: category_id.to_string(),
                manufacturer_id: manufacturer_id.to_string(),
                is_visible,
            },
        )
        .collect();

    Catalog {
        categories,
        manufacturers,
        products,
        sales: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_references_resolve() {
        let catalog = catalog();
        for product in &catalog.products {
            assert!(catalog.check_references(&product.category_id, &product.manufacturer_id).is_ok());
        }
    }

    #[test]
    fn test_seed_stock() {
        let catalog = catalog();
        let shirt = catalog.product("prod2").unwrap();
        assert_eq!(shirt.total_stock(), 120);
        assert_eq!(catalog.product("prod6").unwrap().total_stock(), 0);
        assert!(!catalog.product("prod8").unwrap().is_visible);
        assert_eq!(catalog.product("prod3").unwrap().price, Money::from_cents(450));
    }
}
