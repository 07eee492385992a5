//! Built-in sample catalog for development databases.
use catalog::{Category, Product};
use chrono::{DateTime, TimeDelta, Utc};

use crate::utils::new_id;

// name, description, price, category, stock
const SAMPLES: [(&str, &str, f64, Category, u32); 12] = [
    (
        "Multi-Surface Cleaner",
        "Concentrated cleaner for counters, floors and glass. Makes 20 litres.",
        12.99,
        Category::Cleaning,
        120,
    ),
    (
        "Microfiber Cloth Pack",
        "Twelve lint free cloths, machine washable.",
        9.49,
        Category::Cleaning,
        300,
    ),
    (
        "Corrugated Shipping Boxes",
        "Pack of 25 medium double wall boxes.",
        34.00,
        Category::Packaging,
        80,
    ),
    (
        "Bubble Wrap Roll",
        "30 cm by 50 m roll with perforations every 30 cm.",
        18.75,
        Category::Packaging,
        45,
    ),
    (
        "Nitrile Gloves",
        "Box of 100 powder free gloves, size large.",
        14.25,
        Category::Safety,
        200,
    ),
    (
        "Safety Goggles",
        "Anti fog goggles with an adjustable strap.",
        7.99,
        Category::Safety,
        0,
    ),
    (
        "Stackable Storage Bins",
        "Set of four 20 litre bins with lids.",
        39.90,
        Category::Storage,
        60,
    ),
    (
        "Steel Shelving Unit",
        "Five shelf unit rated at 150 kg per shelf.",
        129.00,
        Category::Equipment,
        12,
    ),
    (
        "Label Printer",
        "Thermal label printer with USB and Bluetooth.",
        89.95,
        Category::Electronics,
        25,
    ),
    (
        "Work Jacket",
        "Water resistant jacket with reflective strips.",
        64.50,
        Category::Clothing,
        40,
    ),
    (
        "Warehouse Operations Handbook",
        "Practical guide to receiving, picking and shipping.",
        24.00,
        Category::Books,
        70,
    ),
    (
        "Desk Organizer",
        "Bamboo organizer with five compartments.",
        19.99,
        Category::Home,
        90,
    ),
];

/// Fresh products for an empty catalog. Creation times are a second apart so
/// the first sample is the newest.
pub fn sample_products(now: DateTime<Utc>) -> Vec<Product> {
    SAMPLES
        .iter()
        .enumerate()
        .map(|(i, &(name, description, price, category, stock))| {
            let created_at = now - TimeDelta::seconds(i as i64);

            Product {
                id: new_id(),
                name: name.to_string(),
                description: description.to_string(),
                price,
                category,
                images: vec![format!("/images/products/{}.jpg", slug(name))],
                stock,
                is_active: true,
                created_at,
                updated_at: created_at,
            }
        })
        .collect()
}

fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}
