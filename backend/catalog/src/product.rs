use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ParseEnumError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cleaning,
    Packaging,
    Safety,
    Storage,
    Equipment,
    Electronics,
    Clothing,
    Books,
    Home,
    Sports,
    Other,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Cleaning,
        Category::Packaging,
        Category::Safety,
        Category::Storage,
        Category::Equipment,
        Category::Electronics,
        Category::Clothing,
        Category::Books,
        Category::Home,
        Category::Sports,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cleaning => "cleaning",
            Category::Packaging => "packaging",
            Category::Safety => "safety",
            Category::Storage => "storage",
            Category::Equipment => "equipment",
            Category::Electronics => "electronics",
            Category::Clothing => "clothing",
            Category::Books => "books",
            Category::Home => "home",
            Category::Sports => "sports",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("category", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: Category,
    pub images: Vec<String>,
    pub stock: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Visible to shoppers.
    pub fn is_listed(&self) -> bool {
        self.is_active
    }
}

/// Highest accepted price. A full line at this price and `u32::MAX` units
/// still fits in `i64` cents.
pub const MAX_PRICE: f64 = 1_000_000.0;

/// Create/update payload for a product.
///
/// `stock` is signed so a negative value reaches [`ProductInput::validate`]
/// instead of failing deserialization with an opaque message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub category: Category,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl ProductInput {
    /// Every problem with the payload, empty when it can be stored.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Name is required".to_string());
        }
        if self.description.trim().is_empty() {
            errors.push("Description is required".to_string());
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            errors.push("Price must be positive".to_string());
        } else if self.price > MAX_PRICE {
            errors.push("Price is too large".to_string());
        }
        if self.stock < 0 {
            errors.push("Stock must be non-negative".to_string());
        } else if u32::try_from(self.stock).is_err() {
            errors.push("Stock is too large".to_string());
        }
        if self.images.iter().any(|url| url.trim().is_empty()) {
            errors.push("Image URLs cannot be empty".to_string());
        }

        errors
    }

    pub fn into_product(self, id: String, now: DateTime<Utc>) -> Product {
        let mut product = Product {
            id,
            name: String::new(),
            description: String::new(),
            price: 0.0,
            category: self.category,
            images: Vec::new(),
            stock: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.apply_to(&mut product, now);

        product
    }

    /// Overwrites every editable field, keeping id and creation time.
    pub fn apply_to(self, product: &mut Product, now: DateTime<Utc>) {
        product.name = self.name.trim().to_string();
        product.description = self.description.trim().to_string();
        product.price = self.price;
        product.category = self.category;
        product.images = self.images.into_iter().map(|url| url.trim().to_string()).collect();
        product.stock = u32::try_from(self.stock.max(0)).unwrap_or(u32::MAX);
        product.is_active = self.is_active;
        product.updated_at = now;
    }
}
