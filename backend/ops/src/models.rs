use catalog::{Category, Order, ProductInput};
use serde::{Deserialize, Serialize};

use crate::utils::{clean_name, parse_category};

/// Response body shared by every API route.
#[derive(Deserialize, Debug)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Deserialize, Debug)]
pub struct Session {
    pub token: String,
}

#[derive(Serialize, Debug)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SeedStatus {
    pub total_products: usize,
    pub categories: Vec<CategoryCount>,
}

#[derive(Deserialize, Debug)]
pub struct CategoryCount {
    #[serde(rename = "_id")]
    pub category: Category,
    pub count: usize,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate<'a> {
    pub order_id: &'a str,
    pub status: &'a str,
}

pub type Orders = Vec<Order>;

/// One product in an import file. Looser than [`ProductInput`]: names and
/// categories are cleaned up before sending.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub category: String,
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

impl ImportRecord {
    pub fn into_input(self) -> Result<ProductInput, String> {
        let category = parse_category(&self.category)
            .ok_or_else(|| format!("Unknown category {:?}", self.category))?;

        let input = ProductInput {
            name: clean_name(&self.name),
            description: self.description.trim().to_string(),
            price: self.price,
            category,
            images: self.images,
            stock: self.stock,
            is_active: self.is_active,
        };

        let errors = input.validate();
        if errors.is_empty() {
            Ok(input)
        } else {
            Err(errors.join(", "))
        }
    }
}
