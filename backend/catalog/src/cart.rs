//! # Cart
//!
//! Client-held list of products and quantities. Never persisted server side.
//!
//! Totals are summed in whole cents so the order items were added in cannot
//! change the result.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Category, Product};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("{0} is out of stock")]
    OutOfStock(String),

    #[error("Quantity must be at least 1")]
    InvalidQuantity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub image: Option<String>,
    pub category: Category,
    pub stock: u32,
    pub quantity: u32,
}

impl CartItem {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.images.first().cloned(),
            category: product.category,
            stock: product.stock,
            quantity,
        }
    }

    pub fn line_total(&self) -> f64 {
        from_cents(self.line_cents())
    }

    fn line_cents(&self) -> i64 {
        to_cents(self.price).saturating_mul(i64::from(self.quantity))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Adds `item.quantity` units, merging with an existing line for the same
    /// product. The merged quantity is capped at the item's stock.
    ///
    /// Returns the line's quantity after the add.
    pub fn add(&mut self, item: CartItem) -> Result<u32, CartError> {
        if item.quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if item.stock == 0 {
            return Err(CartError::OutOfStock(item.name));
        }

        match self.items.iter_mut().find(|line| line.id == item.id) {
            Some(line) => {
                line.stock = item.stock;
                line.price = item.price;
                line.quantity = line.quantity.saturating_add(item.quantity).min(item.stock);
                Ok(line.quantity)
            }
            None => {
                let quantity = item.quantity.min(item.stock);
                self.items.push(CartItem { quantity, ..item });
                Ok(quantity)
            }
        }
    }

    /// Zero removes the line. Stock is not consulted here.
    ///
    /// Returns false when the product is not in the cart.
    pub fn set_quantity(&mut self, id: &str, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(id).is_some();
        }

        match self.items.iter_mut().find(|line| line.id == id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<CartItem> {
        let index = self.items.iter().position(|line| line.id == id)?;

        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Saturates instead of overflowing for absurd carts.
    pub fn total_price(&self) -> f64 {
        from_cents(
            self.items
                .iter()
                .map(CartItem::line_cents)
                .fold(0, i64::saturating_add),
        )
    }
}

// `as` saturates for out of range floats
fn to_cents(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: f64, stock: u32, quantity: u32) -> CartItem {
        CartItem {
            id: id.to_string(),
            name: format!("Item {id}"),
            price,
            image: None,
            category: Category::Other,
            stock,
            quantity,
        }
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add(item("a", 2.5, 10, 2)).unwrap();
        cart.add(item("b", 0.1, 10, 3)).unwrap();

        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total_price(), 5.3);
    }

    #[test]
    fn test_total_ignores_add_order() {
        let adds = [
            item("a", 19.99, 50, 3),
            item("b", 0.1, 50, 7),
            item("c", 5.05, 50, 1),
            item("a", 19.99, 50, 2),
            item("d", 1234.56, 50, 4),
        ];

        let mut forward = Cart::new();
        for add in adds.iter().cloned() {
            forward.add(add).unwrap();
        }

        let mut backward = Cart::new();
        for add in adds.iter().rev().cloned() {
            backward.add(add).unwrap();
        }

        assert_eq!(forward.total_price(), backward.total_price());
        assert_eq!(forward.total_items(), backward.total_items());
        assert_eq!(forward.get("a").unwrap().quantity, 5);
    }

    #[test]
    fn test_zero_quantity_removes() {
        let mut cart = Cart::new();
        cart.add(item("a", 1.0, 5, 1)).unwrap();
        cart.add(item("b", 1.0, 5, 1)).unwrap();

        assert!(cart.set_quantity("a", 0));
        assert!(cart.get("a").is_none());
        assert_eq!(cart.items().len(), 1);
        assert!(!cart.set_quantity("a", 0));
    }

    #[test]
    fn test_set_quantity_does_not_clamp() {
        let mut cart = Cart::new();
        cart.add(item("a", 1.0, 2, 1)).unwrap();

        assert!(cart.set_quantity("a", 9));
        assert_eq!(cart.get("a").unwrap().quantity, 9);
        assert!(!cart.set_quantity("missing", 1));
    }

    #[test]
    fn test_add_clamps_to_stock() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(item("a", 1.0, 3, 2)), Ok(2));
        assert_eq!(cart.add(item("a", 1.0, 3, 2)), Ok(3));
        assert_eq!(cart.add(item("b", 1.0, 1, 4)), Ok(1));
    }

    #[test]
    fn test_add_rejects() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.add(item("a", 1.0, 0, 1)),
            Err(CartError::OutOfStock("Item a".to_string()))
        );
        assert_eq!(cart.add(item("a", 1.0, 5, 0)), Err(CartError::InvalidQuantity));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(item("a", 1.0, 5, 1)).unwrap();
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), 0.0);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(item("a", 19.99, 10, 3).line_total(), 59.97);
    }

    #[test]
    fn test_totals_at_quantity_limits() {
        let mut cart = Cart::new();
        cart.add(item("a", 1.0, u32::MAX, u32::MAX)).unwrap();
        cart.add(item("b", 1.0, u32::MAX, 1)).unwrap();
        assert!(cart.set_quantity("b", u32::MAX));

        assert_eq!(cart.total_items(), 2 * u64::from(u32::MAX));
        assert_eq!(cart.total_price(), 2.0 * f64::from(u32::MAX));
    }

    #[test]
    fn test_huge_prices_saturate() {
        let mut cart = Cart::new();
        cart.add(item("a", 1e17, 10, 2)).unwrap();
        cart.add(item("b", 1e17, 10, 2)).unwrap();

        assert_eq!(cart.total_price(), i64::MAX as f64 / 100.0);
        assert_eq!(item("c", f64::MAX, 1, 1).line_total(), i64::MAX as f64 / 100.0);
    }

    #[test]
    fn test_largest_valid_line_is_exact() {
        let line = item("a", crate::product::MAX_PRICE, u32::MAX, u32::MAX);

        assert_eq!(line.line_cents(), 100_000_000 * i64::from(u32::MAX));
    }
}
