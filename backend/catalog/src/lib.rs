//! # Catalog
//!
//! Storefront records and the rules that sit on top of them.
//!
//! Nothing in here touches the network or the database. The server crate
//! persists these records and the UI mirrors these rules, so both sides agree
//! on what a valid password, a cart total or an order status is.
//!
//! ## Records
//! - [`Product`]: SKU-like catalog entry, priced in dollars, stock as a count
//! - [`User`]: account with a role, password kept as a PHC hash string
//! - [`Order`]: snapshot of purchased items plus a shipping address
//!
//! ## Rules
//! - [`password`]: policy violations for a candidate password
//! - [`cart`]: client-held cart and its derived totals
//! - [`featured`]: timed rotation over the featured products
use thiserror::Error;

pub mod cart;
pub mod featured;
pub mod order;
pub mod password;
pub mod product;
pub mod user;

pub use cart::{Cart, CartError, CartItem};
pub use featured::Rotation;
pub use order::{Order, OrderItem, OrderStatus, ShippingAddress};
pub use password::{Violation, validate_password};
pub use product::{Category, Product, ProductInput};
pub use user::{PublicUser, Role, User};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
