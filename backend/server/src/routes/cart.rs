use std::sync::Arc;

use axum::{Json, extract::State};
use catalog::{Cart, CartItem};
use serde::{Deserialize, Serialize};

use super::{ApiResult, AppJson, Envelope};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct CartRequest {
    #[serde(default)]
    pub items: Vec<CartLine>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub items: Vec<CartItem>,
    pub total_items: u64,
    pub total_price: f64,
    pub unavailable: Vec<String>,
}

/// Rebuilds a client-held cart from live catalog data. Lines for missing,
/// hidden or sold out products are reported instead of priced; quantities are
/// capped at current stock.
pub async fn summarize_cart(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<CartRequest>,
) -> ApiResult<CartSummary> {
    let mut cart = Cart::new();
    let mut unavailable = Vec::new();

    for line in request.items.into_iter().filter(|line| line.quantity > 0) {
        let priced = match state.store.product(&line.product_id).await? {
            Some(product) if product.is_listed() => {
                cart.add(CartItem::from_product(&product, line.quantity)).is_ok()
            }
            _ => false,
        };

        if !priced {
            unavailable.push(line.product_id);
        }
    }

    Ok(Json(Envelope::data(CartSummary {
        total_items: cart.total_items(),
        total_price: cart.total_price(),
        items: cart.items().to_vec(),
        unavailable,
    })))
}
