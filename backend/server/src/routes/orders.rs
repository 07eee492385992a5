use std::{collections::HashMap, sync::Arc};

use axum::{Json, extract::State, http::StatusCode};
use catalog::{Cart, CartItem, Order, OrderItem, OrderStatus, ShippingAddress};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::{AppJson, Created, Envelope, cart::CartLine};
use crate::{
    auth::AuthUser,
    error::AppError,
    state::AppState,
    utils::{new_id, order_number},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<CartLine>,
    pub shipping_address: ShippingAddress,
}

/// Same product listed twice becomes one line, first position wins.
fn merge_lines(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut merged: Vec<CartLine> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for line in lines {
        match positions.get(&line.product_id) {
            Some(&index) => {
                merged[index].quantity = merged[index].quantity.saturating_add(line.quantity);
            }
            None => {
                positions.insert(line.product_id.clone(), merged.len());
                merged.push(line);
            }
        }
    }

    merged
}

/// Places an order from a cart. Prices and names are snapshotted; stock is
/// checked but not reserved.
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    AppJson(request): AppJson<CreateOrderRequest>,
) -> Created<Order> {
    if !state.config.checkout_enabled {
        return Err(AppError::Forbidden(
            "Checkout is currently disabled".to_string(),
        ));
    }

    if request.items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_string()));
    }

    let missing = request.shipping_address.missing_fields();
    if !missing.is_empty() {
        return Err(AppError::validation(
            "Shipping address is incomplete",
            missing.iter().map(|field| format!("{field} is required")).collect(),
        ));
    }

    let mut cart = Cart::new();
    for line in merge_lines(request.items) {
        let product = state
            .store
            .product(&line.product_id)
            .await?
            .filter(|product| product.is_listed())
            .ok_or_else(|| {
                AppError::NotFound(format!("Product {} is not available", line.product_id))
            })?;

        if line.quantity == 0 {
            return Err(AppError::BadRequest(format!(
                "Quantity for {} must be at least 1",
                product.name
            )));
        }
        if line.quantity > product.stock {
            return Err(AppError::BadRequest(format!(
                "Only {} of {} left in stock",
                product.stock, product.name
            )));
        }

        cart.add(CartItem::from_product(&product, line.quantity))
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
    }

    let now = Utc::now();
    let order = Order {
        id: new_id(),
        order_number: order_number(now),
        user_id: caller.user.id.clone(),
        items: cart
            .items()
            .iter()
            .map(|item| OrderItem {
                product_id: item.id.clone(),
                name: item.name.clone(),
                price: item.price,
                quantity: item.quantity,
            })
            .collect(),
        total: cart.total_price(),
        status: OrderStatus::Pending,
        shipping_address: request.shipping_address,
        created_at: now,
        updated_at: now,
    };

    state.store.save_order(&order).await?;

    info!("Order {} placed by {}", order.order_number, caller.user.id);

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(order).with_message("Order placed successfully")),
    ))
}
