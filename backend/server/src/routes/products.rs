use std::{
    cmp::Reverse,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use catalog::{Category, Product, ProductInput, Rotation, featured::DEFAULT_INTERVAL};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ApiResult, AppJson, Created, Envelope};
use crate::{
    auth::{AdminUser, MaybeUser},
    error::AppError,
    state::AppState,
    utils::{clamp_limit, new_id},
};

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;
pub const FEATURED_COUNT: usize = 5;

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub limit: Option<usize>,
    pub category: Option<Category>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Featured {
    pub product: Product,
    pub index: usize,
    pub count: usize,
    pub next_rotation_ms: u64,
}

fn not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}

fn newest_first(products: &mut [Product]) {
    products.sort_by_key(|product| (Reverse(product.created_at), product.name.clone()));
}

pub async fn list_products(
    State(state): State<Arc<AppState>>,
    viewer: MaybeUser,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Vec<Product>> {
    let show_inactive = viewer.is_admin();

    let mut products: Vec<Product> = state
        .store
        .products()
        .await?
        .into_iter()
        .filter(|product| show_inactive || product.is_listed())
        .filter(|product| query.category.is_none_or(|category| product.category == category))
        .collect();

    newest_first(&mut products);
    products.truncate(clamp_limit(query.limit, DEFAULT_LIMIT, MAX_LIMIT));

    Ok(Json(Envelope::data(products)))
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    viewer: MaybeUser,
    Path(id): Path<String>,
) -> ApiResult<Product> {
    let product = state.store.product(&id).await?.ok_or_else(not_found)?;

    if !product.is_listed() && !viewer.is_admin() {
        return Err(not_found());
    }

    Ok(Json(Envelope::data(product)))
}

/// Current pick from the newest in-stock products, rotating on a fixed
/// interval of wall-clock time.
pub async fn featured_product(State(state): State<Arc<AppState>>) -> ApiResult<Featured> {
    let mut candidates: Vec<Product> = state
        .store
        .products()
        .await?
        .into_iter()
        .filter(|product| product.is_listed() && product.in_stock())
        .collect();

    newest_first(&mut candidates);
    candidates.truncate(FEATURED_COUNT);

    let rotation = Rotation::new(candidates.len(), DEFAULT_INTERVAL);
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();

    let index = rotation
        .index_at(elapsed)
        .ok_or_else(|| AppError::NotFound("No featured products".to_string()))?;

    Ok(Json(Envelope::data(Featured {
        product: candidates.swap_remove(index),
        index,
        count: rotation.len(),
        next_rotation_ms: rotation.next_change_in(elapsed).as_millis() as u64,
    })))
}

fn check(input: &ProductInput) -> Result<(), AppError> {
    let errors = input.validate();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation("Invalid product data", errors))
    }
}

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    AppJson(input): AppJson<ProductInput>,
) -> Created<Product> {
    check(&input)?;

    let product = input.into_product(new_id(), Utc::now());
    state.store.save_product(&product).await?;

    info!("Product {} created by {}", product.id, admin.id);

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(product).with_message("Product created successfully")),
    ))
}

pub async fn update_product(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    AppJson(input): AppJson<ProductInput>,
) -> ApiResult<Product> {
    let mut product = state.store.product(&id).await?.ok_or_else(not_found)?;

    check(&input)?;
    input.apply_to(&mut product, Utc::now());
    state.store.save_product(&product).await?;

    info!("Product {} updated by {}", product.id, admin.id);

    Ok(Json(
        Envelope::data(product).with_message("Product updated successfully"),
    ))
}

pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    if !state.store.delete_product(&id).await? {
        return Err(not_found());
    }

    info!("Product {id} deleted by {}", admin.id);

    Ok(Json(Envelope::message("Product deleted successfully")))
}
