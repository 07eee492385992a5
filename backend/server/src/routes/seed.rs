use std::{collections::HashMap, sync::Arc};

use axum::{Json, extract::State};
use catalog::Category;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::{ApiResult, Envelope};
use crate::{auth::AdminUser, error::AppError, seed::sample_products, state::AppState};

#[derive(Debug, Serialize)]
pub struct CategoryCount {
    #[serde(rename = "_id")]
    pub category: Category,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedStatus {
    pub total_products: usize,
    pub categories: Vec<CategoryCount>,
}

pub async fn seed_status(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> ApiResult<SeedStatus> {
    let products = state.store.products().await?;

    let mut counts: HashMap<Category, usize> = HashMap::new();
    for product in &products {
        *counts.entry(product.category).or_default() += 1;
    }

    let mut categories: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect();
    categories.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });

    Ok(Json(Envelope::data(SeedStatus {
        total_products: products.len(),
        categories,
    })))
}

pub async fn seed_database(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
) -> ApiResult<()> {
    if state.config.environment.is_production() {
        warn!("{} tried to seed a production database", admin.id);
        return Err(AppError::Forbidden(
            "Database seeding is disabled in production".to_string(),
        ));
    }

    let existing = state.store.products().await?.len();
    if existing > 0 {
        return Err(AppError::BadRequest(format!(
            "Database already contains {existing} products. Clear it before seeding."
        )));
    }

    let products = sample_products(Utc::now());
    for product in &products {
        state.store.save_product(product).await?;
    }

    info!("{} seeded {} products", admin.id, products.len());

    Ok(Json(Envelope::message(format!(
        "Database seeded with {} products",
        products.len()
    ))))
}

pub async fn clear_database(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
) -> ApiResult<()> {
    if state.config.environment.is_production() {
        warn!("{} tried to clear a production database", admin.id);
        return Err(AppError::Forbidden(
            "Database clearing is disabled in production".to_string(),
        ));
    }

    let deleted = state.store.clear_products().await?;

    info!("{} deleted {} products", admin.id, deleted);

    Ok(Json(Envelope::message(format!("Deleted {deleted} products"))))
}
