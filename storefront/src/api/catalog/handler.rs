//! Catalog API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::models::{CategorySummary, Product, StoreConfig};

use crate::core::ServerState;
use crate::db::repository::product::ProductFilter;
use crate::services::catalog;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct SubcategoryQuery {
    pub category: Option<String>,
}

/// `subcategory=` (present but empty) filters on "no subcategory"
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

/// GET /api/config
pub async fn config(State(state): State<ServerState>) -> Json<StoreConfig> {
    Json(catalog::store_config(&state.db.pool, &state.config.store_title).await)
}

/// GET /api/categories
pub async fn categories(State(state): State<ServerState>) -> AppResult<Json<Vec<CategorySummary>>> {
    let categories = catalog::list_categories(&state.db.pool).await?;
    Ok(Json(categories))
}

/// GET /api/subcategories
pub async fn subcategories(
    State(state): State<ServerState>,
    Query(query): Query<SubcategoryQuery>,
) -> AppResult<Json<Vec<String>>> {
    let subcategories =
        catalog::list_subcategories(&state.db.pool, query.category.as_deref()).await?;
    Ok(Json(subcategories))
}

/// GET /api/products
pub async fn products(
    State(state): State<ServerState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let filter = ProductFilter {
        category: query.category,
        subcategory: query.subcategory,
    };
    let products = catalog::list_products(&state.db.pool, &filter).await?;
    Ok(Json(products))
}
