//! Catalog queries
//!
//! Read path for the storefront: category tiles, subcategory labels,
//! product listings and the store config. Rows from the store are shaped
//! into the client-facing [`Product`] here.

use shared::models::{CategorySummary, Product, StoreConfig};
use sqlx::SqlitePool;

use crate::db::repository::product::{self, ProductFilter, ProductRow};
use crate::db::repository::setting;
use crate::utils::AppResult;

/// Split a stored comma-joined size string
///
/// Tokens are trimmed, empty tokens dropped, duplicates keep their first position.
pub fn parse_sizes(raw: &str) -> Vec<String> {
    let mut sizes: Vec<String> = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !sizes.iter().any(|s| s == token) {
            sizes.push(token.to_string());
        }
    }
    sizes
}

/// Row → client shape; NULL text columns become empty strings
pub fn shape_product(row: ProductRow) -> Product {
    let sizes = parse_sizes(row.sizes.as_deref().unwrap_or_default());
    let sizes_text = sizes.join(",");
    Product {
        id: row.id,
        title: row.title,
        category: row.category.unwrap_or_default(),
        subcategory: row.subcategory.unwrap_or_default(),
        price: row.price,
        image_url: row.image_url.unwrap_or_default(),
        description: row.description.unwrap_or_default(),
        sizes,
        sizes_text,
        is_active: row.is_active,
    }
}

pub async fn list_categories(pool: &SqlitePool) -> AppResult<Vec<CategorySummary>> {
    let categories = product::find_active_categories(pool).await?;
    Ok(categories.into_iter().map(CategorySummary::new).collect())
}

/// Empty when `category` is absent or empty
pub async fn list_subcategories(pool: &SqlitePool, category: Option<&str>) -> AppResult<Vec<String>> {
    match category.filter(|c| !c.is_empty()) {
        Some(category) => Ok(product::find_active_subcategories(pool, category).await?),
        None => Ok(Vec::new()),
    }
}

pub async fn list_products(pool: &SqlitePool, filter: &ProductFilter) -> AppResult<Vec<Product>> {
    let rows = product::find_active(pool, filter).await?;
    Ok(rows.into_iter().map(shape_product).collect())
}

/// Lookup by id, active or not
pub async fn get_product(pool: &SqlitePool, id: i64) -> AppResult<Option<Product>> {
    Ok(product::find_by_id(pool, id).await?.map(shape_product))
}

/// Store config from settings; an unreadable settings table reads as "nothing set"
pub async fn store_config(pool: &SqlitePool, title: &str) -> StoreConfig {
    let logo_url = setting::get_or_default(pool, setting::LOGO_URL, "").await;
    let video_url = setting::get_or_default(pool, setting::HERO_VIDEO_URL, "").await;
    StoreConfig::new(title, logo_url, video_url)
}
