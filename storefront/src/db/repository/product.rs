//! Product Repository

use super::{RepoError, RepoResult};
use shared::models::ProductCreate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const PRODUCT_COLUMNS: &str =
    "id, title, category, subcategory, price, image_url, description, sizes, is_active";

/// Raw `products` row; nullable text columns stay `Option` until shaping
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub title: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub price: i64,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub sizes: Option<String>,
    pub is_active: bool,
}

/// Listing filter. `category` applies only when non-empty; `subcategory`
/// applies whenever present, so `Some("")` selects products without one.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

/// Distinct non-empty categories of active products
pub async fn find_active_categories(pool: &SqlitePool) -> RepoResult<Vec<String>> {
    let categories = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT category FROM products WHERE is_active = 1 AND COALESCE(category, '') <> '' ORDER BY category",
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

/// Distinct non-empty subcategories of active products within `category`
pub async fn find_active_subcategories(
    pool: &SqlitePool,
    category: &str,
) -> RepoResult<Vec<String>> {
    let subcategories = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT subcategory FROM products WHERE is_active = 1 AND COALESCE(category, '') = ? AND COALESCE(subcategory, '') <> '' ORDER BY subcategory",
    )
    .bind(category)
    .fetch_all(pool)
    .await?;
    Ok(subcategories)
}

/// Active products matching `filter`, newest first
pub async fn find_active(pool: &SqlitePool, filter: &ProductFilter) -> RepoResult<Vec<ProductRow>> {
    let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = 1"
    ));

    if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
        qb.push(" AND COALESCE(category, '') = ").push_bind(category);
    }
    if let Some(subcategory) = filter.subcategory.as_deref() {
        qb.push(" AND COALESCE(subcategory, '') = ")
            .push_bind(subcategory);
    }
    qb.push(" ORDER BY id DESC");

    let rows = qb.build_query_as::<ProductRow>().fetch_all(pool).await?;
    Ok(rows)
}

/// Lookup by primary key, regardless of `is_active`
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ProductRow>> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn insert(pool: &SqlitePool, data: &ProductCreate) -> RepoResult<i64> {
    if data.title.trim().is_empty() {
        return Err(RepoError::Validation("Product title must not be empty".into()));
    }
    if data.price < 0 {
        return Err(RepoError::Validation(format!(
            "Product price must not be negative: {}",
            data.price
        )));
    }

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO products (title, category, subcategory, price, image_url, description, sizes, is_active) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(data.title.trim())
    .bind(&data.category)
    .bind(&data.subcategory)
    .bind(data.price)
    .bind(&data.image_url)
    .bind(&data.description)
    .bind(&data.sizes)
    .bind(data.is_active.unwrap_or(true))
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Logical delete / restore
pub async fn set_active(pool: &SqlitePool, id: i64, is_active: bool) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE products SET is_active = ? WHERE id = ?")
        .bind(is_active)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    Ok(())
}

pub async fn set_price(pool: &SqlitePool, id: i64, price: i64) -> RepoResult<()> {
    if price < 0 {
        return Err(RepoError::Validation(format!(
            "Product price must not be negative: {price}"
        )));
    }
    let rows = sqlx::query("UPDATE products SET price = ? WHERE id = ?")
        .bind(price)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    Ok(())
}
