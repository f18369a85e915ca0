//! Order Repository

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderItem};
use sqlx::SqlitePool;

/// Order header to insert
#[derive(Debug, Clone, Default)]
pub struct NewOrder {
    /// 0 for web orders
    pub user_id: i64,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub comment: Option<String>,
    pub telegram: Option<String>,
    pub total_price: i64,
}

/// Order line to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub size: String,
    pub qty: i64,
    pub price: i64,
}

/// Insert the order and all of its lines in one transaction
pub async fn create(pool: &SqlitePool, order: &NewOrder, items: &[NewOrderItem]) -> RepoResult<i64> {
    let sum = items
        .iter()
        .try_fold(0i64, |acc, it| it.price.checked_mul(it.qty).and_then(|t| acc.checked_add(t)))
        .ok_or_else(|| RepoError::Validation("Order line sum overflows".into()))?;
    if sum != order.total_price {
        return Err(RepoError::Validation(format!(
            "Order total {} does not match line sum {sum}",
            order.total_price
        )));
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let order_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO orders (user_id, username, full_name, phone, address, comment, telegram, total_price, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(order.user_id)
    .bind(&order.username)
    .bind(&order.full_name)
    .bind(&order.phone)
    .bind(&order.address)
    .bind(&order.comment)
    .bind(&order.telegram)
    .bind(order.total_price)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    for item in items {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, size, qty, price) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(order_id)
        .bind(item.product_id)
        .bind(&item.size)
        .bind(item.qty)
        .bind(item.price)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(order_id)
}

/// Order with its lines
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(
        "SELECT id, user_id, username, full_name, phone, address, comment, telegram, total_price, created_at FROM orders WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(mut order) = order else {
        return Ok(None);
    };

    order.items = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, product_id, COALESCE(size, '') AS size, qty, price FROM order_items WHERE order_id = ? ORDER BY id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn test_db() -> (tempfile::TempDir, DbService) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.sqlite");
        let db = DbService::new(path.to_str().unwrap()).await.unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let (_dir, db) = test_db().await;
        let order = NewOrder {
            user_id: 42,
            username: Some("buyer".into()),
            full_name: Some("Ivan Petrov".into()),
            total_price: 2500,
            ..Default::default()
        };
        let items = vec![
            NewOrderItem { product_id: 1, size: "M".into(), qty: 2, price: 1000 },
            NewOrderItem { product_id: 2, size: String::new(), qty: 1, price: 500 },
        ];

        let id = create(&db.pool, &order, &items).await.unwrap();
        let stored = find_by_id(&db.pool, id).await.unwrap().unwrap();

        assert_eq!(stored.user_id, 42);
        assert_eq!(stored.username.as_deref(), Some("buyer"));
        assert_eq!(stored.total_price, 2500);
        assert_eq!(stored.items.len(), 2);
        assert_eq!(stored.items[0].size, "M");
        assert_eq!(stored.items[0].qty, 2);
        assert_eq!(stored.items[1].price, 500);
        assert!(stored.created_at > 0);
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let (_dir, db) = test_db().await;
        let a = create(&db.pool, &NewOrder::default(), &[]).await.unwrap();
        let b = create(&db.pool, &NewOrder::default(), &[]).await.unwrap();
        assert!(b > a);
    }

    #[tokio::test]
    async fn test_total_mismatch_is_rejected() {
        let (_dir, db) = test_db().await;
        let order = NewOrder { total_price: 1, ..Default::default() };
        let items = vec![NewOrderItem { product_id: 1, size: String::new(), qty: 1, price: 2 }];

        let err = create(&db.pool, &order, &items).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_overflowing_line_sum_is_rejected() {
        let (_dir, db) = test_db().await;
        let order = NewOrder { total_price: i64::MAX, ..Default::default() };
        let items = vec![NewOrderItem {
            product_id: 1,
            size: String::new(),
            qty: i64::MAX / 10,
            price: 1000,
        }];

        let err = create(&db.pool, &order, &items).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
        assert!(find_by_id(&db.pool, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_item_rolls_back_order() {
        let (_dir, db) = test_db().await;
        let order = NewOrder { total_price: 0, ..Default::default() };
        // qty = 0 violates the CHECK constraint on the second statement
        let items = vec![NewOrderItem { product_id: 1, size: String::new(), qty: 0, price: 100 }];

        assert!(create(&db.pool, &order, &items).await.is_err());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_find_missing_order() {
        let (_dir, db) = test_db().await;
        assert!(find_by_id(&db.pool, 999).await.unwrap().is_none());
    }
}
