//! Order intake
//!
//! Prices a submitted cart against the catalog and persists the order.
//! Shared by `POST /api/order` and the chat web-app payload handler.
//!
//! Line policy:
//! - unknown or inactive product id: the line is dropped with a warning
//! - `qty` absent or null: 1
//! - `product_id` / `qty` that are not integers: the whole cart is rejected
//! - `qty` below 1: the whole cart is rejected
//! - a line or cart total that does not fit in `i64`: the whole cart is rejected
//!
//! Unit prices always come from the catalog, never from the client.

use serde_json::Value;
use shared::models::{CartItemInput, OrderRequest};
use sqlx::SqlitePool;

use crate::db::repository::order::{self, NewOrder, NewOrderItem};
use crate::db::repository::product;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Contact fields entered by the buyer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuyerDetails {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub comment: Option<String>,
    pub telegram: Option<String>,
}

impl From<&OrderRequest> for BuyerDetails {
    fn from(req: &OrderRequest) -> Self {
        Self {
            full_name: req.full_name.clone(),
            phone: req.phone.clone(),
            address: req.address.clone(),
            comment: req.comment.clone(),
            telegram: req.telegram.clone(),
        }
    }
}

/// Chat sender of a web-app payload; absent for web orders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatIdentity {
    pub user_id: i64,
    pub username: Option<String>,
}

/// Retained cart line, priced from the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: i64,
    pub title: String,
    pub size: String,
    pub qty: i64,
    /// Unit price
    pub price: i64,
}

impl PricedLine {
    /// `None` when `price * qty` overflows
    pub fn line_total(&self) -> Option<i64> {
        self.price.checked_mul(self.qty)
    }
}

fn cart_total(lines: &[PricedLine]) -> AppResult<i64> {
    lines
        .iter()
        .try_fold(0i64, |acc, line| line.line_total().and_then(|t| acc.checked_add(t)))
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::ValueOutOfRange, "Order total is out of range")
                .with_detail("field", "qty")
        })
}

/// Persisted order as seen by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order_id: i64,
    pub total_price: i64,
    pub lines: Vec<PricedLine>,
    /// Number of cart lines dropped (unknown or inactive product)
    pub dropped: usize,
}

/// Coerce a JSON number or numeric string into an integer
///
/// Floats are accepted only when they carry no fractional part.
pub fn coerce_int(value: &Value, field: &str) -> AppResult<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Null => return Err(AppError::required_field(field)),
        _ => None,
    };

    parsed.ok_or_else(|| {
        AppError::invalid_format(format!("{field} must be an integer"))
            .with_detail("field", field)
            .with_detail("value", value.clone())
    })
}

/// Validated but not yet priced cart line
struct CartLine {
    product_id: i64,
    qty: i64,
    size: String,
}

fn validate_line(item: &CartItemInput) -> AppResult<CartLine> {
    let product_id = coerce_int(&item.product_id, "product_id")?;
    let qty = match &item.qty {
        None | Some(Value::Null) => 1,
        Some(value) => coerce_int(value, "qty")?,
    };
    if qty < 1 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("qty must be at least 1, got {qty}"),
        )
        .with_detail("field", "qty"));
    }

    Ok(CartLine {
        product_id,
        qty,
        size: item.size.as_deref().unwrap_or_default().trim().to_string(),
    })
}

/// Price `items` against the catalog and persist the order with its lines
///
/// The whole cart is validated before the first store read, so a malformed
/// line leaves no trace.
pub async fn place_order(
    pool: &SqlitePool,
    buyer: &BuyerDetails,
    chat: Option<&ChatIdentity>,
    items: &[CartItemInput],
) -> AppResult<PlacedOrder> {
    let cart = items.iter().map(validate_line).collect::<AppResult<Vec<_>>>()?;

    let mut lines = Vec::with_capacity(cart.len());
    let mut dropped = 0;
    for line in cart {
        let reason = match product::find_by_id(pool, line.product_id).await? {
            Some(p) if p.is_active => {
                lines.push(PricedLine {
                    product_id: p.id,
                    title: p.title,
                    size: line.size,
                    qty: line.qty,
                    price: p.price,
                });
                continue;
            }
            Some(_) => "inactive",
            None => "unknown",
        };
        tracing::warn!(product_id = line.product_id, reason = reason, "Cart line dropped");
        dropped += 1;
    }

    let total_price = cart_total(&lines)?;

    let header = NewOrder {
        user_id: chat.map(|c| c.user_id).unwrap_or(0),
        username: chat.and_then(|c| c.username.clone()),
        full_name: buyer.full_name.clone(),
        phone: buyer.phone.clone(),
        address: buyer.address.clone(),
        comment: buyer.comment.clone(),
        telegram: buyer.telegram.clone(),
        total_price,
    };
    let rows: Vec<NewOrderItem> = lines
        .iter()
        .map(|l| NewOrderItem {
            product_id: l.product_id,
            size: l.size.clone(),
            qty: l.qty,
            price: l.price,
        })
        .collect();

    let order_id = order::create(pool, &header, &rows).await?;
    tracing::info!(
        order_id = order_id,
        total_price = total_price,
        lines = lines.len(),
        dropped = dropped,
        web = chat.is_none(),
        "Order placed"
    );

    Ok(PlacedOrder {
        order_id,
        total_price,
        lines,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use serde_json::json;
    use shared::models::ProductCreate;

    async fn test_db() -> (tempfile::TempDir, DbService) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intake.sqlite");
        let db = DbService::new(path.to_str().unwrap()).await.unwrap();
        (dir, db)
    }

    async fn seed(db: &DbService, title: &str, price: i64) -> i64 {
        product::insert(
            &db.pool,
            &ProductCreate {
                title: title.into(),
                category: Some("Apparel".into()),
                price,
                sizes: Some("S,M".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
    }

    fn line(product_id: Value, qty: Option<Value>, size: Option<&str>) -> CartItemInput {
        CartItemInput {
            product_id,
            qty,
            size: size.map(String::from),
        }
    }

    async fn order_count(db: &DbService) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&db.pool)
            .await
            .unwrap()
    }

    #[test]
    fn test_coerce_int() {
        assert_eq!(coerce_int(&json!(3), "qty").unwrap(), 3);
        assert_eq!(coerce_int(&json!("7"), "qty").unwrap(), 7);
        assert_eq!(coerce_int(&json!(" 7 "), "qty").unwrap(), 7);
        assert_eq!(coerce_int(&json!(2.0), "qty").unwrap(), 2);

        let err = coerce_int(&json!(2.5), "qty").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert_eq!(coerce_int(&json!("two"), "qty").unwrap_err().code, ErrorCode::InvalidFormat);
        assert_eq!(coerce_int(&json!(true), "qty").unwrap_err().code, ErrorCode::InvalidFormat);
        assert_eq!(
            coerce_int(&Value::Null, "product_id").unwrap_err().code,
            ErrorCode::RequiredField
        );
    }

    #[tokio::test]
    async fn test_prices_from_catalog() {
        let (_dir, db) = test_db().await;
        let tee = seed(&db, "Tee", 1000).await;

        let placed = place_order(
            &db.pool,
            &BuyerDetails::default(),
            None,
            &[line(json!(tee), Some(json!(2)), Some("M"))],
        )
        .await
        .unwrap();

        assert_eq!(placed.total_price, 2000);
        assert_eq!(placed.dropped, 0);
        assert_eq!(placed.lines[0].title, "Tee");

        let stored = order::find_by_id(&db.pool, placed.order_id).await.unwrap().unwrap();
        assert_eq!(stored.user_id, 0);
        assert_eq!(stored.total_price, 2000);
        assert_eq!(stored.items.len(), 1);
        assert_eq!(stored.items[0].price, 1000);
        assert_eq!(stored.items[0].qty, 2);
        assert_eq!(stored.items[0].size, "M");
    }

    #[tokio::test]
    async fn test_qty_defaults_to_one() {
        let (_dir, db) = test_db().await;
        let tee = seed(&db, "Tee", 1000).await;

        let placed = place_order(
            &db.pool,
            &BuyerDetails::default(),
            None,
            &[line(json!(tee), None, None), line(json!(tee.to_string()), Some(Value::Null), None)],
        )
        .await
        .unwrap();

        assert_eq!(placed.total_price, 2000);
        assert!(placed.lines.iter().all(|l| l.qty == 1 && l.size.is_empty()));
    }

    #[tokio::test]
    async fn test_unknown_ids_give_empty_order() {
        let (_dir, db) = test_db().await;

        let placed = place_order(
            &db.pool,
            &BuyerDetails::default(),
            None,
            &[line(json!(404), Some(json!(1)), None), line(json!(405), None, None)],
        )
        .await
        .unwrap();

        assert_eq!(placed.total_price, 0);
        assert!(placed.lines.is_empty());
        assert_eq!(placed.dropped, 2);

        let stored = order::find_by_id(&db.pool, placed.order_id).await.unwrap().unwrap();
        assert!(stored.items.is_empty());
    }

    #[tokio::test]
    async fn test_inactive_product_is_dropped() {
        let (_dir, db) = test_db().await;
        let tee = seed(&db, "Tee", 1000).await;
        let cap = seed(&db, "Cap", 300).await;
        product::set_active(&db.pool, cap, false).await.unwrap();

        let placed = place_order(
            &db.pool,
            &BuyerDetails::default(),
            None,
            &[line(json!(tee), None, None), line(json!(cap), None, None)],
        )
        .await
        .unwrap();

        assert_eq!(placed.total_price, 1000);
        assert_eq!(placed.dropped, 1);
    }

    #[tokio::test]
    async fn test_malformed_line_rejects_whole_cart() {
        let (_dir, db) = test_db().await;
        let tee = seed(&db, "Tee", 1000).await;

        let err = place_order(
            &db.pool,
            &BuyerDetails::default(),
            None,
            &[line(json!(tee), None, None), line(json!(tee), Some(json!("lots")), None)],
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);

        let err = place_order(
            &db.pool,
            &BuyerDetails::default(),
            None,
            &[line(json!(tee), Some(json!(0)), None)],
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);

        assert_eq!(order_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_overflowing_total_rejects_cart() {
        let (_dir, db) = test_db().await;
        let tee = seed(&db, "Tee", 1000).await;

        let err = place_order(
            &db.pool,
            &BuyerDetails::default(),
            None,
            &[line(json!(tee), Some(json!(i64::MAX / 10)), None)],
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);

        // Each line fits on its own, the sum does not
        let err = place_order(
            &db.pool,
            &BuyerDetails::default(),
            None,
            &[
                line(json!(tee), Some(json!(i64::MAX / 1000)), None),
                line(json!(tee), Some(json!(i64::MAX / 1000)), None),
            ],
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);

        assert_eq!(order_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_price_change_keeps_history() {
        let (_dir, db) = test_db().await;
        let tee = seed(&db, "Tee", 1000).await;

        let placed = place_order(
            &db.pool,
            &BuyerDetails::default(),
            None,
            &[line(json!(tee), Some(json!(1)), None)],
        )
        .await
        .unwrap();
        product::set_price(&db.pool, tee, 1500).await.unwrap();

        let stored = order::find_by_id(&db.pool, placed.order_id).await.unwrap().unwrap();
        assert_eq!(stored.items[0].price, 1000);
        assert_eq!(stored.total_price, 1000);
    }

    #[tokio::test]
    async fn test_chat_identity_is_stored() {
        let (_dir, db) = test_db().await;
        let chat = ChatIdentity {
            user_id: 777,
            username: Some("buyer".into()),
        };
        let buyer = BuyerDetails {
            full_name: Some("Anna".into()),
            telegram: Some("@anna".into()),
            ..Default::default()
        };

        let placed = place_order(&db.pool, &buyer, Some(&chat), &[]).await.unwrap();
        let stored = order::find_by_id(&db.pool, placed.order_id).await.unwrap().unwrap();
        assert_eq!(stored.user_id, 777);
        assert_eq!(stored.username.as_deref(), Some("buyer"));
        assert_eq!(stored.full_name.as_deref(), Some("Anna"));
        assert_eq!(stored.telegram.as_deref(), Some("@anna"));
    }
}
