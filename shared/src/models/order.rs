//! Order Model

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One cart line as submitted by a client
///
/// `product_id` and `qty` are kept as raw JSON values: clients send them
/// as numbers or numeric strings, and the intake service decides what
/// counts as an integer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartItemInput {
    #[serde(default)]
    pub product_id: Value,
    #[serde(default)]
    pub qty: Option<Value>,
    #[serde(default)]
    pub size: Option<String>,
}

/// Order submission body (`POST /api/order` and the chat web-app payload)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderRequest {
    #[serde(default)]
    pub items: Vec<CartItemInput>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub comment: Option<String>,
    pub telegram: Option<String>,
}

/// Response of a successful order placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub ok: bool,
    pub order_id: i64,
}

impl OrderPlaced {
    pub fn new(order_id: i64) -> Self {
        Self { ok: true, order_id }
    }
}

/// Stored order line (price and product id are snapshots)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    #[serde(default)]
    pub size: String,
    pub qty: i64,
    /// Unit price in minor currency units at order time
    pub price: i64,
}

/// Stored order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// Chat user id, 0 for web orders
    pub user_id: i64,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub comment: Option<String>,
    pub telegram: Option<String>,
    pub total_price: i64,
    pub created_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<OrderItem>,
}
