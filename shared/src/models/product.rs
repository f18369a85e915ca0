//! Product Model

use serde::{Deserialize, Serialize};

/// Product as exposed to the web client
///
/// `sizes` is the parsed size list; `sizes_text` is the same list
/// re-joined with `,` so clients that only want a label don't have to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    /// Price in minor currency units
    pub price: i64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub sizes_text: String,
    pub is_active: bool,
}

/// Catalog import payload
///
/// `sizes` is the raw comma-joined string as it appears in the source sheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCreate {
    pub title: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub price: i64,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub sizes: Option<String>,
    pub is_active: Option<bool>,
}
