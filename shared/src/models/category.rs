//! Category Model

use serde::{Deserialize, Serialize};

/// Category tile shown on the storefront landing view
///
/// Categories are not stored on their own; they are derived from the
/// distinct `category` labels of active products. `image_url` is reserved
/// and currently always empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub title: String,
    #[serde(default)]
    pub image_url: String,
}

impl CategorySummary {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image_url: String::new(),
        }
    }
}
