//! Storefront Config Model

use serde::{Deserialize, Serialize};

/// Kind of the hero asset on the landing view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeroType {
    Video,
    Image,
    #[default]
    #[serde(rename = "")]
    None,
}

/// Payload of `GET /api/config`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub title: String,
    pub logo_url: String,
    pub video_url: String,
    /// `video_url` when set, otherwise `logo_url`
    pub hero_url: String,
    pub hero_type: HeroType,
}

impl StoreConfig {
    /// Build the config from the raw settings values (empty string = unset)
    pub fn new(title: impl Into<String>, logo_url: String, video_url: String) -> Self {
        let (hero_url, hero_type) = if !video_url.is_empty() {
            (video_url.clone(), HeroType::Video)
        } else if !logo_url.is_empty() {
            (logo_url.clone(), HeroType::Image)
        } else {
            (String::new(), HeroType::None)
        };

        Self {
            title: title.into(),
            logo_url,
            video_url,
            hero_url,
            hero_type,
        }
    }
}
