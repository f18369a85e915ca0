//! Bundled web client and static media
//!
//! | Path | Description |
//! |------|-------------|
//! | /, /web, /web/ | `index.html` of the web directory |
//! | /web/* | static file, unknown paths fall back to `index.html` |
//! | /images/* | static media, mounted only when the directory exists |

use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::core::{Config, ServerState};

pub fn router(config: &Config) -> Router<ServerState> {
    let index = Path::new(&config.web_dir).join("index.html");

    let mut router = Router::new()
        .route_service("/", ServeFile::new(&index))
        // `/web` and `/web/` reach the directory root, which serves index.html
        .nest_service(
            "/web",
            ServeDir::new(&config.web_dir).fallback(ServeFile::new(&index)),
        );

    let images = Path::new(&config.images_dir);
    if images.is_dir() {
        router = router.nest_service("/images", ServeDir::new(images));
    } else {
        tracing::info!(dir = %config.images_dir, "Images directory missing, /images not mounted");
    }

    router
}
