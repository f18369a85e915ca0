//! Image relay Handlers

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use http::{HeaderValue, StatusCode, header};
use serde::Deserialize;

use crate::core::ServerState;
use crate::services::image_proxy::{self, Relay};
use crate::utils::AppResult;

const CACHE_FOREVER: &str = "public, max-age=31536000";

#[derive(Debug, Deserialize)]
pub struct RelayQuery {
    #[serde(default)]
    pub u: String,
}

/// GET /img?u=
///
/// - 400: `u` is not an absolute http(s) URL
/// - upstream status with body `fetch error`: image host refused
/// - 502: image host unreachable, timed out, body unreadable or over the size cap
pub async fn relay(
    State(state): State<ServerState>,
    Query(query): Query<RelayQuery>,
) -> AppResult<Response> {
    let url = image_proxy::rewrite_source_url(&query.u)?;

    match image_proxy::fetch(&state.http, &url).await? {
        Relay::Image { content_type, body } => {
            let content_type = HeaderValue::from_str(&content_type)
                .unwrap_or(HeaderValue::from_static("application/octet-stream"));
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CACHE_CONTROL, HeaderValue::from_static(CACHE_FOREVER)),
                ],
                body,
            )
                .into_response())
        }
        Relay::UpstreamStatus(status) => Ok((status, "fetch error").into_response()),
    }
}
