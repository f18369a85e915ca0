//! Image relay
//!
//! Product images live on third-party hosts that the web view cannot
//! always embed directly. The relay canonicalizes the source link and
//! streams the bytes back under our own origin.

use axum::body::Bytes;
use http::StatusCode;
use url::Url;

use crate::utils::{AppError, AppResult};

const DRIVE_HOST: &str = "drive.google.com";
const GITHUB_RAW_HOST: &str = "raw.githubusercontent.com";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
/// Largest upstream body the relay buffers
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Result of one upstream fetch
#[derive(Debug)]
pub enum Relay {
    /// Upstream answered with a success status
    Image { content_type: String, body: Bytes },
    /// Upstream answered with a non-success status
    UpstreamStatus(StatusCode),
}

fn host_is(url: &Url, host: &str) -> bool {
    url.host_str().is_some_and(|h| h.eq_ignore_ascii_case(host))
}

/// Validate and canonicalize a source link
///
/// - only absolute `http`/`https` URLs are accepted
/// - query and fragment are stripped
/// - Drive share links `/file/d/<id>/...` become `uc?export=view&id=<id>`
/// - raw GitHub `/<owner>/<repo>/refs/heads/main/...` becomes `/<owner>/<repo>/main/...`
pub fn rewrite_source_url(raw: &str) -> AppResult<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| AppError::invalid_request(format!("Bad image url: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(AppError::invalid_request(format!(
            "Bad image url scheme: {}",
            url.scheme()
        )));
    }
    url.set_query(None);
    url.set_fragment(None);

    let segments: Vec<String> = url
        .path_segments()
        .map(|s| s.map(String::from).collect())
        .unwrap_or_default();

    if host_is(&url, DRIVE_HOST)
        && let [file, d, id, ..] = segments.as_slice()
        && file == "file"
        && d == "d"
        && !id.is_empty()
    {
        let mut direct = Url::parse("https://drive.google.com/uc")
            .map_err(|e| AppError::internal(e.to_string()))?;
        direct
            .query_pairs_mut()
            .append_pair("export", "view")
            .append_pair("id", id);
        return Ok(direct);
    }

    if host_is(&url, GITHUB_RAW_HOST)
        && segments.len() > 5
        && segments[2].eq_ignore_ascii_case("refs")
        && segments[3].eq_ignore_ascii_case("heads")
        && segments[4].eq_ignore_ascii_case("main")
    {
        let mut canonical: Vec<&str> = vec![segments[0].as_str(), segments[1].as_str(), "main"];
        canonical.extend(segments[5..].iter().map(String::as_str));
        url.set_path(&format!("/{}", canonical.join("/")));
    }

    Ok(url)
}

/// Fetch `url` once; transport and body errors map to `UpstreamUnavailable`
pub async fn fetch(client: &reqwest::Client, url: &Url) -> AppResult<Relay> {
    fetch_limited(client, url, MAX_IMAGE_BYTES).await
}

/// [`fetch`] with an explicit body cap; a larger body is an upstream error
pub async fn fetch_limited(client: &reqwest::Client, url: &Url, max_bytes: usize) -> AppResult<Relay> {
    let mut resp = client.get(url.as_str()).send().await.map_err(|e| {
        tracing::warn!(url = %url, error = %e, "Image fetch failed");
        AppError::upstream(format!("Image fetch failed: {e}"))
    })?;

    let status = resp.status();
    if !status.is_success() {
        tracing::warn!(url = %url, status = %status, "Image host returned non-success status");
        let status = StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        return Ok(Relay::UpstreamStatus(status));
    }

    let too_large = |size: u64| {
        tracing::warn!(url = %url, size = size, limit = max_bytes, "Image body too large");
        AppError::upstream(format!("Image body exceeds {max_bytes} bytes"))
    };
    if let Some(len) = resp.content_length()
        && len > max_bytes as u64
    {
        return Err(too_large(len));
    }

    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();

    // Content-Length may be absent or wrong; the cap holds while streaming
    let mut body = Vec::new();
    loop {
        let chunk = resp.chunk().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Image body read failed");
            AppError::upstream(format!("Image body read failed: {e}"))
        })?;
        let Some(chunk) = chunk else { break };
        if body.len() + chunk.len() > max_bytes {
            return Err(too_large((body.len() + chunk.len()) as u64));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(Relay::Image {
        content_type,
        body: Bytes::from(body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    fn rewrite(raw: &str) -> String {
        rewrite_source_url(raw).unwrap().to_string()
    }

    #[test]
    fn test_rejects_non_absolute() {
        for raw in ["not-a-url", "/images/a.png", "ftp://host/a.png", "", "data:image/png;base64,AA"] {
            let err = rewrite_source_url(raw).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidRequest, "{raw}");
        }
    }

    #[test]
    fn test_strips_query() {
        assert_eq!(
            rewrite("https://cdn.example.com/a.jpg?w=200&h=100#top"),
            "https://cdn.example.com/a.jpg"
        );
    }

    #[test]
    fn test_drive_share_link() {
        assert_eq!(
            rewrite("https://drive.google.com/file/d/1AbC-xyz/view?usp=sharing"),
            "https://drive.google.com/uc?export=view&id=1AbC-xyz"
        );
        // Not a share link: left alone
        assert_eq!(
            rewrite("https://drive.google.com/drive/folders/abc"),
            "https://drive.google.com/drive/folders/abc"
        );
    }

    #[test]
    fn test_github_raw_branch_path() {
        assert_eq!(
            rewrite("https://raw.githubusercontent.com/acme/shop/refs/heads/main/img/tee.png"),
            "https://raw.githubusercontent.com/acme/shop/main/img/tee.png"
        );
        assert_eq!(
            rewrite("https://raw.githubusercontent.com/acme/shop/refs/heads/dev/img/tee.png"),
            "https://raw.githubusercontent.com/acme/shop/refs/heads/dev/img/tee.png"
        );
        assert_eq!(
            rewrite("https://raw.githubusercontent.com/acme/shop/main/tee.png"),
            "https://raw.githubusercontent.com/acme/shop/main/tee.png"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_upstream_error() {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap();
        let url = rewrite_source_url("https://unreachable.invalid/x.jpg").unwrap();

        let err = fetch(&client, &url).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UpstreamUnavailable);
        assert_eq!(err.http_status(), StatusCode::BAD_GATEWAY);
    }

    async fn serve_bytes(len: usize) -> std::net::SocketAddr {
        let app = axum::Router::new().route(
            "/big.png",
            axum::routing::get(move || async move {
                ([(http::header::CONTENT_TYPE, "image/png")], vec![7u8; len])
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        addr
    }

    #[tokio::test]
    async fn test_body_over_limit_is_upstream_error() {
        let addr = serve_bytes(2048).await;
        let client = reqwest::Client::new();
        let url = rewrite_source_url(&format!("http://{addr}/big.png")).unwrap();

        let err = fetch_limited(&client, &url, 1024).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UpstreamUnavailable);

        match fetch_limited(&client, &url, 2048).await.unwrap() {
            Relay::Image { content_type, body } => {
                assert_eq!(content_type, "image/png");
                assert_eq!(body.len(), 2048);
            }
            other => panic!("unexpected relay result: {other:?}"),
        }
    }
}
