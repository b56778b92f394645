//! Streaming download proxy.
//!
//! Fetches a media URL on behalf of the browser and pipes the body straight
//! through with attachment headers, so the browser saves the file under a
//! sensible name instead of navigating to a CDN URL it may not be allowed to
//! load. The body is never buffered: each upstream chunk is forwarded as it
//! arrives, and dropping the client connection drops the upstream stream.

use axum::body::Body;
use axum::http::header::{HeaderValue, CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use futures_util::TryStreamExt;
use reqwest::Client;

use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::core::metrics::PROXIED_BYTES_TOTAL;
use crate::core::validation::{parse_download_url, sanitize_filename};

/// Query parameters of `GET /api/download`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DownloadQuery {
    pub url: Option<String>,
    pub filename: Option<String>,
}

impl DownloadQuery {
    /// Read `url` and `filename` from a raw query string.
    ///
    /// A repeated parameter keeps its first value.
    pub fn from_query(raw: Option<&str>) -> Self {
        Self {
            url: query_param(raw, "url"),
            filename: query_param(raw, "filename"),
        }
    }
}

/// First value of `key` in a form-encoded query string.
///
/// # Examples
/// ```
/// use igdl::download::proxy::query_param;
///
/// assert_eq!(query_param(Some("url=a&url=b"), "url").as_deref(), Some("a"));
/// assert_eq!(query_param(Some("filename=x"), "url"), None);
/// assert_eq!(query_param(None, "url"), None);
/// ```
pub fn query_param(raw: Option<&str>, key: &str) -> Option<String> {
    url::form_urlencoded::parse(raw?.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Build the HTTP client used for proxied fetches.
///
/// Redirects are followed (reqwest's default policy). No timeout is set: large
/// videos may legitimately take minutes to stream.
pub fn build_proxy_client() -> Result<Client, reqwest::Error> {
    Client::builder().user_agent(config::download::USER_AGENT).build()
}

/// Build an RFC 6266 `Content-Disposition` value with an RFC 5987 UTF-8 fallback.
///
/// # Examples
/// ```
/// use igdl::download::proxy::content_disposition;
///
/// assert_eq!(
///     content_disposition("My Clip?.mp4"),
///     "attachment; filename=\"My Clip_.mp4\"; filename*=UTF-8''My%20Clip_.mp4"
/// );
/// ```
pub fn content_disposition(filename: &str) -> String {
    let safe = sanitize_filename(filename);
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        safe.replace('"', "\\\""),
        urlencoding::encode(&safe)
    )
}

/// Validate the request, fetch the upstream URL and stream it back.
///
/// Status and headers are decided before any body bytes are sent.
pub async fn proxy_download(client: &Client, query: DownloadQuery) -> AppResult<Response> {
    let target = parse_download_url(query.url.as_deref())?;
    let filename = query
        .filename
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| config::download::DEFAULT_FILENAME.to_string());

    log::info!("Proxying download: host={:?} filename={:?}", target.host_str(), filename);

    let upstream = client
        .get(target)
        .send()
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    let status = upstream.status();
    if !status.is_success() || status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
        return Err(AppError::Upstream(status.as_u16().to_string()));
    }

    let mut headers = HeaderMap::new();
    if let Some(content_type) = upstream.headers().get(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, content_type.clone());
    }
    if let Some(content_length) = upstream.headers().get(CONTENT_LENGTH) {
        headers.insert(CONTENT_LENGTH, content_length.clone());
    }
    let disposition = HeaderValue::from_bytes(content_disposition(&filename).as_bytes())
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    headers.insert(CONTENT_DISPOSITION, disposition);
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

    let stream = upstream
        .bytes_stream()
        .inspect_ok(|chunk| PROXIED_BYTES_TOTAL.inc_by(chunk.len() as f64));

    let mut response = Response::new(Body::from_stream(stream));
    *response.headers_mut() = headers;
    Ok(response)
}
