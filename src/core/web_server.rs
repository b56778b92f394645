//! Public-facing web server.
//!
//! Serves the analyze and download APIs, the landing page, and the
//! health/metrics endpoints. Runs on WEB_PORT (default 3000).

use axum::{
    extract::{RawQuery, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use prometheus::{Encoder, TextEncoder};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::metrics;
use crate::download::analyze::analyze_link;
use crate::download::proxy::{proxy_download, query_param, DownloadQuery};
use crate::download::source::{ResourceResolver, ResourceView};

/// Shared state for the web server. Immutable; cloned per request.
#[derive(Clone)]
pub struct WebState {
    resolver: Arc<dyn ResourceResolver>,
    http: reqwest::Client,
}

impl WebState {
    /// `http` is the client used for proxied downloads.
    pub fn new(resolver: Arc<dyn ResourceResolver>, http: reqwest::Client) -> Self {
        Self { resolver, http }
    }
}

/// Build the application router.
pub fn build_router(state: WebState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/ig/analyze", get(analyze_handler))
        .route("/api/download", get(download_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Start the public web server.
pub async fn start_web_server(port: u16, state: WebState) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = build_router(state);

    log::info!("Starting web server on http://{}", addr);
    log::info!("  /                 - Landing page (HTML)");
    log::info!("  /api/ig/analyze   - Resolve a share link (JSON)");
    log::info!("  /api/download     - Streaming download proxy");
    log::info!("  /health           - Health check");
    log::info!("  /metrics          - Prometheus metrics");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /api/ig/analyze?url=: resolves a share link into its media resources.
async fn analyze_handler(State(state): State<WebState>, RawQuery(query): RawQuery) -> Response {
    let url = query_param(query.as_deref(), "url");
    match analyze_link(state.resolver.as_ref(), url.as_deref()).await {
        Ok(resources) => {
            let data: Vec<ResourceView<'_>> = resources.iter().map(ResourceView::from).collect();
            (StatusCode::OK, Json(json!({ "data": data }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// GET /api/download?url=&filename=: streams the upstream file as an attachment.
async fn download_handler(State(state): State<WebState>, RawQuery(query): RawQuery) -> Response {
    match proxy_download(&state.http, DownloadQuery::from_query(query.as_deref())).await {
        Ok(response) => {
            metrics::record_download("success");
            response
        }
        Err(e) => {
            metrics::record_download(e.category());
            e.into_response()
        }
    }
}

/// GET /health: simple health check.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// GET /metrics: Prometheus metrics in text exposition format.
async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (StatusCode::OK, [(CONTENT_TYPE, encoder.format_type().to_string())], buffer).into_response(),
        Err(e) => {
            log::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
                .into_response()
        }
    }
}

/// GET /: landing page.
async fn index_handler() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

/// Landing page. Theme preference lives in the browser's localStorage only.
const INDEX_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>IG Downloader</title>
<style>
*{box-sizing:border-box;margin:0;padding:0}
:root{--bg:#f8fafc;--card:#fff;--fg:#0f172a;--muted:#64748b;--border:#e2e8f0;--primary:#3b82f6}
.dark{--bg:#0b0f19;--card:#111827;--fg:#f1f5f9;--muted:#94a3b8;--border:#1f2937}
body{background:var(--bg);color:var(--fg);font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;padding:48px 16px}
main{max-width:672px;margin:0 auto}
header{display:flex;justify-content:space-between;align-items:center;margin-bottom:32px}
h1{font-size:1.8rem}
.sub{color:var(--muted);font-size:.85rem;margin-top:4px}
.panel,.card{background:var(--card);border:1px solid var(--border);border-radius:12px}
.panel{padding:28px}
input{width:100%;padding:12px 16px;border-radius:8px;border:1px solid var(--border);background:var(--bg);color:var(--fg);margin:8px 0 16px}
button,.dl{display:block;width:100%;padding:12px;border:0;border-radius:8px;background:var(--primary);color:#fff;font-weight:600;text-align:center;text-decoration:none;cursor:pointer}
button:disabled{opacity:.7;cursor:not-allowed}
#theme{width:auto;background:var(--card);color:var(--fg);border:1px solid var(--border)}
#error{display:none;color:#ef4444;margin-bottom:16px;font-size:.9rem}
#results{display:grid;grid-template-columns:repeat(auto-fill,minmax(280px,1fr));gap:24px;margin-top:32px}
.card{overflow:hidden}
.media{aspect-ratio:4/5;background:var(--border);position:relative}
.media img,.media video{width:100%;height:100%;object-fit:cover}
.badge{position:absolute;top:12px;right:12px;background:rgba(0,0,0,.6);color:#fff;font-size:.7rem;padding:2px 8px;border-radius:4px}
.info{padding:16px}
.name{font-size:.9rem;white-space:nowrap;overflow:hidden;text-overflow:ellipsis}
.dims{color:var(--muted);font-size:.75rem;margin:4px 0 16px}
</style>
</head>
<body>
<main>
<header>
<div><h1>IG Downloader</h1><p class="sub">Download videos &amp; photos instantly</p></div>
<button id="theme" type="button" title="Toggle theme">&#9728;</button>
</header>
<div class="panel">
<label for="url">Instagram link</label>
<input id="url" type="text" placeholder="Paste link here (e.g. https://www.instagram.com/p/...)">
<div id="error"></div>
<button id="analyze" type="button">Analyze</button>
</div>
<div id="results"></div>
</main>
<script>
(function () {
  var root = document.documentElement;
  var themeBtn = document.getElementById('theme');
  function applyTheme(dark) {
    root.classList.toggle('dark', dark);
    themeBtn.innerHTML = dark ? '&#9790;' : '&#9728;';
    localStorage.setItem('theme', dark ? 'dark' : 'light');
  }
  var saved = localStorage.getItem('theme');
  applyTheme(saved ? saved === 'dark' : window.matchMedia('(prefers-color-scheme: dark)').matches);
  themeBtn.onclick = function () { applyTheme(!root.classList.contains('dark')); };

  var input = document.getElementById('url');
  var btn = document.getElementById('analyze');
  var errorBox = document.getElementById('error');
  var results = document.getElementById('results');

  function showError(msg) {
    errorBox.textContent = msg;
    errorBox.style.display = msg ? 'block' : 'none';
  }

  function card(item) {
    var el = document.createElement('div');
    el.className = 'card';
    var media = document.createElement('div');
    media.className = 'media';
    var view = document.createElement(item.type === 'video' ? 'video' : 'img');
    view.src = item.preview_url;
    if (item.type === 'video') { view.controls = true; } else { view.alt = item.filename; view.loading = 'lazy'; }
    var badge = document.createElement('span');
    badge.className = 'badge';
    badge.textContent = item.type.toUpperCase();
    media.appendChild(view);
    media.appendChild(badge);
    var info = document.createElement('div');
    info.className = 'info';
    var name = document.createElement('div');
    name.className = 'name';
    name.textContent = item.filename;
    name.title = item.filename;
    var dims = document.createElement('div');
    dims.className = 'dims';
    dims.textContent = item.width + ' x ' + item.height;
    var link = document.createElement('a');
    link.className = 'dl';
    link.textContent = 'Download';
    link.href = '/api/download?url=' + encodeURIComponent(item.url) + '&filename=' + encodeURIComponent(item.filename);
    link.download = item.filename;
    info.appendChild(name);
    info.appendChild(dims);
    info.appendChild(link);
    el.appendChild(media);
    el.appendChild(info);
    return el;
  }

  function analyze() {
    var url = input.value.trim();
    if (!url) { showError('Please enter a URL.'); return; }
    showError('');
    results.innerHTML = '';
    btn.disabled = true;
    btn.textContent = 'Analyzing...';
    fetch('/api/ig/analyze?url=' + encodeURIComponent(url))
      .then(function (res) { return res.json().then(function (json) { return { ok: res.ok, json: json }; }); })
      .then(function (r) {
        if (r.ok && r.json.data && r.json.data.length > 0) {
          r.json.data.forEach(function (item) { results.appendChild(card(item)); });
        } else {
          showError(r.json.message || 'Failed to analyze URL.');
        }
      })
      .catch(function () { showError('Network error occurred.'); })
      .then(function () { btn.disabled = false; btn.textContent = 'Analyze'; });
  }

  btn.onclick = analyze;
  input.onkeydown = function (e) { if (e.key === 'Enter') { analyze(); } };
})();
</script>
</body>
</html>"##;
