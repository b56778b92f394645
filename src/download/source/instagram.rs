//! InstagramResolver: resolves posts, reels and carousels via Instagram's internal GraphQL API.
//!
//! Public posts resolve without login. The GraphQL `doc_id` rotates every few
//! weeks and is configurable through `INSTAGRAM_DOC_ID`; outbound calls go
//! through `WARP_PROXY` when it is set.

use crate::core::config;
use crate::core::validation::{extract_shortcode, sanitize_filename};
use crate::download::error::ResolverError;
use crate::download::source::{ResourceInfo, ResourceResolver, ResourceType};
use async_trait::async_trait;
use serde_json::Value;

/// Instagram internal app ID (public, embedded in the web app).
const IG_APP_ID: &str = "936619743392459";

/// Facebook LSD token (anti-CSRF, public static value used by web scrapers).
const FB_LSD_TOKEN: &str = "AVqbxe3J_YA";

/// Facebook ASBD ID (public, embedded in the web app).
const FB_ASBD_ID: &str = "129477";

/// Resolver backed by the anonymous GraphQL endpoint.
pub struct InstagramResolver {
    client: reqwest::Client,
    endpoint: String,
    doc_id: String,
}

impl InstagramResolver {
    /// Build a resolver from the process configuration.
    pub fn new() -> Result<Self, reqwest::Error> {
        let mut client_builder = reqwest::Client::builder()
            .user_agent(config::instagram::USER_AGENT)
            .timeout(config::instagram::request_timeout())
            .connect_timeout(config::instagram::connect_timeout());

        if let Some(ref proxy_url) = *config::proxy::WARP_PROXY {
            match reqwest::Proxy::all(proxy_url) {
                Ok(proxy) => {
                    log::info!("InstagramResolver: using proxy for GraphQL API");
                    client_builder = client_builder.proxy(proxy);
                }
                Err(e) => {
                    log::warn!("InstagramResolver: failed to configure proxy: {}", e);
                }
            }
        }

        Ok(Self::with_endpoint(
            client_builder.build()?,
            config::INSTAGRAM_GRAPHQL_ENDPOINT.as_str(),
            config::INSTAGRAM_DOC_ID.as_str(),
        ))
    }

    /// Build a resolver against an explicit endpoint and doc_id.
    pub fn with_endpoint(client: reqwest::Client, endpoint: impl Into<String>, doc_id: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            doc_id: doc_id.into(),
        }
    }

    /// Fetch the raw GraphQL response for a shortcode.
    async fn fetch_graphql_media(&self, shortcode: &str) -> Result<Value, ResolverError> {
        let variables = format!(r#"{{"shortcode":"{}"}}"#, shortcode);
        let body = format!(
            "doc_id={}&variables={}&lsd={}",
            urlencoding::encode(&self.doc_id),
            urlencoding::encode(&variables),
            FB_LSD_TOKEN
        );

        log::info!("InstagramResolver: GraphQL POST for shortcode={}", shortcode);

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-IG-App-ID", IG_APP_ID)
            .header("X-FB-LSD", FB_LSD_TOKEN)
            .header("X-ASBD-ID", FB_ASBD_ID)
            .header("X-Requested-With", "XMLHttpRequest")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("Referer", "https://www.instagram.com/")
            .header("Origin", "https://www.instagram.com")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("InstagramResolver: GraphQL HTTP {} for shortcode={}", status, shortcode);
            return Err(ResolverError::Status(status.as_u16()));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            log::error!(
                "InstagramResolver: GraphQL returned non-JSON ({}): {}",
                e,
                response_text.chars().take(500).collect::<String>()
            );
            ResolverError::Parse(e.to_string())
        })
    }
}

#[async_trait]
impl ResourceResolver for InstagramResolver {
    fn name(&self) -> &str {
        "instagram-graphql"
    }

    async fn resolve(&self, url: &str) -> Result<Vec<ResourceInfo>, ResolverError> {
        let shortcode = extract_shortcode(url).ok_or_else(|| ResolverError::InvalidUrl(url.to_string()))?;
        let body = self.fetch_graphql_media(&shortcode).await?;
        let resources = parse_media_resources(&body, &shortcode)?;

        log::info!(
            "InstagramResolver: shortcode={} resolved to {} resource(s)",
            shortcode,
            resources.len()
        );
        Ok(resources)
    }
}

/// Map a GraphQL shortcode response to resources, in carousel order.
pub fn parse_media_resources(body: &Value, shortcode: &str) -> Result<Vec<ResourceInfo>, ResolverError> {
    // Detect doc_id expiry or error responses
    let message = body.get("message").and_then(|v| v.as_str());
    if let Some(message) = message {
        if message.contains("useragent mismatch") || message.contains("doc_id") {
            log::error!("InstagramResolver: possible doc_id expiry: {}", message);
            return Err(ResolverError::DocIdExpired(message.to_string()));
        }
    }

    let media = body
        .pointer("/data/xdt_shortcode_media")
        .filter(|v| !v.is_null())
        .or_else(|| body.pointer("/data/shortcode_media").filter(|v| !v.is_null()))
        .ok_or_else(|| match message {
            Some(m) if m.contains("checkpoint_required") || m.contains("login_required") => {
                ResolverError::LoginRequired
            }
            _ => ResolverError::NotFound,
        })?;

    let owner = media
        .pointer("/owner/username")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("instagram");

    let sidecar_edges = media
        .pointer("/edge_sidecar_to_children/edges")
        .and_then(|v| v.as_array())
        .filter(|edges| !edges.is_empty());

    let resources: Vec<ResourceInfo> = match sidecar_edges {
        Some(edges) => edges
            .iter()
            .filter_map(|edge| edge.get("node"))
            .enumerate()
            .filter_map(|(i, node)| media_node_to_resource(node, &format!("{}_{}_{}", owner, shortcode, i + 1)))
            .collect(),
        None => media_node_to_resource(media, &format!("{}_{}", owner, shortcode))
            .into_iter()
            .collect(),
    };

    if resources.is_empty() {
        return Err(ResolverError::NoMedia);
    }

    Ok(resources)
}

/// Convert one media node (post or carousel child) into a resource.
fn media_node_to_resource(node: &Value, stem: &str) -> Option<ResourceInfo> {
    let is_video = node.get("is_video").and_then(|v| v.as_bool()).unwrap_or(false);
    let kind = if is_video { ResourceType::Video } else { ResourceType::Image };

    let url = match kind {
        ResourceType::Video => node.get("video_url"),
        ResourceType::Image => node.get("display_url"),
    }
    .and_then(|v| v.as_str())
    .filter(|s| !s.is_empty())?;

    let dimension = |key: &str| {
        node.pointer(&format!("/dimensions/{}", key))
            .and_then(|v| v.as_u64())
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0)
    };

    let filename = sanitize_filename(&format!("{}.{}", stem, kind.extension()));
    Some(ResourceInfo::new(filename, dimension("width"), dimension("height"), url, kind))
}
