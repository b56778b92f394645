//! Resource resolver abstraction layer.
//!
//! Provides the `ResourceResolver` trait for pluggable scraping backends and
//! the `ResourceInfo` type they produce. The analyze endpoint only talks to
//! the trait, so a new backend is added by implementing it and handing an
//! `Arc<dyn ResourceResolver>` to the web server.
//!
//! Built-in backends:
//! - `InstagramResolver`: public posts, reels and carousels via Instagram's GraphQL API

pub mod instagram;

use crate::core::cors::to_cors_url;
use crate::download::error::ResolverError;
use async_trait::async_trait;
use serde::Serialize;

pub use instagram::InstagramResolver;

/// How a resource is rendered and saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Image,
    Video,
}

impl ResourceType {
    /// File extension used for generated filenames
    pub fn extension(&self) -> &'static str {
        match self {
            ResourceType::Image => "jpg",
            ResourceType::Video => "mp4",
        }
    }
}

/// A single downloadable media item of a post.
///
/// `kind` is fixed at construction; there is no setter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceInfo {
    filename: String,
    width: u32,
    height: u32,
    url: String,
    #[serde(rename = "type")]
    kind: ResourceType,
}

impl ResourceInfo {
    pub fn new(filename: impl Into<String>, width: u32, height: u32, url: impl Into<String>, kind: ResourceType) -> Self {
        Self {
            filename: filename.into(),
            width,
            height,
            url: url.into(),
            kind,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn kind(&self) -> ResourceType {
        self.kind
    }

    /// CORS-free URL for in-browser previews.
    pub fn preview_url(&self) -> String {
        to_cors_url(&self.url)
    }
}

/// Wire form of a resource in the analyze response: the resource itself plus
/// its preview URL.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceView<'a> {
    #[serde(flatten)]
    pub info: &'a ResourceInfo,
    pub preview_url: String,
}

impl<'a> From<&'a ResourceInfo> for ResourceView<'a> {
    fn from(info: &'a ResourceInfo) -> Self {
        Self {
            preview_url: info.preview_url(),
            info,
        }
    }
}

/// Trait for resolver implementations.
///
/// `resolve` is all-or-nothing: either every media item of the post is
/// returned, in display order, or the call fails.
#[async_trait]
pub trait ResourceResolver: Send + Sync {
    /// Human-readable name of this backend (e.g., "instagram-graphql")
    fn name(&self) -> &str;

    /// Resolve a validated share link into its media resources.
    async fn resolve(&self, url: &str) -> Result<Vec<ResourceInfo>, ResolverError>;
}
