//! Mock resolver returning canned resources or a canned failure

#![allow(dead_code)]

use async_trait::async_trait;
use igdl::download::{ResolverError, ResourceInfo, ResourceResolver, ResourceType};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Resolver that records the URLs it is asked for.
pub struct MockResolver {
    outcome: Result<Vec<ResourceInfo>, String>,
    calls: AtomicUsize,
    last_url: Mutex<Option<String>>,
}

impl MockResolver {
    /// Resolve every link to the given resources.
    pub fn returning(resources: Vec<ResourceInfo>) -> Self {
        Self {
            outcome: Ok(resources),
            calls: AtomicUsize::new(0),
            last_url: Mutex::new(None),
        }
    }

    /// Fail every call with the given message.
    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_url: Mutex::new(None),
        }
    }

    /// A two-item carousel: one image, one video.
    pub fn carousel() -> Self {
        Self::returning(vec![
            ResourceInfo::new(
                "user_CAR1_1.jpg",
                1080,
                1350,
                "https://scontent-lax3-1.cdninstagram.com/v/1.jpg",
                ResourceType::Image,
            ),
            ResourceInfo::new(
                "user_CAR1_2.mp4",
                1080,
                1920,
                "https://scontent-lax3-1.cdninstagram.com/v/2.mp4",
                ResourceType::Video,
            ),
        ])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_url(&self) -> Option<String> {
        self.last_url.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ResourceResolver for MockResolver {
    fn name(&self) -> &str {
        "mock"
    }

    async fn resolve(&self, url: &str) -> Result<Vec<ResourceInfo>, ResolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_url.lock().unwrap_or_else(|e| e.into_inner()) = Some(url.to_string());

        match &self.outcome {
            Ok(resources) => Ok(resources.clone()),
            Err(message) => Err(ResolverError::Other(message.clone())),
        }
    }
}
