//! Share-link analysis: validate the link, then hand it to the resolver.

use crate::core::error::{AppError, AppResult};
use crate::core::metrics;
use crate::core::validation::{is_valid_ig_url, ValidationError};
use crate::download::source::{ResourceInfo, ResourceResolver};

/// Resolve a share link into its media resources.
///
/// Invalid or missing links are rejected without calling the resolver.
/// Resolver failures are returned untouched; nothing is retried.
pub async fn analyze_link(resolver: &dyn ResourceResolver, url: Option<&str>) -> AppResult<Vec<ResourceInfo>> {
    let url = match url {
        Some(url) if is_valid_ig_url(Some(url)) => url.trim(),
        _ => {
            metrics::record_analyze("invalid_link");
            return Err(ValidationError::InvalidShareLink.into());
        }
    };

    let timer = metrics::RESOLVE_DURATION_SECONDS.start_timer();
    let result = resolver.resolve(url).await;
    timer.observe_duration();

    match result {
        Ok(resources) => {
            metrics::record_analyze("success");
            log::info!("Resolved {} via {}: {} resource(s)", url, resolver.name(), resources.len());
            Ok(resources)
        }
        Err(e) => {
            metrics::record_analyze(e.subcategory());
            Err(AppError::Resolver(e))
        }
    }
}
