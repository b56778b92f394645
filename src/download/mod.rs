//! Share-link resolution and the download proxy

pub mod analyze;
pub mod error;
pub mod proxy;
pub mod source;

// Re-exports for convenience
pub use analyze::analyze_link;
pub use error::ResolverError;
pub use proxy::{content_disposition, proxy_download, DownloadQuery};
pub use source::{InstagramResolver, ResourceInfo, ResourceResolver, ResourceType};
