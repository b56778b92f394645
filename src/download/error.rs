use std::fmt;

/// Structured error type for resource resolution.
///
/// Display yields the human-readable message that the analyze endpoint
/// returns to the client verbatim.
#[derive(Debug)]
pub enum ResolverError {
    /// The link is not an Instagram post/reel/tv link
    InvalidUrl(String),
    /// Transport-level failure reaching Instagram
    Network(String),
    /// Instagram answered with a non-success HTTP status
    Status(u16),
    /// Response body was not the JSON we expected
    Parse(String),
    /// The GraphQL `doc_id` has likely rotated
    DocIdExpired(String),
    /// Private account, or Instagram demands a login for this IP
    LoginRequired,
    /// Post does not exist or was removed
    NotFound,
    /// Post resolved but carried no downloadable media
    NoMedia,
    /// Catch-all for uncategorized errors
    Other(String),
}

impl fmt::Display for ResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverError::InvalidUrl(url) => write!(f, "Not a valid Instagram share link: {}", url),
            ResolverError::Network(msg) => write!(f, "Failed to reach Instagram: {}", msg),
            ResolverError::Status(code) => write!(f, "Instagram responded with HTTP {}", code),
            ResolverError::Parse(msg) => write!(f, "Failed to parse Instagram response: {}", msg),
            ResolverError::DocIdExpired(msg) => write!(f, "doc_id may be expired: {}", msg),
            ResolverError::LoginRequired => write!(f, "Private account or login required"),
            ResolverError::NotFound => write!(f, "Post not found or media unavailable"),
            ResolverError::NoMedia => write!(f, "No media found in post"),
            ResolverError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ResolverError {}

impl ResolverError {
    /// Returns subcategory for metrics
    pub fn subcategory(&self) -> &'static str {
        match self {
            ResolverError::InvalidUrl(_) => "invalid_url",
            ResolverError::Network(_) => "network",
            ResolverError::Status(_) => "status",
            ResolverError::Parse(_) => "parse",
            ResolverError::DocIdExpired(_) => "doc_id",
            ResolverError::LoginRequired => "login_required",
            ResolverError::NotFound => "not_found",
            ResolverError::NoMedia => "no_media",
            ResolverError::Other(_) => "other",
        }
    }
}

impl From<reqwest::Error> for ResolverError {
    fn from(e: reqwest::Error) -> Self {
        ResolverError::Network(e.to_string())
    }
}
