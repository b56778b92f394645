use once_cell::sync::Lazy;
use std::env;

/// Port for the public web server
/// Read from WEB_PORT environment variable
/// Default: 3000
pub static WEB_PORT: Lazy<u16> = Lazy::new(|| {
    env::var("WEB_PORT")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(3000)
});

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: igdl.log. Set to an empty string to log to the terminal only.
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "igdl.log".to_string()));

/// Instagram GraphQL persisted query id for shortcode lookups.
/// Rotates every few weeks; override with INSTAGRAM_DOC_ID without a rebuild.
pub static INSTAGRAM_DOC_ID: Lazy<String> =
    Lazy::new(|| env::var("INSTAGRAM_DOC_ID").unwrap_or_else(|_| "8845758582119845".to_string()));

/// Instagram GraphQL endpoint
/// Read from INSTAGRAM_GRAPHQL_ENDPOINT environment variable
pub static INSTAGRAM_GRAPHQL_ENDPOINT: Lazy<String> = Lazy::new(|| {
    env::var("INSTAGRAM_GRAPHQL_ENDPOINT").unwrap_or_else(|_| "https://www.instagram.com/api/graphql".to_string())
});

/// Outbound proxy configuration
pub mod proxy {
    use once_cell::sync::Lazy;
    use std::env;

    /// Proxy for Instagram API calls (datacenter IPs are often blocked)
    /// Read from WARP_PROXY environment variable
    /// Example: socks5://your-vps-ip:1080
    pub static WARP_PROXY: Lazy<Option<String>> = Lazy::new(|| {
        env::var("WARP_PROXY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && s != "none" && s != "disabled")
    });
}

/// Download proxy configuration
pub mod download {
    /// User-Agent sent to media CDNs. Some of them reject requests without one.
    pub const USER_AGENT: &str = "instagram-downloader/1.0";

    /// Filename used when the client supplies none, or sanitization empties it
    pub const DEFAULT_FILENAME: &str = "download";

    /// Maximum filename length (in characters) after sanitization
    pub const MAX_FILENAME_CHARS: usize = 180;
}

/// Instagram resolver configuration
pub mod instagram {
    use std::time::Duration;

    /// Browser User-Agent for GraphQL calls
    pub const USER_AGENT: &str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

    /// Timeout for a single GraphQL call (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Connect timeout (in seconds)
    pub const CONNECT_TIMEOUT_SECS: u64 = 15;

    pub fn request_timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }

    pub fn connect_timeout() -> Duration {
        Duration::from_secs(CONNECT_TIMEOUT_SECS)
    }
}
