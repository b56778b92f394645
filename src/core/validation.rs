//! URL and filename validation utilities
//!
//! Provides the input checks shared by the HTTP endpoints:
//! - Instagram share link validation (post / reel / tv)
//! - Download target validation (absolute http/https URLs only)
//! - Filename sanitization for `Content-Disposition`

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use url::Url;

use crate::core::config;

/// Validation errors. Display strings are the client-facing messages.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Analyze input is not an Instagram post/reel/tv link
    #[error("Not a valid Instagram share link.")]
    InvalidShareLink,

    /// Download request without a `url` parameter
    #[error("Missing url")]
    MissingUrl,

    /// Download `url` is not an absolute URL
    #[error("Invalid url")]
    InvalidUrl,

    /// Download `url` uses a scheme other than http/https
    #[error("Unsupported protocol")]
    UnsupportedProtocol,
}

/// Accepted share link shape. Capture group 1 is the shortcode.
static IG_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?instagram\.com/(?:p|reel|tv)/([A-Za-z0-9_-]+)/?(?:\?[^#]*)?(?:#.*)?$")
        .expect("instagram url regex")
});

/// Characters that may never appear in a suggested download filename.
const RESERVED_FILENAME_CHARS: &[char] = &['\\', '/', ':', '"', '*', '?', '<', '>', '|'];

/// Checks whether `input` is an Instagram post, reel or IGTV share link.
///
/// `None` stands for a missing or non-string value and is always rejected.
/// The input is trimmed before matching; a trailing slash, query string and
/// fragment are tolerated, extra path segments are not.
///
/// # Examples
/// ```
/// use igdl::core::validation::is_valid_ig_url;
///
/// assert!(is_valid_ig_url(Some("https://www.instagram.com/p/CxYz_12-3/")));
/// assert!(is_valid_ig_url(Some("instagram.com/reel/abc?igsh=xyz")));
/// assert!(!is_valid_ig_url(Some("https://notinstagram.com/p/abc/")));
/// assert!(!is_valid_ig_url(Some("https://www.instagram.com/stories/abc/")));
/// assert!(!is_valid_ig_url(None));
/// ```
pub fn is_valid_ig_url(input: Option<&str>) -> bool {
    match input {
        Some(url) => IG_URL_REGEX.is_match(url.trim()),
        None => false,
    }
}

/// Extracts the post shortcode from a valid share link.
pub fn extract_shortcode(url: &str) -> Option<String> {
    IG_URL_REGEX
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Parses the `url` parameter of a download request.
///
/// Only absolute `http`/`https` URLs are accepted.
pub fn parse_download_url(raw: Option<&str>) -> Result<Url, ValidationError> {
    let raw = raw.filter(|s| !s.is_empty()).ok_or(ValidationError::MissingUrl)?;
    let url = Url::parse(raw).map_err(|_| ValidationError::InvalidUrl)?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ValidationError::UnsupportedProtocol),
    }
}

/// Sanitizes a client-supplied filename for use in `Content-Disposition`.
///
/// - Control characters (U+0000–U+001F, U+007F) are removed
/// - Each run of `\ / : " * ? < > |` becomes a single `_`
/// - Surrounding whitespace is trimmed
/// - The result is capped at 180 characters
/// - An empty result falls back to `download`
///
/// The function is idempotent.
///
/// # Examples
/// ```
/// use igdl::core::validation::sanitize_filename;
///
/// assert_eq!(sanitize_filename("My Clip?.mp4"), "My Clip_.mp4");
/// assert_eq!(sanitize_filename("a//\\b.jpg"), "a_b.jpg");
/// assert_eq!(sanitize_filename("\u{0001}\u{007f}"), "download");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_reserved_run = false;

    for c in name.chars().filter(|c| !is_stripped_control(*c)) {
        if RESERVED_FILENAME_CHARS.contains(&c) {
            if !in_reserved_run {
                out.push('_');
            }
            in_reserved_run = true;
        } else {
            out.push(c);
            in_reserved_run = false;
        }
    }

    let truncated: String = out.trim().chars().take(config::download::MAX_FILENAME_CHARS).collect();
    // Truncation can expose trailing whitespace
    let truncated = truncated.trim_end();

    if truncated.is_empty() {
        config::download::DEFAULT_FILENAME.to_string()
    } else {
        truncated.to_string()
    }
}

fn is_stripped_control(c: char) -> bool {
    c <= '\u{1f}' || c == '\u{7f}'
}
