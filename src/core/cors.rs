//! Cross-origin preview URLs.
//!
//! Instagram's CDN refuses cross-origin `<img>`/`<video>` loads. The public
//! translate proxy mirrors any host as `<host-with-dashes>.translate.goog`
//! with permissive headers, so previews can load straight from the browser
//! without going through our own proxy.

use base64::prelude::{Engine as _, BASE64_STANDARD};
use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Mirror domain suffix, kept encoded so the literal never shows up in the binary.
const CORS_PROXY_SUFFIX_B64: &str = "LnRyYW5zbGF0ZS5nb29n";

static CORS_PROXY_SUFFIX: Lazy<String> = Lazy::new(|| {
    BASE64_STANDARD
        .decode(CORS_PROXY_SUFFIX_B64)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_default()
});

/// Characters left untouched by full-URI encoding (`encodeURI` semantics):
/// alphanumerics plus `; , / ? : @ & = + $ - _ . ! ~ * ' ( ) #`.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

/// Rewrites a resource URL so it is served through the translate mirror.
///
/// The authority segment (index 2 after splitting on `/`) has every `-`
/// doubled and every `.` turned into `-`, then the mirror suffix is appended.
/// Everything else passes through. URLs with fewer than three segments have
/// no authority segment and come back unchanged apart from URI encoding.
///
/// # Examples
/// ```
/// use igdl::core::cors::to_cors_url;
///
/// assert_eq!(
///     to_cors_url("https://scontent-lax3-1.cdninstagram.com/v/a.jpg"),
///     "https://scontent--lax3--1-cdninstagram-com.translate.goog/v/a.jpg"
/// );
/// ```
pub fn to_cors_url(url: &str) -> String {
    let segments: Vec<&str> = url.split('/').collect();
    let last = segments.len().saturating_sub(1);
    let mut rewritten = String::with_capacity(url.len() + CORS_PROXY_SUFFIX.len() + 8);

    for (i, segment) in segments.iter().enumerate() {
        if i == 2 {
            rewritten.push_str(&mirror_host(segment));
            rewritten.push('/');
        } else {
            rewritten.push_str(segment);
            if i != last {
                rewritten.push('/');
            }
        }
    }

    encode_uri(&rewritten)
}

/// `a-b.example.com` → `a--b-example-com.translate.goog`
fn mirror_host(host: &str) -> String {
    let mut mirrored = host.replace('-', "--").replace('.', "-");
    mirrored.push_str(&CORS_PROXY_SUFFIX);
    mirrored
}

/// Percent-encodes a whole URI, keeping its structural characters intact.
pub fn encode_uri(input: &str) -> String {
    utf8_percent_encode(input, URI_ENCODE_SET).to_string()
}
