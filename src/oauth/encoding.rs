//! OAuth 1.0a parameter encoding.
//!
//! Form URL encoding with three exceptions: space is `%20` rather than `+`,
//! `*` is `%2A`, and `~` stays unescaped.

use url::form_urlencoded;

pub fn encode(s: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(s.as_bytes()).collect();
    encoded
        .replace('+', "%20")
        .replace('*', "%2A")
        .replace("%7E", "~")
}

/// Decode a single form-encoded component. The input must not contain a raw `&` or `=`.
pub fn decode(s: &str) -> String {
    form_urlencoded::parse(s.as_bytes())
        .next()
        .map(|(component, _)| component.into_owned())
        .unwrap_or_default()
}
