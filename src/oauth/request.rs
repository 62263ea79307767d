//! OAuth 1.0a request signing.
//!
//! Only the subset of OAuth 1.0a the Yahoo APIs need is supported: HMAC-SHA1
//! signatures carried in the `Authorization` header, with GET or POST requests
//! whose parameters all travel in that header.

use std::collections::BTreeMap;
use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, Rng};
use sha1::Sha1;

use super::encoding::encode;
use super::token::Token;

type HmacSha1 = Hmac<Sha1>;

const PREAMBLE: &str = "OAuth ";
const HEADER_SEPARATOR: &str = ", ";
const VERSION: &str = "1.0";
const SIGNATURE_METHOD: &str = "HMAC-SHA1";

pub const KEY_CONSUMER_KEY: &str = "oauth_consumer_key";
pub const KEY_TIMESTAMP: &str = "oauth_timestamp";
pub const KEY_NONCE: &str = "oauth_nonce";
pub const KEY_VERSION: &str = "oauth_version";
pub const KEY_TOKEN: &str = "oauth_token";
pub const KEY_SIGNATURE_METHOD: &str = "oauth_signature_method";
pub const KEY_SIGNATURE: &str = "oauth_signature";

/// Application credentials issued by the provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Consumer {
    pub key: String,
    pub secret: String,
}

impl Consumer {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request to be signed. Parameters are kept sorted by key, which fixes
/// both the header order and the signature base string.
#[derive(Debug, Clone)]
pub struct OAuthRequest {
    method: HttpMethod,
    url: String,
    parameters: BTreeMap<String, String>,
}

impl OAuthRequest {
    /// Request carrying the standard OAuth parameters, stamped at `timestamp_sec`.
    pub fn new(
        method: HttpMethod,
        url: impl Into<String>,
        consumer_key: &str,
        token: &Token,
        timestamp_sec: i64,
    ) -> Self {
        let nonce_suffix: i32 = OsRng.gen();
        Self::from_parameters(
            method,
            url,
            standard_parameters(consumer_key, token, timestamp_sec, nonce_suffix),
        )
    }

    /// Request with exactly the given parameters.
    pub fn from_parameters(
        method: HttpMethod,
        url: impl Into<String>,
        parameters: BTreeMap<String, String>,
    ) -> Self {
        Self {
            method,
            url: url.into(),
            parameters,
        }
    }

    /// Merge request-specific parameters, overriding any with the same key.
    pub fn with_parameters<I, K, V>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.parameters
            .extend(extra.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// `k1=v1&k2=v2&...` with keys and values already encoded.
    pub fn normalized_parameters(&self) -> String {
        self.parameters
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// `METHOD&enc(url)&enc(normalized parameters)`
    pub fn signature_base_string(&self) -> String {
        format!(
            "{}&{}&{}",
            self.method,
            encode(&self.url),
            encode(&self.normalized_parameters())
        )
    }

    /// Base64 HMAC-SHA1 of the base string, keyed by both secrets.
    pub fn signature(&self, consumer_secret: &str, token_secret: &str) -> String {
        let key = format!("{}&{}", encode(consumer_secret), encode(token_secret));
        let mut mac =
            HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length");
        mac.update(self.signature_base_string().as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }

    /// Value for the `Authorization` header, signature last.
    pub fn authorization_header(&self, consumer_secret: &str, token: &Token) -> String {
        let signature = self.signature(consumer_secret, &token.token_secret);
        let mut fields: Vec<String> = self
            .parameters
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect();
        fields.push(format!("{}=\"{}\"", KEY_SIGNATURE, encode(&signature)));
        format!("{}{}", PREAMBLE, fields.join(HEADER_SEPARATOR))
    }
}

/// Parameters sent with every request. `oauth_token` is omitted while the token is
/// still empty, as when requesting a new one.
pub fn standard_parameters(
    consumer_key: &str,
    token: &Token,
    timestamp_sec: i64,
    nonce_suffix: i32,
) -> BTreeMap<String, String> {
    let timestamp = timestamp_sec.to_string();
    let mut parameters = BTreeMap::new();
    parameters.insert(KEY_VERSION.to_string(), VERSION.to_string());
    parameters.insert(KEY_CONSUMER_KEY.to_string(), consumer_key.to_string());
    // Unique per timestamp, unpredictable within it
    parameters.insert(KEY_NONCE.to_string(), format!("{timestamp}{nonce_suffix}"));
    parameters.insert(KEY_TIMESTAMP.to_string(), timestamp);
    parameters.insert(
        KEY_SIGNATURE_METHOD.to_string(),
        SIGNATURE_METHOD.to_string(),
    );
    if !token.token.is_empty() {
        parameters.insert(KEY_TOKEN.to_string(), token.token.clone());
    }
    parameters
}
