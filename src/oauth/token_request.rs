//! Token negotiation requests and their form-encoded responses.
//!
//! One request shape serves all three flows. The previous token is empty when
//! obtaining a request token, the request token when exchanging a verifier, and the
//! expired token when refreshing.

use std::collections::BTreeMap;

use reqwest::{header::AUTHORIZATION, Client};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};
use url::Url;

use super::encoding::decode;
use super::request::{Consumer, HttpMethod, OAuthRequest};
use super::token::Token;
use crate::core::clock::Clock;
use crate::core::http::fetch_text;
use crate::{FantasyWearError, Result};

pub const OAUTH_BASE_URL: &str = "https://api.login.yahoo.com/oauth/v2/";

pub const ENDPOINT_GET_REQUEST_TOKEN: &str = "get_request_token";
pub const ENDPOINT_GET_TOKEN: &str = "get_token";

const KEY_TOKEN: &str = "oauth_token";
const KEY_TOKEN_SECRET: &str = "oauth_token_secret";
const KEY_SESSION_HANDLE: &str = "oauth_session_handle";
const KEY_EXPIRES_IN: &str = "oauth_expires_in";
const KEY_AUTHORIZATION_EXPIRES_IN: &str = "oauth_authorization_expires_in";
const KEY_REQUEST_AUTH_URL: &str = "xoauth_request_auth_url";
const KEY_YAHOO_GUID: &str = "xoauth_yahoo_guid";

/// A signed POST to one of the token endpoints.
#[derive(Debug, Clone)]
pub struct OAuthTokenRequest {
    url: String,
    previous_token: Token,
    extra_parameters: BTreeMap<String, String>,
}

impl OAuthTokenRequest {
    pub fn new(
        base_url: &str,
        endpoint: &str,
        previous_token: Token,
        extra_parameters: BTreeMap<String, String>,
    ) -> Result<Self> {
        Ok(Self {
            url: endpoint_url(base_url, endpoint)?,
            previous_token,
            extra_parameters,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The signed request as of `now_sec`, extra parameters included.
    pub fn signed(&self, consumer_key: &str, now_sec: i64) -> OAuthRequest {
        OAuthRequest::new(
            HttpMethod::Post,
            self.url.clone(),
            consumer_key,
            &self.previous_token,
            now_sec,
        )
        .with_parameters(self.extra_parameters.clone())
    }

    /// Send the request and parse the returned token.
    pub async fn send(
        &self,
        http: &Client,
        consumer: &Consumer,
        clock: &dyn Clock,
        cancel: &CancellationToken,
    ) -> Result<Token> {
        let header = self
            .signed(&consumer.key, clock.now_secs())
            .authorization_header(&consumer.secret, &self.previous_token);

        debug!(url = %self.url, "Sending token request");
        let body = fetch_text(http.post(&self.url).header(AUTHORIZATION, header), cancel).await?;
        parse_token_response(&body, clock.now_secs())
    }
}

/// `<base>/<endpoint>`, tolerating a base with or without a trailing slash.
pub fn endpoint_url(base_url: &str, endpoint: &str) -> Result<String> {
    let base = if base_url.ends_with('/') {
        Url::parse(base_url)?
    } else {
        Url::parse(&format!("{base_url}/"))?
    };
    Ok(base.join(endpoint)?.to_string())
}

/// Parse a `key=value&...` token response. Expiry offsets are relative to `now_sec`.
///
/// Malformed pairs and unknown keys are logged and skipped.
pub fn parse_token_response(body: &str, now_sec: i64) -> Result<Token> {
    let mut token = Token::default();
    for pair in body.trim().split('&').filter(|p| !p.is_empty()) {
        let parts: Vec<&str> = pair.split('=').collect();
        if parts.len() != 2 {
            error!(pair, "Skipping malformed response parameter");
            continue;
        }
        let (key, value) = (parts[0], decode(parts[1]));
        match key {
            KEY_TOKEN => token.token = value,
            KEY_TOKEN_SECRET => token.token_secret = value,
            KEY_SESSION_HANDLE => token.session_handle = value,
            KEY_REQUEST_AUTH_URL => token.request_auth_url = value,
            KEY_YAHOO_GUID => token.yahoo_guid = value,
            KEY_EXPIRES_IN => token.expiration_time_sec = Some(expiration_time(&value, now_sec)?),
            KEY_AUTHORIZATION_EXPIRES_IN => {
                token.authorization_expiration_time_sec = Some(expiration_time(&value, now_sec)?)
            }
            _ => warn!(key, "Ignoring unknown response parameter"),
        }
    }
    Ok(token)
}

fn expiration_time(expires_in_sec: &str, now_sec: i64) -> Result<i64> {
    let offset: i64 = expires_in_sec.trim().parse().map_err(|_| {
        FantasyWearError::parse(format!("Invalid expiry offset: {expires_in_sec}"))
    })?;
    Ok(now_sec + offset)
}
