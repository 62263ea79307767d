//! Client for the OAuth token negotiation calls.
//!
//! Every call observes a [`CancellationToken`]; cancelling it aborts the in-flight
//! request with [`FantasyWearError::Cancelled`].

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::info;
use url::Url;

use super::authenticator::TokenRefresher;
use super::request::Consumer;
use super::token::Token;
use super::token_request::{
    OAuthTokenRequest, ENDPOINT_GET_REQUEST_TOKEN, ENDPOINT_GET_TOKEN, OAUTH_BASE_URL,
};
use crate::core::clock::Clock;
use crate::{FantasyWearError, Result};

const KEY_CALLBACK: &str = "oauth_callback";
const KEY_LANG_PREF: &str = "xoauth_lang_pref";
const KEY_VERIFIER: &str = "oauth_verifier";
const KEY_SESSION_HANDLE: &str = "oauth_session_handle";

/// Out-of-band callback: the provider shows the verifier to the user instead of redirecting.
pub const DEFAULT_CALLBACK_URL: &str = "oob";

#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub consumer: Consumer,
    pub callback_url: String,
    pub lang_pref: Option<String>,
    pub base_url: String,
}

impl OAuthConfig {
    pub fn new(consumer: Consumer) -> Self {
        Self {
            consumer,
            callback_url: DEFAULT_CALLBACK_URL.to_string(),
            lang_pref: None,
            base_url: OAUTH_BASE_URL.to_string(),
        }
    }
}

pub struct OAuthClient {
    http: Client,
    config: OAuthConfig,
    clock: Arc<dyn Clock>,
}

impl OAuthClient {
    pub fn new(http: Client, config: OAuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            http,
            config,
            clock,
        }
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Obtain a request token. Its `request_auth_url` is where the user approves access.
    pub async fn get_request_token(&self, cancel: &CancellationToken) -> Result<Token> {
        let mut extra = BTreeMap::new();
        extra.insert(KEY_CALLBACK.to_string(), self.config.callback_url.clone());
        if let Some(lang) = self.config.lang_pref.as_ref().filter(|l| !l.is_empty()) {
            extra.insert(KEY_LANG_PREF.to_string(), lang.clone());
        }
        // Empty previous token: this is the first request of the handshake
        self.send(ENDPOINT_GET_REQUEST_TOKEN, Token::default(), extra, cancel)
            .await
    }

    /// Exchange a request token plus the verifier attached to `callback_url` for an
    /// access token.
    pub async fn get_token(
        &self,
        cancel: &CancellationToken,
        request_token: &Token,
        callback_url: &str,
    ) -> Result<Token> {
        let verifier = verifier_from_callback(callback_url)?;
        self.get_token_with_verifier(cancel, request_token, &verifier)
            .await
    }

    /// Exchange a request token and a verifier the user copied by hand.
    pub async fn get_token_with_verifier(
        &self,
        cancel: &CancellationToken,
        request_token: &Token,
        verifier: &str,
    ) -> Result<Token> {
        if verifier.is_empty() {
            return Err(FantasyWearError::MissingVerifier { callback_url: None });
        }
        let mut extra = BTreeMap::new();
        extra.insert(KEY_VERIFIER.to_string(), verifier.to_string());
        self.send(ENDPOINT_GET_TOKEN, request_token.clone(), extra, cancel)
            .await
    }

    /// Refresh an expired access token using its session handle.
    pub async fn refresh_token(&self, cancel: &CancellationToken, token: &Token) -> Result<Token> {
        let mut extra = BTreeMap::new();
        extra.insert(KEY_SESSION_HANDLE.to_string(), token.session_handle.clone());
        let refreshed = self
            .send(ENDPOINT_GET_TOKEN, token.clone(), extra, cancel)
            .await?;
        info!("Refreshed access token");
        Ok(refreshed)
    }

    async fn send(
        &self,
        endpoint: &str,
        previous_token: Token,
        extra: BTreeMap<String, String>,
        cancel: &CancellationToken,
    ) -> Result<Token> {
        OAuthTokenRequest::new(&self.config.base_url, endpoint, previous_token, extra)?
            .send(&self.http, &self.config.consumer, self.clock.as_ref(), cancel)
            .await
    }
}

#[async_trait]
impl TokenRefresher for OAuthClient {
    async fn refresh(&self, token: &Token, cancel: &CancellationToken) -> Result<Token> {
        self.refresh_token(cancel, token).await
    }
}

/// The `oauth_verifier` query parameter of a callback URL.
pub fn verifier_from_callback(callback_url: &str) -> Result<String> {
    let missing = || FantasyWearError::MissingVerifier {
        callback_url: Some(callback_url.to_string()),
    };
    let url = Url::parse(callback_url).map_err(|_| missing())?;
    url.query_pairs()
        .find(|(key, _)| key == KEY_VERIFIER)
        .map(|(_, value)| value.into_owned())
        .filter(|verifier| !verifier.is_empty())
        .ok_or_else(missing)
}
