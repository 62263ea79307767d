//! Authenticated GET requests against the data APIs.

use std::sync::Arc;

use reqwest::{header::AUTHORIZATION, Client};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::authenticator::AuthTokenSource;
use super::request::{Consumer, HttpMethod, OAuthRequest};
use super::token::Token;
use crate::core::clock::Clock;
use crate::core::http::fetch_text;
use crate::storage::Account;
use crate::{FantasyWearError, Result};

/// Marks a stored token as expired so the next use refreshes it.
pub trait TokenInvalidator: Send + Sync {
    /// Only invalidates if the stored token still matches `token`.
    fn invalidate_token(&self, account: &Account, token: &Token) -> Result<()>;
}

/// Everything needed to sign a data request on behalf of an account.
#[derive(Clone)]
pub struct ApiAuth {
    pub consumer: Consumer,
    pub tokens: Arc<dyn AuthTokenSource>,
    pub invalidator: Arc<dyn TokenInvalidator>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Debug, Clone)]
pub struct OAuthApiRequest {
    url: String,
    account: Account,
}

impl OAuthApiRequest {
    pub fn new(url: impl Into<String>, account: Account) -> Self {
        Self {
            url: url.into(),
            account,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send the request and return the response body.
    ///
    /// A client error invalidates the token the request was signed with, so the next
    /// request forces a refresh; if that fails too, the account is removed.
    pub async fn execute(
        &self,
        http: &Client,
        auth: &ApiAuth,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let token = self.obtain_token(auth, cancel).await?;
        self.execute_with_token(http, auth, &token, cancel).await
    }

    async fn obtain_token(&self, auth: &ApiAuth, cancel: &CancellationToken) -> Result<Token> {
        auth.tokens
            .auth_token(&self.account, cancel)
            .await
            .map_err(|e| match e {
                FantasyWearError::Cancelled
                | FantasyWearError::AuthPermanent { .. }
                | FantasyWearError::AuthTransient { .. } => e,
                other => FantasyWearError::AuthTransient {
                    message: format!("Unable to obtain auth token: {other}"),
                },
            })
    }

    async fn execute_with_token(
        &self,
        http: &Client,
        auth: &ApiAuth,
        token: &Token,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let header = OAuthRequest::new(
            HttpMethod::Get,
            self.url.clone(),
            &auth.consumer.key,
            token,
            auth.clock.now_secs(),
        )
        .authorization_header(&auth.consumer.secret, token);

        debug!(url = %self.url, "Sending API request");
        match fetch_text(http.get(&self.url).header(AUTHORIZATION, header), cancel).await {
            Err(e) if e.is_client_error() => {
                error!(
                    status = e.status_code(),
                    account = %self.account.name,
                    "Invalidating token due to HTTP client error"
                );
                if let Err(invalidate_err) = auth.invalidator.invalidate_token(&self.account, token)
                {
                    warn!(error = %invalidate_err, "Failed to invalidate token");
                }
                Err(e)
            }
            result => result,
        }
    }
}
