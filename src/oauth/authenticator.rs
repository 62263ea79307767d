//! Authenticator for Yahoo Fantasy Sports accounts.
//!
//! Account names are Yahoo GUIDs and account types are [`ACCOUNT_TYPE_YAHOO`]. The
//! only supported token type is [`TOKEN_TYPE_OAUTH`], returned as the transport
//! string of a [`Token`] (see [`crate::protocol::wire`]).
//!
//! [`AccountAuthenticator::get_auth_token`] decides from the stored token whether it
//! can be used as-is, must be refreshed, or is unrecoverable. In the last case the
//! account is removed, since re-authentication cannot guarantee the same user.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::token::{Token, TokenState};
use crate::core::clock::Clock;
use crate::protocol::wire::{decode_from_string, encode_to_string};
use crate::storage::Account;
use crate::{FantasyWearError, Result};

pub const ACCOUNT_TYPE_YAHOO: &str = "fantasy_wear.ACCOUNT_TYPE_YAHOO";
pub const TOKEN_TYPE_OAUTH: &str = "oauth";

/// The operation was interrupted before it finished.
pub const ERROR_CODE_CANCELED: i32 = 4;
/// The credentials are no longer usable and the account has been removed.
pub const ERROR_CODE_BAD_AUTHENTICATION: i32 = 9;

/// Performs the refresh call for an expired token.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, token: &Token, cancel: &CancellationToken) -> Result<Token>;
}

/// Persistent account registry consulted by the authenticator.
pub trait AccountStore: Send + Sync {
    /// The stored token, or an empty token if the account has none.
    fn get_token(&self, account: &Account) -> Result<Token>;
    fn update_token(&self, account: &Account, token: &Token) -> Result<()>;
    fn remove_account(&self, account: &Account) -> Result<()>;
}

/// Tells the user that an account needs to log in again.
pub trait AuthNotifier: Send + Sync {
    fn notify_lost_authorization(&self, account: &Account);
}

/// Notifier that only writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl AuthNotifier for LogNotifier {
    fn notify_lost_authorization(&self, account: &Account) {
        warn!(
            account = %account.name,
            "Authorization lost; log in again to resume syncing this account"
        );
    }
}

/// Anything that can hand out a usable token for an account.
#[async_trait]
pub trait AuthTokenSource: Send + Sync {
    async fn auth_token(&self, account: &Account, cancel: &CancellationToken) -> Result<Token>;
}

/// Identity of the process asking for credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub pid: u32,
    pub signature: String,
}

/// Result of [`AccountAuthenticator::get_auth_token`], in the account-manager
/// convention of a token bundle or a numeric error code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthTokenResponse {
    Token {
        account_name: String,
        account_type: String,
        auth_token: String,
    },
    Error {
        code: i32,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddAccountResponse {
    /// The caller should run the interactive login flow.
    StartLogin,
}

pub struct AccountAuthenticator {
    store: Arc<dyn AccountStore>,
    refresher: Arc<dyn TokenRefresher>,
    notifier: Arc<dyn AuthNotifier>,
    clock: Arc<dyn Clock>,
    owner_signature: String,
    app_name: String,
    // At most one refresh in flight per authenticator
    lock: Mutex<()>,
}

impl AccountAuthenticator {
    pub fn new(
        store: Arc<dyn AccountStore>,
        refresher: Arc<dyn TokenRefresher>,
        notifier: Arc<dyn AuthNotifier>,
        clock: Arc<dyn Clock>,
        owner_signature: impl Into<String>,
        app_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            refresher,
            notifier,
            clock,
            owner_signature: owner_signature.into(),
            app_name: app_name.into(),
            lock: Mutex::new(()),
        }
    }

    /// The identity of this application, accepted by every entry point.
    pub fn owner_identity(&self) -> CallerIdentity {
        CallerIdentity {
            pid: std::process::id(),
            signature: self.owner_signature.clone(),
        }
    }

    pub fn add_account(&self, caller: &CallerIdentity) -> Result<AddAccountResponse> {
        self.enforce_permission(caller)?;
        Ok(AddAccountResponse::StartLogin)
    }

    /// Obtain a usable token for `account`, refreshing it if it has expired.
    pub async fn get_auth_token(
        &self,
        caller: &CallerIdentity,
        account: &Account,
        token_type: &str,
        cancel: &CancellationToken,
    ) -> Result<AuthTokenResponse> {
        self.enforce_permission(caller)?;
        if token_type != TOKEN_TYPE_OAUTH {
            return Err(FantasyWearError::Unsupported {
                operation: format!("Token type {token_type}"),
            });
        }

        let _guard = self.lock.lock().await;

        let mut token = self.store.get_token(account)?;
        match token.state_at(self.clock.now_secs()) {
            TokenState::Unauthorized => {
                // No saved credentials, or no authorization left to refresh them with
                error!(account = %account.name, "Token authorization lost; removing account");
                return self.handle_lost_authorization(account);
            }
            TokenState::ExpiredRefreshable => {
                debug!(account = %account.name, "Refreshing expired or invalidated auth token");
                token = match self.refresher.refresh(&token, cancel).await {
                    Ok(token) => token,
                    Err(e) if e.is_cancellation() => {
                        return Ok(AuthTokenResponse::Error {
                            code: ERROR_CODE_CANCELED,
                            message: "Interrupted while refreshing token".to_string(),
                        });
                    }
                    Err(e) if e.is_client_error() => {
                        error!(
                            account = %account.name,
                            error = %e,
                            "Client error while refreshing token, invalidating account"
                        );
                        return self.handle_lost_authorization(account);
                    }
                    Err(e) => {
                        return Err(FantasyWearError::AuthTransient {
                            message: format!("Server or network error refreshing token: {e}"),
                        });
                    }
                };
                self.store.update_token(account, &token)?;
            }
            TokenState::Valid => {}
        }

        Ok(AuthTokenResponse::Token {
            account_name: account.name.clone(),
            account_type: account.account_type.clone(),
            auth_token: encode_to_string(&token)?,
        })
    }

    pub fn get_auth_token_label(&self, _token_type: &str) -> String {
        self.app_name.clone()
    }

    pub fn confirm_credentials(&self, _account: &Account) -> Result<()> {
        Err(unsupported("confirm_credentials"))
    }

    pub fn update_credentials(&self, _account: &Account, _token_type: &str) -> Result<()> {
        Err(unsupported("update_credentials"))
    }

    pub fn has_features(&self, _account: &Account, _features: &[&str]) -> Result<bool> {
        Err(unsupported("has_features"))
    }

    pub fn edit_properties(&self, _account_type: &str) -> Result<()> {
        Err(unsupported("edit_properties"))
    }

    fn enforce_permission(&self, caller: &CallerIdentity) -> Result<()> {
        if caller.signature != self.owner_signature {
            warn!(pid = caller.pid, "Rejected foreign caller");
            return Err(FantasyWearError::PermissionDenied {
                message: "Other applications may not use FantasyWear accounts".to_string(),
            });
        }
        Ok(())
    }

    fn handle_lost_authorization(&self, account: &Account) -> Result<AuthTokenResponse> {
        self.store.remove_account(account)?;
        self.notifier.notify_lost_authorization(account);
        Ok(AuthTokenResponse::Error {
            code: ERROR_CODE_BAD_AUTHENTICATION,
            message: "Lost authorization".to_string(),
        })
    }
}

#[async_trait]
impl AuthTokenSource for AccountAuthenticator {
    async fn auth_token(&self, account: &Account, cancel: &CancellationToken) -> Result<Token> {
        let response = self
            .get_auth_token(&self.owner_identity(), account, TOKEN_TYPE_OAUTH, cancel)
            .await?;
        match response {
            AuthTokenResponse::Token { auth_token, .. } => decode_from_string(&auth_token)
                .ok_or_else(|| FantasyWearError::AuthTransient {
                    message: "Error decoding token string".to_string(),
                }),
            AuthTokenResponse::Error { code, .. } if code == ERROR_CODE_CANCELED => {
                Err(FantasyWearError::Cancelled)
            }
            AuthTokenResponse::Error { message, .. } => {
                Err(FantasyWearError::AuthPermanent { message })
            }
        }
    }
}

fn unsupported(operation: &str) -> FantasyWearError {
    FantasyWearError::Unsupported {
        operation: operation.to_string(),
    }
}
