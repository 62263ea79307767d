//! OAuth credentials and their validity windows.

use serde::{Deserialize, Serialize};

/// Credential record for one account.
///
/// Empty strings stand for absent values. `authorization_expiration_time_sec == None`
/// means authorization was never obtained or has been revoked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Token {
    pub token: String,
    pub token_secret: String,
    pub session_handle: String,
    pub request_auth_url: String,
    pub yahoo_guid: String,
    pub expiration_time_sec: Option<i64>,
    pub authorization_expiration_time_sec: Option<i64>,
}

/// Where a stored token sits in its lifecycle at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// No authorization, or the authorization window has closed.
    Unauthorized,
    /// Usable as-is.
    Valid,
    /// Past its expiry but still inside the authorization window.
    ExpiredRefreshable,
}

impl Token {
    /// State of this token at `now_sec` (Unix seconds).
    pub fn state_at(&self, now_sec: i64) -> TokenState {
        match self.authorization_expiration_time_sec {
            None => return TokenState::Unauthorized,
            Some(expiry) if now_sec > expiry => return TokenState::Unauthorized,
            Some(_) => {}
        }
        match self.expiration_time_sec {
            Some(expiry) if now_sec <= expiry => TokenState::Valid,
            _ => TokenState::ExpiredRefreshable,
        }
    }

    /// Copy of this token with its expiry forced into the past.
    pub fn invalidated(&self) -> Token {
        Token {
            expiration_time_sec: Some(0),
            ..self.clone()
        }
    }
}
