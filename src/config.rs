//! Application configuration from the environment

use std::path::PathBuf;

use crate::core::cache::{database_path, preferences_path};
use crate::oauth::client::DEFAULT_CALLBACK_URL;
use crate::oauth::token_request::OAUTH_BASE_URL;
use crate::oauth::{Consumer, OAuthConfig};
use crate::yahoo::API_BASE_URL;
use crate::{FantasyWearError, Result};

pub const CONSUMER_KEY_ENV_VAR: &str = "FANTASY_WEAR_CONSUMER_KEY";
pub const CONSUMER_SECRET_ENV_VAR: &str = "FANTASY_WEAR_CONSUMER_SECRET";
pub const CALLBACK_URL_ENV_VAR: &str = "FANTASY_WEAR_CALLBACK_URL";
pub const LANG_PREF_ENV_VAR: &str = "FANTASY_WEAR_LANG_PREF";
pub const OAUTH_BASE_URL_ENV_VAR: &str = "FANTASY_WEAR_OAUTH_BASE_URL";
pub const API_BASE_URL_ENV_VAR: &str = "FANTASY_WEAR_API_BASE_URL";
pub const APP_SIGNATURE_ENV_VAR: &str = "FANTASY_WEAR_APP_SIGNATURE";

const DEFAULT_APP_SIGNATURE: &str = "fantasy-wear";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub consumer: Consumer,
    pub callback_url: String,
    pub lang_pref: Option<String>,
    pub oauth_base_url: String,
    pub api_base_url: String,
    /// Identity accepted by the account authenticator
    pub app_signature: String,
    pub database_path: PathBuf,
    pub preferences_path: PathBuf,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Consumer credentials are only needed by commands that talk to Yahoo.
    pub fn require_credentials(&self) -> Result<()> {
        for (value, env_var) in [
            (&self.consumer.key, CONSUMER_KEY_ENV_VAR),
            (&self.consumer.secret, CONSUMER_SECRET_ENV_VAR),
        ] {
            if value.is_empty() {
                return Err(FantasyWearError::MissingConfig {
                    env_var: env_var.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Read the configuration through `lookup`, which returns a variable's value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            consumer: Consumer::new(
                var(CONSUMER_KEY_ENV_VAR).unwrap_or_default(),
                var(CONSUMER_SECRET_ENV_VAR).unwrap_or_default(),
            ),
            callback_url: var(CALLBACK_URL_ENV_VAR)
                .unwrap_or_else(|| DEFAULT_CALLBACK_URL.to_string()),
            lang_pref: var(LANG_PREF_ENV_VAR),
            oauth_base_url: var(OAUTH_BASE_URL_ENV_VAR)
                .unwrap_or_else(|| OAUTH_BASE_URL.to_string()),
            api_base_url: var(API_BASE_URL_ENV_VAR).unwrap_or_else(|| API_BASE_URL.to_string()),
            app_signature: var(APP_SIGNATURE_ENV_VAR)
                .unwrap_or_else(|| DEFAULT_APP_SIGNATURE.to_string()),
            database_path: database_path(),
            preferences_path: preferences_path(),
        })
    }

    pub fn oauth_config(&self) -> OAuthConfig {
        OAuthConfig {
            consumer: self.consumer.clone(),
            callback_url: self.callback_url.clone(),
            lang_pref: self.lang_pref.clone(),
            base_url: self.oauth_base_url.clone(),
        }
    }
}
