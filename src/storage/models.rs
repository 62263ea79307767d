//! Data models for the storage layer

use crate::oauth::ACCOUNT_TYPE_YAHOO;
use serde::{Deserialize, Serialize};

/// A fantasy league belonging to one account
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct League {
    pub account_name: String,
    pub league_key: String,
    pub league_name: String,
}

impl League {
    pub fn new(
        account_name: impl Into<String>,
        league_key: impl Into<String>,
        league_name: impl Into<String>,
    ) -> Self {
        Self {
            account_name: account_name.into(),
            league_key: league_key.into(),
            league_name: league_name.into(),
        }
    }
}

/// A logged-in user. The name is the Yahoo GUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub account_type: String,
}

impl Account {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            account_type: ACCOUNT_TYPE_YAHOO.to_string(),
        }
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
