//! Shared handle to the database
//!
//! `Store` is constructed once at start-up and cloned into every component that
//! needs persistence. Each call takes the lock for the duration of one table
//! operation only.

use super::{
    models::{Account, League},
    schema::FantasyWearDatabase,
};
use crate::oauth::{AccountStore, Token, TokenInvalidator};
use crate::{FantasyWearError, Result};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

#[derive(Clone)]
pub struct Store {
    db: Arc<Mutex<FantasyWearDatabase>>,
}

impl Store {
    pub fn new(db: FantasyWearDatabase) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    pub fn new_in_memory() -> Result<Self> {
        Ok(Self::new(FantasyWearDatabase::new_in_memory()?))
    }

    fn lock(&self) -> Result<MutexGuard<'_, FantasyWearDatabase>> {
        self.db.lock().map_err(|_| FantasyWearError::Storage {
            message: "Database lock poisoned".to_string(),
        })
    }

    /// Register a newly logged-in account with its first token
    pub fn add_account(&self, account: &Account, token: &Token) -> Result<()> {
        self.lock()?.insert_token(account, token)?;
        info!(account = %account.name, "Added account");
        Ok(())
    }

    /// All accounts, sorted by name
    pub fn accounts(&self) -> Result<Vec<Account>> {
        Ok(self
            .lock()?
            .account_names()?
            .into_iter()
            .map(Account::new)
            .collect())
    }

    pub fn find_account(&self, name: &str) -> Result<Option<Account>> {
        Ok(self.accounts()?.into_iter().find(|a| a.name == name))
    }

    pub fn token(&self, account: &Account) -> Result<Token> {
        self.lock()?.get_token(account)
    }

    pub fn leagues(&self, account: &Account) -> Result<Vec<League>> {
        self.lock()?.get_leagues(account)
    }

    pub fn all_leagues(&self) -> Result<Vec<League>> {
        self.lock()?.get_all_leagues()
    }

    pub fn update_leagues(&self, account: &Account, leagues: &[League]) -> Result<()> {
        self.lock()?.update_leagues(account, leagues)
    }

    pub fn last_sync_time_sec(&self, account: &Account) -> Result<i64> {
        self.lock()?.get_last_sync_time_sec(account)
    }

    pub fn set_last_sync_time_sec(&self, account: &Account, last_sync_sec: i64) -> Result<()> {
        self.lock()?.set_last_sync_time_sec(account, last_sync_sec)
    }

    /// Drop token rows (and their leagues) for accounts not in `current_accounts`
    pub fn clean_unused_tokens(&self, current_accounts: &[Account]) -> Result<usize> {
        let removed = self.lock()?.clean_unused_tokens(current_accounts)?;
        if removed > 0 {
            info!(removed, "Removed tokens for deleted accounts");
        }
        Ok(removed)
    }
}

impl AccountStore for Store {
    fn get_token(&self, account: &Account) -> Result<Token> {
        self.token(account)
    }

    fn update_token(&self, account: &Account, token: &Token) -> Result<()> {
        if !self.lock()?.update_token(account, token)? {
            debug!(account = %account.name, "No token row to update");
        }
        Ok(())
    }

    fn remove_account(&self, account: &Account) -> Result<()> {
        if self.lock()?.delete_token(account)? {
            info!(account = %account.name, "Removed account");
        }
        Ok(())
    }
}

impl TokenInvalidator for Store {
    fn invalidate_token(&self, account: &Account, token: &Token) -> Result<()> {
        if !self.lock()?.invalidate_token(account, token)? {
            debug!(account = %account.name, "Stored token already replaced; nothing to invalidate");
        }
        Ok(())
    }
}
