//! Listing and removing accounts

use tracing::info;

use super::common::AppContext;
use crate::core::clock::Clock;
use crate::oauth::{AccountStore, TokenState};
use crate::protocol::WearTransport;
use crate::sync::clean_unused_accounts;
use crate::{FantasyWearError, Result};

/// Print each account with its token state and last sync time.
pub fn handle_accounts(ctx: &AppContext) -> Result<()> {
    let accounts = ctx.store.accounts()?;
    if accounts.is_empty() {
        println!("No accounts. Run `fantasy-wear login` to add one.");
        return Ok(());
    }

    let now = ctx.clock.now_secs();
    for account in &accounts {
        let state = match ctx.store.token(account)?.state_at(now) {
            TokenState::Valid => "valid",
            TokenState::ExpiredRefreshable => "expired (refreshable)",
            TokenState::Unauthorized => "login required",
        };
        let last_sync = match ctx.store.last_sync_time_sec(account)? {
            0 => "never".to_string(),
            sec => format!("{}s ago", (now - sec).max(0)),
        };
        println!("{}  token: {}  last sync: {}", account.name, state, last_sync);
    }
    Ok(())
}

/// Remove an account, its leagues, and its data items on the wearable.
pub async fn handle_remove_account(
    ctx: &AppContext,
    name: &str,
    transport: &dyn WearTransport,
) -> Result<()> {
    let account = ctx
        .store
        .find_account(name)?
        .ok_or_else(|| FantasyWearError::Storage {
            message: format!("No account named {name}"),
        })?;
    AccountStore::remove_account(&ctx.store, &account)?;

    let remaining = ctx.store.accounts()?;
    let deleted = clean_unused_accounts(&ctx.store, transport, &remaining).await?;
    info!(account = %account.name, deleted, "Account removed");
    println!("✓ Removed {}", account.name);
    Ok(())
}
