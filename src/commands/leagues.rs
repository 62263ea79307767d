//! Listing an account's leagues

use tokio_util::sync::CancellationToken;

use super::common::AppContext;
use crate::storage::League;
use crate::yahoo::FantasyApi;
use crate::Result;

/// Print stored leagues, refreshing them from Yahoo first when asked.
pub async fn handle_leagues(
    ctx: &AppContext,
    account: Option<&str>,
    refresh: bool,
    as_json: bool,
) -> Result<()> {
    let cancel = CancellationToken::new();
    let mut leagues: Vec<League> = Vec::new();
    for account in ctx.select_accounts(account)? {
        if refresh {
            let fetched = ctx.yahoo.get_leagues(&account, &cancel).await?;
            ctx.store.update_leagues(&account, &fetched)?;
        }
        leagues.extend(ctx.store.leagues(&account)?);
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&leagues)?);
        return Ok(());
    }
    if leagues.is_empty() {
        println!("No head-to-head leagues found.");
        return Ok(());
    }
    for league in &leagues {
        println!(
            "{}  {}  ({})",
            league.league_key, league.league_name, league.account_name
        );
    }
    Ok(())
}
