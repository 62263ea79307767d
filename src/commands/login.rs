//! Interactive Yahoo login

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::common::AppContext;
use crate::oauth::AddAccountResponse;
use crate::storage::Account;
use crate::{FantasyWearError, Result};

/// Run the OAuth handshake and store the new account.
///
/// The verifier (or the full callback URL) may be passed directly; otherwise it is
/// read from standard input after the authorization URL is printed.
pub async fn handle_login(ctx: &AppContext, verifier: Option<String>) -> Result<Account> {
    match ctx
        .authenticator
        .add_account(&ctx.authenticator.owner_identity())?
    {
        AddAccountResponse::StartLogin => debug!("Starting login"),
    }

    let cancel = CancellationToken::new();
    let request_token = ctx.oauth.get_request_token(&cancel).await?;
    println!("Open this URL to authorize FantasyWear:");
    println!("  {}", request_token.request_auth_url);

    let input = match verifier {
        Some(verifier) => verifier,
        None => prompt("Enter the verification code: ").await?,
    };
    let input = input.trim();

    let token = if input.starts_with("http://") || input.starts_with("https://") {
        ctx.oauth.get_token(&cancel, &request_token, input).await?
    } else {
        ctx.oauth
            .get_token_with_verifier(&cancel, &request_token, input)
            .await?
    };

    if token.yahoo_guid.is_empty() {
        return Err(FantasyWearError::parse("Token response has no Yahoo GUID"));
    }
    let account = Account::new(token.yahoo_guid.clone());
    ctx.store.add_account(&account, &token)?;
    info!(account = %account.name, "Login complete");
    println!("✓ Logged in as {}", account.name);
    Ok(account)
}

async fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    let line = tokio::task::spawn_blocking(|| -> std::io::Result<String> {
        use std::io::Write;
        std::io::stdout().flush()?;
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        Ok(line)
    })
    .await
    .map_err(|e| FantasyWearError::Io(std::io::Error::other(e)))??;
    Ok(line)
}
