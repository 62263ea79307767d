//! Entry point: parse CLI and dispatch to command handlers.

use clap::Parser;
use fantasy_wear::{
    cli::{Commands, FantasyWear},
    commands::{
        accounts::{handle_accounts, handle_remove_account},
        leagues::handle_leagues,
        login::handle_login,
        run::handle_run,
        sync::{handle_set_sync_interval, handle_sync},
        AppContext, LocalWearable,
    },
    config::AppConfig,
};
use tracing_subscriber::EnvFilter;

/// Run the CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app = FantasyWear::parse();
    let config = AppConfig::from_env()?;
    if app.command.needs_credentials() {
        config.require_credentials()?;
    }
    let ctx = AppContext::new(config)?;

    match app.command {
        Commands::Login { verifier } => {
            handle_login(&ctx, verifier).await?;
        }
        Commands::Accounts => handle_accounts(&ctx)?,
        Commands::RemoveAccount { name } => {
            let (wearable, _requests) = LocalWearable::connect();
            handle_remove_account(&ctx, &name, &wearable.host()).await?
        }
        Commands::Leagues {
            account,
            refresh,
            json,
        } => handle_leagues(&ctx, account.as_deref(), refresh, json).await?,
        Commands::Sync { account } => {
            handle_sync(&ctx, account.as_deref()).await?;
        }
        Commands::SetSyncInterval { interval } => {
            handle_set_sync_interval(&ctx, interval.as_secs())?
        }
        Commands::Run => handle_run(&ctx).await?,
    }

    Ok(())
}
