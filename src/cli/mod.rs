//! CLI argument definitions and parsing.

pub mod types;

use clap::{Parser, Subcommand};
use types::SyncInterval;

#[derive(Debug, Parser)]
#[clap(
    name = "fantasy-wear",
    about = "Push Yahoo Fantasy Football scores to a paired wearable"
)]
pub struct FantasyWear {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Authorize a Yahoo account.
    ///
    /// Prints the Yahoo authorization URL, then exchanges the verification code
    /// (or the full callback URL) for an access token.
    Login {
        /// Verification code or callback URL; prompted for when omitted.
        #[clap(long)]
        verifier: Option<String>,
    },

    /// List accounts with their token state and last sync time.
    Accounts,

    /// Remove an account, its leagues, and its data on the wearable.
    RemoveAccount {
        /// Account name (Yahoo GUID) as shown by `accounts`.
        name: String,
    },

    /// List head-to-head leagues.
    Leagues {
        /// Only this account.
        #[clap(long, short)]
        account: Option<String>,

        /// Fetch the league list from Yahoo before printing.
        #[clap(long)]
        refresh: bool,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Sync now, forcing an update of every league on the wearable.
    Sync {
        /// Only this account.
        #[clap(long, short)]
        account: Option<String>,
    },

    /// Set the periodic sync interval, e.g. `1800`, `30m`, `2h`.
    SetSyncInterval { interval: SyncInterval },

    /// Sync periodically and on wearable requests until interrupted.
    Run,
}

impl Commands {
    /// Whether the command calls Yahoo and so needs consumer credentials.
    pub fn needs_credentials(&self) -> bool {
        match self {
            Commands::Login { .. } | Commands::Sync { .. } | Commands::Run => true,
            Commands::Leagues { refresh, .. } => *refresh,
            Commands::Accounts | Commands::RemoveAccount { .. } | Commands::SetSyncInterval { .. } => {
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_sync_interval() {
        let app = FantasyWear::try_parse_from(["fantasy-wear", "set-sync-interval", "30m"]).unwrap();
        match app.command {
            Commands::SetSyncInterval { interval } => assert_eq!(interval.as_secs(), 1800),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_leagues_flags() {
        let app = FantasyWear::try_parse_from([
            "fantasy-wear",
            "leagues",
            "--account",
            "GUID",
            "--refresh",
        ])
        .unwrap();
        assert!(app.command.needs_credentials());
        match app.command {
            Commands::Leagues {
                account,
                refresh,
                json,
            } => {
                assert_eq!(account.as_deref(), Some("GUID"));
                assert!(refresh);
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_local_commands_need_no_credentials() {
        let app = FantasyWear::try_parse_from(["fantasy-wear", "accounts"]).unwrap();
        assert!(!app.command.needs_credentials());
        assert!(FantasyWear::try_parse_from(["fantasy-wear", "set-sync-interval", "5"]).is_err());
    }
}
