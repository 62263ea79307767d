//! FantasyWear
//!
//! Keeps a paired wearable up to date with Yahoo Fantasy Football head-to-head
//! scores.
//!
//! ## Features
//!
//! - **OAuth 1.0a**: HMAC-SHA1 request signing, token negotiation and refresh
//! - **Token Lifecycle**: Per-account authenticator that refreshes expired tokens
//!   and reports lost authorization
//! - **Local Storage**: SQLite tables for tokens and leagues
//! - **Wearable Sync**: League payloads pushed over a data-item transport, with
//!   acknowledged delivery for a league's first update
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fantasy_wear::{commands::{AppContext, LocalWearable}, config::AppConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> fantasy_wear::Result<()> {
//! let ctx = AppContext::new(AppConfig::from_env()?)?;
//! let (wearable, _requests) = LocalWearable::connect();
//! let stats = ctx
//!     .sync_adapter(&wearable)
//!     .sync_all(true, &CancellationToken::new())
//!     .await;
//! println!("{} leagues updated", stats.num_updates);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! Set the Yahoo application credentials before running network commands:
//! ```bash
//! export FANTASY_WEAR_CONSUMER_KEY=...
//! export FANTASY_WEAR_CONSUMER_SECRET=...
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod oauth;
pub mod protocol;
pub mod storage;
pub mod sync;
pub mod yahoo;

// Re-export commonly used types
pub use error::{FantasyWearError, Result};
pub use oauth::{Consumer, Token, TokenState};
pub use storage::{Account, League, Store};
pub use yahoo::{Matchup, Team};
