//! Yahoo Fantasy Sports data API
//!
//! - `types`: Teams and matchups
//! - `parser`: XML response parsing
//! - `http`: Signed API calls and the logo cache

pub mod http;
pub mod parser;
pub mod types;

pub use http::{FantasyApi, YahooClient, API_BASE_URL};
pub use types::{Matchup, Team};
