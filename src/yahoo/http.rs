//! Client for Yahoo's fantasy APIs

use async_trait::async_trait;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::parser::{parse_leagues, parse_scoreboard};
use super::types::Matchup;
use crate::core::cache::MemoryCache;
use crate::core::http::fetch_bytes;
use crate::oauth::{ApiAuth, OAuthApiRequest};
use crate::storage::{Account, League};
use crate::Result;

pub const API_BASE_URL: &str = "https://fantasysports.yahooapis.com/fantasy/v2/";

const ENDPOINT_LEAGUES: &str = "users;use_login=1/games;is_available=1/leagues";
const LOGO_CACHE_CAPACITY: usize = 64;

/// The data calls a sync pass needs
#[async_trait]
pub trait FantasyApi: Send + Sync {
    /// Head-to-head leagues of the account in currently available games
    async fn get_leagues(&self, account: &Account, cancel: &CancellationToken)
        -> Result<Vec<League>>;

    /// The account's current matchup in `league`
    async fn get_matchup(
        &self,
        account: &Account,
        league: &League,
        cancel: &CancellationToken,
    ) -> Result<Matchup>;

    /// Raw image bytes for a team logo
    async fn get_logo(&self, url: &str, cancel: &CancellationToken) -> Result<Vec<u8>>;
}

pub struct YahooClient {
    http: Client,
    auth: ApiAuth,
    base_url: String,
    logos: MemoryCache<String, Vec<u8>>,
}

impl YahooClient {
    pub fn new(http: Client, auth: ApiAuth) -> Self {
        Self::with_base_url(http, auth, API_BASE_URL)
    }

    pub fn with_base_url(http: Client, auth: ApiAuth, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            http,
            auth,
            base_url,
            logos: MemoryCache::new(LOGO_CACHE_CAPACITY),
        }
    }

    fn endpoint(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn get(&self, endpoint: &str, account: &Account, cancel: &CancellationToken) -> Result<String> {
        OAuthApiRequest::new(self.endpoint(endpoint), account.clone())
            .execute(&self.http, &self.auth, cancel)
            .await
    }
}

#[async_trait]
impl FantasyApi for YahooClient {
    async fn get_leagues(
        &self,
        account: &Account,
        cancel: &CancellationToken,
    ) -> Result<Vec<League>> {
        let body = self.get(ENDPOINT_LEAGUES, account, cancel).await?;
        let leagues = parse_leagues(&body)?
            .into_iter()
            .map(|league| League {
                account_name: account.name.clone(),
                ..league
            })
            .collect();
        Ok(leagues)
    }

    async fn get_matchup(
        &self,
        account: &Account,
        league: &League,
        cancel: &CancellationToken,
    ) -> Result<Matchup> {
        let endpoint = format!("league/{}/scoreboard", league.league_key);
        let body = self.get(&endpoint, account, cancel).await?;
        parse_scoreboard(&body)
    }

    async fn get_logo(&self, url: &str, cancel: &CancellationToken) -> Result<Vec<u8>> {
        // Teams without a logo get an empty asset
        if url.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(bytes) = self.logos.get(&url.to_string()) {
            debug!(url, "Logo cache hit");
            return Ok(bytes);
        }
        let bytes = fetch_bytes(self.http.get(url), cancel).await?;
        self.logos.put(url.to_string(), bytes.clone());
        Ok(bytes)
    }
}
