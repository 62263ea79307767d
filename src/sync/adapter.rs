//! Per-account sync passes pushing league state to the wearable.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::ack::AckHub;
use super::stats::SyncStats;
use crate::core::clock::Clock;
use crate::error::FantasyWearError;
use crate::protocol::{league_data, Asset, DataItem, WearTransport};
use crate::storage::{Account, League, Preferences, Store};
use crate::yahoo::FantasyApi;
use crate::Result;

/// How often the league list is refreshed outside of manual syncs.
pub const LEAGUE_REFRESH_PERIOD_SEC: i64 = 24 * 60 * 60;

/// Sync interval for accounts with no head-to-head leagues.
pub const NO_LEAGUES_SYNC_INTERVAL_SEC: u64 = 12 * 60 * 60;

/// Attempts at delivering the first update of a league.
pub const INITIAL_SYNC_TRIES: u32 = 10;

/// How long to wait for an ack before resending an initial update.
pub const INITIAL_SYNC_PERIOD: Duration = Duration::from_secs(10);

/// Upper bound on a single transport call.
pub const TRANSPORT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub initial_sync_tries: u32,
    pub initial_sync_period: Duration,
    pub transport_timeout: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            initial_sync_tries: INITIAL_SYNC_TRIES,
            initial_sync_period: INITIAL_SYNC_PERIOD,
            transport_timeout: TRANSPORT_TIMEOUT,
        }
    }
}

/// Per-account scheduling state kept between passes.
#[derive(Debug, Clone, Copy, Default)]
struct AccountSchedule {
    interval_sec: Option<u64>,
    /// Earliest time a periodic pass may retry after a failure
    retry_at_sec: Option<i64>,
}

/// Fetches league and matchup data for accounts and pushes it to the wearable.
pub struct SyncAdapter {
    store: Store,
    api: Arc<dyn FantasyApi>,
    transport: Arc<dyn WearTransport>,
    acks: Arc<AckHub>,
    preferences: Preferences,
    clock: Arc<dyn Clock>,
    settings: SyncSettings,
    schedules: Mutex<HashMap<String, AccountSchedule>>,
}

impl SyncAdapter {
    pub fn new(
        store: Store,
        api: Arc<dyn FantasyApi>,
        transport: Arc<dyn WearTransport>,
        acks: Arc<AckHub>,
        preferences: Preferences,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            api,
            transport,
            acks,
            preferences,
            clock,
            settings: SyncSettings::default(),
            schedules: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_settings(mut self, settings: SyncSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn acks(&self) -> &Arc<AckHub> {
        &self.acks
    }

    /// Sync every account in turn. A failure in one account doesn't stop the rest.
    pub async fn sync_all(&self, is_manual: bool, cancel: &CancellationToken) -> SyncStats {
        let mut stats = SyncStats::default();
        let accounts = match self.store.accounts() {
            Ok(accounts) => accounts,
            Err(e) => {
                error!(error = %e, "Unable to list accounts");
                stats.record_error(&e);
                return stats;
            }
        };
        for account in &accounts {
            if cancel.is_cancelled() {
                break;
            }
            stats += self.on_perform_sync(account, is_manual, cancel).await;
        }
        stats
    }

    /// Run one pass for `account`, classifying any failure into the returned stats.
    pub async fn on_perform_sync(
        &self,
        account: &Account,
        is_manual: bool,
        cancel: &CancellationToken,
    ) -> SyncStats {
        info!(account = %account.name, is_manual, "Starting sync");
        let mut stats = SyncStats::default();
        match self.perform_sync(account, is_manual, &mut stats, cancel).await {
            Ok(()) => debug!(account = %account.name, updates = stats.num_updates, "Sync complete"),
            Err(FantasyWearError::Cancelled) => warn!(account = %account.name, "Sync interrupted"),
            Err(e) if e.is_parse_failure() => {
                error!(account = %account.name, error = %e, "Error parsing response")
            }
            Err(e) if e.is_auth_failure() => {
                error!(account = %account.name, error = %e, "Error authenticating")
            }
            Err(e) => error!(account = %account.name, error = %e, "Error syncing"),
        }
        stats
    }

    /// Refresh leagues if due, push every league's matchup, and record the sync time.
    pub async fn perform_sync(
        &self,
        account: &Account,
        is_manual: bool,
        stats: &mut SyncStats,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let result = self.sync_account(account, is_manual, stats, cancel).await;
        match &result {
            Ok(()) => self.update_schedule(account, |s| s.retry_at_sec = None),
            Err(e) => {
                stats.record_error(e);
                if !e.is_cancellation() {
                    // Wait a full interval before the next periodic attempt
                    let retry_at_sec = self.clock.now_secs() + self.interval_for(account) as i64;
                    self.update_schedule(account, |s| s.retry_at_sec = Some(retry_at_sec));
                }
            }
        }
        result
    }

    async fn sync_account(
        &self,
        account: &Account,
        is_manual: bool,
        stats: &mut SyncStats,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let last_sync_time_sec = self.store.last_sync_time_sec(account)?;
        let is_initial_sync = last_sync_time_sec == 0;

        let leagues = if self.should_refresh_leagues(last_sync_time_sec, is_manual) {
            debug!(account = %account.name, "Refreshing leagues");
            let leagues = self.api.get_leagues(account, cancel).await?;
            self.store.update_leagues(account, &leagues)?;
            leagues
        } else {
            self.store.leagues(account)?
        };

        let interval_sec = if leagues.is_empty() {
            info!(account = %account.name, "No head-to-head leagues");
            NO_LEAGUES_SYNC_INTERVAL_SEC
        } else {
            for league in &leagues {
                self.sync_league(account, league, is_manual, is_initial_sync, cancel)
                    .await?;
                stats.num_updates += 1;
            }
            self.preferences.sync_interval_sec()
        };

        self.store
            .set_last_sync_time_sec(account, self.clock.now_secs())?;
        self.set_periodic_sync_interval_sec(account, interval_sec);
        Ok(())
    }

    async fn sync_league(
        &self,
        account: &Account,
        league: &League,
        is_manual: bool,
        is_initial_sync: bool,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let matchup = self.api.get_matchup(account, league, cancel).await?;
        let (logo, opponent_logo) = tokio::try_join!(
            self.api.get_logo(&matchup.my_team.logo_url, cancel),
            self.api.get_logo(&matchup.opponent_team.logo_url, cancel),
        )?;
        let (logo, opponent_logo) = (Asset::from_bytes(logo), Asset::from_bytes(opponent_logo));

        let request = |force_update: bool| {
            league_data::update_request(
                account,
                league,
                &matchup,
                logo.clone(),
                opponent_logo.clone(),
                force_update,
                self.clock.now_millis(),
            )
        };

        if !is_initial_sync {
            return self.send_update(request(is_manual)?).await;
        }

        // Early updates may sit undelivered until a later one arrives, so resend
        // until the wearable confirms receipt.
        let path = league_data::league_path(account, league);
        let mut waiter = self.acks.register(&path);
        for attempt in 1..=self.settings.initial_sync_tries {
            debug!(%path, attempt, "Sending initial update");
            self.send_update(request(true)?).await?;
            if waiter
                .wait(self.settings.initial_sync_period, cancel)
                .await?
            {
                debug!(%path, attempt, "Received ACK");
                return Ok(());
            }
        }
        error!(
            %path,
            tries = self.settings.initial_sync_tries,
            "Did not receive ACK for initial update; giving up"
        );
        Ok(())
    }

    async fn send_update(&self, item: DataItem) -> Result<()> {
        tokio::time::timeout(
            self.settings.transport_timeout,
            self.transport.put_data_item(item),
        )
        .await
        .map_err(|_| FantasyWearError::transport("Timed out sending data item"))?
    }

    /// Leagues are refreshed on manual syncs, when the clock moved backwards, and
    /// once the refresh period has passed.
    pub fn should_refresh_leagues(&self, last_sync_time_sec: i64, is_manual: bool) -> bool {
        let now = self.clock.now_secs();
        is_manual
            || last_sync_time_sec > now
            || now - last_sync_time_sec > LEAGUE_REFRESH_PERIOD_SEC
    }

    /// The periodic interval recorded by the account's last pass.
    pub fn periodic_sync_interval_sec(&self, account: &Account) -> Option<u64> {
        self.schedule(account).interval_sec
    }

    pub fn set_periodic_sync_interval_sec(&self, account: &Account, interval_sec: u64) {
        self.update_schedule(account, |s| s.interval_sec = Some(interval_sec));
    }

    /// When a failed account may next be retried by a periodic pass.
    pub fn retry_at_sec(&self, account: &Account) -> Option<i64> {
        self.schedule(account).retry_at_sec
    }

    fn schedule(&self, account: &Account) -> AccountSchedule {
        self.schedules
            .lock()
            .ok()
            .and_then(|schedules| schedules.get(&account.name).copied())
            .unwrap_or_default()
    }

    fn update_schedule(&self, account: &Account, update: impl FnOnce(&mut AccountSchedule)) {
        if let Ok(mut schedules) = self.schedules.lock() {
            update(schedules.entry(account.name.clone()).or_default());
        }
    }

    /// Store a new default interval and apply it to every account.
    pub fn set_sync_interval_for_all(&self, interval_sec: u64) -> Result<()> {
        self.preferences.set_sync_interval_sec(interval_sec)?;
        for account in self.store.accounts()? {
            self.set_periodic_sync_interval_sec(&account, interval_sec);
        }
        Ok(())
    }

    fn interval_for(&self, account: &Account) -> u64 {
        self.periodic_sync_interval_sec(account)
            .unwrap_or_else(|| self.preferences.sync_interval_sec())
    }

    /// When `account` is next due for a periodic pass. A clock that moved
    /// backwards makes it due now; a pending retry after a failure pushes it out.
    fn due_at_sec(&self, account: &Account, now: i64) -> Result<i64> {
        let last = self.store.last_sync_time_sec(account)?;
        let due_at = if last > now {
            now
        } else {
            last + self.interval_for(account) as i64
        };
        Ok(match self.retry_at_sec(account) {
            Some(retry_at) => due_at.max(retry_at),
            None => due_at,
        })
    }

    /// Accounts whose periodic interval has elapsed since their last sync.
    pub fn due_accounts(&self) -> Result<Vec<Account>> {
        let now = self.clock.now_secs();
        let mut due = Vec::new();
        for account in self.store.accounts()? {
            if self.due_at_sec(&account, now)? <= now {
                due.push(account);
            }
        }
        Ok(due)
    }

    /// Time until the next account becomes due, at least one second.
    pub fn next_sync_delay(&self) -> Result<Duration> {
        let now = self.clock.now_secs();
        let mut delay_sec = self.preferences.sync_interval_sec() as i64;
        for account in self.store.accounts()? {
            delay_sec = delay_sec.min(self.due_at_sec(&account, now)? - now);
        }
        Ok(Duration::from_secs(delay_sec.max(1) as u64))
    }
}
