//! Resources shared by the command handlers.

use reqwest::Client;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::clock::{Clock, SystemClock};
use crate::core::http::build_http_client;
use crate::oauth::{AccountAuthenticator, ApiAuth, LogNotifier, OAuthClient};
use crate::protocol::{
    DataListener, LogNotificationSink, MessageListener, PairedDataLayer, Side, WearEndpoint,
    WearReceiver,
};
use crate::storage::{Account, FantasyWearDatabase, Preferences, Store};
use crate::sync::{AckHub, HostMessageListener, SyncAdapter, SyncRequest};
use crate::yahoo::YahooClient;
use crate::{FantasyWearError, Result};

const APP_NAME: &str = "FantasyWear";

/// Clients and storage constructed once per invocation
pub struct AppContext {
    pub config: AppConfig,
    pub http: Client,
    pub store: Store,
    pub preferences: Preferences,
    pub clock: Arc<dyn Clock>,
    pub oauth: Arc<OAuthClient>,
    pub authenticator: Arc<AccountAuthenticator>,
    pub yahoo: Arc<YahooClient>,
}

impl AppContext {
    /// Open the on-disk database and build the clients for `config`
    pub fn new(config: AppConfig) -> Result<Self> {
        let store = Store::new(FantasyWearDatabase::open(&config.database_path)?);
        let preferences = Preferences::at(&config.preferences_path);
        Self::with_store(config, store, preferences, Arc::new(SystemClock))
    }

    pub fn with_store(
        config: AppConfig,
        store: Store,
        preferences: Preferences,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let http = build_http_client()?;
        let oauth = Arc::new(OAuthClient::new(
            http.clone(),
            config.oauth_config(),
            clock.clone(),
        ));
        let authenticator = Arc::new(AccountAuthenticator::new(
            Arc::new(store.clone()),
            oauth.clone(),
            Arc::new(LogNotifier),
            clock.clone(),
            config.app_signature.clone(),
            APP_NAME,
        ));
        let auth = ApiAuth {
            consumer: config.consumer.clone(),
            tokens: authenticator.clone(),
            invalidator: Arc::new(store.clone()),
            clock: clock.clone(),
        };
        let yahoo = Arc::new(YahooClient::with_base_url(
            http.clone(),
            auth,
            config.api_base_url.clone(),
        ));
        Ok(Self {
            config,
            http,
            store,
            preferences,
            clock,
            oauth,
            authenticator,
            yahoo,
        })
    }

    /// The named account, or every account when `name` is `None`
    pub fn select_accounts(&self, name: Option<&str>) -> Result<Vec<Account>> {
        match name {
            None => self.store.accounts(),
            Some(name) => match self.store.find_account(name)? {
                Some(account) => Ok(vec![account]),
                None => Err(FantasyWearError::Storage {
                    message: format!("No account named {name}"),
                }),
            },
        }
    }

    pub fn sync_adapter(&self, wearable: &LocalWearable) -> SyncAdapter {
        SyncAdapter::new(
            self.store.clone(),
            self.yahoo.clone(),
            Arc::new(wearable.host()),
            wearable.acks.clone(),
            self.preferences.clone(),
            self.clock.clone(),
        )
    }
}

/// An in-process wearable paired with this host. The wearable logs score updates
/// and acknowledges forced ones; the host routes its messages to the ack hub and
/// the sync request channel.
pub struct LocalWearable {
    pub layer: PairedDataLayer,
    pub acks: Arc<AckHub>,
    _receiver: Arc<dyn DataListener>,
    _host_listener: Arc<dyn MessageListener>,
}

impl LocalWearable {
    pub fn connect() -> (Self, mpsc::UnboundedReceiver<SyncRequest>) {
        let layer = PairedDataLayer::new();
        let acks = AckHub::new();
        let (tx, rx) = mpsc::unbounded_channel();

        let receiver: Arc<dyn DataListener> = Arc::new(WearReceiver::new(
            Arc::new(layer.wear()),
            Arc::new(LogNotificationSink),
        ));
        let host_listener: Arc<dyn MessageListener> =
            Arc::new(HostMessageListener::new(acks.clone(), tx));
        layer.set_data_listener(Side::Wear, &receiver);
        layer.set_message_listener(Side::Host, &host_listener);

        (
            Self {
                layer,
                acks,
                _receiver: receiver,
                _host_listener: host_listener,
            },
            rx,
        )
    }

    pub fn host(&self) -> WearEndpoint {
        self.layer.host()
    }

    pub fn wear(&self) -> WearEndpoint {
        self.layer.wear()
    }
}
