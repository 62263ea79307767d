//! In-process data layer connecting a host endpoint to a wearable endpoint.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, Weak};
use tracing::debug;

use super::data_map::{DataEvent, DataEventKind, DataItem, DataMap, MessageEvent};
use super::transport::{DataListener, MessageListener, WearTransport};
use crate::error::FantasyWearError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Host,
    Wear,
}

impl Side {
    fn other(self) -> Self {
        match self {
            Side::Host => Side::Wear,
            Side::Wear => Side::Host,
        }
    }
}

#[derive(Default)]
struct Listeners {
    data: Option<Weak<dyn DataListener>>,
    message: Option<Weak<dyn MessageListener>>,
}

#[derive(Default)]
struct Shared {
    items: Mutex<BTreeMap<String, DataMap>>,
    host: RwLock<Listeners>,
    wear: RwLock<Listeners>,
}

impl Shared {
    fn items(&self) -> Result<MutexGuard<'_, BTreeMap<String, DataMap>>> {
        self.items
            .lock()
            .map_err(|_| FantasyWearError::transport("Data item store lock poisoned"))
    }

    fn listeners(&self, side: Side) -> &RwLock<Listeners> {
        match side {
            Side::Host => &self.host,
            Side::Wear => &self.wear,
        }
    }

    fn data_listener(&self, side: Side) -> Option<Arc<dyn DataListener>> {
        self.listeners(side).read().ok()?.data.as_ref()?.upgrade()
    }

    fn message_listener(&self, side: Side) -> Option<Arc<dyn MessageListener>> {
        self.listeners(side).read().ok()?.message.as_ref()?.upgrade()
    }
}

/// A pair of connected nodes sharing one data item store.
///
/// Listeners are held weakly; the caller keeps them alive for as long as they
/// should receive events.
#[derive(Clone, Default)]
pub struct PairedDataLayer {
    shared: Arc<Shared>,
}

impl PairedDataLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoint(&self, side: Side) -> WearEndpoint {
        WearEndpoint {
            side,
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn host(&self) -> WearEndpoint {
        self.endpoint(Side::Host)
    }

    pub fn wear(&self) -> WearEndpoint {
        self.endpoint(Side::Wear)
    }

    pub fn set_data_listener(&self, side: Side, listener: &Arc<dyn DataListener>) {
        if let Ok(mut listeners) = self.shared.listeners(side).write() {
            listeners.data = Some(Arc::downgrade(listener));
        }
    }

    pub fn set_message_listener(&self, side: Side, listener: &Arc<dyn MessageListener>) {
        if let Ok(mut listeners) = self.shared.listeners(side).write() {
            listeners.message = Some(Arc::downgrade(listener));
        }
    }
}

/// One node of a [`PairedDataLayer`]
#[derive(Clone)]
pub struct WearEndpoint {
    side: Side,
    shared: Arc<Shared>,
}

impl WearEndpoint {
    pub fn side(&self) -> Side {
        self.side
    }
}

#[async_trait]
impl WearTransport for WearEndpoint {
    async fn put_data_item(&self, item: DataItem) -> Result<()> {
        let changed = {
            let mut items = self.shared.items()?;
            if items.get(&item.path) == Some(&item.data_map) {
                false
            } else {
                items.insert(item.path.clone(), item.data_map.clone());
                true
            }
        };
        if !changed {
            debug!(path = %item.path, "Data item unchanged, not replicating");
            return Ok(());
        }
        if let Some(listener) = self.shared.data_listener(self.side.other()) {
            listener
                .on_data_changed(vec![DataEvent {
                    kind: DataEventKind::Changed,
                    item,
                }])
                .await;
        }
        Ok(())
    }

    async fn data_items(&self) -> Result<Vec<DataItem>> {
        let items = self.shared.items()?;
        Ok(items
            .iter()
            .map(|(path, data_map)| DataItem {
                path: path.clone(),
                data_map: data_map.clone(),
            })
            .collect())
    }

    async fn delete_data_items(&self, path: &str) -> Result<usize> {
        let removed = self.shared.items()?.remove(path);
        let Some(data_map) = removed else {
            return Ok(0);
        };
        if let Some(listener) = self.shared.data_listener(self.side.other()) {
            listener
                .on_data_changed(vec![DataEvent {
                    kind: DataEventKind::Deleted,
                    item: DataItem {
                        path: path.to_string(),
                        data_map,
                    },
                }])
                .await;
        }
        Ok(1)
    }

    async fn send_message(&self, path: &str, data: &[u8]) -> Result<()> {
        match self.shared.message_listener(self.side.other()) {
            Some(listener) => {
                listener
                    .on_message_received(MessageEvent {
                        path: path.to_string(),
                        data: data.to_vec(),
                    })
                    .await;
            }
            None => debug!(path, "No connected node to receive message"),
        }
        Ok(())
    }
}
