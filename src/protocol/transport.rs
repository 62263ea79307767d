//! Data-item and message transport between the host and the paired wearable.

use async_trait::async_trait;

use super::data_map::{DataEvent, DataItem, MessageEvent};
use crate::Result;

/// One side's view of the replicated data layer
#[async_trait]
pub trait WearTransport: Send + Sync {
    /// Store `item` under its path and replicate it to the other side.
    async fn put_data_item(&self, item: DataItem) -> Result<()>;

    /// Every data item currently stored.
    async fn data_items(&self) -> Result<Vec<DataItem>>;

    /// Delete the item at `path`, returning the number of items removed.
    async fn delete_data_items(&self, path: &str) -> Result<usize>;

    /// Send a message to every connected node.
    async fn send_message(&self, path: &str, data: &[u8]) -> Result<()>;
}

#[async_trait]
pub trait DataListener: Send + Sync {
    async fn on_data_changed(&self, events: Vec<DataEvent>);
}

#[async_trait]
pub trait MessageListener: Send + Sync {
    async fn on_message_received(&self, message: MessageEvent);
}
