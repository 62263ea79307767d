//! Host-side handling of messages from the wearable.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

use super::ack::AckHub;
use crate::protocol::{paths, MessageEvent, MessageListener};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncRequest {
    Manual,
}

/// Routes `sync` messages to the scheduler and `ack` messages to the ack hub.
pub struct HostMessageListener {
    acks: Arc<AckHub>,
    sync_requests: mpsc::UnboundedSender<SyncRequest>,
}

impl HostMessageListener {
    pub fn new(acks: Arc<AckHub>, sync_requests: mpsc::UnboundedSender<SyncRequest>) -> Self {
        Self {
            acks,
            sync_requests,
        }
    }
}

#[async_trait]
impl MessageListener for HostMessageListener {
    async fn on_message_received(&self, message: MessageEvent) {
        match message.path.as_str() {
            paths::SYNC => {
                debug!("Requesting manual sync");
                if self.sync_requests.send(SyncRequest::Manual).is_err() {
                    error!("Sync scheduler is not running");
                }
            }
            paths::ACK => match String::from_utf8(message.data) {
                Ok(path) => {
                    debug!(%path, "Got ACK");
                    self.acks.deliver(&path);
                }
                Err(e) => error!(error = %e, "ACK payload is not UTF-8"),
            },
            other => error!(path = other, "Unknown message path"),
        }
    }
}
