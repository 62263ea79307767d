//! Acknowledgements from the wearable for forced league updates.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::FantasyWearError;
use crate::Result;

/// Routes incoming acks to the sync pass waiting for them, keyed by item path.
#[derive(Debug, Default)]
pub struct AckHub {
    next_id: AtomicU64,
    waiters: Mutex<HashMap<String, (u64, oneshot::Sender<()>)>>,
}

impl AckHub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Start listening for an ack of `path`. Register before sending the update
    /// so an immediate ack is not missed.
    pub fn register(self: &Arc<Self>, path: &str) -> AckWaiter {
        let path = ack_key(path);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        if let Ok(mut waiters) = self.waiters.lock() {
            waiters.insert(path.to_string(), (id, tx));
        }
        AckWaiter {
            hub: Arc::clone(self),
            path: path.to_string(),
            id,
            state: WaitState::Pending(rx),
        }
    }

    /// Deliver an ack for `path`. Returns whether anyone was waiting for it.
    pub fn deliver(&self, path: &str) -> bool {
        let path = ack_key(path);
        let waiter = match self.waiters.lock() {
            Ok(mut waiters) => waiters.remove(path),
            Err(_) => None,
        };
        match waiter {
            Some((_, tx)) => {
                debug!(path, "Delivering ACK");
                tx.send(()).is_ok()
            }
            None => {
                warn!(path, "Received unexpected ACK");
                false
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.waiters.lock().map(|w| w.len()).unwrap_or(0)
    }

    fn unregister(&self, path: &str, id: u64) {
        if let Ok(mut waiters) = self.waiters.lock() {
            if waiters.get(path).is_some_and(|(waiter_id, _)| *waiter_id == id) {
                waiters.remove(path);
            }
        }
    }
}

/// Transports may report item paths with or without a leading `/`.
fn ack_key(path: &str) -> &str {
    path.trim_start_matches('/')
}

#[derive(Debug)]
enum WaitState {
    Pending(oneshot::Receiver<()>),
    Acked,
    Closed,
}

/// A registered interest in one path's ack. Unregisters when dropped.
#[derive(Debug)]
pub struct AckWaiter {
    hub: Arc<AckHub>,
    path: String,
    id: u64,
    state: WaitState,
}

impl AckWaiter {
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Wait up to `period` for the ack. Returns `Ok(true)` once acked; an ack that
    /// arrived between waits is not lost.
    pub async fn wait(&mut self, period: Duration, cancel: &CancellationToken) -> Result<bool> {
        match self.state {
            WaitState::Acked => return Ok(true),
            // Replaced by a newer registration for the same path
            WaitState::Closed => {
                return tokio::select! {
                    _ = cancel.cancelled() => Err(FantasyWearError::Cancelled),
                    _ = tokio::time::sleep(period) => Ok(false),
                };
            }
            WaitState::Pending(_) => {}
        }
        let WaitState::Pending(rx) = &mut self.state else {
            return Ok(false);
        };
        let received = tokio::select! {
            _ = cancel.cancelled() => return Err(FantasyWearError::Cancelled),
            received = tokio::time::timeout(period, rx) => received,
        };
        match received {
            Ok(Ok(())) => {
                self.state = WaitState::Acked;
                Ok(true)
            }
            Ok(Err(_)) => {
                self.state = WaitState::Closed;
                Ok(false)
            }
            Err(_elapsed) => Ok(false),
        }
    }
}

impl Drop for AckWaiter {
    fn drop(&mut self) {
        self.hub.unregister(&self.path, self.id);
    }
}
