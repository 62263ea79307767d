//! Keeping the wearable up to date
//!
//! - `adapter`: Per-account sync passes and the initial-sync ack retry
//! - `ack`: Routing acks to waiting passes
//! - `stats`: Error and update counters
//! - `listener`: Messages from the wearable
//! - `cleanup`: State left behind by removed accounts
//! - `scheduler`: Periodic and on-demand sync loop

pub mod ack;
pub mod adapter;
pub mod cleanup;
pub mod listener;
pub mod scheduler;
pub mod stats;

pub use ack::{AckHub, AckWaiter};
pub use adapter::{SyncAdapter, SyncSettings};
pub use cleanup::clean_unused_accounts;
pub use listener::{HostMessageListener, SyncRequest};
pub use scheduler::run_sync_loop;
pub use stats::SyncStats;
