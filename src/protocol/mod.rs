//! Communication with the paired wearable
//!
//! - `paths`: Data item and message path prefixes
//! - `data_map`: Replicated payload types
//! - `league_data`: League update payloads
//! - `wire`: String transport encoding
//! - `transport`: Transport and listener traits
//! - `memory`: In-process paired data layer
//! - `receiver`: Wearable-side update handling

pub mod data_map;
pub mod league_data;
pub mod memory;
pub mod paths;
pub mod receiver;
pub mod transport;
pub mod wire;

pub use data_map::{Asset, DataEvent, DataEventKind, DataItem, DataMap, DataValue, MessageEvent};
pub use memory::{PairedDataLayer, Side, WearEndpoint};
pub use receiver::{LogNotificationSink, NotificationSink, ScoreNotification, WearReceiver};
pub use transport::{DataListener, MessageListener, WearTransport};
