//! Path prefixes for communication with the wearable.

/// Data items for league updates, as `league/<account name>/<league key>`.
/// Build these with [`super::league_data::league_path`].
pub const LEAGUE: &str = "league";

/// Message from the wearable asking the host to sync every account.
pub const SYNC: &str = "sync";

/// Message from the wearable acknowledging a forced league update. The payload is
/// the acknowledged item's path as UTF-8.
///
/// The first few data items of a league may be queued but not delivered until a
/// later one arrives, so initial updates are resent until acknowledged.
pub const ACK: &str = "ack";
