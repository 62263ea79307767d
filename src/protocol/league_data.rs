//! League update payloads sent from the host to the wearable.

use std::collections::HashSet;

use super::data_map::{Asset, DataItem, DataMap};
use super::paths;
use super::wire::{decode_from_string, encode_to_string};
use crate::storage::{Account, League};
use crate::yahoo::Matchup;
use crate::Result;

/// Bumped when the payload layout changes.
pub const APP_VERSION: i32 = 1;

const KEY_MATCHUP: &str = "matchup";
const KEY_APP_VERSION: &str = "app_version";
const KEY_TIMESTAMP: &str = "timestamp";
const KEY_LOGO: &str = "logo";
const KEY_OPPONENT_LOGO: &str = "opponent_logo";

/// Build the data item that updates a league's state on the wearable.
///
/// The transport suppresses puts identical to the last one, so a forced update
/// carries `now_millis` to make it unique. Its presence also marks the update as
/// manual to the receiver.
pub fn update_request(
    account: &Account,
    league: &League,
    matchup: &Matchup,
    logo: Asset,
    opponent_logo: Asset,
    force_update: bool,
    now_millis: i64,
) -> Result<DataItem> {
    let mut map = DataMap::new();
    map.put_int(KEY_APP_VERSION, APP_VERSION);
    map.put_string(KEY_MATCHUP, encode_to_string(matchup)?);
    map.put_asset(KEY_LOGO, logo);
    map.put_asset(KEY_OPPONENT_LOGO, opponent_logo);
    if force_update {
        map.put_long(KEY_TIMESTAMP, now_millis);
    }
    Ok(DataItem {
        path: league_path(account, league),
        data_map: map,
    })
}

/// The matchup carried by an update, if it decodes.
pub fn matchup(map: &DataMap) -> Option<Matchup> {
    decode_from_string(map.get_string(KEY_MATCHUP)?)
}

pub fn logo(map: &DataMap) -> Option<&Asset> {
    map.get_asset(KEY_LOGO)
}

pub fn opponent_logo(map: &DataMap) -> Option<&Asset> {
    map.get_asset(KEY_OPPONENT_LOGO)
}

pub fn app_version(map: &DataMap) -> Option<i32> {
    map.get_int(KEY_APP_VERSION)
}

/// Whether an update was forced by a manual or initial sync.
pub fn is_manual_sync(map: &DataMap) -> bool {
    map.contains_key(KEY_TIMESTAMP)
}

/// `league/<account name>/<league key>`
pub fn league_path(account: &Account, league: &League) -> String {
    format!("{}/{}/{}", paths::LEAGUE, account.name, league.league_key)
}

/// `<account name>/<league key>` for league paths, `None` for anything else.
pub fn tag_if_matches(path: &str) -> Option<String> {
    league_segments(path).map(|(account, league)| format!("{account}/{league}"))
}

/// Whether `item` is a league update for one of `account_names`.
pub fn is_active_league_item(item: &DataItem, account_names: &HashSet<String>) -> bool {
    league_segments(&item.path).is_some_and(|(account, _)| account_names.contains(account))
}

fn league_segments(path: &str) -> Option<(&str, &str)> {
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match segments.as_slice() {
        [prefix, account, league] if *prefix == paths::LEAGUE => Some((account, league)),
        _ => None,
    }
}
