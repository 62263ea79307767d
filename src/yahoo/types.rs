//! Fantasy API response types

use serde::{Deserialize, Serialize};

/// One side of a matchup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Team {
    pub name: String,
    pub logo_url: String,
    /// Points as the API formats them, e.g. "100.00"
    pub score: String,
    pub is_owned_by_current_login: bool,
}

/// The current week's head-to-head pairing for the logged-in user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Matchup {
    pub my_team: Team,
    pub opponent_team: Team,
}
