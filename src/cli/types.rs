//! Type-safe CLI argument values

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{FantasyWearError, Result};

/// Shortest periodic sync interval accepted
pub const MIN_SYNC_INTERVAL_SEC: u64 = 60;

/// Periodic sync interval, written as seconds or with an `s`, `m` or `h` suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncInterval(pub u64);

impl SyncInterval {
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SyncInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl FromStr for SyncInterval {
    type Err = FantasyWearError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        let (digits, multiplier) = match s.chars().last() {
            Some('h') => (&s[..s.len() - 1], 3600),
            Some('m') => (&s[..s.len() - 1], 60),
            Some('s') => (&s[..s.len() - 1], 1),
            _ => (s.as_str(), 1),
        };
        let value: u64 = digits
            .trim()
            .parse()
            .map_err(|_| FantasyWearError::parse(format!("Invalid sync interval: {s}")))?;
        let secs = value
            .checked_mul(multiplier)
            .ok_or_else(|| FantasyWearError::parse(format!("Sync interval too large: {s}")))?;
        if secs < MIN_SYNC_INTERVAL_SEC {
            return Err(FantasyWearError::parse(format!(
                "Sync interval must be at least {MIN_SYNC_INTERVAL_SEC}s"
            )));
        }
        Ok(Self(secs))
    }
}
