//! User preferences, persisted as JSON next to the database

use crate::core::cache::{preferences_path, try_read_to_string, write_string};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// 30 minutes
pub const DEFAULT_SYNC_INTERVAL_SEC: u64 = 30 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceValues {
    pub sync_interval_sec: u64,
}

impl Default for PreferenceValues {
    fn default() -> Self {
        Self {
            sync_interval_sec: DEFAULT_SYNC_INTERVAL_SEC,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
}

impl Preferences {
    /// Preferences at the default location under the cache directory
    pub fn new() -> Self {
        Self::at(preferences_path())
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current values; a missing or unreadable file yields the defaults
    pub fn load(&self) -> PreferenceValues {
        let Some(contents) = try_read_to_string(&self.path) else {
            return PreferenceValues::default();
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Ignoring unreadable preferences");
            PreferenceValues::default()
        })
    }

    pub fn sync_interval_sec(&self) -> u64 {
        self.load().sync_interval_sec
    }

    pub fn set_sync_interval_sec(&self, sync_interval_sec: u64) -> Result<()> {
        let values = PreferenceValues {
            sync_interval_sec,
            ..self.load()
        };
        write_string(&self.path, &serde_json::to_string_pretty(&values)?)?;
        Ok(())
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self::new()
    }
}
