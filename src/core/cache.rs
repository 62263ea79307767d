//! File locations and caching utilities
//!
//! - Paths under the user's cache directory for the database and preferences
//! - Small file read/write helpers
//! - `MemoryCache`: an in-memory LRU cache shared behind a mutex

use dirs;
use lru::LruCache;
use std::{
    fs,
    hash::Hash,
    io::{Read, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::Mutex,
};


const APP_DIR: &str = "fantasy-wear";

/// Base directory: ~/.cache/fantasy-wear
pub fn app_cache_dir() -> PathBuf {
    let base = dirs::cache_dir().unwrap_or_else(|| {
        let mut home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.push(".cache");
        home
    });
    base.join(APP_DIR)
}

/// Path: ~/.cache/fantasy-wear/fantasywear.db
pub fn database_path() -> PathBuf {
    app_cache_dir().join("fantasywear.db")
}

/// Path: ~/.cache/fantasy-wear/prefs.json
pub fn preferences_path() -> PathBuf {
    app_cache_dir().join("prefs.json")
}

/// Try to read a file into a String
pub fn try_read_to_string(path: &Path) -> Option<String> {
    let mut f = fs::File::open(path).ok()?;
    let mut s = String::new();

    f.read_to_string(&mut s).ok()?;

    Some(s)
}

/// Write a string to file
pub fn write_string(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut f = fs::File::create(path)?;
    f.write_all(contents.as_bytes())
}

/// LRU cache safe to share between tasks.
///
/// A poisoned lock degrades to a cache miss rather than an error.
pub struct MemoryCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    entries: Mutex<LruCache<K, V>>,
}

impl<K, V> MemoryCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    /// Create a cache holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().ok()?;
        entries.get(key).cloned()
    }

    pub fn put(&self, key: K, value: V) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.put(key, value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}
