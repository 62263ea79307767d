//! Core utilities for FantasyWear
//!
//! This module consolidates common utilities that are used across
//! the application:
//! - `cache`: File locations and the in-memory LRU cache
//! - `clock`: Injectable wall clock
//! - `http`: Cancellable HTTP helpers

pub mod cache;
pub mod clock;
pub mod http;

// Re-export commonly used items for convenience
pub use cache::{database_path, preferences_path, try_read_to_string, write_string, MemoryCache};
pub use clock::{Clock, FixedClock, SystemClock};
pub use http::{build_http_client, fetch_bytes, fetch_text};
