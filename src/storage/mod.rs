//! Storage layer for FantasyWear
//!
//! This module provides a clean abstraction over the SQLite database,
//! organized into logical components:
//! - `models`: Data structures
//! - `schema`: Database connection and schema management
//! - `tokens` / `leagues`: Table operations
//! - `store`: Shared, lockable handle used by the rest of the crate
//! - `preferences`: User settings stored as JSON

pub mod leagues;
pub mod models;
pub mod preferences;
pub mod schema;
pub mod store;
pub mod tokens;

#[cfg(test)]
mod tests;

// Re-export the main types and database struct for easy access
pub use models::*;
pub use preferences::{Preferences, DEFAULT_SYNC_INTERVAL_SEC};
pub use schema::FantasyWearDatabase;
pub use store::Store;
