//! Database schema and connection management

use crate::core::cache::database_path;
use crate::Result;
use rusqlite::Connection;
use std::path::Path;

/// Database connection for tokens and leagues
pub struct FantasyWearDatabase {
    pub(crate) conn: Connection,
}

impl FantasyWearDatabase {
    /// Open the database under the user's cache directory, creating it if needed
    pub fn new() -> Result<Self> {
        Self::open(&database_path())
    }

    /// Open (or create) the database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure the cache directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Self::from_connection(Connection::open(path)?)
    }

    /// Create an in-memory database, mainly for tests
    pub fn new_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // Leagues are deleted with their account through the foreign key
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initialize the database schema
    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS tokens (
                account_name TEXT PRIMARY KEY,
                token TEXT,
                token_secret TEXT,
                session_handle TEXT,
                expiration_time_sec INTEGER,
                authorization_expiration_time_sec INTEGER,
                last_sync_time_sec INTEGER
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS leagues (
                account_name TEXT REFERENCES tokens(account_name) ON DELETE CASCADE,
                league_key TEXT,
                league_name TEXT,
                PRIMARY KEY (account_name, league_key)
            )",
            [],
        )?;

        Ok(())
    }
}
