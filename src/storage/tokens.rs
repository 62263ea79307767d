//! Token table operations
//!
//! One row per account. An account exists exactly when it has a row here.

use super::{models::Account, schema::FantasyWearDatabase};
use crate::oauth::Token;
use crate::Result;
use rusqlite::{params, params_from_iter, OptionalExtension};

impl FantasyWearDatabase {
    /// The stored token for `account`, or an empty token if there is none
    pub fn get_token(&self, account: &Account) -> Result<Token> {
        let token = self
            .conn
            .query_row(
                "SELECT token, token_secret, session_handle,
                        expiration_time_sec, authorization_expiration_time_sec
                 FROM tokens WHERE account_name = ?",
                [&account.name],
                |row| {
                    Ok(Token {
                        token: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                        token_secret: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                        session_handle: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                        expiration_time_sec: row.get(3)?,
                        authorization_expiration_time_sec: row.get(4)?,
                        ..Token::default()
                    })
                },
            )
            .optional()?;
        Ok(token.unwrap_or_default())
    }

    /// Insert or replace the token row for `account`. Resets the last sync time.
    pub fn insert_token(&mut self, account: &Account, token: &Token) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO tokens
             (account_name, token, token_secret, session_handle,
              expiration_time_sec, authorization_expiration_time_sec, last_sync_time_sec)
             VALUES (?, ?, ?, ?, ?, ?, 0)",
            params![
                account.name,
                token.token,
                token.token_secret,
                token.session_handle,
                token.expiration_time_sec,
                token.authorization_expiration_time_sec
            ],
        )?;
        Ok(())
    }

    /// Overwrite the credentials of an existing row. Missing accounts are left alone.
    pub fn update_token(&mut self, account: &Account, token: &Token) -> Result<bool> {
        let rows = self.conn.execute(
            "UPDATE tokens SET token = ?, token_secret = ?, session_handle = ?,
                 expiration_time_sec = ?, authorization_expiration_time_sec = ?
             WHERE account_name = ?",
            params![
                token.token,
                token.token_secret,
                token.session_handle,
                token.expiration_time_sec,
                token.authorization_expiration_time_sec,
                account.name
            ],
        )?;
        Ok(rows > 0)
    }

    /// Force a refresh on next use, if the stored token is still `token`
    pub fn invalidate_token(&mut self, account: &Account, token: &Token) -> Result<bool> {
        let rows = self.conn.execute(
            "UPDATE tokens SET expiration_time_sec = 0
             WHERE account_name = ? AND token = ? AND token_secret = ?",
            params![account.name, token.token, token.token_secret],
        )?;
        Ok(rows > 0)
    }

    /// Delete the account's row; its leagues go with it
    pub fn delete_token(&mut self, account: &Account) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM tokens WHERE account_name = ?", [&account.name])?;
        Ok(rows > 0)
    }

    /// Delete every row whose account is not in `current_accounts`
    pub fn clean_unused_tokens(&mut self, current_accounts: &[Account]) -> Result<usize> {
        if current_accounts.is_empty() {
            return Ok(self.conn.execute("DELETE FROM tokens", [])?);
        }
        let placeholders = vec!["?"; current_accounts.len()].join(",");
        let sql = format!("DELETE FROM tokens WHERE account_name NOT IN ({placeholders})");
        let rows = self.conn.execute(
            &sql,
            params_from_iter(current_accounts.iter().map(|a| a.name.as_str())),
        )?;
        Ok(rows)
    }

    /// Names of all accounts with a token row, sorted
    pub fn account_names(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT account_name FROM tokens ORDER BY account_name")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    /// Last successful sync for `account`; 0 if it never synced or doesn't exist
    pub fn get_last_sync_time_sec(&self, account: &Account) -> Result<i64> {
        let last = self
            .conn
            .query_row(
                "SELECT last_sync_time_sec FROM tokens WHERE account_name = ?",
                [&account.name],
                |row| row.get::<_, Option<i64>>(0),
            )
            .optional()?;
        Ok(last.flatten().unwrap_or(0))
    }

    pub fn set_last_sync_time_sec(&mut self, account: &Account, last_sync_sec: i64) -> Result<()> {
        self.conn.execute(
            "UPDATE tokens SET last_sync_time_sec = ? WHERE account_name = ?",
            params![last_sync_sec, account.name],
        )?;
        Ok(())
    }
}
