//! League table operations

use super::{
    models::{Account, League},
    schema::FantasyWearDatabase,
};
use crate::Result;
use rusqlite::{params, params_from_iter, Row};

fn league_from_row(row: &Row) -> rusqlite::Result<League> {
    Ok(League {
        account_name: row.get(0)?,
        league_key: row.get(1)?,
        league_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
    })
}

impl FantasyWearDatabase {
    /// All leagues for all accounts
    pub fn get_all_leagues(&self) -> Result<Vec<League>> {
        let mut stmt = self.conn.prepare(
            "SELECT account_name, league_key, league_name FROM leagues
             ORDER BY account_name, league_key",
        )?;
        let leagues = stmt
            .query_map([], league_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(leagues)
    }

    /// All leagues for `account`
    pub fn get_leagues(&self, account: &Account) -> Result<Vec<League>> {
        let mut stmt = self.conn.prepare(
            "SELECT account_name, league_key, league_name FROM leagues
             WHERE account_name = ? ORDER BY league_key",
        )?;
        let leagues = stmt
            .query_map([&account.name], league_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(leagues)
    }

    /// Replace the leagues of `account` with `leagues`. Stale rows are removed.
    ///
    /// The account must already have a token row.
    pub fn update_leagues(&mut self, account: &Account, leagues: &[League]) -> Result<()> {
        let tx = self.conn.transaction()?;

        for league in leagues {
            tx.execute(
                "INSERT OR REPLACE INTO leagues (account_name, league_key, league_name)
                 VALUES (?, ?, ?)",
                params![account.name, league.league_key, league.league_name],
            )?;
        }

        if leagues.is_empty() {
            tx.execute("DELETE FROM leagues WHERE account_name = ?", [&account.name])?;
        } else {
            let placeholders = vec!["?"; leagues.len()].join(",");
            let sql = format!(
                "DELETE FROM leagues WHERE account_name = ? AND league_key NOT IN ({placeholders})"
            );
            let args = std::iter::once(account.name.as_str())
                .chain(leagues.iter().map(|l| l.league_key.as_str()));
            tx.execute(&sql, params_from_iter(args))?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Delete every league row
    pub fn clear_leagues(&mut self) -> Result<()> {
        self.conn.execute("DELETE FROM leagues", [])?;
        Ok(())
    }
}
