use chrono::Utc;
use rusqlite::params;

use super::*;
use crate::roster::RosterEntry;

impl GolfDb {
    // =========================================================================
    // Players
    // =========================================================================

    /// Destructive roster import: the incoming set replaces the tracked
    /// players wholesale. Owned results go with their players via cascade.
    /// Returns the number of players inserted.
    pub fn replace_roster(&self, roster: &[RosterEntry]) -> Result<usize, DbError> {
        self.with_transaction(|db| {
            db.conn.execute("DELETE FROM players", [])?;

            let now = Utc::now().to_rfc3339();
            let mut inserted = 0usize;
            for entry in roster {
                db.conn.execute(
                    "INSERT INTO players (license, nickname, updated_at)
                     VALUES (?1, ?2, ?3)",
                    params![entry.license, entry.nickname, now],
                )?;
                inserted += 1;
            }
            Ok(inserted)
        })
    }

    /// All tracked players in roster (insertion) order.
    pub fn list_players(&self) -> Result<Vec<DbPlayer>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, license, nickname, current_handicap, updated_at
             FROM players ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(DbPlayer {
                id: row.get(0)?,
                license: row.get(1)?,
                nickname: row.get(2)?,
                current_handicap: row.get(3)?,
                updated_at: row.get(4)?,
            })
        })?;

        let mut players = Vec::new();
        for row in rows {
            players.push(row?);
        }
        Ok(players)
    }

    /// Look up a single player by license.
    pub fn get_player_by_license(&self, license: &str) -> Result<Option<DbPlayer>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, license, nickname, current_handicap, updated_at
             FROM players WHERE license = ?1",
        )?;
        let mut rows = stmt.query_map(params![license], |row| {
            Ok(DbPlayer {
                id: row.get(0)?,
                license: row.get(1)?,
                nickname: row.get(2)?,
                current_handicap: row.get(3)?,
                updated_at: row.get(4)?,
            })
        })?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Set a player's rolling handicap to the latest final-handicap snapshot.
    pub fn update_current_handicap(&self, player_id: i64, handicap: f64) -> Result<(), DbError> {
        self.conn.execute(
            "UPDATE players SET current_handicap = ?2, updated_at = ?3 WHERE id = ?1",
            params![player_id, handicap, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}
