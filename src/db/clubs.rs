//! Club directory store and resolver.
//!
//! The directory is append-only: the builder inserts entries as it discovers
//! them and re-runs are idempotent (uniqueness violations are reported, not
//! raised). The resolver is the read side — a short-code lookup with a
//! deterministic placeholder for codes the directory does not know yet.

use std::path::PathBuf;

use rusqlite::{params, Connection};

use super::types::{DbClub, DbError};

/// Handle to the club directory store.
pub struct ClubsDb {
    conn: Connection,
}

impl ClubsDb {
    /// Open (or create) the directory store at `path` and apply the schema.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self, DbError> {
        let conn = super::open_connection(&path.into(), crate::migrations::CLUBS_MIGRATIONS)?;
        Ok(Self { conn })
    }

    /// Borrow the underlying connection for ad-hoc queries.
    pub fn conn_ref(&self) -> &Connection {
        &self.conn
    }

    /// Insert a directory entry. Returns `false` when the entry already
    /// exists (club ID or code uniqueness) — the expected outcome on re-run,
    /// never an error.
    pub fn insert_club(&self, club_id: u32, code: &str, name: &str) -> Result<bool, DbError> {
        let result = self.conn.execute(
            "INSERT INTO clubs (club_id, club_code, club_name) VALUES (?1, ?2, ?3)",
            params![club_id, code, name],
        );
        match result {
            Ok(_) => Ok(true),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a club's display name by its short code.
    pub fn get_name_by_code(&self, code: &str) -> Result<Option<String>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT club_name FROM clubs WHERE club_code = ?1")?;
        let mut rows = stmt.query_map(params![code], |row| row.get::<_, String>(0))?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Resolve a short code to a display name, synthesizing a placeholder for
    /// codes the directory has not seen.
    pub fn resolve_name(&self, code: &str) -> Result<String, DbError> {
        Ok(self
            .get_name_by_code(code)?
            .unwrap_or_else(|| format!("Unknown Club ({})", code)))
    }

    /// All directory entries, ordered by external club ID.
    pub fn list_clubs(&self) -> Result<Vec<DbClub>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, club_id, club_code, club_name FROM clubs ORDER BY club_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(DbClub {
                id: row.get(0)?,
                club_id: row.get(1)?,
                club_code: row.get(2)?,
                club_name: row.get(3)?,
            })
        })?;

        let mut clubs = Vec::new();
        for row in rows {
            clubs.push(row?);
        }
        Ok(clubs)
    }

    /// Total directory entries.
    pub fn count(&self) -> Result<i64, DbError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM clubs", [], |row| row.get(0))?;
        Ok(count)
    }
}
