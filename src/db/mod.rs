//! SQLite persistence for the ingestion pipeline.
//!
//! Two independent stores: `golf.db` holds tracked players and their owned
//! results; `clubs.db` holds the club reference directory. Each is wrapped by
//! a thin connection owner that applies its schema migrations on open. Store
//! handles are created at run start and passed into the components that need
//! them — there is no process-global connection.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

pub mod clubs;
pub mod players;
pub mod results;
pub mod types;

pub use clubs::ClubsDb;
pub use types::*;

/// Handle to the players + results store.
pub struct GolfDb {
    conn: Connection,
}

impl GolfDb {
    /// Open (or create) the golf store at `path` and apply the schema.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self, DbError> {
        let conn = open_connection(&path.into(), crate::migrations::GOLF_MIGRATIONS)?;
        // Cascade delete from players to their owned results.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Borrow the underlying connection for ad-hoc queries.
    pub fn conn_ref(&self) -> &Connection {
        &self.conn
    }

    /// Execute a closure within a SQLite transaction.
    /// Commits on Ok, rolls back on Err.
    pub fn with_transaction<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Self) -> Result<T, DbError>,
    {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        match f(self) {
            Ok(val) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(val)
            }
            Err(e) => {
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }
}

/// Open a connection with WAL mode and run the given migration set.
fn open_connection(
    path: &Path,
    migrations: &[crate::migrations::Migration],
) -> Result<Connection, DbError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(DbError::CreateDir)?;
        }
    }

    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    crate::migrations::run_migrations(&conn, migrations).map_err(DbError::Migration)?;
    Ok(conn)
}
