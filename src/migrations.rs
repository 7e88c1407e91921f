//! Schema migration framework.
//!
//! Numbered SQL migrations are embedded at compile time via `include_str!`.
//! Each migration runs exactly once, tracked by a `schema_version` table in
//! the target database. The golf store and the clubs store are independent
//! databases with independent migration sets.

use rusqlite::Connection;

pub struct Migration {
    version: i32,
    sql: &'static str,
}

/// Players + results store.
pub const GOLF_MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("migrations/001_golf_baseline.sql"),
}];

/// Club directory store.
pub const CLUBS_MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("migrations/001_clubs_baseline.sql"),
}];

fn ensure_schema_version_table(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .map_err(|e| format!("Failed to create schema_version table: {}", e))
}

/// Return the highest applied migration version, or 0 if none.
fn current_version(conn: &Connection) -> Result<i32, String> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| format!("Failed to read schema version: {}", e))
}

/// Run all pending migrations from `migrations` against `conn`.
///
/// Returns the number of migrations applied (0 if already up-to-date).
///
/// Forward-compat guard: if the database has a higher version than the
/// highest known migration, returns an error rather than touching data a
/// newer build owns.
pub fn run_migrations(conn: &Connection, migrations: &[Migration]) -> Result<usize, String> {
    ensure_schema_version_table(conn)?;

    let current = current_version(conn)?;
    let max_known = migrations.last().map(|m| m.version).unwrap_or(0);

    if current > max_known {
        return Err(format!(
            "Database schema version {} is newer than this build supports ({}). \
             Update fairway before running against this database.",
            current, max_known
        ));
    }

    let mut applied = 0usize;
    for migration in migrations.iter().filter(|m| m.version > current) {
        conn.execute_batch("BEGIN")
            .map_err(|e| format!("Failed to begin migration transaction: {}", e))?;

        let result = conn
            .execute_batch(migration.sql)
            .and_then(|_| {
                conn.execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    [migration.version],
                )
                .map(|_| ())
            });

        match result {
            Ok(()) => {
                conn.execute_batch("COMMIT")
                    .map_err(|e| format!("Failed to commit migration {}: {}", migration.version, e))?;
                log::info!("Applied migration v{}", migration.version);
                applied += 1;
            }
            Err(e) => {
                let _ = conn.execute_batch("ROLLBACK");
                return Err(format!("Migration v{} failed: {}", migration.version, e));
            }
        }
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golf_migrations_apply_once() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_migrations(&conn, GOLF_MIGRATIONS).unwrap(), 1);
        assert_eq!(run_migrations(&conn, GOLF_MIGRATIONS).unwrap(), 0);
    }

    #[test]
    fn clubs_migrations_apply_once() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_migrations(&conn, CLUBS_MIGRATIONS).unwrap(), 1);
        assert_eq!(run_migrations(&conn, CLUBS_MIGRATIONS).unwrap(), 0);
    }

    #[test]
    fn newer_database_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn, GOLF_MIGRATIONS).unwrap();
        conn.execute("INSERT INTO schema_version (version) VALUES (99)", [])
            .unwrap();
        assert!(run_migrations(&conn, GOLF_MIGRATIONS).is_err());
    }
}
