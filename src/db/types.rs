//! Shared type definitions for the database layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors specific to database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Schema migration failed: {0}")]
    Migration(String),
}

/// A row from the `players` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbPlayer {
    pub id: i64,
    pub license: String,
    pub nickname: String,
    pub current_handicap: f64,
    pub updated_at: String,
}

/// A row from the `results` table. Column names follow the portal's own
/// vocabulary; `res_stb` is derived (`dif_neto + 36`) at extraction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbResult {
    pub id: i64,
    pub player_id: i64,
    pub fecha: String,
    pub club: String,
    pub nombre_torneo: String,
    pub nivel: String,
    pub jornada: Option<i64>,
    pub res_hcp: Option<i64>,
    pub res_sch: Option<String>,
    pub dif_neto: Option<i64>,
    pub res_stb: Option<i64>,
    pub mod_jue: Option<String>,
    pub form_calc: Option<String>,
    pub hcp_ini: Option<f64>,
    pub hcp_jue: Option<f64>,
    pub hcp_fin: Option<f64>,
}

/// A row from the `clubs` table in the directory store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbClub {
    pub id: i64,
    pub club_id: i64,
    pub club_code: String,
    pub club_name: String,
}
