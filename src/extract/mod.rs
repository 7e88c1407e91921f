//! Per-entity extraction: rendered results table → typed, derived, windowed
//! record batches.
//!
//! The parser is defensive at field level (a cell that does not parse becomes
//! a null field, never a dropped row or a failed run) and strict about the
//! two things correctness hangs on: the positional column schema and the
//! tournament date format the recency window sorts by.

use thiserror::Error;

use crate::db::DbError;
use crate::portal::PortalError;

pub mod engine;
pub mod parser;
pub mod schema;

pub use engine::{ExtractionEngine, WINDOW_SIZE};

/// Fixed par-adjustment constant: stableford-equivalent = net difference + 36.
pub const STABLEFORD_PAR_BASE: i64 = 36;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Portal interaction failed: {0}")]
    Portal(#[from] PortalError),

    #[error("Unparseable tournament date {raw:?}: expected month/year")]
    InvalidDate { raw: String },

    #[error("Club directory lookup failed: {0}")]
    Directory(#[from] DbError),
}

/// Tournament date at the portal's month/year granularity. Ordering is
/// chronological: `(year, month)` ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthYear {
    pub year: i32,
    pub month: u32,
}

impl MonthYear {
    /// Strict two-part `MM/YYYY` parse. Anything else is an error — the
    /// recency window cannot be sorted around a date that did not parse.
    pub fn parse(raw: &str) -> Result<Self, ExtractError> {
        let invalid = || ExtractError::InvalidDate {
            raw: raw.to_string(),
        };

        let mut parts = raw.trim().split('/');
        let (month_part, year_part) = match (parts.next(), parts.next(), parts.next()) {
            (Some(m), Some(y), None) => (m.trim(), y.trim()),
            _ => return Err(invalid()),
        };

        let month: u32 = month_part.parse().map_err(|_| invalid())?;
        let year: i32 = year_part.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) || year <= 0 {
            return Err(invalid());
        }
        Ok(Self { year, month })
    }
}

/// One result row, parsed and typed but not yet club-resolved.
#[derive(Debug, Clone)]
pub struct ParsedResult {
    /// Original date text, persisted verbatim.
    pub fecha: String,
    /// Typed date the recency window sorts by.
    pub date: MonthYear,
    pub club_code: String,
    pub nombre_torneo: String,
    pub nivel: String,
    pub jornada: Option<i64>,
    pub res_hcp: Option<i64>,
    pub res_sch: String,
    pub dif_neto: Option<i64>,
    /// Derived: `dif_neto + 36` when `dif_neto` is present.
    pub res_stb: Option<i64>,
    pub mod_jue: String,
    pub form_calc: String,
    pub hcp_ini: Option<f64>,
    pub hcp_jue: Option<f64>,
    pub hcp_fin: Option<f64>,
}

/// A retained result with its club reference resolved to a display name.
#[derive(Debug, Clone)]
pub struct EnrichedResult {
    pub result: ParsedResult,
    pub club: String,
}

/// What the engine emits per player: the retained window, most recent first,
/// plus the derived rolling handicap (absent when the window is empty or the
/// most recent record carries no final handicap — the stored value is then
/// left untouched).
#[derive(Debug, Default)]
pub struct PlayerBatch {
    pub results: Vec<EnrichedResult>,
    pub current_handicap: Option<f64>,
}
