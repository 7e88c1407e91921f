//! Per-entity extraction engine.
//!
//! One player at a time: search, parse, derive, window, resolve. The engine
//! owns the data-shaping decisions; the portal session and the club directory
//! come in as context objects.

use crate::db::ClubsDb;
use crate::portal::ResultsSource;

use super::parser::parse_results_fragment;
use super::schema::RESULT_COLUMNS_V1;
use super::{EnrichedResult, ExtractError, PlayerBatch};

/// Bounded recent-history window retained per player.
pub const WINDOW_SIZE: usize = 10;

pub struct ExtractionEngine<'a, S: ResultsSource + ?Sized> {
    source: &'a S,
    clubs: &'a ClubsDb,
}

impl<'a, S: ResultsSource + ?Sized> ExtractionEngine<'a, S> {
    pub fn new(source: &'a S, clubs: &'a ClubsDb) -> Self {
        Self { source, clubs }
    }

    /// Extract one player's retained result window.
    ///
    /// Candidates are sorted most-recent-first at month/year resolution; the
    /// sort is stable, so same-month results keep the portal's own order.
    /// Club codes are resolved only for the retained window — records past
    /// the cut are discarded unresolved.
    pub async fn extract_player(&self, license: &str) -> Result<PlayerBatch, ExtractError> {
        let html = self.source.fetch_results_fragment(license).await?;

        let mut candidates = parse_results_fragment(&html, &RESULT_COLUMNS_V1)?;
        let parsed = candidates.len();

        candidates.sort_by(|a, b| b.date.cmp(&a.date));
        candidates.truncate(WINDOW_SIZE);

        let current_handicap = candidates.first().and_then(|r| r.hcp_fin);

        let mut results = Vec::with_capacity(candidates.len());
        for record in candidates {
            let club = self.clubs.resolve_name(&record.club_code)?;
            results.push(EnrichedResult {
                result: record,
                club,
            });
        }

        log::debug!(
            "License {}: {} candidates parsed, {} retained",
            license,
            parsed,
            results.len()
        );
        Ok(PlayerBatch {
            results,
            current_handicap,
        })
    }
}
