//! Club directory builder.
//!
//! Session-less crawler over the federation's public club microsites: walk a
//! contiguous candidate ID range, fetch one page per ID, lift the (code,
//! name) pair, insert. Most IDs in the range resolve to nothing — absence is
//! the expected outcome, not a failure — and re-runs are idempotent because
//! inserts dedup on the external ID.

use std::ops::RangeInclusive;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

use crate::db::{ClubsDb, DbError};

/// Structural markers for the code/name elements on the microsite page. The
/// ASP.NET ids carry a generated control prefix; the suffix is the stable
/// part.
const CODE_SELECTOR: &str = r#"span[id$="lblCodigoFederativo"]"#;
const NAME_SELECTOR: &str = r#"div[id$="dvClubName"]"#;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Invalid directory URL: {0}")]
    BadUrl(#[from] url::ParseError),

    #[error("Directory fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Source of club microsite pages, keyed by candidate ID.
#[async_trait]
pub trait ClubPageSource: Send + Sync {
    /// Fetch one candidate's page. `Ok(None)` for non-success responses —
    /// unassigned IDs are part of normal operation.
    async fn fetch_page(&self, club_id: u32) -> Result<Option<String>, DirectoryError>;
}

/// Production page source: plain HTTP GET per ID.
pub struct ClubMicrositeClient {
    http: reqwest::Client,
    base: Url,
}

impl ClubMicrositeClient {
    pub fn new(base_url: &str) -> Result<Self, DirectoryError> {
        Ok(Self {
            http: reqwest::Client::new(),
            base: Url::parse(base_url)?,
        })
    }
}

#[async_trait]
impl ClubPageSource for ClubMicrositeClient {
    async fn fetch_page(&self, club_id: u32) -> Result<Option<String>, DirectoryError> {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("ClubId", &club_id.to_string());

        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Ok(None);
        }
        Ok(Some(resp.text().await?))
    }
}

/// Lift the (code, name) pair from a microsite page. Both elements must be
/// present and non-empty; anything less means the ID carries no usable club.
pub fn parse_club_page(html: &str) -> Option<(String, String)> {
    let doc = Html::parse_document(html);
    let code_sel = Selector::parse(CODE_SELECTOR).expect("static css selector");
    let name_sel = Selector::parse(NAME_SELECTOR).expect("static css selector");

    let code = doc
        .select(&code_sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())?;
    let name = doc
        .select(&name_sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())?;

    if code.is_empty() || name.is_empty() {
        return None;
    }
    Some((code, name))
}

/// Outcome counters for one builder run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DirectorySummary {
    pub scanned: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub skipped: usize,
}

pub struct DirectoryBuilder<'a, S: ClubPageSource + ?Sized> {
    source: &'a S,
    db: &'a ClubsDb,
    request_delay: Duration,
}

impl<'a, S: ClubPageSource + ?Sized> DirectoryBuilder<'a, S> {
    pub fn new(source: &'a S, db: &'a ClubsDb, request_delay: Duration) -> Self {
        Self {
            source,
            db,
            request_delay,
        }
    }

    /// Walk the candidate range. Fetch and parse problems skip the ID;
    /// only store-level failures abort the run.
    pub async fn build(
        &self,
        ids: RangeInclusive<u32>,
    ) -> Result<DirectorySummary, DirectoryError> {
        let last = *ids.end();
        let mut summary = DirectorySummary::default();

        for club_id in ids {
            summary.scanned += 1;

            let page = match self.source.fetch_page(club_id).await {
                Ok(page) => page,
                Err(e) => {
                    log::warn!("Club ID {}: fetch failed, treating as not found: {}", club_id, e);
                    None
                }
            };

            match page.as_deref().and_then(parse_club_page) {
                Some((code, name)) => {
                    if self.db.insert_club(club_id, &code, &name)? {
                        summary.inserted += 1;
                        log::info!("Club ID {}: inserted {} ({})", club_id, name, code);
                    } else {
                        summary.duplicates += 1;
                        log::info!("Club ID {}: already in the directory", club_id);
                    }
                }
                None => {
                    summary.skipped += 1;
                    log::debug!("Club ID {}: not found or missing data", club_id);
                }
            }

            if club_id != last {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        log::info!(
            "Directory build done: {} scanned, {} inserted, {} duplicates, {} skipped",
            summary.scanned,
            summary.inserted,
            summary.duplicates,
            summary.skipped
        );
        Ok(summary)
    }
}
