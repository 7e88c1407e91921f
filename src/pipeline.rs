//! Run orchestration.
//!
//! Each entry point wires config → store handles → components for one run and
//! tears everything down at the end. Nothing here is long-lived: the process
//! runs one pipeline, reports, and exits.

use std::path::Path;

use crate::config::Config;
use crate::db::{ClubsDb, GolfDb};
use crate::directory::{ClubMicrositeClient, DirectoryBuilder, DirectorySummary};
use crate::error::PipelineError;
use crate::extract::ExtractionEngine;
use crate::portal::{Authenticator, WebDriverClient};

/// Outcome counters for one refresh run.
#[derive(Debug, Default)]
pub struct RefreshSummary {
    pub players: usize,
    pub players_failed: usize,
    pub results_inserted: usize,
}

/// The full extraction pipeline: authenticate once, walk the roster in
/// order, replace each player's stored window.
///
/// Per-player extraction failures (missing table, malformed date) are
/// logged and counted — the remaining players still run. Authentication and
/// persistence failures abort the run; the run is then retried wholesale.
pub async fn refresh(config: &Config) -> Result<RefreshSummary, PipelineError> {
    let credentials = config.require_credentials()?.clone();

    let golf = GolfDb::open_at(config.golf_db_path())?;
    let clubs = ClubsDb::open_at(config.clubs_db_path())?;

    let players = golf.list_players()?;
    if players.is_empty() {
        log::warn!("No tracked players — import a roster before refreshing");
        return Ok(RefreshSummary::default());
    }

    let driver = WebDriverClient::connect(&config.webdriver_url).await?;
    let outcome = run_extraction(&driver, config, &credentials, &golf, &clubs, &players).await;
    driver.quit().await;
    outcome
}

async fn run_extraction(
    driver: &WebDriverClient,
    config: &Config,
    credentials: &crate::config::Credentials,
    golf: &GolfDb,
    clubs: &ClubsDb,
    players: &[crate::db::DbPlayer],
) -> Result<RefreshSummary, PipelineError> {
    let view = Authenticator::new(driver, &config.portal, credentials)
        .login()
        .await?;

    // The run's result set is authoritative and total.
    let cleared = golf.clear_all_results()?;
    log::info!("Cleared {} stale results ahead of the run", cleared);

    let engine = ExtractionEngine::new(&view, clubs);
    let mut summary = RefreshSummary {
        players: players.len(),
        ..RefreshSummary::default()
    };

    for (index, player) in players.iter().enumerate() {
        log::info!(
            "[{}/{}] Refreshing {} (license {})",
            index + 1,
            players.len(),
            player.nickname,
            player.license
        );

        match engine.extract_player(&player.license).await {
            Ok(batch) => {
                let retained = batch.results.len();
                golf.replace_player_results(player.id, &batch)?;
                summary.results_inserted += retained;
                match batch.current_handicap {
                    Some(handicap) => log::info!(
                        "{}: {} results, handicap now {:.1}",
                        player.nickname,
                        retained,
                        handicap
                    ),
                    None => log::info!(
                        "{}: {} results, handicap unchanged",
                        player.nickname,
                        retained
                    ),
                }
            }
            Err(e) => {
                summary.players_failed += 1;
                log::warn!("Skipping {}: {}", player.nickname, e);
            }
        }
    }

    log::info!(
        "Refresh done: {} players, {} failed, {} results stored",
        summary.players,
        summary.players_failed,
        summary.results_inserted
    );
    Ok(summary)
}

/// Build (or extend) the club directory by crawling the candidate ID range.
pub async fn build_directory(config: &Config) -> Result<DirectorySummary, PipelineError> {
    let clubs = ClubsDb::open_at(config.clubs_db_path())?;
    let client = ClubMicrositeClient::new(&config.directory.base_url)?;
    let builder = DirectoryBuilder::new(&client, &clubs, config.directory.request_delay);

    let (start, end) = config.directory.id_range;
    Ok(builder.build(start..=end).await?)
}

/// Destructive roster import: the file's player set replaces the tracked set.
pub fn import_roster(config: &Config, path: &Path) -> Result<usize, PipelineError> {
    let entries = crate::roster::load_roster(path)?;
    let golf = GolfDb::open_at(config.golf_db_path())?;
    let count = golf.replace_roster(&entries)?;
    log::info!("Imported {} players (previous roster replaced)", count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use crate::extract::{EnrichedResult, MonthYear, ParsedResult, PlayerBatch};
    use crate::roster::RosterEntry;

    use super::*;

    fn golf_db() -> (tempfile::TempDir, GolfDb) {
        let dir = tempfile::tempdir().unwrap();
        let db = GolfDb::open_at(dir.path().join("golf.db")).unwrap();
        (dir, db)
    }

    fn entry(license: &str, nickname: &str) -> RosterEntry {
        RosterEntry {
            license: license.to_string(),
            nickname: nickname.to_string(),
        }
    }

    fn result(fecha: &str, hcp_fin: Option<f64>) -> EnrichedResult {
        let date = MonthYear::parse(fecha).unwrap();
        EnrichedResult {
            club: "Example Club".to_string(),
            result: ParsedResult {
                fecha: fecha.to_string(),
                date,
                club_code: "ABC".to_string(),
                nombre_torneo: "Open".to_string(),
                nivel: "N1".to_string(),
                jornada: Some(1),
                res_hcp: Some(33),
                res_sch: "81".to_string(),
                dif_neto: Some(-3),
                res_stb: Some(33),
                mod_jue: "IND".to_string(),
                form_calc: "SH".to_string(),
                hcp_ini: Some(12.0),
                hcp_jue: Some(11.9),
                hcp_fin,
            },
        }
    }

    #[test]
    fn roster_import_is_destructive() {
        let (_dir, db) = golf_db();
        db.replace_roster(&[entry("111", "Ana"), entry("222", "Luis")])
            .unwrap();
        assert_eq!(db.list_players().unwrap().len(), 2);

        db.replace_roster(&[entry("333", "Eva")]).unwrap();
        let players = db.list_players().unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].license, "333");
    }

    #[test]
    fn roster_reload_cascades_to_results() {
        let (_dir, db) = golf_db();
        db.replace_roster(&[entry("111", "Ana")]).unwrap();
        let player = db.get_player_by_license("111").unwrap().unwrap();

        let batch = PlayerBatch {
            results: vec![result("05/2024", Some(11.5))],
            current_handicap: Some(11.5),
        };
        db.replace_player_results(player.id, &batch).unwrap();
        assert_eq!(db.count_results().unwrap(), 1);

        db.replace_roster(&[entry("222", "Luis")]).unwrap();
        assert_eq!(db.count_results().unwrap(), 0);
    }

    #[test]
    fn replace_leaves_exactly_the_emitted_batch() {
        let (_dir, db) = golf_db();
        db.replace_roster(&[entry("111", "Ana")]).unwrap();
        let player = db.get_player_by_license("111").unwrap().unwrap();

        let first = PlayerBatch {
            results: vec![result("03/2024", Some(12.0)), result("02/2024", Some(12.4))],
            current_handicap: Some(12.0),
        };
        db.replace_player_results(player.id, &first).unwrap();

        let second = PlayerBatch {
            results: vec![result("05/2024", Some(11.5))],
            current_handicap: Some(11.5),
        };
        db.replace_player_results(player.id, &second).unwrap();

        let stored = db.results_for_player(player.id).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].fecha, "05/2024");
        assert_eq!(stored[0].club, "Example Club");
        assert_eq!(stored[0].res_stb, Some(33));

        let player = db.get_player_by_license("111").unwrap().unwrap();
        assert_eq!(player.current_handicap, 11.5);
    }

    #[test]
    fn empty_batch_leaves_the_handicap_untouched() {
        let (_dir, db) = golf_db();
        db.replace_roster(&[entry("111", "Ana")]).unwrap();
        let player = db.get_player_by_license("111").unwrap().unwrap();

        let batch = PlayerBatch {
            results: vec![result("05/2024", Some(9.9))],
            current_handicap: Some(9.9),
        };
        db.replace_player_results(player.id, &batch).unwrap();

        db.replace_player_results(player.id, &PlayerBatch::default())
            .unwrap();
        let player = db.get_player_by_license("111").unwrap().unwrap();
        assert_eq!(player.current_handicap, 9.9);
        assert_eq!(db.count_results().unwrap(), 0);
    }

    #[test]
    fn run_start_clear_empties_every_player() {
        let (_dir, db) = golf_db();
        db.replace_roster(&[entry("111", "Ana"), entry("222", "Luis")])
            .unwrap();
        for player in db.list_players().unwrap() {
            let batch = PlayerBatch {
                results: vec![result("04/2024", Some(10.0))],
                current_handicap: Some(10.0),
            };
            db.replace_player_results(player.id, &batch).unwrap();
        }
        assert_eq!(db.count_results().unwrap(), 2);

        assert_eq!(db.clear_all_results().unwrap(), 2);
        assert_eq!(db.count_results().unwrap(), 0);
    }
}
