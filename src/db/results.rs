use rusqlite::params;

use super::*;
use crate::extract::PlayerBatch;

impl GolfDb {
    // =========================================================================
    // Results — full-replace persistence
    // =========================================================================

    /// Run-start clear: the incoming run's result set is authoritative and
    /// total, so every stored result is dropped before the first player is
    /// processed. Returns the number of rows deleted.
    pub fn clear_all_results(&self) -> Result<usize, DbError> {
        let deleted = self.conn.execute("DELETE FROM results", [])?;
        Ok(deleted)
    }

    /// Replace one player's result set with the emitted batch, inside a single
    /// transaction: delete-scope, insert-batch, then the derived handicap
    /// update. After commit the player's stored results exactly equal the
    /// batch, and `current_handicap` reflects its most recent record (or is
    /// untouched when the batch carries no handicap).
    pub fn replace_player_results(
        &self,
        player_id: i64,
        batch: &PlayerBatch,
    ) -> Result<(), DbError> {
        self.with_transaction(|db| {
            db.conn.execute(
                "DELETE FROM results WHERE player_id = ?1",
                params![player_id],
            )?;

            for enriched in &batch.results {
                let r = &enriched.result;
                db.conn.execute(
                    "INSERT INTO results (
                        player_id, fecha, club, nombre_torneo, nivel, jornada,
                        res_hcp, res_sch, dif_neto, res_stb, mod_jue, form_calc,
                        hcp_ini, hcp_jue, hcp_fin
                     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                    params![
                        player_id,
                        r.fecha,
                        enriched.club,
                        r.nombre_torneo,
                        r.nivel,
                        r.jornada,
                        r.res_hcp,
                        r.res_sch,
                        r.dif_neto,
                        r.res_stb,
                        r.mod_jue,
                        r.form_calc,
                        r.hcp_ini,
                        r.hcp_jue,
                        r.hcp_fin,
                    ],
                )?;
            }

            if let Some(handicap) = batch.current_handicap {
                db.update_current_handicap(player_id, handicap)?;
            }
            Ok(())
        })
    }

    /// A player's stored results in insertion order (most recent first, since
    /// batches are emitted sorted).
    pub fn results_for_player(&self, player_id: i64) -> Result<Vec<DbResult>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, player_id, fecha, club, nombre_torneo, nivel, jornada,
                    res_hcp, res_sch, dif_neto, res_stb, mod_jue, form_calc,
                    hcp_ini, hcp_jue, hcp_fin
             FROM results WHERE player_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![player_id], |row| {
            Ok(DbResult {
                id: row.get(0)?,
                player_id: row.get(1)?,
                fecha: row.get(2)?,
                club: row.get(3)?,
                nombre_torneo: row.get(4)?,
                nivel: row.get(5)?,
                jornada: row.get(6)?,
                res_hcp: row.get(7)?,
                res_sch: row.get(8)?,
                dif_neto: row.get(9)?,
                res_stb: row.get(10)?,
                mod_jue: row.get(11)?,
                form_calc: row.get(12)?,
                hcp_ini: row.get(13)?,
                hcp_jue: row.get(14)?,
                hcp_fin: row.get(15)?,
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    /// Total stored result rows across all players.
    pub fn count_results(&self) -> Result<i64, DbError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM results", [], |row| row.get(0))?;
        Ok(count)
    }
}
