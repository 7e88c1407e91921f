//! Positional column schema for the rendered results table.
//!
//! The portal renders a fixed-order table with no header the parser can key
//! on, so column positions are the contract. They live here as one versioned
//! descriptor instead of index literals scattered through the parser; a
//! portal layout change means a new descriptor version, not a hunt through
//! business logic.

/// Column positions for one results-table layout version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultColumns {
    pub version: u32,
    /// Rows with fewer cells are malformed/partial and are discarded whole.
    pub min_columns: usize,
    pub fecha: usize,
    /// Club short code, nested in a `span` inside the cell.
    pub club_code: usize,
    /// Tournament name, nested in an `a` inside the cell.
    pub nombre_torneo: usize,
    pub nivel: usize,
    pub jornada: usize,
    pub res_hcp: usize,
    pub res_sch: usize,
    pub dif_neto: usize,
    pub mod_jue: usize,
    pub form_calc: usize,
    pub hcp_ini: usize,
    pub hcp_jue: usize,
    pub hcp_fin: usize,
}

impl ResultColumns {
    /// Whether a row with `cell_count` cells satisfies this layout.
    pub fn accepts(&self, cell_count: usize) -> bool {
        cell_count >= self.min_columns
    }
}

/// The layout observed on the activity view since the scraper was written.
pub const RESULT_COLUMNS_V1: ResultColumns = ResultColumns {
    version: 1,
    min_columns: 13,
    fecha: 0,
    club_code: 1,
    nombre_torneo: 2,
    nivel: 3,
    jornada: 4,
    res_hcp: 5,
    res_sch: 6,
    dif_neto: 7,
    mod_jue: 8,
    form_calc: 9,
    hcp_ini: 10,
    hcp_jue: 11,
    hcp_fin: 12,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v1_accepts_full_rows_only() {
        assert!(RESULT_COLUMNS_V1.accepts(13));
        assert!(RESULT_COLUMNS_V1.accepts(14));
        assert!(!RESULT_COLUMNS_V1.accepts(12));
    }

    #[test]
    fn v1_indices_fit_min_columns() {
        let s = RESULT_COLUMNS_V1;
        let max_index = [
            s.fecha, s.club_code, s.nombre_torneo, s.nivel, s.jornada, s.res_hcp, s.res_sch,
            s.dif_neto, s.mod_jue, s.form_calc, s.hcp_ini, s.hcp_jue, s.hcp_fin,
        ]
        .into_iter()
        .max()
        .unwrap();
        assert!(max_index < s.min_columns);
    }
}
