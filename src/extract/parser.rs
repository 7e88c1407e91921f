//! Results-table parser.
//!
//! Input is the rendered page HTML; output is typed rows. Only `tr.item` and
//! `tr.altern` are data rows (the portal alternates the two stylings), rows
//! short of the schema's column floor are discarded whole, and at most
//! [`PAGE_ROW_CEILING`] raw rows are considered — the portal pages at ten.

use scraper::{ElementRef, Html, Selector};

use super::schema::ResultColumns;
use super::{ExtractError, MonthYear, ParsedResult, STABLEFORD_PAR_BASE};

/// Raw candidate rows considered per page, pre-sort.
pub const PAGE_ROW_CEILING: usize = 10;

/// Parse the rendered results fragment into typed rows.
///
/// Field-level failures degrade to nulls; an unparseable date is fatal to the
/// whole batch because the recency window cannot be ordered around it.
pub fn parse_results_fragment(
    html: &str,
    schema: &ResultColumns,
) -> Result<Vec<ParsedResult>, ExtractError> {
    let doc = Html::parse_document(html);
    let row_sel = selector("tr.item, tr.altern");
    let cell_sel = selector("td");
    let span_sel = selector("span");
    let anchor_sel = selector("a");

    let mut rows = Vec::new();
    for row in doc.select(&row_sel).take(PAGE_ROW_CEILING) {
        let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
        if !schema.accepts(cells.len()) {
            log::debug!(
                "Discarding partial result row: {} cells, schema v{} needs {}",
                cells.len(),
                schema.version,
                schema.min_columns
            );
            continue;
        }
        rows.push(parse_row(&cells, schema, &span_sel, &anchor_sel)?);
    }
    Ok(rows)
}

fn parse_row(
    cells: &[ElementRef],
    schema: &ResultColumns,
    span_sel: &Selector,
    anchor_sel: &Selector,
) -> Result<ParsedResult, ExtractError> {
    let fecha = cell_text(cells[schema.fecha]);
    let date = MonthYear::parse(&fecha)?;

    let dif_neto = parse_signed_int(&cell_text(cells[schema.dif_neto]));

    Ok(ParsedResult {
        date,
        fecha,
        club_code: nested_text(cells[schema.club_code], span_sel),
        nombre_torneo: nested_text(cells[schema.nombre_torneo], anchor_sel),
        nivel: cell_text(cells[schema.nivel]),
        jornada: parse_unsigned_int(&cell_text(cells[schema.jornada])),
        res_hcp: parse_unsigned_int(&cell_text(cells[schema.res_hcp])),
        res_sch: cell_text(cells[schema.res_sch]),
        dif_neto,
        res_stb: dif_neto.map(|d| d + STABLEFORD_PAR_BASE),
        mod_jue: cell_text(cells[schema.mod_jue]),
        form_calc: cell_text(cells[schema.form_calc]),
        hcp_ini: parse_float(&cell_text(cells[schema.hcp_ini])),
        hcp_jue: parse_float(&cell_text(cells[schema.hcp_jue])),
        hcp_fin: parse_float(&cell_text(cells[schema.hcp_fin])),
    })
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static css selector")
}

/// A cell's visible text, whitespace-collapsed.
fn cell_text(cell: ElementRef) -> String {
    collapse_ws(&cell.text().collect::<String>())
}

/// Text of the first nested element matching `sel`, falling back to the
/// cell's own text when the expected nesting is absent.
fn nested_text(cell: ElementRef, sel: &Selector) -> String {
    match cell.select(sel).next() {
        Some(inner) => collapse_ws(&inner.text().collect::<String>()),
        None => cell_text(cell),
    }
}

fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Digits only, like the portal's round and handicap-result cells.
fn parse_unsigned_int(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Digits with an optional leading minus — the net-difference cell is the
/// only one that legitimately goes negative.
fn parse_signed_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Empty cell means no snapshot; the portal occasionally renders a decimal
/// comma, so normalize before parsing.
fn parse_float(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    s.replace(',', ".").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::super::schema::RESULT_COLUMNS_V1;
    use super::*;

    /// A full 13-cell data row in the portal's layout.
    fn row(class: &str, fecha: &str, dif_neto: &str) -> String {
        format!(
            r##"<tr class="{class}">
                <td>{fecha}</td>
                <td><span>ABC</span></td>
                <td><a href="#">Open de Prueba</a></td>
                <td>N1</td>
                <td>2</td>
                <td>34</td>
                <td>82</td>
                <td>{dif_neto}</td>
                <td>IND</td>
                <td>SH</td>
                <td>12.4</td>
                <td>12.0</td>
                <td>11.8</td>
            </tr>"##
        )
    }

    fn table(rows: &[String]) -> String {
        format!("<html><body><table>{}</table></body></html>", rows.join(""))
    }

    #[test]
    fn accepts_both_row_stylings_and_nothing_else() {
        let html = table(&[
            row("item", "05/2024", "-2"),
            row("altern", "04/2024", "0"),
            row("header", "03/2024", "1"),
        ]);
        let rows = parse_results_fragment(&html, &RESULT_COLUMNS_V1).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fecha, "05/2024");
        assert_eq!(rows[1].fecha, "04/2024");
    }

    #[test]
    fn discards_rows_short_of_the_column_floor() {
        let short = r#"<tr class="item"><td>05/2024</td><td>ABC</td><td>Partial</td></tr>"#;
        let html = table(&[row("item", "05/2024", "3"), short.to_string()]);
        let rows = parse_results_fragment(&html, &RESULT_COLUMNS_V1).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn parses_positional_fields_and_nested_tokens() {
        let html = table(&[row("item", "11/2023", "-5")]);
        let rows = parse_results_fragment(&html, &RESULT_COLUMNS_V1).unwrap();
        let r = &rows[0];

        assert_eq!(r.date, MonthYear { year: 2023, month: 11 });
        assert_eq!(r.club_code, "ABC");
        assert_eq!(r.nombre_torneo, "Open de Prueba");
        assert_eq!(r.nivel, "N1");
        assert_eq!(r.jornada, Some(2));
        assert_eq!(r.res_hcp, Some(34));
        assert_eq!(r.res_sch, "82");
        assert_eq!(r.dif_neto, Some(-5));
        assert_eq!(r.mod_jue, "IND");
        assert_eq!(r.form_calc, "SH");
        assert_eq!(r.hcp_ini, Some(12.4));
        assert_eq!(r.hcp_jue, Some(12.0));
        assert_eq!(r.hcp_fin, Some(11.8));
    }

    #[test]
    fn stableford_equivalent_follows_net_difference() {
        let html = table(&[row("item", "05/2024", "-2"), row("altern", "04/2024", "")]);
        let rows = parse_results_fragment(&html, &RESULT_COLUMNS_V1).unwrap();
        assert_eq!(rows[0].res_stb, Some(34));
        assert_eq!(rows[1].dif_neto, None);
        assert_eq!(rows[1].res_stb, None);
    }

    #[test]
    fn non_numeric_cells_become_nulls() {
        let html = table(&[format!(
            r##"<tr class="item">
                <td>05/2024</td>
                <td><span>XYZ</span></td>
                <td><a href="#">Torneo</a></td>
                <td>N2</td>
                <td>n/a</td>
                <td></td>
                <td>NP</td>
                <td>--</td>
                <td>IND</td>
                <td>SH</td>
                <td></td>
                <td></td>
                <td></td>
            </tr>"##
        )]);
        let rows = parse_results_fragment(&html, &RESULT_COLUMNS_V1).unwrap();
        let r = &rows[0];
        assert_eq!(r.jornada, None);
        assert_eq!(r.res_hcp, None);
        assert_eq!(r.dif_neto, None);
        assert_eq!(r.res_stb, None);
        assert_eq!(r.hcp_ini, None);
        assert_eq!(r.hcp_jue, None);
        assert_eq!(r.hcp_fin, None);
    }

    #[test]
    fn missing_nested_token_falls_back_to_cell_text() {
        let html = table(&[format!(
            r#"<tr class="item">
                <td>05/2024</td>
                <td>RAW</td>
                <td>Sin enlace</td>
                <td>N1</td><td>1</td><td>30</td><td>75</td><td>2</td>
                <td>IND</td><td>SH</td><td>10.0</td><td>9.8</td><td>9.6</td>
            </tr>"#
        )]);
        let rows = parse_results_fragment(&html, &RESULT_COLUMNS_V1).unwrap();
        assert_eq!(rows[0].club_code, "RAW");
        assert_eq!(rows[0].nombre_torneo, "Sin enlace");
    }

    #[test]
    fn raw_row_ceiling_is_applied_pre_sort() {
        let rows_html: Vec<String> = (1..=12)
            .map(|i| row("item", &format!("{:02}/2024", (i % 12) + 1), "1"))
            .collect();
        let rows = parse_results_fragment(&table(&rows_html), &RESULT_COLUMNS_V1).unwrap();
        assert_eq!(rows.len(), PAGE_ROW_CEILING);
    }

    #[test]
    fn malformed_date_fails_the_batch() {
        let html = table(&[row("item", "mayo de 2024", "1")]);
        let err = parse_results_fragment(&html, &RESULT_COLUMNS_V1).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidDate { .. }));
    }

    #[test]
    fn decimal_comma_handicaps_parse() {
        let html = table(&[format!(
            r##"<tr class="altern">
                <td>02/2024</td>
                <td><span>CLB</span></td>
                <td><a href="#">Copa</a></td>
                <td>N1</td><td>1</td><td>32</td><td>80</td><td>-1</td>
                <td>IND</td><td>SH</td><td>8,3</td><td>8,1</td><td>7,9</td>
            </tr>"##
        )]);
        let rows = parse_results_fragment(&html, &RESULT_COLUMNS_V1).unwrap();
        assert_eq!(rows[0].hcp_ini, Some(8.3));
        assert_eq!(rows[0].hcp_fin, Some(7.9));
    }
}
