//! Data column detection in the source header region.

use checkpoint_io_xlsx::SpecTextGrid;

use crate::conf::{
    C_KEYWORD_COL_DURATION, C_KEYWORD_COL_NAME, N_COLS_HEADER_SCAN_MAX, N_ROWS_HEADER_SCAN_MAX,
};
use crate::spec::SpecColumnLayout;

/// Find the checkpoint-name and duration columns.
///
/// Scans the first 40 rows by 30 columns row by row. A cell whose lower-cased
/// text contains `название` marks the name column, `продолж` the duration
/// column; later matches override earlier ones. Columns never matched keep
/// their defaults (3 and 10).
pub fn locate_columns(grid: &SpecTextGrid) -> SpecColumnLayout {
    let mut layout = SpecColumnLayout::default();

    for row in grid.rows.iter().take(N_ROWS_HEADER_SCAN_MAX) {
        for (col_idx, c_cell) in row.iter().take(N_COLS_HEADER_SCAN_MAX).enumerate() {
            if c_cell.is_empty() {
                continue;
            }
            let c_lower = c_cell.trim().to_lowercase();
            if c_lower.contains(C_KEYWORD_COL_NAME) {
                layout.col_name = col_idx + 1;
                layout.if_name_detected = true;
            }
            if c_lower.contains(C_KEYWORD_COL_DURATION) {
                layout.col_duration = col_idx + 1;
                layout.if_duration_detected = true;
            }
        }
    }

    tracing::debug!(
        col_name = layout.col_name,
        col_duration = layout.col_duration,
        if_name_detected = layout.if_name_detected,
        if_duration_detected = layout.if_duration_detected,
        "located data columns"
    );
    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive_grid(rows: &[&[&str]]) -> SpecTextGrid {
        SpecTextGrid::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn defaults_without_header_keywords() {
        let grid = derive_grid(&[&["a", "b"], &["c", "d"]]);
        let layout = locate_columns(&grid);
        assert_eq!(layout, SpecColumnLayout::default());
        assert_eq!((layout.col_name, layout.col_duration), (3, 10));
    }

    #[test]
    fn detects_keywords_case_insensitively() {
        let grid = derive_grid(&[
            &["Отчет", "", "", ""],
            &["№", "НАЗВАНИЕ точки", "Время", "Продолжительность"],
        ]);
        let layout = locate_columns(&grid);
        assert_eq!((layout.col_name, layout.col_duration), (2, 4));
        assert!(layout.if_name_detected && layout.if_duration_detected);
    }

    #[test]
    fn last_match_wins() {
        let grid = derive_grid(&[
            &["Название", "Продолж."],
            &["", "", "", "название", "", "продолжительность"],
        ]);
        let layout = locate_columns(&grid);
        assert_eq!((layout.col_name, layout.col_duration), (4, 6));
    }

    #[test]
    fn ignores_cells_outside_scan_region() {
        let mut l_rows: Vec<Vec<String>> = vec![vec![String::new(); 35]; 45];
        l_rows[0][31] = "Название".to_string();
        l_rows[41][0] = "Продолжительность".to_string();
        l_rows[39][29] = "Продолжительность".to_string();
        let layout = locate_columns(&SpecTextGrid::from_rows(l_rows));
        assert_eq!(layout.col_name, 3);
        assert!(!layout.if_name_detected);
        assert_eq!(layout.col_duration, 30);
    }
}
