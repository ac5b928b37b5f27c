//! Stateless helper utilities used by the XLSX writer kernel.

use std::collections::BTreeMap;

use crate::conf::{N_LEN_EXCEL_SHEET_NAME_MAX, TUP_EXCEL_ILLEGAL};
use crate::spec::{
    EnumCellValue, SpecAutofitCellsPolicy, SpecSheetCell, SpecSheetVerticalMerge,
};

////////////////////////////////////////////////////////////////////////////////
// #region CellText

/// Rendered text of a planned cell value (blank for `None`).
pub fn derive_cell_text(value: &EnumCellValue) -> String {
    match value {
        EnumCellValue::None => String::new(),
        EnumCellValue::String(s) => s.clone(),
        EnumCellValue::Number(n) => derive_number_text(*n),
    }
}

/// Number text with integral values printed without a fractional part.
pub fn derive_number_text(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Estimate displayed width units for one planned cell value (character count).
pub fn estimate_width_len(value: &EnumCellValue) -> usize {
    derive_cell_text(value).chars().count()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region MergeUtils

/// Plan vertical merges for runs of equal, non-empty text in `cols`.
///
/// Only rows at or after `row_idx_start` take part; runs of length 1 are skipped.
pub fn plan_vertical_merges(
    rows: &[Vec<SpecSheetCell>],
    cols: &[usize],
    row_idx_start: usize,
) -> Vec<SpecSheetVerticalMerge> {
    let mut l_merges = Vec::new();
    let n_rows = rows.len();

    for &col_idx in cols {
        let derive_text = |row_idx: usize| -> String {
            rows[row_idx]
                .get(col_idx)
                .map(|cell| derive_cell_text(&cell.value))
                .unwrap_or_default()
        };

        let mut n_row_idx = row_idx_start;
        while n_row_idx < n_rows {
            let c_text_current = derive_text(n_row_idx);
            if c_text_current.is_empty() {
                n_row_idx += 1;
                continue;
            }

            let mut n_row_idx_next = n_row_idx + 1;
            while n_row_idx_next < n_rows && derive_text(n_row_idx_next) == c_text_current {
                n_row_idx_next += 1;
            }

            if n_row_idx_next - n_row_idx > 1 {
                l_merges.push(SpecSheetVerticalMerge {
                    col_idx,
                    row_idx_start: n_row_idx,
                    row_idx_end: n_row_idx_next - 1,
                    text: c_text_current,
                });
            }
            n_row_idx = n_row_idx_next;
        }
    }

    l_merges
}

/// Build lookup map for cells covered by a vertical merge (excluding anchor).
pub fn derive_vertical_merge_tracker(
    merges: &[SpecSheetVerticalMerge],
) -> BTreeMap<(usize, usize), bool> {
    let mut dict_merged_cells_tracker = BTreeMap::new();

    for merge in merges {
        for row_idx in (merge.row_idx_start + 1)..=merge.row_idx_end {
            dict_merged_cells_tracker.insert((row_idx, merge.col_idx), true);
        }
    }

    dict_merged_cells_tracker
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Autofit

/// Plan final column widths over every cell, header included:
/// `min(max, max(min, longest + padding))`.
pub fn plan_column_widths(
    rows: &[Vec<SpecSheetCell>],
    policy: &SpecAutofitCellsPolicy,
) -> Vec<usize> {
    let n_width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut l_width_by_col = vec![0usize; n_width];

    for row in rows {
        for (col_idx, cell) in row.iter().enumerate() {
            l_width_by_col[col_idx] =
                usize::max(l_width_by_col[col_idx], estimate_width_len(&cell.value));
        }
    }

    let n_min = usize::max(1, policy.width_cell_min);
    let n_max = usize::min(255, usize::max(n_min, policy.width_cell_max));
    l_width_by_col
        .into_iter()
        .map(|n_width_recorded| {
            usize::min(
                n_max,
                usize::max(n_min, n_width_recorded + policy.width_cell_padding),
            )
        })
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::spec::SpecCellFormat;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<SpecSheetCell>> {
        let fmt = SpecCellFormat::default();
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|txt| {
                        if txt.is_empty() {
                            SpecSheetCell::blank(&fmt)
                        } else {
                            SpecSheetCell::text(*txt, &fmt)
                        }
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_plan_vertical_merges_detects_only_contiguous_non_empty_runs() {
        let rows = grid(&[
            &["hdr", "hdr"],
            &["A", "X"],
            &["A", ""],
            &["A", "X"],
            &["", "X"],
            &["B", "X"],
            &["B", "Y"],
        ]);

        assert_eq!(
            plan_vertical_merges(&rows, &[0, 1], 1),
            vec![
                SpecSheetVerticalMerge {
                    col_idx: 0,
                    row_idx_start: 1,
                    row_idx_end: 3,
                    text: "A".to_string(),
                },
                SpecSheetVerticalMerge {
                    col_idx: 0,
                    row_idx_start: 5,
                    row_idx_end: 6,
                    text: "B".to_string(),
                },
                SpecSheetVerticalMerge {
                    col_idx: 1,
                    row_idx_start: 3,
                    row_idx_end: 5,
                    text: "X".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_plan_vertical_merges_ignores_header_rows_and_single_runs() {
        let rows = grid(&[&["A"], &["A"], &["B"], &["C"]]);
        assert_eq!(plan_vertical_merges(&rows, &[0], 1), vec![]);
    }

    #[test]
    fn test_derive_vertical_merge_tracker_skips_anchor() {
        let merges = vec![SpecSheetVerticalMerge {
            col_idx: 1,
            row_idx_start: 2,
            row_idx_end: 4,
            text: "ТЭ".to_string(),
        }];
        let tracker = derive_vertical_merge_tracker(&merges);
        assert!(!tracker.contains_key(&(2, 1)));
        assert!(tracker.contains_key(&(3, 1)));
        assert!(tracker.contains_key(&(4, 1)));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_plan_column_widths_pads_and_caps() {
        let long_text = "x".repeat(60);
        let rows = grid(&[&["№ п/п", "Дата", ""], &["1", long_text.as_str(), ""]]);
        let widths = plan_column_widths(&rows, &SpecAutofitCellsPolicy::default());
        assert_eq!(widths, vec![7, 40, 2]);
    }

    #[test]
    fn test_plan_column_widths_counts_characters_not_bytes() {
        let rows = grid(&[&["Экскаватор"]]);
        let widths = plan_column_widths(&rows, &SpecAutofitCellsPolicy::default());
        assert_eq!(widths, vec![12]);
    }

    #[test]
    fn test_derive_number_text_drops_integral_fraction() {
        assert_eq!(derive_number_text(3.0), "3");
        assert_eq!(derive_number_text(3.5), "3.5");
        assert_eq!(derive_cell_text(&EnumCellValue::None), "");
    }

    #[test]
    fn test_sanitize_sheet_name_replaces_illegal_chars() {
        assert_eq!(sanitize_sheet_name("Отчет: 1/2", "_"), "Отчет_ 1_2");
        assert_eq!(sanitize_sheet_name("   ", "_"), "Sheet");
    }
}
