//! End-to-end report pipeline: read, scan, order, render, save.

use std::path::{Path, PathBuf};

use checkpoint_io_xlsx::{XlsxWriter, read_first_sheet_text_grid};

use crate::columns::locate_columns;
use crate::conf::{N_COL_DURATION_DEFAULT, N_COL_NAME_DEFAULT};
use crate::order::sort_sections;
use crate::render::build_report_sheet;
use crate::report::{ReportRun, ReportRunBuilder};
use crate::scan::scan_sections;
use crate::spec::{CheckpointReportError, SpecReportOptions};
use crate::util::ensure_unique_path;

/// Build the report for `source` with the default grouped layout.
///
/// `dest` is passed through [`ensure_unique_path`]; the returned path is where
/// the report was actually saved.
pub fn process_file<P, Q>(source: P, dest: Q) -> Result<PathBuf, CheckpointReportError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    process_file_with_options(source, dest, &SpecReportOptions::default())
        .map(|report| report.path_file_out)
}

/// Build the report for `source` and return the run report.
///
/// # Errors
/// - [`CheckpointReportError::SourceUnreadable`] when the source cannot be read
///   as a workbook.
/// - [`CheckpointReportError::OutputUnwritable`] when the report cannot be saved.
///
/// Sheet content never fails the run; unrecognized rows are skipped.
pub fn process_file_with_options<P, Q>(
    source: P,
    dest: Q,
    options: &SpecReportOptions,
) -> Result<ReportRun, CheckpointReportError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_source = source.as_ref();
    tracing::info!(source = %path_source.display(), "building checkpoint report");

    let grid =
        read_first_sheet_text_grid(path_source).map_err(CheckpointReportError::SourceUnreadable)?;
    let layout_columns = locate_columns(&grid);
    let outcome = scan_sections(&grid, &layout_columns);

    let mut l_sections = outcome.sections;
    sort_sections(&mut l_sections);

    let mut builder = ReportRunBuilder {
        cnt_rows_scanned: outcome.cnt_rows_scanned as u64,
        cnt_sections: l_sections.len() as u64,
        cnt_passes: outcome.cnt_passes,
        cnt_passes_ignored: outcome.cnt_passes_ignored,
        period: outcome.period,
        layout_columns,
        ..Default::default()
    };
    if !layout_columns.if_name_detected {
        builder.add_warning(format!(
            "Name column header not found; using column {N_COL_NAME_DEFAULT}."
        ));
    }
    if !layout_columns.if_duration_detected {
        builder.add_warning(format!(
            "Duration column header not found; using column {N_COL_DURATION_DEFAULT}."
        ));
    }
    if l_sections.is_empty() {
        builder.add_warning("No model sections found.");
    }
    if builder.period.is_empty() {
        builder.add_warning("No reporting period found.");
    }
    for c_warning in &builder.warnings {
        tracing::warn!("{c_warning}");
    }

    let sheet = build_report_sheet(&l_sections, &builder.period, options);

    let path_file_out = ensure_unique_path(dest);
    let mut writer = XlsxWriter::new(path_file_out.clone());
    writer
        .write_sheet(&sheet)
        .and_then(|()| writer.close())
        .map_err(|source| CheckpointReportError::OutputUnwritable {
            path: path_file_out.clone(),
            source,
        })?;

    for report_sheet in writer.report() {
        for c_warning in &report_sheet.warnings {
            tracing::warn!(sheet = %report_sheet.sheet_name, "{c_warning}");
        }
        builder.sheet_name = report_sheet.sheet_name;
        builder.widths = report_sheet.widths;
        builder.warnings.extend(report_sheet.warnings);
    }

    let report = builder.build(path_file_out);
    tracing::info!("{report}");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SpecReportLayout;
    use pretty_assertions::assert_eq;
    use rust_xlsxwriter::{Format, Workbook};
    use std::io;

    fn write_source_workbook(path: &Path) {
        let fmt_time = Format::new().set_num_format("hh:mm:ss");
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        let l_rows: Vec<(u32, Vec<(u16, &str)>)> = vec![
            (0, vec![(0, "Отчет о прохождении точек")]),
            (1, vec![(0, "Период: с 01.03.2024 по 31.03.2024")]),
            (3, vec![(0, "№"), (1, "Название"), (2, "Время"), (3, "Продолжительность")]),
            (4, vec![(0, "Модель: ТАН-2 Кран (4)   Номер ТС: А001АА")]),
            (5, vec![(1, "Точка 2"), (3, "00:01:00")]),
            (6, vec![(1, "Точка 9"), (3, "00:01:00")]),
            (7, vec![(0, "ИТОГО по ТС")]),
            (8, vec![(0, "Модель: ТЭ Погрузчик")]),
            (9, vec![(1, "Точка 1"), (3, "00:00:00")]),
            (11, vec![(0, "Модель: ТАН-2 Бульдозер")]),
            (12, vec![(1, "Точка 1")]),
        ];
        for (row, l_cells) in l_rows {
            for (col, c_text) in l_cells {
                worksheet.write_string(row, col, c_text).unwrap();
            }
        }
        worksheet
            .write_number_with_format(12, 3, 125.0 / 86_400.0, &fmt_time)
            .unwrap();
        workbook.save(path).unwrap();
    }

    #[test]
    fn process_file_writes_grouped_report() {
        let dir_tmp = tempfile::tempdir().unwrap();
        let path_source = dir_tmp.path().join("log.xlsx");
        write_source_workbook(&path_source);

        let path_dest = dir_tmp.path().join("out.xlsx");
        let report = process_file_with_options(&path_source, &path_dest, &SpecReportOptions::default())
            .unwrap();

        assert_eq!(report.path_file_out, path_dest);
        assert_eq!(report.cnt_sections, 3);
        assert_eq!(report.cnt_passes, 3);
        assert_eq!(report.cnt_passes_ignored, 1);
        assert_eq!(report.period, "01.03.2024");
        assert_eq!(
            (report.layout_columns.col_name, report.layout_columns.col_duration),
            (2, 4)
        );
        assert!(report.warnings.is_empty());
        assert_eq!(report.sheet_name, "Отчет");
        assert_eq!(report.widths.len(), 13);
        assert!(report.widths.iter().all(|n_width| (1..=40).contains(n_width)));

        let grid = read_first_sheet_text_grid(&path_dest).unwrap();
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.cell(1, 2), "Группа");
        assert_eq!(grid.cell(1, 13), "Точка 8");

        let row_of = |row: usize| -> Vec<&str> { (1..=8).map(|col| grid.cell(row, col)).collect() };
        assert_eq!(
            row_of(2),
            vec!["1", "ТЭ", "Погрузчик", "", "01.03.2024", "нет", "---", "---"]
        );
        assert_eq!(
            row_of(3),
            vec!["2", "ТАН-2", "Бульдозер", "", "01.03.2024", "(1) / 00:02:05", "---", "---"]
        );
        assert_eq!(
            row_of(4),
            vec!["3", "", "Кран", "4", "01.03.2024", "---", "(1) / 00:01:00", "---"]
        );
    }

    #[test]
    fn process_file_never_overwrites_destination() {
        let dir_tmp = tempfile::tempdir().unwrap();
        let path_source = dir_tmp.path().join("log.xlsx");
        write_source_workbook(&path_source);

        let path_dest = dir_tmp.path().join("out.xlsx");
        std::fs::write(&path_dest, b"keep").unwrap();

        let path_saved = process_file(&path_source, &path_dest).unwrap();
        assert_eq!(path_saved, dir_tmp.path().join("out (1).xlsx"));
        assert_eq!(std::fs::read(&path_dest).unwrap(), b"keep");
    }

    #[test]
    fn process_file_ungrouped_layout() {
        let dir_tmp = tempfile::tempdir().unwrap();
        let path_source = dir_tmp.path().join("log.xlsx");
        write_source_workbook(&path_source);

        let options = SpecReportOptions {
            layout: SpecReportLayout::ungrouped(),
            ..Default::default()
        };
        let report =
            process_file_with_options(&path_source, dir_tmp.path().join("out.xlsx"), &options)
                .unwrap();

        let grid = read_first_sheet_text_grid(&report.path_file_out).unwrap();
        assert_eq!(grid.width, 11);
        assert_eq!(grid.cell(1, 2), "Название объекта");
        assert_eq!(grid.cell(2, 2), "Погрузчик");
        assert_eq!(grid.cell(2, 4), "(1) / 00:00:00");
        assert_eq!(grid.cell(2, 5), "нет");
    }

    #[test]
    fn sheet_without_sections_yields_header_only_report() {
        let dir_tmp = tempfile::tempdir().unwrap();
        let path_source = dir_tmp.path().join("empty.xlsx");
        let mut workbook = Workbook::new();
        workbook.add_worksheet().write_string(0, 0, "пусто").unwrap();
        workbook.save(&path_source).unwrap();

        let report = process_file_with_options(
            &path_source,
            dir_tmp.path().join("out.xlsx"),
            &SpecReportOptions::default(),
        )
        .unwrap();

        assert_eq!(report.cnt_sections, 0);
        assert_eq!(report.warning_count(), 5);
        assert_eq!(
            report.warnings.last().map(String::as_str),
            Some("Sheet has no body rows.")
        );
        let grid = read_first_sheet_text_grid(&report.path_file_out).unwrap();
        assert_eq!(grid.height(), 1);
        assert_eq!(grid.cell(1, 1), "№ п/п");
    }

    #[test]
    fn missing_source_is_source_unreadable() {
        let dir_tmp = tempfile::tempdir().unwrap();
        let err = process_file(
            dir_tmp.path().join("absent.xlsx"),
            dir_tmp.path().join("out.xlsx"),
        )
        .unwrap_err();

        assert!(matches!(err, CheckpointReportError::SourceUnreadable(_)));
        assert_eq!(err.io_error_kind(), Some(io::ErrorKind::NotFound));
        assert!(!dir_tmp.path().join("out.xlsx").exists());
    }

    #[test]
    fn unwritable_destination_is_output_unwritable() {
        let dir_tmp = tempfile::tempdir().unwrap();
        let path_source = dir_tmp.path().join("log.xlsx");
        write_source_workbook(&path_source);

        let path_dest = dir_tmp.path().join("missing").join("out.xlsx");
        let err = process_file(&path_source, &path_dest).unwrap_err();
        match err {
            CheckpointReportError::OutputUnwritable { path, .. } => assert_eq!(path, path_dest),
            other => panic!("unexpected error: {other}"),
        }
    }
}
