//! XLSX writer kernel that turns a fully planned [`SpecStyledSheet`] into workbook output.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::conf::{N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX};
use crate::spec::{EnumCellValue, SpecCellFormat, SpecStyledSheet, SpecXlsxReport, XlsxIoError};
use crate::util::{
    derive_vertical_merge_tracker, plan_column_widths, plan_vertical_merges, sanitize_sheet_name,
};

/// Stateful workbook writer.
///
/// The workbook is buffered in memory until [`Self::close`] is called, so a
/// failed run never leaves a half-written file behind.
pub struct XlsxWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    set_sheet_names_existing: BTreeSet<String>,
    l_reports: Vec<SpecXlsxReport>,
    if_closed: bool,
}

impl XlsxWriter {
    /// Create writer bound to output path.
    pub fn new(path_file_out: PathBuf) -> Self {
        Self {
            path_file_out,
            workbook: Workbook::new(),
            set_sheet_names_existing: BTreeSet::new(),
            l_reports: Vec::new(),
            if_closed: false,
        }
    }

    /// Return immutable snapshot of per-sheet write reports.
    pub fn report(&self) -> Vec<SpecXlsxReport> {
        self.l_reports.clone()
    }

    /// Flush workbook to disk. Idempotent.
    pub fn close(&mut self) -> Result<(), XlsxIoError> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook.save(&self.path_file_out)?;
        self.if_closed = true;
        tracing::debug!(path = %self.path_file_out.display(), "workbook saved");
        Ok(())
    }

    /// Write one planned sheet into the in-memory workbook.
    pub fn write_sheet(&mut self, sheet: &SpecStyledSheet) -> Result<(), XlsxIoError> {
        if self.if_closed {
            return Err(XlsxIoError::Closed);
        }
        validate_sheet_shape(sheet)?;

        let sheet_name_unique =
            self.derive_unique_sheet_name(&sanitize_sheet_name(&sheet.sheet_name, "_"));
        let mut report = SpecXlsxReport {
            sheet_name: sheet_name_unique.clone(),
            ..Default::default()
        };

        let l_merges = plan_vertical_merges(
            &sheet.rows,
            &sheet.cols_merge_vertical,
            sheet.n_rows_header,
        );
        let dict_merge_tracker = derive_vertical_merge_tracker(&l_merges);
        let l_widths = plan_column_widths(&sheet.rows, &sheet.policy_autofit);

        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(&sheet_name_unique)?;

        let mut dict_formats: HashMap<SpecCellFormat, Format> = HashMap::new();
        for (row_idx, row) in sheet.rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                if dict_merge_tracker
                    .get(&(row_idx, col_idx))
                    .copied()
                    .unwrap_or(false)
                {
                    continue;
                }
                let format = dict_formats
                    .entry(cell.fmt.clone())
                    .or_insert_with(|| derive_rust_xlsx_format(&cell.fmt));
                write_cell_with_format(worksheet, row_idx, col_idx, &cell.value, format)?;
            }
        }

        for merge in &l_merges {
            let cell_anchor = &sheet.rows[merge.row_idx_start][merge.col_idx];
            let format = dict_formats
                .entry(cell_anchor.fmt.clone())
                .or_insert_with(|| derive_rust_xlsx_format(&cell_anchor.fmt));
            worksheet.merge_range(
                cast_row_num(merge.row_idx_start)?,
                cast_col_num(merge.col_idx)?,
                cast_row_num(merge.row_idx_end)?,
                cast_col_num(merge.col_idx)?,
                &merge.text,
                format,
            )?;
        }

        for (col_idx, n_width) in l_widths.iter().enumerate() {
            worksheet.set_column_width(cast_col_num(col_idx)?, *n_width as f64)?;
        }

        if sheet.rows.len() <= sheet.n_rows_header {
            report.warn("Sheet has no body rows.");
        }
        report.n_rows_written = sheet.rows.len();
        report.n_merges = l_merges.len();
        report.widths = l_widths;

        tracing::debug!(
            sheet = %report.sheet_name,
            rows = report.n_rows_written,
            merges = report.n_merges,
            "sheet planned"
        );
        self.l_reports.push(report);
        Ok(())
    }

    fn derive_unique_sheet_name(&mut self, name: &str) -> String {
        if !self.set_sheet_names_existing.contains(name) {
            self.set_sheet_names_existing.insert(name.to_string());
            return name.to_string();
        }

        let base_name: String = name
            .chars()
            .take(usize::max(1, N_LEN_EXCEL_SHEET_NAME_MAX - 3))
            .collect();

        let mut n_idx = 2usize;
        loop {
            let candidate: String = format!("{base_name}__{n_idx}")
                .chars()
                .take(N_LEN_EXCEL_SHEET_NAME_MAX)
                .collect();
            if !self.set_sheet_names_existing.contains(&candidate) {
                self.set_sheet_names_existing.insert(candidate.clone());
                return candidate;
            }
            n_idx += 1;
        }
    }
}

fn validate_sheet_shape(sheet: &SpecStyledSheet) -> Result<(), XlsxIoError> {
    if sheet.rows.len() > N_NROWS_EXCEL_MAX {
        return Err(XlsxIoError::InvalidSheet(format!(
            "{} rows exceed Excel limit {N_NROWS_EXCEL_MAX}.",
            sheet.rows.len()
        )));
    }
    if sheet.width() > N_NCOLS_EXCEL_MAX {
        return Err(XlsxIoError::InvalidSheet(format!(
            "{} columns exceed Excel limit {N_NCOLS_EXCEL_MAX}.",
            sheet.width()
        )));
    }
    if sheet.n_rows_header > sheet.rows.len() {
        return Err(XlsxIoError::InvalidSheet(format!(
            "n_rows_header={} exceeds row count {}.",
            sheet.n_rows_header,
            sheet.rows.len()
        )));
    }
    Ok(())
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), XlsxIoError> {
    match value {
        EnumCellValue::None => {
            worksheet.write_blank(cast_row_num(row_idx)?, cast_col_num(col_idx)?, format)?;
        }
        EnumCellValue::String(val) if val.is_empty() => {
            worksheet.write_blank(cast_row_num(row_idx)?, cast_col_num(col_idx)?, format)?;
        }
        EnumCellValue::String(val) => {
            worksheet.write_string_with_format(
                cast_row_num(row_idx)?,
                cast_col_num(col_idx)?,
                val,
                format,
            )?;
        }
        EnumCellValue::Number(val) => {
            worksheet.write_number_with_format(
                cast_row_num(row_idx)?,
                cast_col_num(col_idx)?,
                *val,
                format,
            )?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.valign_center.unwrap_or(false) {
        format = format.set_align(FormatAlign::VerticalCenter);
    }
    if spec.border_thin.unwrap_or(false) {
        format = format.set_border(FormatBorder::Thin);
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }

    format
}

fn cast_row_num(value: usize) -> Result<u32, XlsxIoError> {
    u32::try_from(value)
        .map_err(|_| XlsxIoError::InvalidSheet(format!("row index overflow: {value}")))
}

fn cast_col_num(value: usize) -> Result<u16, XlsxIoError> {
    u16::try_from(value)
        .map_err(|_| XlsxIoError::InvalidSheet(format!("column index overflow: {value}")))
}
