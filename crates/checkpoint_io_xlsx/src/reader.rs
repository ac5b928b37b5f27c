//! First-sheet reader: workbook file -> [`SpecTextGrid`] of computed cell texts.

use std::path::Path;

use calamine::{Data, ExcelDateTime, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::conf::{N_MICROS_PER_SECOND, N_SECONDS_PER_DAY, TUP_EXCEL_EPOCH_YMD};
use crate::spec::{SpecTextGrid, XlsxIoError};
use crate::util::derive_number_text;

/// Read the first worksheet as cached values and normalize every cell to text.
///
/// The grid is anchored at `A1` even when the used range starts further in, so
/// 1-based column numbers keep their sheet meaning.
pub fn read_first_sheet_text_grid<P>(file_in: P) -> Result<SpecTextGrid, XlsxIoError>
where
    P: AsRef<Path>,
{
    let path_file_in = file_in.as_ref();
    let mut workbook = open_workbook_auto(path_file_in).map_err(|source| XlsxIoError::Read {
        path: path_file_in.to_path_buf(),
        source,
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| XlsxIoError::NoWorksheet(path_file_in.to_path_buf()))?
        .map_err(|source| XlsxIoError::Read {
            path: path_file_in.to_path_buf(),
            source,
        })?;

    let Some((n_row_start, n_col_start)) = range.start() else {
        tracing::warn!(path = %path_file_in.display(), "first worksheet is empty");
        return Ok(SpecTextGrid::default());
    };
    let n_row_start = n_row_start as usize;
    let n_col_start = n_col_start as usize;
    let n_width = n_col_start + range.width();

    let mut l_rows = Vec::with_capacity(n_row_start + range.height());
    l_rows.resize(n_row_start, vec![String::new(); n_width]);
    for row in range.rows() {
        let mut l_cells = Vec::with_capacity(n_width);
        l_cells.resize(n_col_start, String::new());
        l_cells.extend(row.iter().map(derive_text_from_data));
        l_rows.push(l_cells);
    }

    tracing::debug!(
        path = %path_file_in.display(),
        rows = l_rows.len(),
        cols = n_width,
        "read first worksheet"
    );
    Ok(SpecTextGrid::from_rows(l_rows))
}

/// Cell text as a desktop spreadsheet user would see the computed value, trimmed.
pub fn derive_text_from_data(value: &Data) -> String {
    let c_text = match value {
        Data::Empty => String::new(),
        Data::String(val) => val.clone(),
        Data::Int(val) => val.to_string(),
        Data::Float(val) => derive_number_text(*val),
        Data::Bool(val) => if *val { "True" } else { "False" }.to_string(),
        Data::DateTime(val) => derive_text_from_excel_datetime(val),
        Data::DateTimeIso(val) => {
            derive_text_from_iso_datetime(val).unwrap_or_else(|| val.clone())
        }
        Data::DurationIso(val) => parse_iso_duration_seconds(val)
            .map(format_clock_text)
            .unwrap_or_else(|| val.clone()),
        Data::Error(val) => val.to_string(),
    };
    c_text.trim().to_string()
}

fn derive_text_from_excel_datetime(value: &ExcelDateTime) -> String {
    let n_serial = value.as_f64();
    if !n_serial.is_finite() || n_serial < 0.0 {
        return derive_number_text(n_serial);
    }

    let n_seconds_total = derive_whole_seconds(n_serial * N_SECONDS_PER_DAY);
    if value.is_duration() || n_serial < 1.0 {
        return format_clock_text(n_seconds_total);
    }

    let (n_year, n_month, n_day) = TUP_EXCEL_EPOCH_YMD;
    NaiveDate::from_ymd_opt(n_year, n_month, n_day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|dt| dt.checked_add_signed(TimeDelta::seconds(n_seconds_total)))
        .map_or_else(|| derive_number_text(n_serial), |dt| dt.to_string())
}

/// Whole seconds shown for a fractional amount: settle float noise at
/// microsecond precision, then drop the fraction.
fn derive_whole_seconds(n_seconds: f64) -> i64 {
    let n_micros = (n_seconds * N_MICROS_PER_SECOND as f64).round() as i64;
    n_micros.div_euclid(N_MICROS_PER_SECOND)
}

/// ODS date-time value (`2024-03-01T10:00:00`, optional fraction, or a bare date).
fn derive_text_from_iso_datetime(text: &str) -> Option<String> {
    let c_text = text.trim();
    for c_fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(c_text, c_fmt) {
            return Some(dt.format("%Y-%m-%d %H:%M:%S").to_string());
        }
    }
    NaiveDate::parse_from_str(c_text, "%Y-%m-%d")
        .ok()
        .map(|date| format!("{date} 00:00:00"))
}

/// Whole seconds of an ISO 8601 duration such as `PT00H02M05S` or `P1DT2H0M0.5S`.
///
/// Only day, hour, minute and second fields are accepted.
fn parse_iso_duration_seconds(text: &str) -> Option<i64> {
    let c_rest = text.trim().strip_prefix('P')?;
    if c_rest.is_empty() {
        return None;
    }
    let (c_date, c_time) = c_rest.split_once('T').unwrap_or((c_rest, ""));
    let n_days = sum_duration_fields(c_date, &[('D', N_SECONDS_PER_DAY)])?;
    let n_clock = sum_duration_fields(c_time, &[('H', 3600.0), ('M', 60.0), ('S', 1.0)])?;
    Some(derive_whole_seconds(n_days + n_clock))
}

fn sum_duration_fields(part: &str, units: &[(char, f64)]) -> Option<f64> {
    let mut n_total = 0.0;
    let mut c_number = String::new();
    for ch in part.chars() {
        match ch {
            '0'..='9' | '.' => c_number.push(ch),
            ',' => c_number.push('.'),
            _ => {
                let (_, n_scale) = units.iter().find(|(unit, _)| *unit == ch)?;
                let n_value = c_number.parse::<f64>().ok()?;
                n_total += n_value * n_scale;
                c_number.clear();
            }
        }
    }
    c_number.is_empty().then_some(n_total)
}

/// `HH:MM:SS` with unbounded hours.
fn format_clock_text(n_seconds_total: i64) -> String {
    let n_hours = n_seconds_total / 3600;
    let n_minutes = (n_seconds_total % 3600) / 60;
    let n_seconds = n_seconds_total % 60;
    format!("{n_hours:02}:{n_minutes:02}:{n_seconds:02}")
}
