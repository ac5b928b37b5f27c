//! Shared XLSX specification models.

use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Immutable cell format description, converted to a writer format at write time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Bold style.
    pub bold: Option<bool>,
    /// Vertically centered text.
    pub valign_center: Option<bool>,
    /// Thin border on all sides.
    pub border_thin: Option<bool>,
    /// Background fill color (`#RRGGBB`).
    pub bg_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            bold: other.bold.or(self.bold),
            valign_center: other.valign_center.or(self.valign_center),
            border_thin: other.border_thin.or(self.border_thin),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
        }
    }
}

/// Normalized cell value in the write pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
}

/// One output cell: value plus the format applied to it.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecSheetCell {
    /// Cell value.
    pub value: EnumCellValue,
    /// Cell format.
    pub fmt: SpecCellFormat,
}

impl SpecSheetCell {
    /// Text cell.
    pub fn text(value: impl Into<String>, fmt: &SpecCellFormat) -> Self {
        Self {
            value: EnumCellValue::String(value.into()),
            fmt: fmt.clone(),
        }
    }

    /// Numeric cell.
    pub fn number(value: f64, fmt: &SpecCellFormat) -> Self {
        Self {
            value: EnumCellValue::Number(value),
            fmt: fmt.clone(),
        }
    }

    /// Blank cell that still carries a format (fill/border).
    pub fn blank(fmt: &SpecCellFormat) -> Self {
        Self {
            value: EnumCellValue::None,
            fmt: fmt.clone(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetSpecification

/// Autofit policy for one sheet; widths are inferred from header and body cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecAutofitCellsPolicy {
    /// Minimum final width.
    pub width_cell_min: usize,
    /// Maximum final width.
    pub width_cell_max: usize,
    /// Width padding added after inference.
    pub width_cell_padding: usize,
}

impl Default for SpecAutofitCellsPolicy {
    fn default() -> Self {
        Self {
            width_cell_min: 1,
            width_cell_max: 40,
            width_cell_padding: 2,
        }
    }
}

/// Fully planned sheet: every cell value and format is decided before writing.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecStyledSheet {
    /// Requested sheet name (sanitized and de-duplicated by the writer).
    pub sheet_name: String,
    /// Row-major cells; header rows first.
    pub rows: Vec<Vec<SpecSheetCell>>,
    /// Number of leading header rows.
    pub n_rows_header: usize,
    /// Columns whose consecutive equal body values are merged vertically.
    pub cols_merge_vertical: Vec<usize>,
    /// Column autofit policy.
    pub policy_autofit: SpecAutofitCellsPolicy,
}

impl SpecStyledSheet {
    /// Number of columns (widest row).
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Vertical merge plan item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetVerticalMerge {
    /// Column index where merge is applied.
    pub col_idx: usize,
    /// Start row index (inclusive).
    pub row_idx_start: usize,
    /// End row index (inclusive).
    pub row_idx_end: usize,
    /// Merge display text.
    pub text: String,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region InputGridSpecification

/// Rectangular text view of one worksheet, anchored at `A1`.
///
/// Every row holds exactly `width` cells; empty cells are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecTextGrid {
    /// Row-major cell texts.
    pub rows: Vec<Vec<String>>,
    /// Column count shared by all rows.
    pub width: usize,
}

impl SpecTextGrid {
    /// Build a grid from ragged rows, padding every row to the widest one.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { rows, width }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Cell text by 1-based `(row, col)`; out-of-range cells read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        if row == 0 || col == 0 {
            return "";
        }
        self.rows
            .get(row - 1)
            .and_then(|r| r.get(col - 1))
            .map_or("", String::as_str)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportAndErrors

/// Per-sheet write report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Actual unique sheet name in workbook.
    pub sheet_name: String,
    /// Rows written, header included.
    pub n_rows_written: usize,
    /// Vertical merges applied.
    pub n_merges: usize,
    /// Final column widths.
    pub widths: Vec<usize>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

/// Spreadsheet IO failures.
#[derive(Debug, Error)]
pub enum XlsxIoError {
    /// Source workbook could not be opened or parsed.
    #[error("failed to read workbook {}: {source}", path.display())]
    Read {
        /// Source workbook path.
        path: PathBuf,
        /// Underlying reader error.
        #[source]
        source: calamine::Error,
    },
    /// Source workbook has no worksheet to read.
    #[error("workbook has no worksheet: {}", .0.display())]
    NoWorksheet(PathBuf),
    /// Workbook serialization or save failed.
    #[error("xlsx write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
    /// Planned sheet does not fit the Excel grid.
    #[error("invalid sheet: {0}")]
    InvalidSheet(String),
    /// Writer was already flushed.
    #[error("Cannot write after close().")]
    Closed,
}

impl XlsxIoError {
    /// Kind of the underlying OS error, when the failure came from the filesystem.
    pub fn io_error_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Read {
                source: calamine::Error::Io(err),
                ..
            } => Some(err.kind()),
            Self::Read {
                source: calamine::Error::Xlsx(calamine::XlsxError::Io(err)),
                ..
            } => Some(err.kind()),
            Self::Write(rust_xlsxwriter::XlsxError::IoError(err)) => Some(err.kind()),
            _ => {
                let mut err_cursor: Option<&(dyn StdError + 'static)> = self.source();
                while let Some(err) = err_cursor {
                    if let Some(err_io) = err.downcast_ref::<io::Error>() {
                        return Some(err_io.kind());
                    }
                    err_cursor = err.source();
                }
                None
            }
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
