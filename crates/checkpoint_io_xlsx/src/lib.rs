//! `checkpoint_io_xlsx` v1:
//! Spreadsheet IO kernel for the checkpoint pass report.
//!
//! Module layout:
//! - `conf`   : constants and default presets
//! - `spec`   : specs/models/options/errors
//! - `util`   : pure helper functions
//! - `reader` : first-sheet text grid reader
//! - `writer` : styled sheet writer kernel
pub mod conf;
pub mod reader;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
    derive_default_xlsx_formats,
};
pub use reader::read_first_sheet_text_grid;
pub use spec::{
    EnumCellValue, SpecAutofitCellsPolicy, SpecCellFormat,
    SpecSheetCell, SpecSheetVerticalMerge, SpecStyledSheet, SpecTextGrid, SpecXlsxReport,
    XlsxIoError,
};
pub use util::{
    derive_cell_text, derive_vertical_merge_tracker, plan_column_widths, plan_vertical_merges,
    sanitize_sheet_name,
};
pub use writer::XlsxWriter;
