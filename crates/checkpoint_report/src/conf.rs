//! Report constants, fixed domain vocabulary and default style presets.

use checkpoint_io_xlsx::{SpecCellFormat, derive_default_xlsx_formats};

/// Number of checkpoints tracked per section (indices `1..=8`).
pub const N_CHECKPOINTS: usize = 8;

/// Default 1-based column holding the checkpoint name.
pub const N_COL_NAME_DEFAULT: usize = 3;
/// Default 1-based column holding the pass duration.
pub const N_COL_DURATION_DEFAULT: usize = 10;
/// Header region scanned by the column locator.
pub const N_ROWS_HEADER_SCAN_MAX: usize = 40;
pub const N_COLS_HEADER_SCAN_MAX: usize = 30;
/// Lower-case keyword of the checkpoint-name column header.
pub const C_KEYWORD_COL_NAME: &str = "название";
/// Lower-case keyword of the duration column header.
pub const C_KEYWORD_COL_DURATION: &str = "продолж";

/// Reporting period marker followed by a `DD.MM.YYYY` date.
pub const C_PATTERN_PERIOD: &str = r"(?i)Период:\s*с\s*(\d{2}\.\d{2}\.\d{4})";
/// Section header marker; text after a vehicle-number marker is dropped.
pub const C_PATTERN_SECTION_HEADER: &str = r"(?i)Модель:\s*(.+?)(?:\s+Номер ТС:.*)?$";
/// Checkpoint marker followed by its index.
pub const C_PATTERN_CHECKPOINT: &str = r"(?i)Точка\s*([0-9]+)";
/// Trailing declared checkpoint total, e.g. `(6)`.
pub const C_PATTERN_DECLARED_TOTAL: &str = r"\(\s*([0-9]+)\s*\)\s*$";
/// Known group prefixes at the start of a header.
pub const C_PATTERN_GROUP_KNOWN: &str = r"(?i)^(ТАН-[0-9]+|ТЭ)(?:[\s:\-]|$)";
/// Literal end-of-section marker.
pub const C_MARKER_SECTION_END: &str = "ИТОГО по ТС";

/// Sort priority of known groups; anything else sorts after them.
pub const TUP_GROUP_PRIORITY: [(&str, usize); 4] =
    [("ТЭ", 0), ("ТАН-1", 1), ("ТАН-2", 2), ("ТАН-3", 3)];
pub const N_GROUP_PRIORITY_UNKNOWN: usize = 99;

/// Default report file name, placed next to the source workbook.
pub const C_FILE_NAME_REPORT_DEFAULT: &str = "отчет прохождения точек.xlsx";
/// Output sheet name.
pub const C_SHEET_NAME_REPORT: &str = "Отчет";

pub const C_HEADER_SEQ: &str = "№ п/п";
pub const C_HEADER_GROUP: &str = "Группа";
pub const C_HEADER_NAME: &str = "Название объекта";
pub const C_HEADER_DECLARED_TOTAL: &str = "Всего точек";
pub const C_HEADER_PERIOD: &str = "Дата";
pub const C_HEADER_CHECKPOINT_PREFIX: &str = "Точка";

/// Zero passes, grouped layout.
pub const C_SENTINEL_NO_PASS_GROUPED: &str = "---";
/// Passes recorded but their durations sum to zero, grouped layout.
pub const C_SENTINEL_ZERO_DURATION: &str = "нет";
/// Zero passes, ungrouped layout.
pub const C_SENTINEL_NO_PASS_UNGROUPED: &str = "нет";

pub const C_COLOR_FILL_HEADER: &str = "#FFF2CC";
pub const C_COLOR_FILL_BODY: &str = "#FFFBEA";
pub const C_COLOR_FILL_POSITIVE: &str = "#C6EFCE";
pub const C_COLOR_FILL_NEGATIVE: &str = "#FFC7CE";

/// Cell formats by role in the rendered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecReportFormats {
    /// Header row cells.
    pub header: SpecCellFormat,
    /// Non-checkpoint data cells.
    pub body: SpecCellFormat,
    /// Checkpoint cells holding a count/duration pair.
    pub positive: SpecCellFormat,
    /// Checkpoint cells holding a sentinel.
    pub negative: SpecCellFormat,
}

/// Build the report palette on top of the writer's base presets.
pub fn derive_report_formats() -> SpecReportFormats {
    let dict_fmt = derive_default_xlsx_formats();
    let fmt_text = dict_fmt.get("text").cloned().unwrap_or_default();
    let fmt_header = dict_fmt.get("header").cloned().unwrap_or_default();

    let derive_fill = |fmt_base: &SpecCellFormat, c_color: &str| {
        fmt_base.with_(SpecCellFormat {
            bg_color: Some(c_color.to_string()),
            ..Default::default()
        })
    };

    SpecReportFormats {
        header: derive_fill(&fmt_header, C_COLOR_FILL_HEADER),
        body: derive_fill(&fmt_text, C_COLOR_FILL_BODY),
        positive: derive_fill(&fmt_text, C_COLOR_FILL_POSITIVE),
        negative: derive_fill(&fmt_text, C_COLOR_FILL_NEGATIVE),
    }
}
