//! Run report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::spec::SpecColumnLayout;

/// Counters and diagnostics for one `process_file` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportRun {
    /// Source rows scanned.
    pub cnt_rows_scanned: u64,
    /// Sections written to the report.
    pub cnt_sections: u64,
    /// Checkpoint passes aggregated.
    pub cnt_passes: u64,
    /// Checkpoint rows skipped for an out-of-range index.
    pub cnt_passes_ignored: u64,
    /// Reporting period date, empty when none was found.
    pub period: String,
    /// Final report path.
    pub path_file_out: PathBuf,
    /// Data columns used for the scan.
    pub layout_columns: SpecColumnLayout,
    /// Sheet name as written to the workbook.
    pub sheet_name: String,
    /// Final report column widths.
    pub widths: Vec<usize>,
    /// Non-fatal warnings, pipeline first, then writer.
    pub warnings: Vec<String>,
}

impl ReportRun {
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_rows_scanned".to_string(), self.cnt_rows_scanned);
        dict_counts.insert("cnt_sections".to_string(), self.cnt_sections);
        dict_counts.insert("cnt_passes".to_string(), self.cnt_passes);
        dict_counts.insert("cnt_passes_ignored".to_string(), self.cnt_passes_ignored);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let c_period = if self.period.is_empty() {
            "-"
        } else {
            self.period.as_str()
        };
        format!(
            "{prefix} rows={} sections={} passes={} ignored={} warnings={} period={} out={}",
            self.cnt_rows_scanned,
            self.cnt_sections,
            self.cnt_passes,
            self.cnt_passes_ignored,
            self.warning_count(),
            c_period,
            self.path_file_out.display()
        )
    }
}

impl fmt::Display for ReportRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[REPORT]"))
    }
}

/// Mutable accumulator filled while a run progresses.
#[derive(Debug, Default, Clone)]
pub struct ReportRunBuilder {
    pub cnt_rows_scanned: u64,
    pub cnt_sections: u64,
    pub cnt_passes: u64,
    pub cnt_passes_ignored: u64,
    pub period: String,
    pub layout_columns: SpecColumnLayout,
    pub sheet_name: String,
    pub widths: Vec<usize>,
    pub warnings: Vec<String>,
}

impl ReportRunBuilder {
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Finalize into an immutable report for the written file.
    pub fn build(self, path_file_out: PathBuf) -> ReportRun {
        ReportRun {
            cnt_rows_scanned: self.cnt_rows_scanned,
            cnt_sections: self.cnt_sections,
            cnt_passes: self.cnt_passes,
            cnt_passes_ignored: self.cnt_passes_ignored,
            period: self.period,
            path_file_out,
            layout_columns: self.layout_columns,
            sheet_name: self.sheet_name,
            widths: self.widths,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_run_to_dict_and_format() {
        let mut builder = ReportRunBuilder {
            cnt_rows_scanned: 12,
            cnt_sections: 3,
            cnt_passes: 7,
            cnt_passes_ignored: 1,
            period: "01.03.2024".to_string(),
            ..Default::default()
        };
        builder.add_warning("w");
        let report = builder.build(PathBuf::from("out.xlsx"));

        let dict_counts = report.to_dict();
        assert_eq!(dict_counts["cnt_rows_scanned"], 12);
        assert_eq!(dict_counts["cnt_sections"], 3);
        assert_eq!(dict_counts["cnt_passes"], 7);
        assert_eq!(dict_counts["cnt_passes_ignored"], 1);
        assert_eq!(dict_counts["cnt_warnings"], 1);

        let txt = report.format("[REPORT]");
        assert_eq!(
            txt,
            "[REPORT] rows=12 sections=3 passes=7 ignored=1 warnings=1 period=01.03.2024 out=out.xlsx"
        );
        assert_eq!(report.to_string(), txt);
    }

    #[test]
    fn empty_period_renders_dash() {
        let report = ReportRunBuilder::default().build(PathBuf::from("r.xlsx"));
        assert!(report.format("[X]").contains(" period=- "));
        assert_eq!(report.layout_columns, SpecColumnLayout::default());
    }
}
