//! Report data models, layout options and top-level error types.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use checkpoint_io_xlsx::{SpecAutofitCellsPolicy, XlsxIoError};
use thiserror::Error;

use crate::conf::{C_SHEET_NAME_REPORT, N_CHECKPOINTS, N_COL_DURATION_DEFAULT, N_COL_NAME_DEFAULT};

////////////////////////////////////////////////////////////////////////////////
// #region SectionModels

/// Post-processed model header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecHeaderInfo {
    /// Known group prefix, else the first token, else empty.
    pub group: String,
    /// Header text without group prefix and trailing `(N)`.
    pub name: String,
    /// Checkpoint total declared by a trailing `(N)`; informational only.
    pub declared_total: Option<u32>,
}

/// One model section with per-checkpoint aggregates.
///
/// `counts` and `duration_sums` always hold exactly the keys `1..=8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecAggregatedSection {
    /// Cleaned section name.
    pub name: String,
    /// Group prefix used for sorting and merging.
    pub group: String,
    /// Declared checkpoint total, if the header carried one.
    pub declared_total: Option<u32>,
    /// Pass count by checkpoint index.
    pub counts: BTreeMap<usize, u64>,
    /// Summed pass duration by checkpoint index.
    pub duration_sums: BTreeMap<usize, Duration>,
}

impl SpecAggregatedSection {
    /// Open an empty section from a post-processed header.
    pub fn new(info: SpecHeaderInfo) -> Self {
        Self {
            name: info.name,
            group: info.group,
            declared_total: info.declared_total,
            counts: (1..=N_CHECKPOINTS).map(|idx| (idx, 0)).collect(),
            duration_sums: (1..=N_CHECKPOINTS)
                .map(|idx| (idx, Duration::ZERO))
                .collect(),
        }
    }

    /// Add one pass at `idx`. Returns `false` (and changes nothing) for indices outside `1..=8`.
    pub fn record_pass(&mut self, idx: usize, duration: Duration) -> bool {
        let (Some(n_count), Some(dur_sum)) =
            (self.counts.get_mut(&idx), self.duration_sums.get_mut(&idx))
        else {
            return false;
        };
        *n_count += 1;
        *dur_sum = dur_sum.saturating_add(duration);
        true
    }

    /// Pass count at `idx` (zero outside the tracked range).
    pub fn count(&self, idx: usize) -> u64 {
        self.counts.get(&idx).copied().unwrap_or(0)
    }

    /// Summed duration at `idx` (zero outside the tracked range).
    pub fn duration_sum(&self, idx: usize) -> Duration {
        self.duration_sums
            .get(&idx)
            .copied()
            .unwrap_or(Duration::ZERO)
    }

    /// Total passes across all checkpoints.
    pub fn total_passes(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// 1-based data columns located in the source sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecColumnLayout {
    /// Checkpoint-name column.
    pub col_name: usize,
    /// Duration column.
    pub col_duration: usize,
    /// Whether `col_name` came from a header match.
    pub if_name_detected: bool,
    /// Whether `col_duration` came from a header match.
    pub if_duration_detected: bool,
}

impl Default for SpecColumnLayout {
    fn default() -> Self {
        Self {
            col_name: N_COL_NAME_DEFAULT,
            col_duration: N_COL_DURATION_DEFAULT,
            if_name_detected: false,
            if_duration_detected: false,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportOptions

/// Checkpoint cell sentinel rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumSentinelPolicy {
    /// `---` for no passes, `нет` for passes with zero summed duration.
    #[default]
    Grouped,
    /// `нет` for no passes; zero-duration passes render as a value.
    Ungrouped,
}

/// Column layout of the rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecReportLayout {
    /// Emit the group column (and merge equal consecutive groups).
    pub if_include_group: bool,
    /// Emit the declared checkpoint total column.
    pub if_include_declared_total: bool,
    /// Sentinel rule for checkpoint cells.
    pub rule_sentinel: EnumSentinelPolicy,
}

impl SpecReportLayout {
    /// Canonical layout with group and declared-total columns.
    pub fn grouped() -> Self {
        Self {
            if_include_group: true,
            if_include_declared_total: true,
            rule_sentinel: EnumSentinelPolicy::Grouped,
        }
    }

    /// Plain layout: sequence number, name, date and checkpoints.
    pub fn ungrouped() -> Self {
        Self {
            if_include_group: false,
            if_include_declared_total: false,
            rule_sentinel: EnumSentinelPolicy::Ungrouped,
        }
    }
}

impl Default for SpecReportLayout {
    fn default() -> Self {
        Self::grouped()
    }
}

/// Options for one `process_file` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecReportOptions {
    /// Report column layout.
    pub layout: SpecReportLayout,
    /// Output sheet name.
    pub sheet_name: String,
    /// Column autofit policy.
    pub policy_autofit: SpecAutofitCellsPolicy,
}

impl Default for SpecReportOptions {
    fn default() -> Self {
        Self {
            layout: SpecReportLayout::default(),
            sheet_name: C_SHEET_NAME_REPORT.to_string(),
            policy_autofit: SpecAutofitCellsPolicy::default(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Failures at the IO boundary. Sheet content never produces an error.
#[derive(Debug, Error)]
pub enum CheckpointReportError {
    /// Source missing, not accessible, or not a spreadsheet.
    #[error("source workbook is unreadable: {0}")]
    SourceUnreadable(#[source] XlsxIoError),
    /// Report could not be written to its destination.
    #[error("failed to write report {}: {source}", path.display())]
    OutputUnwritable {
        /// Final destination path.
        path: PathBuf,
        /// Underlying writer error.
        #[source]
        source: XlsxIoError,
    },
}

impl CheckpointReportError {
    /// Kind of the underlying OS error, when there is one.
    pub fn io_error_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::SourceUnreadable(err) => err.io_error_kind(),
            Self::OutputUnwritable { source, .. } => source.io_error_kind(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
