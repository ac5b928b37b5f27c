//! `checkpoint_report` v1:
//! Checkpoint ("Точка") pass log aggregator and styled report generator.
//!
//! Module layout:
//! - `conf`     : domain vocabulary, patterns and style presets
//! - `spec`     : section models, layout options and errors
//! - `duration` : `HH:MM:SS` codec
//! - `columns`  : data column locator
//! - `extract`  : free-text marker extractors
//! - `scan`     : row-scan state machine
//! - `order`    : section ordering
//! - `render`   : report sheet planning
//! - `report`   : run report model
//! - `process`  : end-to-end pipeline
//! - `util`     : output path helpers

pub mod columns;
pub mod conf;
pub mod duration;
pub mod extract;
pub mod order;
pub mod process;
pub mod render;
pub mod report;
pub mod scan;
pub mod spec;
pub mod util;

pub use columns::locate_columns;
pub use duration::{format_duration, parse_duration};
pub use extract::{
    extract_checkpoint_index, extract_period, extract_section_header, is_section_end,
    parse_header_info,
};
pub use order::{derive_group_priority, sort_sections};
pub use process::{process_file, process_file_with_options};
pub use render::{build_report_sheet, render_checkpoint_value};
pub use report::{ReportRun, ReportRunBuilder};
pub use scan::{EnumScanState, SpecRowEffect, SpecScanOutcome, advance, finish, scan_sections};
pub use spec::{
    CheckpointReportError, EnumSentinelPolicy, SpecAggregatedSection, SpecColumnLayout,
    SpecHeaderInfo, SpecReportLayout, SpecReportOptions,
};
pub use util::{build_default_output_path, ensure_unique_path};
