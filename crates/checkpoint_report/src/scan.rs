//! Row-scan state machine.
//!
//! The scanner holds at most one open section. Each row is applied by the pure
//! transition [`advance`], which returns the next state and what the row did;
//! [`scan_sections`] folds a whole grid through it.

use std::mem;

use checkpoint_io_xlsx::SpecTextGrid;

use crate::duration::parse_duration;
use crate::extract::{
    extract_checkpoint_index, extract_checkpoint_number, extract_period, extract_section_header,
    is_section_end, parse_header_info,
};
use crate::spec::{SpecAggregatedSection, SpecColumnLayout};

////////////////////////////////////////////////////////////////////////////////
// #region ScanModels

/// Scanner state between rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EnumScanState {
    /// No section is collecting passes.
    #[default]
    NoOpenSection,
    /// One section is collecting passes.
    SectionOpen(SpecAggregatedSection),
}

/// What a single row did to the scan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecRowEffect {
    /// Period date seen in this row.
    pub period: Option<String>,
    /// Sections closed by this row, in close order (at most two).
    pub flushed: Vec<SpecAggregatedSection>,
    /// Checkpoint index recorded into the open section.
    pub checkpoint: Option<usize>,
    /// A checkpoint marker was seen in an open section but its index was out of range.
    pub if_checkpoint_ignored: bool,
}

/// Result of scanning a whole grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecScanOutcome {
    /// Sections in encounter order.
    pub sections: Vec<SpecAggregatedSection>,
    /// Last period date seen, or empty.
    pub period: String,
    /// Rows visited.
    pub cnt_rows_scanned: usize,
    /// Passes recorded into sections.
    pub cnt_passes: u64,
    /// Checkpoint markers skipped for an out-of-range index.
    pub cnt_passes_ignored: u64,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Transitions

fn derive_row_text(row: &[String], col: usize) -> &str {
    col.checked_sub(1)
        .and_then(|idx| row.get(idx))
        .map_or("", String::as_str)
}

fn log_flushed_section(section: &SpecAggregatedSection) {
    tracing::debug!(
        name = %section.name,
        group = %section.group,
        n_passes = section.total_passes(),
        "section closed"
    );
}

/// Apply one row to the scan state.
///
/// Order within a row: period, header (closes the open section and opens a new
/// one), checkpoint pass, end marker. Row content never fails the scan.
pub fn advance(
    mut state: EnumScanState,
    row: &[String],
    layout: &SpecColumnLayout,
) -> (EnumScanState, SpecRowEffect) {
    let mut effect = SpecRowEffect {
        period: extract_period(row),
        ..Default::default()
    };

    if let Some(c_header) = extract_section_header(row) {
        if let EnumScanState::SectionOpen(section) = state {
            log_flushed_section(&section);
            effect.flushed.push(section);
        }
        state = EnumScanState::SectionOpen(SpecAggregatedSection::new(parse_header_info(
            &c_header,
        )));
    }

    if let EnumScanState::SectionOpen(section) = &mut state {
        let c_name = derive_row_text(row, layout.col_name);
        match extract_checkpoint_index(c_name) {
            Some(idx) => {
                let dur = parse_duration(derive_row_text(row, layout.col_duration));
                if section.record_pass(idx, dur) {
                    effect.checkpoint = Some(idx);
                }
            }
            None => {
                effect.if_checkpoint_ignored = extract_checkpoint_number(c_name).is_some();
            }
        }
    }

    if is_section_end(row)
        && let EnumScanState::SectionOpen(section) = mem::take(&mut state)
    {
        log_flushed_section(&section);
        effect.flushed.push(section);
    }

    (state, effect)
}

/// Close whatever section is still open at end of input.
pub fn finish(state: EnumScanState) -> Option<SpecAggregatedSection> {
    match state {
        EnumScanState::NoOpenSection => None,
        EnumScanState::SectionOpen(section) => {
            log_flushed_section(&section);
            Some(section)
        }
    }
}

/// Scan every row of `grid` and collect sections in encounter order.
pub fn scan_sections(grid: &SpecTextGrid, layout: &SpecColumnLayout) -> SpecScanOutcome {
    let mut outcome = SpecScanOutcome::default();
    let mut state = EnumScanState::NoOpenSection;

    for row in &grid.rows {
        let (state_next, effect) = advance(state, row, layout);
        state = state_next;

        outcome.cnt_rows_scanned += 1;
        if let Some(c_period) = effect.period {
            outcome.period = c_period;
        }
        if effect.checkpoint.is_some() {
            outcome.cnt_passes += 1;
        }
        if effect.if_checkpoint_ignored {
            outcome.cnt_passes_ignored += 1;
        }
        outcome.sections.extend(effect.flushed);
    }
    outcome.sections.extend(finish(state));

    outcome
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
