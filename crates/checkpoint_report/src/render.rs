//! Report sheet planning.
//!
//! Builds a fully styled [`SpecStyledSheet`]; the xlsx writer only lays it out.

use std::time::Duration;

use checkpoint_io_xlsx::{SpecSheetCell, SpecStyledSheet};

use crate::conf::{
    C_HEADER_CHECKPOINT_PREFIX, C_HEADER_DECLARED_TOTAL, C_HEADER_GROUP, C_HEADER_NAME,
    C_HEADER_PERIOD, C_HEADER_SEQ, C_SENTINEL_NO_PASS_GROUPED, C_SENTINEL_NO_PASS_UNGROUPED,
    C_SENTINEL_ZERO_DURATION, N_CHECKPOINTS, derive_report_formats,
};
use crate::duration::format_duration;
use crate::spec::{EnumSentinelPolicy, SpecAggregatedSection, SpecReportLayout, SpecReportOptions};

/// Text of one checkpoint cell and whether it carries a count/duration pair.
///
/// A `false` flag marks a sentinel.
pub fn render_checkpoint_value(
    count: u64,
    duration_sum: Duration,
    rule_sentinel: EnumSentinelPolicy,
) -> (String, bool) {
    match rule_sentinel {
        EnumSentinelPolicy::Grouped if count == 0 => (C_SENTINEL_NO_PASS_GROUPED.to_string(), false),
        EnumSentinelPolicy::Grouped if duration_sum.is_zero() => {
            (C_SENTINEL_ZERO_DURATION.to_string(), false)
        }
        EnumSentinelPolicy::Ungrouped if count == 0 => {
            (C_SENTINEL_NO_PASS_UNGROUPED.to_string(), false)
        }
        _ => (
            format!("({count}) / {}", format_duration(duration_sum)),
            true,
        ),
    }
}

/// Header labels for a layout, left to right.
pub fn derive_header_labels(layout: &SpecReportLayout) -> Vec<String> {
    let mut l_labels = vec![C_HEADER_SEQ.to_string()];
    if layout.if_include_group {
        l_labels.push(C_HEADER_GROUP.to_string());
    }
    l_labels.push(C_HEADER_NAME.to_string());
    if layout.if_include_declared_total {
        l_labels.push(C_HEADER_DECLARED_TOTAL.to_string());
    }
    l_labels.push(C_HEADER_PERIOD.to_string());
    l_labels.extend((1..=N_CHECKPOINTS).map(|idx| format!("{C_HEADER_CHECKPOINT_PREFIX} {idx}")));
    l_labels
}

/// Plan the report sheet: one header row, then one row per section in the given order.
pub fn build_report_sheet(
    sections: &[SpecAggregatedSection],
    period: &str,
    options: &SpecReportOptions,
) -> SpecStyledSheet {
    let layout = &options.layout;
    let fmts = derive_report_formats();

    let mut l_rows: Vec<Vec<SpecSheetCell>> = Vec::with_capacity(sections.len() + 1);
    l_rows.push(
        derive_header_labels(layout)
            .into_iter()
            .map(|c_label| SpecSheetCell::text(c_label, &fmts.header))
            .collect(),
    );

    for (row_idx, section) in sections.iter().enumerate() {
        let mut l_cells = vec![SpecSheetCell::number((row_idx + 1) as f64, &fmts.body)];
        if layout.if_include_group {
            l_cells.push(SpecSheetCell::text(section.group.as_str(), &fmts.body));
        }
        l_cells.push(SpecSheetCell::text(section.name.as_str(), &fmts.body));
        if layout.if_include_declared_total {
            l_cells.push(match section.declared_total {
                Some(n_total) => SpecSheetCell::number(f64::from(n_total), &fmts.body),
                None => SpecSheetCell::blank(&fmts.body),
            });
        }
        l_cells.push(SpecSheetCell::text(period, &fmts.body));

        for idx in 1..=N_CHECKPOINTS {
            let (c_value, if_positive) = render_checkpoint_value(
                section.count(idx),
                section.duration_sum(idx),
                layout.rule_sentinel,
            );
            let fmt = if if_positive {
                &fmts.positive
            } else {
                &fmts.negative
            };
            l_cells.push(SpecSheetCell::text(c_value, fmt));
        }
        l_rows.push(l_cells);
    }

    SpecStyledSheet {
        sheet_name: options.sheet_name.clone(),
        rows: l_rows,
        n_rows_header: 1,
        cols_merge_vertical: if layout.if_include_group { vec![1] } else { Vec::new() },
        policy_autofit: options.policy_autofit.clone(),
    }
}
