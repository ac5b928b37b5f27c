//! `HH:MM:SS` duration codec.

use std::time::Duration;

/// Parse `HH:MM:SS` text into elapsed time.
///
/// Each part may carry a fraction, truncated toward zero. Empty text, a part
/// count other than three, non-numeric, negative or non-finite parts, and
/// overflowing totals all yield [`Duration::ZERO`].
pub fn parse_duration(text: &str) -> Duration {
    let c_text = text.trim();
    if c_text.is_empty() {
        return Duration::ZERO;
    }

    let l_parts: Vec<&str> = c_text.split(':').collect();
    let [c_hours, c_minutes, c_seconds] = l_parts.as_slice() else {
        return Duration::ZERO;
    };
    let (Some(n_hours), Some(n_minutes), Some(n_seconds)) = (
        parse_duration_part(c_hours),
        parse_duration_part(c_minutes),
        parse_duration_part(c_seconds),
    ) else {
        return Duration::ZERO;
    };

    n_hours
        .checked_mul(3600)
        .and_then(|n| n.checked_add(n_minutes.checked_mul(60)?))
        .and_then(|n| n.checked_add(n_seconds))
        .map_or(Duration::ZERO, Duration::from_secs)
}

fn parse_duration_part(part: &str) -> Option<u64> {
    let n_value = part.trim().parse::<f64>().ok()?;
    if !n_value.is_finite() {
        return None;
    }
    let n_truncated = n_value.trunc();
    if n_truncated < 0.0 || n_truncated >= u64::MAX as f64 {
        return None;
    }
    Some(n_truncated as u64)
}

/// Render elapsed time as zero-padded `HH:MM:SS`; hours are never wrapped.
pub fn format_duration(elapsed: Duration) -> String {
    let n_seconds_total = elapsed.as_secs();
    let n_hours = n_seconds_total / 3600;
    let n_minutes = (n_seconds_total % 3600) / 60;
    let n_seconds = n_seconds_total % 60;
    format!("{n_hours:02}:{n_minutes:02}:{n_seconds:02}")
}
