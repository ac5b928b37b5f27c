//! Free-text marker extractors.
//!
//! Row-level extractors look at every cell of a row, independent of the
//! located data columns, and return the first match in cell order.

use std::sync::OnceLock;

use regex::Regex;

use crate::conf::{
    C_MARKER_SECTION_END, C_PATTERN_CHECKPOINT, C_PATTERN_DECLARED_TOTAL, C_PATTERN_GROUP_KNOWN,
    C_PATTERN_PERIOD, C_PATTERN_SECTION_HEADER, N_CHECKPOINTS,
};
use crate::spec::SpecHeaderInfo;

////////////////////////////////////////////////////////////////////////////////
// #region Patterns

fn period_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(C_PATTERN_PERIOD).expect("period pattern"))
}

fn section_header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(C_PATTERN_SECTION_HEADER).expect("section header pattern"))
}

fn checkpoint_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(C_PATTERN_CHECKPOINT).expect("checkpoint pattern"))
}

fn declared_total_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(C_PATTERN_DECLARED_TOTAL).expect("declared total pattern"))
}

fn group_known_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(C_PATTERN_GROUP_KNOWN).expect("group pattern"))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RowExtractors

/// Reporting period date (`DD.MM.YYYY`) from the first cell carrying a period marker.
pub fn extract_period<S: AsRef<str>>(texts: &[S]) -> Option<String> {
    texts.iter().find_map(|c_text| {
        period_regex()
            .captures(c_text.as_ref())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Raw section header text from the first cell carrying a model marker.
///
/// Text after a vehicle-number marker is dropped. A marker followed only by
/// whitespace does not count as a header.
pub fn extract_section_header<S: AsRef<str>>(texts: &[S]) -> Option<String> {
    texts.iter().find_map(|c_text| {
        let caps = section_header_regex().captures(c_text.as_ref())?;
        let c_header = caps.get(1)?.as_str().trim();
        (!c_header.is_empty()).then(|| c_header.to_string())
    })
}

/// Whether any cell carries the end-of-section marker.
pub fn is_section_end<S: AsRef<str>>(texts: &[S]) -> bool {
    texts
        .iter()
        .any(|c_text| c_text.as_ref().contains(C_MARKER_SECTION_END))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellExtractors

/// Number following a checkpoint marker, unvalidated.
///
/// Values too large for `u64` saturate so they still read as out of range.
pub fn extract_checkpoint_number(text: &str) -> Option<u64> {
    let caps = checkpoint_regex().captures(text)?;
    let c_digits = caps.get(1)?.as_str();
    Some(c_digits.parse::<u64>().unwrap_or(u64::MAX))
}

/// Checkpoint index in `1..=8`; anything else is no index.
pub fn extract_checkpoint_index(text: &str) -> Option<usize> {
    let n_number = extract_checkpoint_number(text)?;
    usize::try_from(n_number)
        .ok()
        .filter(|idx| (1..=N_CHECKPOINTS).contains(idx))
}

/// Split a raw header into group, clean name and declared checkpoint total.
pub fn parse_header_info(raw: &str) -> SpecHeaderInfo {
    let mut c_text = raw.trim();

    let mut declared_total = None;
    if let Some(caps) = declared_total_regex().captures(c_text)
        && let (Some(m_all), Some(m_num)) = (caps.get(0), caps.get(1))
        && let Ok(n_total) = m_num.as_str().parse::<u32>()
    {
        declared_total = Some(n_total);
        c_text = c_text[..m_all.start()].trim_end();
    }

    let group = derive_header_group(c_text);
    let name = strip_group_prefix(c_text, &group);

    SpecHeaderInfo {
        group,
        name,
        declared_total,
    }
}

fn derive_header_group(text: &str) -> String {
    if let Some(m) = group_known_regex().captures(text).and_then(|caps| caps.get(1)) {
        return m.as_str().to_string();
    }
    text.split_whitespace()
        .next()
        .map(str::to_string)
        .unwrap_or_default()
}

fn strip_group_prefix(text: &str, group: &str) -> String {
    if group.is_empty() {
        return text.trim().to_string();
    }
    let c_pattern = format!(r"(?i)^\s*{}\s*[-:]?\s*", regex::escape(group));
    match Regex::new(&c_pattern) {
        Ok(re) => re.replace(text, "").trim().to_string(),
        Err(err) => {
            tracing::warn!(group, error = %err, "group prefix pattern rejected; keeping header text");
            text.trim().to_string()
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn header_with_known_group_and_declared_total() {
        let info = parse_header_info("ТАН-1 Экскаватор (6)");
        assert_eq!(
            info,
            SpecHeaderInfo {
                group: "ТАН-1".to_string(),
                name: "Экскаватор".to_string(),
                declared_total: Some(6),
            }
        );
    }

    #[test]
    fn header_row_to_info() {
        let l_row = ["", "Модель: ТАН-1 Экскаватор (6)", ""];
        let c_raw = extract_section_header(&l_row).unwrap();
        assert_eq!(c_raw, "ТАН-1 Экскаватор (6)");
        let info = parse_header_info(&c_raw);
        assert_eq!(info.group, "ТАН-1");
        assert_eq!(info.name, "Экскаватор");
        assert_eq!(info.declared_total, Some(6));
    }

    #[test]
    fn header_drops_vehicle_number_suffix() {
        let l_row = ["модель:  ТЭ: Погрузчик   Номер ТС: А123ВС"];
        assert_eq!(
            extract_section_header(&l_row).as_deref(),
            Some("ТЭ: Погрузчик")
        );
        let info = parse_header_info("ТЭ: Погрузчик");
        assert_eq!(info.group, "ТЭ");
        assert_eq!(info.name, "Погрузчик");
        assert_eq!(info.declared_total, None);
    }

    #[test]
    fn header_group_falls_back_to_first_token() {
        let info = parse_header_info("Самосвал БелАЗ ( 12 )");
        assert_eq!(info.group, "Самосвал");
        assert_eq!(info.name, "БелАЗ");
        assert_eq!(info.declared_total, Some(12));

        let info = parse_header_info("тан-2 - Кран");
        assert_eq!(info.group, "тан-2");
        assert_eq!(info.name, "Кран");
    }

    #[test]
    fn header_known_group_needs_separator() {
        let info = parse_header_info("ТЭК Насос");
        assert_eq!(info.group, "ТЭК");
        assert_eq!(info.name, "Насос");
    }

    #[test]
    fn header_marker_without_text_is_ignored() {
        assert_eq!(extract_section_header(&["Модель:   "]), None);
        assert_eq!(extract_section_header(&["Марка: ТЭ"]), None);
    }

    #[test]
    fn period_first_match_in_row() {
        let l_row = [
            "прочее",
            "Период: с 01.03.2024 по 31.03.2024",
            "период: С 05.04.2024",
        ];
        assert_eq!(extract_period(&l_row).as_deref(), Some("01.03.2024"));
        assert_eq!(extract_period(&["Период: с 1.3.2024"]), None);
    }

    #[test]
    fn checkpoint_index_range() {
        assert_eq!(extract_checkpoint_index("Точка 1"), Some(1));
        assert_eq!(extract_checkpoint_index("проезд ТОЧКА8 (въезд)"), Some(8));
        assert_eq!(extract_checkpoint_index("Точка 0"), None);
        assert_eq!(extract_checkpoint_index("Точка 9"), None);
        assert_eq!(extract_checkpoint_index("Ворота"), None);
        assert_eq!(extract_checkpoint_number("Точка 9"), Some(9));
        assert_eq!(
            extract_checkpoint_number("Точка 99999999999999999999999"),
            Some(u64::MAX)
        );
    }

    #[test]
    fn section_end_marker() {
        assert!(is_section_end(&["", "ИТОГО по ТС: 5"]));
        assert!(!is_section_end(&["итого по тс"]));
        assert!(!is_section_end::<&str>(&[]));
    }
}
