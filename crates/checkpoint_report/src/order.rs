//! Section ordering by group priority, group and name.

use crate::conf::{N_GROUP_PRIORITY_UNKNOWN, TUP_GROUP_PRIORITY};
use crate::spec::SpecAggregatedSection;

/// Sort priority of a group prefix; unknown groups sort last.
pub fn derive_group_priority(group: &str) -> usize {
    let c_group = group.trim().to_uppercase();
    TUP_GROUP_PRIORITY
        .iter()
        .find(|(c_known, _)| *c_known == c_group)
        .map_or(N_GROUP_PRIORITY_UNKNOWN, |(_, n_priority)| *n_priority)
}

/// Stable sort by group priority, then group and name case-insensitively.
pub fn sort_sections(sections: &mut [SpecAggregatedSection]) {
    sections.sort_by_cached_key(|section| {
        (
            derive_group_priority(&section.group),
            section.group.to_lowercase(),
            section.name.to_lowercase(),
        )
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SpecHeaderInfo;
    use pretty_assertions::assert_eq;

    fn derive_section(group: &str, name: &str) -> SpecAggregatedSection {
        SpecAggregatedSection::new(SpecHeaderInfo {
            group: group.to_string(),
            name: name.to_string(),
            declared_total: None,
        })
    }

    #[test]
    fn known_groups_first_then_alphabetical() {
        let mut l_sections = vec![
            derive_section("Кран", "Б"),
            derive_section("ТАН-3", "а"),
            derive_section("ТАН-1", "Ёж"),
            derive_section("ТЭ", "Погрузчик"),
            derive_section("ТАН-2", "Каток"),
            derive_section("ТАН-1", "бульдозер"),
            derive_section("ТАН-1", "Асфальт"),
            derive_section("Автокран", "Я"),
        ];
        sort_sections(&mut l_sections);

        let l_keys: Vec<(&str, &str)> = l_sections
            .iter()
            .map(|s| (s.group.as_str(), s.name.as_str()))
            .collect();
        assert_eq!(
            l_keys,
            vec![
                ("ТЭ", "Погрузчик"),
                ("ТАН-1", "Асфальт"),
                ("ТАН-1", "бульдозер"),
                ("ТАН-1", "Ёж"),
                ("ТАН-2", "Каток"),
                ("ТАН-3", "а"),
                ("Автокран", "Я"),
                ("Кран", "Б"),
            ]
        );
    }

    #[test]
    fn priority_is_case_insensitive() {
        assert_eq!(derive_group_priority("тэ"), 0);
        assert_eq!(derive_group_priority("тан-2"), 2);
        assert_eq!(derive_group_priority("ТАН-4"), N_GROUP_PRIORITY_UNKNOWN);
        assert_eq!(derive_group_priority(""), N_GROUP_PRIORITY_UNKNOWN);
    }

    #[test]
    fn equal_keys_keep_encounter_order() {
        let mut first = derive_section("ТЭ", "Каток");
        first.record_pass(1, std::time::Duration::ZERO);
        let second = derive_section("тэ", "каток");
        let mut l_sections = vec![first.clone(), second.clone()];
        sort_sections(&mut l_sections);
        assert_eq!(l_sections, vec![first, second]);
    }
}
