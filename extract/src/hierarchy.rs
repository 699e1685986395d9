//! Display hierarchy derivation.
//!
//! Sub-section names encode a section and an optional group positionally.
//! Two conventions show up in map files:
//!
//! - path style, `<REGION>_.bss.share` → section `.BSS`, group `SHARE`;
//! - keyword style, `<REGION>_CODE_RELOC` → section `CODE`, group `RELOC`.
//!
//! [`split_sub_section_name`] maps one name to its tokens according to the
//! configured [`SplitRule`]; [`build_hierarchy`] flattens a whole layout into
//! begin / section / group / end rows.

use linkmap_core::{HierarchyRow, HierarchyRules, Region, SplitRule, SubSection};
use tracing::{debug, trace};

/// Section and optional group token derived from one sub-section name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTokens {
    pub section: String,
    pub group: Option<String>,
}

impl SectionTokens {
    fn section_only(section: &str) -> Self {
        Self {
            section: section.to_string(),
            group: None,
        }
    }

    fn with_group(section: String, group: &str) -> Self {
        Self {
            section,
            group: (!group.is_empty()).then(|| group.to_string()),
        }
    }
}

/// Splits `sub_name` into hierarchy tokens relative to `region`.
///
/// Returns `None` for denylisted bookkeeping symbols, which never appear in
/// the hierarchy.
///
/// # Examples
///
/// ```
/// use linkmap_core::HierarchyRules;
/// use linkmap_extract::hierarchy::split_sub_section_name;
///
/// let rules = HierarchyRules::default();
///
/// let tokens = split_sub_section_name("DSPR0", "DSPR0_.BSS.SHARE", &rules).unwrap();
/// assert_eq!(tokens.section, ".BSS");
/// assert_eq!(tokens.group.as_deref(), Some("SHARE"));
///
/// let tokens = split_sub_section_name("DSPR0", "DSPR0_CODE_RELOC", &rules).unwrap();
/// assert_eq!(tokens.section, "CODE");
/// assert_eq!(tokens.group.as_deref(), Some("RELOC"));
///
/// assert!(split_sub_section_name("DSPR0", "DSPR0_COREMA_X", &rules).is_none());
/// ```
pub fn split_sub_section_name(
    region: &str,
    sub_name: &str,
    rules: &HierarchyRules,
) -> Option<SectionTokens> {
    if rules.is_denied(&sub_name.to_ascii_uppercase()) {
        return None;
    }

    let remaining = sub_name
        .strip_prefix(region)
        .and_then(|rest| rest.strip_prefix(rules.word_separator))
        .unwrap_or(sub_name);

    let tokens = match rules.split_rule {
        SplitRule::Flat => SectionTokens::section_only(remaining),
        SplitRule::Full if remaining.starts_with(rules.path_separator) => {
            split_path_style(remaining, rules.path_separator)
        }
        SplitRule::Full | SplitRule::KeywordOnly => split_keyword_style(remaining, rules),
    };
    Some(tokens)
}

fn split_path_style(remaining: &str, separator: char) -> SectionTokens {
    let parts: Vec<&str> = remaining.split(separator).collect();
    let [_, middle @ .., last] = parts.as_slice() else {
        return SectionTokens::section_only(remaining);
    };
    if middle.is_empty() {
        return SectionTokens::section_only(remaining);
    }

    let separator = separator.to_string();
    let joined = middle.join(separator.as_str());
    SectionTokens::with_group(format!("{separator}{joined}"), last)
}

fn split_keyword_style(remaining: &str, rules: &HierarchyRules) -> SectionTokens {
    let separator = rules.word_separator;
    match remaining.rsplit_once(separator) {
        Some((section, last)) if rules.is_group_keyword(last) => {
            SectionTokens::with_group(section.to_string(), last)
        }
        None if rules.is_group_keyword(remaining) => {
            SectionTokens::with_group(String::new(), remaining)
        }
        _ => SectionTokens::section_only(remaining),
    }
}

/// Flattens regions and their sub-sections into hierarchy rows.
///
/// Per region: one begin row (region start), one section row per kept
/// sub-section (its start), an extra group row carrying the size when a
/// group token was derived, and one end row (region end). Sub-sections whose
/// parent is not among `regions` are ignored.
pub fn build_hierarchy(
    regions: &[Region],
    sub_sections: &[SubSection],
    rules: &HierarchyRules,
) -> Vec<HierarchyRow> {
    let mut rows = Vec::new();

    for region in regions {
        let short = region.short_name(rules.word_separator);
        rows.push(HierarchyRow::group_begin(
            format!("{}{short}", rules.begin_label_prefix),
            region.start,
        ));

        for sub in sub_sections.iter().filter(|sub| sub.parent == region.name) {
            let Some(tokens) = split_sub_section_name(&region.name, &sub.name, rules) else {
                trace!(region = %region.name, symbol = %sub.name, "Excluded from hierarchy");
                continue;
            };

            rows.push(HierarchyRow::section(tokens.section.clone(), sub.start));
            if let Some(group) = tokens.group {
                rows.push(HierarchyRow::group(tokens.section, group, sub.size));
            }
        }

        rows.push(HierarchyRow::group_end(
            format!("{}{short}", rules.end_label_prefix),
            region.end,
        ));
    }

    debug!(rows = rows.len(), "Built display hierarchy");
    rows
}

#[cfg(test)]
mod tests {
    use linkmap_core::RowKind;

    use super::*;

    fn tokens(region: &str, name: &str) -> Option<(String, Option<String>)> {
        split_sub_section_name(region, name, &HierarchyRules::default())
            .map(|tokens| (tokens.section, tokens.group))
    }

    fn region(name: &str, start: u64, size: u64) -> Region {
        Region {
            name: name.to_string(),
            start,
            end: u128::from(start) + u128::from(size),
            total_size: size,
            usage: size.into(),
            free_space: 0,
        }
    }

    fn sub(parent: &str, name: &str, start: u64, size: u64) -> SubSection {
        SubSection {
            parent: parent.to_string(),
            name: name.to_string(),
            start,
            end: u128::from(start) + u128::from(size),
            size,
        }
    }

    #[test]
    fn test_path_style_with_three_segments() {
        assert_eq!(
            tokens("DSPR0", "DSPR0_.BSS.SHARE"),
            Some((".BSS".to_string(), Some("SHARE".to_string())))
        );
    }

    #[test]
    fn test_path_style_joins_middle_segments() {
        assert_eq!(
            tokens("DSPR0", "DSPR0_.DATA.CPU0.PRIVATE"),
            Some((".DATA.CPU0".to_string(), Some("PRIVATE".to_string())))
        );
    }

    #[test]
    fn test_path_style_with_two_segments_has_no_group() {
        assert_eq!(tokens("DSPR0", "DSPR0_.BSS"), Some((".BSS".to_string(), None)));
    }

    #[test]
    fn test_path_style_trailing_separator_has_no_group() {
        assert_eq!(tokens("DSPR0", "DSPR0_.BSS."), Some((".BSS".to_string(), None)));
    }

    #[test]
    fn test_keyword_suffix_becomes_group() {
        assert_eq!(
            tokens("PFLASH0", "PFLASH0_APP_CODE_EXPLC"),
            Some(("APP_CODE".to_string(), Some("EXPLC".to_string())))
        );
    }

    #[test]
    fn test_non_keyword_suffix_keeps_whole_remainder() {
        assert_eq!(
            tokens("DSPR0", "DSPR0_STACK_CPU0"),
            Some(("STACK_CPU0".to_string(), None))
        );
    }

    #[test]
    fn test_bare_keyword_has_empty_section() {
        assert_eq!(
            tokens("DSPR0", "DSPR0_RELOC"),
            Some((String::new(), Some("RELOC".to_string())))
        );
    }

    #[test]
    fn test_prefix_without_separator_is_kept() {
        // A colliding symbol from another region keeps its full name.
        assert_eq!(
            tokens("REGION_A", "REGION_AB_DATA"),
            Some(("REGION_AB_DATA".to_string(), None))
        );
    }

    #[test]
    fn test_denylisted_names_are_excluded() {
        assert_eq!(tokens("DSPR0", "DSPR0_COREMA_DATA"), None);
        assert_eq!(tokens("DSPR0", "DSPR0_IOPT_MEMLOC_0"), None);
        assert_eq!(tokens("DSPR0", "DSPR0_BSS_END"), None);
        assert_eq!(tokens("DSPR0", "DSPR0_BSS_SIZE"), None);
        assert_eq!(tokens("DSPR0", "DSPR0_BSS_START"), None);
    }

    #[test]
    fn test_keyword_only_rule_skips_path_split() {
        let rules = HierarchyRules {
            split_rule: SplitRule::KeywordOnly,
            ..HierarchyRules::default()
        };
        let tokens = split_sub_section_name("DSPR0", "DSPR0_.BSS.SHARE", &rules).unwrap();
        assert_eq!(tokens.section, ".BSS.SHARE");
        assert_eq!(tokens.group, None);
    }

    #[test]
    fn test_flat_rule_never_derives_group() {
        let rules = HierarchyRules {
            split_rule: SplitRule::Flat,
            ..HierarchyRules::default()
        };
        let tokens = split_sub_section_name("DSPR0", "DSPR0_CODE_RELOC", &rules).unwrap();
        assert_eq!(tokens.section, "CODE_RELOC");
        assert_eq!(tokens.group, None);
    }

    #[test]
    fn test_build_hierarchy_row_sequence() {
        let regions = vec![region("DATA_DSPR0", 0x7000_0000, 0x100)];
        let subs = vec![
            sub("DATA_DSPR0", "DATA_DSPR0_.BSS.SHARE", 0x7000_0000, 0x40),
            sub("DATA_DSPR0", "DATA_DSPR0_STACK", 0x7000_0040, 0x20),
            sub("DATA_DSPR0", "DATA_DSPR0_COREMA_X", 0x7000_0060, 0x10),
        ];

        let rows = build_hierarchy(&regions, &subs, &HierarchyRules::default());
        let kinds: Vec<RowKind> = rows.iter().map(|row| row.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RowKind::GroupBegin,
                RowKind::Section,
                RowKind::Group,
                RowKind::Section,
                RowKind::GroupEnd,
            ]
        );

        assert_eq!(rows[0].label, "_lc_gb_DSPR0");
        assert_eq!(rows[0].value, 0x7000_0000);
        assert_eq!(rows[1].section, ".BSS");
        assert_eq!(rows[1].value, 0x7000_0000);
        assert_eq!(rows[2].group, "SHARE");
        assert_eq!(rows[2].value, 0x40);
        assert_eq!(rows[3].section, "STACK");
        assert_eq!(rows[4].label, "_lc_ge_DSPR0");
        assert_eq!(rows[4].value, 0x7000_0100);
    }

    #[test]
    fn test_build_hierarchy_row_count_per_region() {
        let regions = vec![region("RAM", 0x1000, 0x100), region("ROM", 0x8000, 0x100)];
        let subs = vec![
            sub("RAM", "RAM_CODE_RELOC", 0x1000, 0x10),
            sub("RAM", "RAM_DATA", 0x1010, 0x10),
            sub("RAM", "RAM_DATA_END", 0x1020, 0),
            sub("ROM", "ROM_.TEXT.BOOT", 0x8000, 0x20),
        ];

        let rows = build_hierarchy(&regions, &subs, &HierarchyRules::default());
        // RAM: begin + end + 2 (grouped) + 1 (plain); ROM: begin + end + 2.
        assert_eq!(rows.len(), 5 + 4);
    }

    #[test]
    fn test_orphan_sub_sections_are_ignored() {
        let regions = vec![region("RAM", 0x1000, 0x100)];
        let subs = vec![sub("FLASH", "FLASH_CODE", 0x8000, 0x10)];

        let rows = build_hierarchy(&regions, &subs, &HierarchyRules::default());
        assert_eq!(rows.len(), 2);
    }
}
