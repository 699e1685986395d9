//! Region and sub-section correlation.
//!
//! Every symbol ending in the start suffix opens a region named by the
//! stripped base. Every other symbol whose name begins with that base is
//! attributed to it as a sub-section. Attribution is a plain prefix test on
//! the normalized name, so a base such as `RAM` also attracts `RAMX_DATA`;
//! that ambiguity is inherent in the naming convention and is left as is.

use linkmap_core::{NamingRules, Region, SubSection};
use tracing::debug;

use crate::scan::SymbolScan;

/// Regions and their attributed sub-sections, in symbol-table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionSet {
    pub regions: Vec<Region>,
    /// Grouped by parent: all sub-sections of the first region come first.
    pub sub_sections: Vec<SubSection>,
}

/// Derives regions and sub-sections from scanned tables.
///
/// Missing sizes default to zero. A region without attributed sub-sections
/// counts as fully used. Ends and usage are computed in `u128`, so a range
/// reaching past `u64::MAX` keeps its exact end.
///
/// # Examples
///
/// ```
/// use linkmap_core::NamingRules;
/// use linkmap_extract::regions::build_regions;
/// use linkmap_extract::scan::SymbolScanner;
///
/// let naming = NamingRules::default();
/// let scan = SymbolScanner::new(&naming).unwrap().scan(
///     "| REGION_A_START | 0x1000 |\n| REGION_A_SIZE | 0x100 |\n",
/// );
/// let set = build_regions(&scan, &naming);
///
/// let region = &set.regions[0];
/// assert_eq!(region.name, "REGION_A");
/// assert_eq!(region.end, 0x1100);
/// assert_eq!(region.usage, 0x100);
/// assert_eq!(region.free_space, 0);
/// ```
pub fn build_regions(scan: &SymbolScan, naming: &NamingRules) -> RegionSet {
    let mut set = RegionSet::default();

    for (name, &start) in &scan.symbols {
        let Some(base) = name.strip_suffix(naming.start_suffix.as_str()) else {
            continue;
        };
        if base.is_empty() {
            debug!(symbol = %name, "Skipping start symbol without a base name");
            continue;
        }

        let total_size = scan.size_of(base, &naming.size_suffix).unwrap_or(0);
        let attributed = attribute_sub_sections(scan, base, naming);
        let usage = if attributed.is_empty() {
            u128::from(total_size)
        } else {
            attributed.iter().map(|sub| u128::from(sub.size)).sum()
        };

        set.regions.push(Region {
            name: base.to_string(),
            start,
            end: exact_end(start, total_size),
            total_size,
            usage,
            free_space: free_space(total_size, usage),
        });
        set.sub_sections.extend(attributed);
    }

    debug!(
        regions = set.regions.len(),
        sub_sections = set.sub_sections.len(),
        "Correlated map regions"
    );
    set
}

fn exact_end(start: u64, size: u64) -> u128 {
    u128::from(start) + u128::from(size)
}

// Usage beyond i128::MAX saturates.
fn free_space(total_size: u64, usage: u128) -> i128 {
    i128::from(total_size).saturating_sub(i128::try_from(usage).unwrap_or(i128::MAX))
}

fn attribute_sub_sections(scan: &SymbolScan, base: &str, naming: &NamingRules) -> Vec<SubSection> {
    scan.symbols
        .iter()
        .filter(|(name, _)| {
            name.starts_with(base)
                && !name.ends_with(naming.start_suffix.as_str())
                && !name.ends_with(naming.size_suffix.as_str())
        })
        .map(|(name, &start)| {
            let size = scan.size_of(name, &naming.size_suffix).unwrap_or(0);
            SubSection {
                parent: base.to_string(),
                name: name.clone(),
                start,
                end: exact_end(start, size),
                size,
            }
        })
        .collect()
}
