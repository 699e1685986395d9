use serde::{Deserialize, Serialize};

use crate::{HierarchyRow, MapFormat, Region, SubSection};

/// The complete memory model extracted from one map file.
///
/// Holds the flat region and sub-section lists in symbol-table order plus the
/// derived hierarchy rows. Sub-sections refer to their region by name; the
/// reset-safe subset is a filtered view computed on demand.
///
/// # Examples
///
/// ```
/// use linkmap_core::*;
///
/// let mut layout = MemoryLayout::new(MapFormat::Tabular);
/// layout.regions.push(Region {
///     name: "DATA_RST_SAFE".into(),
///     start: 0x7000_0000,
///     end: 0x7000_0100,
///     total_size: 0x100,
///     usage: 0x100,
///     free_space: 0,
/// });
///
/// assert_eq!(layout.region_count(), 1);
/// assert_eq!(layout.reset_safe_regions("RST_SAFE").len(), 1);
/// assert!(layout.region("DATA_RST_SAFE").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryLayout {
    /// Layout contract version (populated from
    /// [`LAYOUT_CONTRACT_VERSION`](crate::LAYOUT_CONTRACT_VERSION)).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    pub format: MapFormat,
    pub regions: Vec<Region>,
    pub sub_sections: Vec<SubSection>,
    pub hierarchy: Vec<HierarchyRow>,
}

impl MemoryLayout {
    pub fn new(format: MapFormat) -> Self {
        Self {
            schema_version: Some(crate::LAYOUT_CONTRACT_VERSION.to_string()),
            format,
            regions: Vec::new(),
            sub_sections: Vec::new(),
            hierarchy: Vec::new(),
        }
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Finds a region by its base name.
    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|region| region.name == name)
    }

    /// Returns the sub-sections attributed to `region`, in attribution order.
    pub fn sub_sections_of<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a SubSection> {
        self.sub_sections.iter().filter(move |sub| sub.parent == region)
    }

    /// Regions whose name contains `marker`, ignoring ASCII case.
    pub fn reset_safe_regions(&self, marker: &str) -> Vec<&Region> {
        let marker = marker.to_ascii_uppercase();
        self.regions
            .iter()
            .filter(|region| contains_marker(&region.name, &marker))
            .collect()
    }

    /// Sub-sections whose own name or parent name contains `marker`, ignoring
    /// ASCII case.
    pub fn reset_safe_sub_sections(&self, marker: &str) -> Vec<&SubSection> {
        let marker = marker.to_ascii_uppercase();
        self.sub_sections
            .iter()
            .filter(|sub| contains_marker(&sub.name, &marker) || contains_marker(&sub.parent, &marker))
            .collect()
    }

    /// Sub-sections whose parent key names no detected region.
    pub fn orphan_sub_sections(&self) -> Vec<&SubSection> {
        self.sub_sections
            .iter()
            .filter(|sub| self.region(&sub.parent).is_none())
            .collect()
    }
}

/// `marker` must already be upper-cased.
fn contains_marker(name: &str, marker: &str) -> bool {
    name.to_ascii_uppercase().contains(marker)
}
