//! Presentation tables derived from a [`MemoryLayout`].
//!
//! Every value is rendered as a lowercase `0x` hex string so the tables can be
//! written as JSON, YAML or text without further conversion. Column names are
//! part of the output contract and are fixed through serde renames.

use linkmap_core::{
    HierarchyRow, MemoryLayout, Region, SubSection, format_hex, format_signed_hex,
};
use serde::{Deserialize, Serialize};

/// One row of the region (and reset-safe region) table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRow {
    #[serde(rename = "Section")]
    pub section: String,
    #[serde(rename = "Start_Address")]
    pub start_address: String,
    #[serde(rename = "End_Address")]
    pub end_address: String,
    #[serde(rename = "Total_Size")]
    pub total_size: String,
    #[serde(rename = "Usage")]
    pub usage: String,
    #[serde(rename = "Free_Space")]
    pub free_space: String,
}

impl From<&Region> for RegionRow {
    fn from(region: &Region) -> Self {
        Self {
            section: region.name.clone(),
            start_address: format_hex(region.start.into()),
            end_address: format_hex(region.end),
            total_size: format_hex(region.total_size.into()),
            usage: format_hex(region.usage),
            free_space: format_signed_hex(region.free_space),
        }
    }
}

/// One row of the sub-section table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubSectionRow {
    #[serde(rename = "Parent_Section")]
    pub parent_section: String,
    #[serde(rename = "Sub_Section")]
    pub sub_section: String,
    #[serde(rename = "Start_Address")]
    pub start_address: String,
    #[serde(rename = "End_Address")]
    pub end_address: String,
    #[serde(rename = "Size")]
    pub size: String,
}

impl From<&SubSection> for SubSectionRow {
    fn from(sub: &SubSection) -> Self {
        Self {
            parent_section: sub.parent.clone(),
            sub_section: sub.name.clone(),
            start_address: format_hex(sub.start.into()),
            end_address: format_hex(sub.end),
            size: format_hex(sub.size.into()),
        }
    }
}

/// One row of the display hierarchy table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyTableRow {
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Section")]
    pub section: String,
    #[serde(rename = "Group")]
    pub group: String,
    #[serde(rename = "Address/Size")]
    pub value: String,
    /// Tree depth for indented rendering; not part of the serialized row.
    #[serde(skip)]
    pub depth: usize,
}

impl From<&HierarchyRow> for HierarchyTableRow {
    fn from(row: &HierarchyRow) -> Self {
        Self {
            label: row.label.clone(),
            section: row.section.clone(),
            group: row.group.clone(),
            value: format_hex(row.value),
            depth: row.kind.depth(),
        }
    }
}

impl HierarchyTableRow {
    /// The cell that names this row at its depth: label, group or section.
    pub fn display_name(&self) -> &str {
        if !self.label.is_empty() {
            &self.label
        } else if !self.group.is_empty() {
            &self.group
        } else {
            &self.section
        }
    }
}

/// The five output tables of one extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutTables {
    pub regions: Vec<RegionRow>,
    pub sub_sections: Vec<SubSectionRow>,
    pub reset_safe: Vec<RegionRow>,
    pub reset_safe_sub_sections: Vec<SubSectionRow>,
    pub hierarchy: Vec<HierarchyTableRow>,
}

impl LayoutTables {
    /// Renders `layout`, selecting reset-safe rows by `marker`.
    ///
    /// # Examples
    ///
    /// ```
    /// use linkmap_core::{MapFormat, MemoryLayout, Region};
    /// use linkmap_extract::tables::LayoutTables;
    ///
    /// let mut layout = MemoryLayout::new(MapFormat::Tabular);
    /// layout.regions.push(Region {
    ///     name: "RAM".into(),
    ///     start: 0x1000,
    ///     end: 0x1100,
    ///     total_size: 0x100,
    ///     usage: 0x140,
    ///     free_space: -0x40,
    /// });
    ///
    /// let tables = LayoutTables::from_layout(&layout, "RST_SAFE");
    /// assert_eq!(tables.regions[0].end_address, "0x1100");
    /// assert_eq!(tables.regions[0].free_space, "-0x40");
    /// assert!(tables.reset_safe.is_empty());
    /// ```
    pub fn from_layout(layout: &MemoryLayout, marker: &str) -> Self {
        Self {
            regions: layout.regions.iter().map(RegionRow::from).collect(),
            sub_sections: layout.sub_sections.iter().map(SubSectionRow::from).collect(),
            reset_safe: layout
                .reset_safe_regions(marker)
                .into_iter()
                .map(RegionRow::from)
                .collect(),
            reset_safe_sub_sections: layout
                .reset_safe_sub_sections(marker)
                .into_iter()
                .map(SubSectionRow::from)
                .collect(),
            hierarchy: layout.hierarchy.iter().map(HierarchyTableRow::from).collect(),
        }
    }
}
