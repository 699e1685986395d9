//! Memory model type definitions.
//!
//! This module defines the data model derived from a linker map: regions
//! delimited by `_START`/`_SIZE` symbol pairs, the sub-sections attributed to
//! them, and the flat rows of the display hierarchy. Symbol values are `u64`;
//! ends and sums derived from them are `u128` so `start + size` is exact even
//! at the top of the 64-bit space. Hex rendering happens at the presentation
//! boundary via [`format_hex`] and [`format_signed_hex`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Version of the layout contract (semver).
///
/// Embedded in every [`MemoryLayout`](crate::MemoryLayout) so consumers of
/// serialized output can track compatibility.
pub const LAYOUT_CONTRACT_VERSION: &str = "1.0.0";

/// Map-file dialect reported by format detection.
///
/// # Examples
///
/// ```
/// use linkmap_core::MapFormat;
///
/// assert_eq!(MapFormat::default(), MapFormat::Unrecognized);
/// assert_eq!(MapFormat::Tabular.to_string(), "tabular");
/// assert!(MapFormat::Tabular.is_recognized());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MapFormat {
    /// Pipe-delimited symbol table rows carrying `0x` literals.
    Tabular,
    /// Nothing in the input looked like a known dialect (the default).
    #[default]
    Unrecognized,
}

impl MapFormat {
    /// Returns `true` for every dialect the extractor can process.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized)
    }
}

impl fmt::Display for MapFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tabular => write!(f, "tabular"),
            Self::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

/// Renders a value as a lowercase `0x`-prefixed hex string.
///
/// # Examples
///
/// ```
/// assert_eq!(linkmap_core::format_hex(0x1100), "0x1100");
/// assert_eq!(linkmap_core::format_hex(0), "0x0");
/// assert_eq!(linkmap_core::format_hex(1 << 64), "0x10000000000000000");
/// ```
pub fn format_hex(value: u128) -> String {
    format!("{value:#x}")
}

/// Renders a signed value as hex, with a leading `-` for negative values.
///
/// # Examples
///
/// ```
/// assert_eq!(linkmap_core::format_signed_hex(0xc0), "0xc0");
/// assert_eq!(linkmap_core::format_signed_hex(-0x40), "-0x40");
/// ```
pub fn format_signed_hex(value: i128) -> String {
    if value < 0 {
        format!("-{:#x}", value.unsigned_abs())
    } else {
        format!("{value:#x}")
    }
}

/// Parses a `0x`-prefixed (or bare) hex literal.
///
/// Returns `None` for empty input, non-hex digits, or values wider than
/// 64 bits.
///
/// # Examples
///
/// ```
/// use linkmap_core::parse_hex;
///
/// assert_eq!(parse_hex("0x1000"), Some(0x1000));
/// assert_eq!(parse_hex(" 0X0fff "), Some(0xfff));
/// assert_eq!(parse_hex("40"), Some(0x40));
/// assert_eq!(parse_hex("0x"), None);
/// assert_eq!(parse_hex("zz"), None);
/// ```
pub fn parse_hex(text: &str) -> Option<u64> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

/// A top-level memory region delimited by `<NAME>_START` and `<NAME>_SIZE`.
///
/// `usage` is the sum of attributed sub-section sizes, or the total size when
/// no sub-section was attributed. `free_space` is `total_size - usage` and is
/// negative for over-subscribed regions. `end` and `usage` may exceed
/// `u64::MAX`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Base name with the start suffix stripped (e.g. `DSPR0`).
    pub name: String,
    pub start: u64,
    pub end: u128,
    pub total_size: u64,
    pub usage: u128,
    pub free_space: i128,
}

impl Region {
    /// Returns `true` when attributed sub-sections exceed the region size.
    ///
    /// # Examples
    ///
    /// ```
    /// use linkmap_core::Region;
    ///
    /// let region = Region {
    ///     name: "RAM".into(),
    ///     start: 0x1000,
    ///     end: 0x1100,
    ///     total_size: 0x100,
    ///     usage: 0x140,
    ///     free_space: -0x40,
    /// };
    /// assert!(region.is_over_subscribed());
    /// ```
    pub fn is_over_subscribed(&self) -> bool {
        self.free_space < 0
    }

    /// Returns the last `separator`-delimited token of the name
    /// (`DATA_DSPR0` → `DSPR0`).
    pub fn short_name(&self, separator: char) -> &str {
        self.name.rsplit(separator).next().unwrap_or(&self.name)
    }
}

/// A symbol attributed to a region by name prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubSection {
    /// Lookup key of the owning [`Region`] (its base name).
    pub parent: String,
    pub name: String,
    pub start: u64,
    pub end: u128,
    pub size: u64,
}

/// Position of a [`HierarchyRow`] within the three-level display tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// Opens a region; carries the region start address.
    GroupBegin,
    /// A section token; carries the sub-section start address.
    Section,
    /// A group under a section; carries the sub-section size.
    Group,
    /// Closes a region; carries the region end address.
    GroupEnd,
}

impl RowKind {
    /// Indentation depth used when rendering the hierarchy as a tree.
    pub fn depth(&self) -> usize {
        match self {
            Self::GroupBegin | Self::GroupEnd => 0,
            Self::Section => 1,
            Self::Group => 2,
        }
    }
}

/// One row of the derived region → section → group display table.
///
/// # Examples
///
/// ```
/// use linkmap_core::{HierarchyRow, RowKind};
///
/// let row = HierarchyRow::group(".bss", "share", 0x20);
/// assert_eq!(row.kind, RowKind::Group);
/// assert_eq!(row.section, ".bss");
/// assert_eq!(row.label, "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyRow {
    pub kind: RowKind,
    pub label: String,
    pub section: String,
    pub group: String,
    /// Address for begin/section/end rows, size for group rows.
    pub value: u128,
}

impl HierarchyRow {
    pub fn group_begin(label: impl Into<String>, start: u64) -> Self {
        Self::labelled(RowKind::GroupBegin, label.into(), start.into())
    }

    pub fn group_end(label: impl Into<String>, end: u128) -> Self {
        Self::labelled(RowKind::GroupEnd, label.into(), end)
    }

    pub fn section(section: impl Into<String>, start: u64) -> Self {
        Self {
            kind: RowKind::Section,
            label: String::new(),
            section: section.into(),
            group: String::new(),
            value: start.into(),
        }
    }

    pub fn group(section: impl Into<String>, group: impl Into<String>, size: u64) -> Self {
        Self {
            kind: RowKind::Group,
            label: String::new(),
            section: section.into(),
            group: group.into(),
            value: size.into(),
        }
    }

    fn labelled(kind: RowKind, label: String, value: u128) -> Self {
        Self {
            kind,
            label,
            section: String::new(),
            group: String::new(),
            value,
        }
    }
}
