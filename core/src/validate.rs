//! Address range validation.
//!
//! Produces pass/fail verdicts for `(start, end)` pairs: missing values,
//! inverted or empty ranges, and starts that break the alignment boundary.
//! [`check_layout`] applies the same checks to every region and sub-section
//! of a [`MemoryLayout`] and adds a placement verdict for sub-sections.
//!
//! # Examples
//!
//! ```
//! use linkmap_core::*;
//!
//! assert_eq!(validate_range(Some("0x1000"), Some("0x2000"), DEFAULT_ALIGNMENT), RangeStatus::Ok);
//! assert_eq!(validate_range(Some("0x1000"), Some("0x0FFF"), DEFAULT_ALIGNMENT), RangeStatus::InvalidRange);
//! assert_eq!(validate_range(None, Some("0x2000"), DEFAULT_ALIGNMENT).to_string(), "NOT FOUND");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{MemoryLayout, Region, SubSection, format_hex, parse_hex};

/// Alignment boundary applied to range starts unless configured otherwise.
pub const DEFAULT_ALIGNMENT: u64 = 0x40;

/// Verdict for one address range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeStatus {
    /// Start or end is missing.
    NotFound,
    /// End does not lie after start.
    InvalidRange,
    /// Start is not a multiple of the alignment boundary.
    Misaligned,
    Ok,
}

impl fmt::Display for RangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT FOUND"),
            Self::InvalidRange => write!(f, "INVALID RANGE"),
            Self::Misaligned => write!(f, "MISALIGNED"),
            Self::Ok => write!(f, "OK"),
        }
    }
}

/// Where a sub-section sits relative to its parent region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStatus {
    Inside,
    /// Starts before the region start or ends after the region end.
    Overflow,
    /// Parent missing, or either side has no size to compare.
    Unknown,
}

impl fmt::Display for PlacementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inside => write!(f, "OK"),
            Self::Overflow => write!(f, "OVERFLOW"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Validates a range given as hex strings.
///
/// A value that is absent or not a hex literal counts as missing.
///
/// # Examples
///
/// ```
/// use linkmap_core::{RangeStatus, validate_range};
///
/// assert_eq!(validate_range(Some("0x1001"), Some("0x2000"), 0x40), RangeStatus::Misaligned);
/// assert_eq!(validate_range(Some("0x1000"), None, 0x40), RangeStatus::NotFound);
/// ```
pub fn validate_range(start: Option<&str>, end: Option<&str>, alignment: u64) -> RangeStatus {
    let parse = |text: &str| parse_hex(text).map(u128::from);
    validate_values(start.and_then(parse), end.and_then(parse), alignment)
}

/// Validates a range given as integers.
///
/// Bounds are `u128` so derived ends past `u64::MAX` compare exactly. An
/// alignment of zero disables the alignment check.
pub fn validate_values(start: Option<u128>, end: Option<u128>, alignment: u64) -> RangeStatus {
    let (Some(start), Some(end)) = (start, end) else {
        return RangeStatus::NotFound;
    };

    if end <= start {
        return RangeStatus::InvalidRange;
    }

    if start.checked_rem(u128::from(alignment)).is_some_and(|rem| rem != 0) {
        return RangeStatus::Misaligned;
    }

    RangeStatus::Ok
}

/// Compares a sub-section against its parent region.
pub fn check_placement(region: Option<&Region>, sub: &SubSection) -> PlacementStatus {
    let Some(region) = region else {
        return PlacementStatus::Unknown;
    };
    if region.total_size == 0 || sub.size == 0 {
        return PlacementStatus::Unknown;
    }
    if sub.start < region.start || sub.end > region.end {
        PlacementStatus::Overflow
    } else {
        PlacementStatus::Inside
    }
}

/// Verdicts for one region or sub-section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeCheck {
    pub name: String,
    /// Parent region for sub-section checks, `None` for regions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub start: String,
    pub end: String,
    pub status: RangeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<PlacementStatus>,
}

impl RangeCheck {
    /// Returns `true` when every verdict on this row passed.
    pub fn passed(&self) -> bool {
        self.status == RangeStatus::Ok
            && !matches!(self.placement, Some(PlacementStatus::Overflow))
    }
}

/// Validates every region, then every sub-section, of `layout`.
pub fn check_layout(layout: &MemoryLayout, alignment: u64) -> Vec<RangeCheck> {
    let regions = layout.regions.iter().map(|region| RangeCheck {
        name: region.name.clone(),
        parent: None,
        start: format_hex(region.start.into()),
        end: format_hex(region.end),
        status: validate_values(Some(region.start.into()), Some(region.end), alignment),
        placement: None,
    });

    let subs = layout.sub_sections.iter().map(|sub| RangeCheck {
        name: sub.name.clone(),
        parent: Some(sub.parent.clone()),
        start: format_hex(sub.start.into()),
        end: format_hex(sub.end),
        status: validate_values(Some(sub.start.into()), Some(sub.end), alignment),
        placement: Some(check_placement(layout.region(&sub.parent), sub)),
    });

    regions.chain(subs).collect()
}

#[cfg(test)]
mod tests {
    use crate::MapFormat;

    use super::*;

    #[test]
    fn test_validate_range_reports_each_status() {
        assert_eq!(
            validate_range(Some("0x1000"), Some("0x0FFF"), DEFAULT_ALIGNMENT),
            RangeStatus::InvalidRange
        );
        assert_eq!(
            validate_range(Some("0x1001"), Some("0x2000"), DEFAULT_ALIGNMENT),
            RangeStatus::Misaligned
        );
        assert_eq!(
            validate_range(None, Some("0x2000"), DEFAULT_ALIGNMENT),
            RangeStatus::NotFound
        );
        assert_eq!(
            validate_range(Some("0x1040"), Some("0x2000"), DEFAULT_ALIGNMENT),
            RangeStatus::Ok
        );
    }

    #[test]
    fn test_validate_range_equal_bounds_is_invalid() {
        assert_eq!(
            validate_range(Some("0x1000"), Some("0x1000"), DEFAULT_ALIGNMENT),
            RangeStatus::InvalidRange
        );
    }

    #[test]
    fn test_validate_range_unparseable_counts_as_missing() {
        assert_eq!(
            validate_range(Some("bogus"), Some("0x2000"), DEFAULT_ALIGNMENT),
            RangeStatus::NotFound
        );
    }

    #[test]
    fn test_zero_alignment_skips_alignment_check() {
        assert_eq!(
            validate_values(Some(0x1001), Some(0x2000), 0),
            RangeStatus::Ok
        );
    }

    #[test]
    fn test_status_display_strings() {
        assert_eq!(RangeStatus::NotFound.to_string(), "NOT FOUND");
        assert_eq!(RangeStatus::InvalidRange.to_string(), "INVALID RANGE");
        assert_eq!(RangeStatus::Misaligned.to_string(), "MISALIGNED");
        assert_eq!(RangeStatus::Ok.to_string(), "OK");
    }

    #[test]
    fn test_check_layout_flags_overflowing_sub_section() {
        let mut layout = MemoryLayout::new(MapFormat::Tabular);
        layout.regions.push(Region {
            name: "RAM".into(),
            start: 0x1000,
            end: 0x1100,
            total_size: 0x100,
            usage: 0x140,
            free_space: -0x40,
        });
        layout.sub_sections.push(SubSection {
            parent: "RAM".into(),
            name: "RAM_HEAP".into(),
            start: 0x1040,
            end: 0x1180,
            size: 0x140,
        });

        let checks = check_layout(&layout, DEFAULT_ALIGNMENT);
        assert_eq!(checks.len(), 2);
        assert!(checks[0].passed());
        assert_eq!(checks[1].status, RangeStatus::Ok);
        assert_eq!(checks[1].placement, Some(PlacementStatus::Overflow));
        assert!(!checks[1].passed());
    }

    #[test]
    fn test_check_placement_without_parent_is_unknown() {
        let sub = SubSection {
            parent: "LMU".into(),
            name: "LMU_VARS".into(),
            start: 0x0,
            end: 0x40,
            size: 0x40,
        };
        assert_eq!(check_placement(None, &sub), PlacementStatus::Unknown);
    }

    #[test]
    fn test_check_layout_at_top_of_address_space() {
        let mut layout = MemoryLayout::new(MapFormat::Tabular);
        layout.regions.push(Region {
            name: "HIGH".into(),
            start: 0xFFFF_FFFF_FFFF_FF00,
            end: 0x1_0000_0000_0000_0000,
            total_size: 0x100,
            usage: 0x100,
            free_space: 0,
        });
        layout.sub_sections.push(SubSection {
            parent: "HIGH".into(),
            name: "HIGH_TAIL".into(),
            start: 0xFFFF_FFFF_FFFF_FFC0,
            end: 0x1_0000_0000_0000_0040,
            size: 0x80,
        });

        let checks = check_layout(&layout, DEFAULT_ALIGNMENT);
        assert_eq!(checks[0].end, "0x10000000000000000");
        assert_eq!(checks[0].status, RangeStatus::Ok);
        assert_eq!(checks[1].status, RangeStatus::Ok);
        assert_eq!(checks[1].placement, Some(PlacementStatus::Overflow));
    }
}
