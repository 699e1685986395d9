//! Core memory-layout types shared by the extractor and its consumers.
//!
//! This crate defines the model derived from a linker map file:
//!
//! - [`Region`]: a named memory area delimited by `_START`/`_SIZE` symbols,
//!   with computed end address, usage and free space.
//! - [`SubSection`]: a symbol attributed to a region by name prefix.
//! - [`HierarchyRow`]: one row of the derived region → section → group view.
//! - [`MemoryLayout`]: the bundle of all three, plus the reset-safe view.
//!
//! Range validation ([`validate_range`], [`check_layout`]) produces
//! `NOT FOUND` / `INVALID RANGE` / `MISALIGNED` / `OK` verdicts. The naming
//! conventions and tokenization rules live in [`MapConfig`].
//!
//! # Example
//!
//! ```
//! use linkmap_core::*;
//!
//! let mut layout = MemoryLayout::new(MapFormat::Tabular);
//! layout.regions.push(Region {
//!     name: "REGION_A".into(),
//!     start: 0x1000,
//!     end: 0x1100,
//!     total_size: 0x100,
//!     usage: 0x40,
//!     free_space: 0xc0,
//! });
//!
//! let checks = check_layout(&layout, DEFAULT_ALIGNMENT);
//! assert_eq!(checks[0].status, RangeStatus::Ok);
//! assert_eq!(format_signed_hex(layout.regions[0].free_space), "0xc0");
//! ```

mod config;
mod error;
mod layout;
mod types;
mod validate;

pub use config::*;
pub use error::ConfigError;
pub use layout::MemoryLayout;
pub use types::*;
pub use validate::{
    DEFAULT_ALIGNMENT, PlacementStatus, RangeCheck, RangeStatus, check_layout, check_placement,
    validate_range, validate_values,
};
