//! Linker map file parsing and memory layout extraction.
//!
//! This crate turns the tabular symbol listing of an embedded linker map into
//! a [`MemoryLayout`]: regions delimited by `_START`/`_SIZE` symbol pairs, the
//! sub-sections attributed to them by name prefix, and a flat
//! region → section → group display hierarchy.
//!
//! # Main entry points
//!
//! - [`detect_format`]: classify raw map text.
//! - [`extract_layout`]: detect, scan and build the layout in one call.
//! - [`extract_layout_with_report`]: same, plus an [`ExtractionReport`]
//!   with scan counters and warnings.
//! - [`read_map_file`]: read a map file from disk, tolerating bad bytes.
//! - [`load_config`]: read a YAML configuration, or fall back to defaults.
//!
//! # Example
//!
//! ```
//! use linkmap_core::MapConfig;
//! use linkmap_extract::extract_layout;
//!
//! let map = "\
//! | Name                  | Address    |
//! | DSPR0_START           | 0x70000000 |
//! | DSPR0_SIZE            | 0x100      |
//! | DSPR0_.bss.share      | 0x70000000 |
//! | DSPR0_.bss.share_SIZE | 0x40       |
//! ";
//!
//! let layout = extract_layout(map, &MapConfig::default()).unwrap();
//! assert_eq!(layout.regions[0].name, "DSPR0");
//! assert_eq!(layout.regions[0].free_space, 0xC0);
//! assert_eq!(layout.sub_sections[0].name, "DSPR0_.BSS.SHARE");
//! assert_eq!(layout.hierarchy.len(), 4);
//! ```
//!
//! [`MemoryLayout`]: linkmap_core::MemoryLayout
//! [`ExtractionReport`]: report::ExtractionReport

pub mod detect;
pub mod error;
pub mod hierarchy;
pub mod input;
pub mod output;
pub mod regions;
pub mod report;
pub mod scan;
pub mod tables;

use std::path::Path;

use linkmap_core::{MapConfig, MemoryLayout};
use tracing::info;

pub use detect::detect_format;
pub use error::ExtractError;
use error::Result;
pub use input::read_map_file;
use report::{ExtractionReport, ExtractionRun};
use scan::SymbolScanner;

/// Extracts the memory layout from map text.
///
/// # Errors
///
/// Returns [`ExtractError::UnrecognizedFormat`] when no line looks like a
/// tabular symbol row, or [`ExtractError::Pattern`] when the configured size
/// suffix cannot be compiled into a scan pattern.
pub fn extract_layout(text: &str, config: &MapConfig) -> Result<MemoryLayout> {
    extract_layout_with_report(text, "<memory>", config).map(|run| run.layout)
}

/// Extracts the memory layout and an [`ExtractionReport`] describing the run.
///
/// `input` labels the report and error messages (usually the file path).
///
/// # Examples
///
/// ```
/// use linkmap_core::MapConfig;
/// use linkmap_extract::extract_layout_with_report;
///
/// let map = "| RAM_START | 0x1000 |\n| RAM_SIZE | 0x100 |\n";
/// let run = extract_layout_with_report(map, "ram.map", &MapConfig::default()).unwrap();
///
/// assert_eq!(run.report.input, "ram.map");
/// assert_eq!(run.report.regions, 1);
/// assert!(run.report.warnings.is_empty());
/// ```
pub fn extract_layout_with_report(
    text: &str,
    input: &str,
    config: &MapConfig,
) -> Result<ExtractionRun> {
    let format = detect_format(text);
    if !format.is_recognized() {
        return Err(ExtractError::UnrecognizedFormat {
            input: input.to_string(),
        });
    }

    let scanner = SymbolScanner::new(&config.naming)?;
    let scan = scanner.scan(text);
    let set = regions::build_regions(&scan, &config.naming);

    let mut layout = MemoryLayout::new(format);
    layout.hierarchy = hierarchy::build_hierarchy(&set.regions, &set.sub_sections, &config.hierarchy);
    layout.regions = set.regions;
    layout.sub_sections = set.sub_sections;

    let report = ExtractionReport::new(
        input,
        scan.diagnostics,
        scan.symbols.len(),
        scan.sizes.len(),
        &layout,
        &config.naming,
    );

    info!(
        input,
        regions = report.regions,
        sub_sections = report.sub_sections,
        hierarchy_rows = report.hierarchy_rows,
        warnings = report.warnings.len(),
        "Extracted memory layout"
    );

    Ok(ExtractionRun { layout, report })
}

/// Reads `path` and extracts its layout with a report labelled by the path.
///
/// # Errors
///
/// Returns [`ExtractError::Io`] if the file cannot be read, otherwise the
/// errors of [`extract_layout_with_report`].
pub fn extract_layout_from_path(path: impl AsRef<Path>, config: &MapConfig) -> Result<ExtractionRun> {
    let path = path.as_ref();
    let text = read_map_file(path)?;
    extract_layout_with_report(&text, &path.display().to_string(), config)
}

/// Loads the YAML configuration at `path`, or the defaults when `path` is
/// `None`.
///
/// # Errors
///
/// Returns [`ExtractError::Config`] when the file cannot be read, parsed or
/// validated.
pub fn load_config(path: Option<&Path>) -> Result<MapConfig> {
    let Some(path) = path else {
        return Ok(MapConfig::default());
    };
    let config = MapConfig::load(path)?;
    info!(path = %path.display(), "Loaded configuration");
    Ok(config)
}
