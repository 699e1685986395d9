//! Structured extraction reporting.

use linkmap_core::{LAYOUT_CONTRACT_VERSION, MapFormat, MemoryLayout, NamingRules, format_signed_hex};
use serde::{Deserialize, Serialize};

use crate::scan::ScanDiagnostics;
use crate::tables::LayoutTables;

/// Per-input extraction summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Path or label of the map that was processed.
    pub input: String,
    pub format: MapFormat,
    pub lines_scanned: usize,
    pub symbol_rows: usize,
    pub size_rows: usize,
    /// Distinct symbol names after case folding.
    pub symbols: usize,
    /// Distinct size symbol names after case folding.
    pub sizes: usize,
    pub regions: usize,
    pub sub_sections: usize,
    pub reset_safe_regions: usize,
    pub reset_safe_sub_sections: usize,
    pub hierarchy_rows: usize,
    pub orphan_sub_sections: usize,
    pub warnings: Vec<String>,
}

impl ExtractionReport {
    /// Summarizes one extraction.
    pub fn new(
        input: impl Into<String>,
        diagnostics: ScanDiagnostics,
        symbols: usize,
        sizes: usize,
        layout: &MemoryLayout,
        naming: &NamingRules,
    ) -> Self {
        let marker = naming.reset_safe_marker.as_str();
        Self {
            input: input.into(),
            format: layout.format,
            lines_scanned: diagnostics.lines_scanned,
            symbol_rows: diagnostics.symbol_rows,
            size_rows: diagnostics.size_rows,
            symbols,
            sizes,
            regions: layout.region_count(),
            sub_sections: layout.sub_sections.len(),
            reset_safe_regions: layout.reset_safe_regions(marker).len(),
            reset_safe_sub_sections: layout.reset_safe_sub_sections(marker).len(),
            hierarchy_rows: layout.hierarchy.len(),
            orphan_sub_sections: layout.orphan_sub_sections().len(),
            warnings: collect_warnings(layout, naming),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

fn collect_warnings(layout: &MemoryLayout, naming: &NamingRules) -> Vec<String> {
    let mut warnings = Vec::new();

    if layout.regions.is_empty() {
        warnings.push(format!(
            "no regions found: no symbol ends with '{}'",
            naming.start_suffix
        ));
    }

    for region in layout.regions.iter().filter(|region| region.is_over_subscribed()) {
        warnings.push(format!(
            "region {} is over-subscribed: free space {}",
            region.name,
            format_signed_hex(region.free_space)
        ));
    }

    warnings
}

/// Layout plus report, as returned by
/// [`extract_layout_with_report`](crate::extract_layout_with_report).
#[derive(Debug, Clone)]
pub struct ExtractionRun {
    pub layout: MemoryLayout,
    pub report: ExtractionReport,
}

/// Output envelope written when tables and report are requested together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportBundle {
    pub schema_version: String,
    /// RFC 3339 timestamp supplied by the caller.
    pub generated_at: String,
    /// Version of the extractor that produced the bundle.
    pub version: String,
    pub tables: LayoutTables,
    pub report: ExtractionReport,
}

impl ReportBundle {
    pub fn new(
        tables: LayoutTables,
        report: ExtractionReport,
        generated_at: impl Into<String>,
    ) -> Self {
        Self {
            schema_version: LAYOUT_CONTRACT_VERSION.to_string(),
            generated_at: generated_at.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            tables,
            report,
        }
    }
}
