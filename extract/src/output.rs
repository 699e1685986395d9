//! Output formatting for layout tables, reports and range checks.

use linkmap_core::RangeCheck;

use crate::report::{ExtractionReport, ReportBundle};
use crate::tables::{HierarchyTableRow, LayoutTables, RegionRow, SubSectionRow};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

const REGION_COLUMNS: [&str; 6] = [
    "Section",
    "Start_Address",
    "End_Address",
    "Total_Size",
    "Usage",
    "Free_Space",
];
const SUB_SECTION_COLUMNS: [&str; 5] = [
    "Parent_Section",
    "Sub_Section",
    "Start_Address",
    "End_Address",
    "Size",
];
const HIERARCHY_COLUMNS: [&str; 4] = ["Label", "Section", "Group", "Address/Size"];
const CHECK_COLUMNS: [&str; 6] = ["Name", "Parent", "Start", "End", "Status", "Placement"];

/// Formats layout tables in the requested output format.
pub fn format_layout(tables: &LayoutTables, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(tables)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(tables).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(layout_to_markdown(tables)),
        OutputFormat::Table => Ok(layout_to_table(tables)),
    }
}

/// Formats an extraction report in the requested output format.
pub fn format_report(report: &ExtractionReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(report_to_markdown(report)),
        OutputFormat::Table => Ok(report_to_table(report)),
    }
}

/// Formats tables and report together.
///
/// Structured formats serialize the whole envelope; text formats print the
/// tables followed by the report summary.
pub fn format_bundle(bundle: &ReportBundle, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(bundle)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(bundle).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(format!(
            "{}\n{}",
            layout_to_markdown(&bundle.tables),
            report_to_markdown(&bundle.report)
        )),
        OutputFormat::Table => Ok(format!(
            "{}\n{}",
            layout_to_table(&bundle.tables),
            report_to_table(&bundle.report)
        )),
    }
}

/// Formats range-check verdicts in the requested output format.
pub fn format_checks(checks: &[RangeCheck], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(checks)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(checks).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => {
            let mut out = String::from("# Range Checks\n\n");
            out.push_str(&markdown_table(&CHECK_COLUMNS, &check_cells(checks)));
            Ok(out)
        }
        OutputFormat::Table => Ok(text_table(&CHECK_COLUMNS, &check_cells(checks))),
    }
}

fn region_cells(rows: &[RegionRow]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| {
            vec![
                row.section.clone(),
                row.start_address.clone(),
                row.end_address.clone(),
                row.total_size.clone(),
                row.usage.clone(),
                row.free_space.clone(),
            ]
        })
        .collect()
}

fn sub_section_cells(rows: &[SubSectionRow]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| {
            vec![
                row.parent_section.clone(),
                row.sub_section.clone(),
                row.start_address.clone(),
                row.end_address.clone(),
                row.size.clone(),
            ]
        })
        .collect()
}

fn hierarchy_cells(rows: &[HierarchyTableRow]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| {
            vec![
                row.label.clone(),
                row.section.clone(),
                row.group.clone(),
                row.value.clone(),
            ]
        })
        .collect()
}

fn check_cells(checks: &[RangeCheck]) -> Vec<Vec<String>> {
    checks
        .iter()
        .map(|check| {
            vec![
                check.name.clone(),
                check.parent.clone().unwrap_or_default(),
                check.start.clone(),
                check.end.clone(),
                check.status.to_string(),
                check
                    .placement
                    .map(|placement| placement.to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect()
}

fn layout_to_markdown(tables: &LayoutTables) -> String {
    let mut out = String::from("# Memory Layout\n\n");

    let sections: [(&str, &[&str], Vec<Vec<String>>); 5] = [
        ("Regions", &REGION_COLUMNS[..], region_cells(&tables.regions)),
        ("Sub-sections", &SUB_SECTION_COLUMNS[..], sub_section_cells(&tables.sub_sections)),
        ("Reset-safe Regions", &REGION_COLUMNS[..], region_cells(&tables.reset_safe)),
        (
            "Reset-safe Sub-sections",
            &SUB_SECTION_COLUMNS[..],
            sub_section_cells(&tables.reset_safe_sub_sections),
        ),
        ("Hierarchy", &HIERARCHY_COLUMNS[..], hierarchy_cells(&tables.hierarchy)),
    ];

    for (title, columns, cells) in sections {
        out.push_str(&format!("## {title}\n\n"));
        if cells.is_empty() {
            out.push_str("_none_\n\n");
        } else {
            out.push_str(&markdown_table(columns, &cells));
            out.push('\n');
        }
    }

    out
}

fn layout_to_table(tables: &LayoutTables) -> String {
    let mut out = String::new();

    out.push_str("Regions:\n");
    out.push_str(&text_table(&REGION_COLUMNS[..], &region_cells(&tables.regions)));

    if !tables.sub_sections.is_empty() {
        out.push_str("\nSub-sections:\n");
        out.push_str(&text_table(
            &SUB_SECTION_COLUMNS[..],
            &sub_section_cells(&tables.sub_sections),
        ));
    }

    if !tables.reset_safe.is_empty() {
        out.push_str("\nReset-safe:\n");
        out.push_str(&text_table(&REGION_COLUMNS[..], &region_cells(&tables.reset_safe)));
    }

    if !tables.hierarchy.is_empty() {
        out.push_str("\nHierarchy:\n");
        out.push_str(&hierarchy_tree(&tables.hierarchy));
    }

    out
}

/// Indents each row by its depth: region, then section, then group.
fn hierarchy_tree(rows: &[HierarchyTableRow]) -> String {
    let names: Vec<String> = rows
        .iter()
        .map(|row| format!("{}{}", "  ".repeat(row.depth), row.display_name()))
        .collect();
    let width = names.iter().map(String::len).max().unwrap_or(0);

    let mut out = String::new();
    for (name, row) in names.iter().zip(rows) {
        out.push_str(&format!("  {name:<width$}  {}\n", row.value));
    }
    out
}

fn report_to_markdown(report: &ExtractionReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Extraction Report: {}\n\n", report.input));
    out.push_str(&format!("- **Format:** {}\n", report.format));
    out.push_str(&format!("- **Lines Scanned:** {}\n", report.lines_scanned));
    out.push_str(&format!(
        "- **Symbols:** {} ({} rows)\n",
        report.symbols, report.symbol_rows
    ));
    out.push_str(&format!(
        "- **Sizes:** {} ({} rows)\n",
        report.sizes, report.size_rows
    ));
    out.push_str(&format!("- **Regions:** {}\n", report.regions));
    out.push_str(&format!("- **Sub-sections:** {}\n", report.sub_sections));
    out.push_str(&format!(
        "- **Reset-safe:** {} regions, {} sub-sections\n",
        report.reset_safe_regions, report.reset_safe_sub_sections
    ));
    out.push_str(&format!("- **Hierarchy Rows:** {}\n", report.hierarchy_rows));

    if !report.warnings.is_empty() {
        out.push_str("\n## Warnings\n\n");
        for w in &report.warnings {
            out.push_str(&format!("- {w}\n"));
        }
    }

    out
}

fn report_to_table(report: &ExtractionReport) -> String {
    let status = if report.has_warnings() { "WARN" } else { "OK" };
    let mut out = format!(
        "{:<30} {:<6} {:<12} regions={} subs={} rows={}\n",
        report.input,
        status,
        report.format.to_string(),
        report.regions,
        report.sub_sections,
        report.hierarchy_rows,
    );
    for w in &report.warnings {
        out.push_str(&format!("  warning: {w}\n"));
    }
    out
}

fn markdown_table(columns: &[&str], cells: &[Vec<String>]) -> String {
    let mut out = format!("| {} |\n", columns.join(" | "));
    out.push_str(&format!(
        "|{}|\n",
        columns
            .iter()
            .map(|column| "-".repeat(column.len() + 2))
            .collect::<Vec<_>>()
            .join("|")
    ));
    for row in cells {
        out.push_str(&format!("| {} |\n", row.join(" | ")));
    }
    out
}

fn text_table(columns: &[&str], cells: &[Vec<String>]) -> String {
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            cells
                .iter()
                .filter_map(|row| row.get(index).map(String::len))
                .chain(std::iter::once(column.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render = |values: Vec<&str>| {
        let line = values
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        format!("  {}\n", line.trim_end())
    };

    let mut out = render(columns.to_vec());
    for row in cells {
        out.push_str(&render(row.iter().map(String::as_str).collect()));
    }
    out
}

#[cfg(test)]
mod tests {
    use linkmap_core::{
        HierarchyRow, MapFormat, MemoryLayout, NamingRules, Region, SubSection, check_layout,
    };

    use super::*;
    use crate::scan::ScanDiagnostics;

    fn sample_layout() -> MemoryLayout {
        let mut layout = MemoryLayout::new(MapFormat::Tabular);
        layout.regions.push(Region {
            name: "DATA_DSPR0".to_string(),
            start: 0x7000_0000,
            end: 0x7000_0100,
            total_size: 0x100,
            usage: 0x140,
            free_space: -0x40,
        });
        layout.sub_sections.push(SubSection {
            parent: "DATA_DSPR0".to_string(),
            name: "DATA_DSPR0_.BSS.SHARE".to_string(),
            start: 0x7000_0000,
            end: 0x7000_0140,
            size: 0x140,
        });
        layout.hierarchy = vec![
            HierarchyRow::group_begin("_lc_gb_DSPR0", 0x7000_0000),
            HierarchyRow::section(".BSS", 0x7000_0000),
            HierarchyRow::group(".BSS", "SHARE", 0x140),
            HierarchyRow::group_end("_lc_ge_DSPR0", 0x7000_0100),
        ];
        layout
    }

    fn sample_tables() -> LayoutTables {
        LayoutTables::from_layout(&sample_layout(), "RST_SAFE")
    }

    fn sample_report() -> ExtractionReport {
        ExtractionReport::new(
            "tc397.map",
            ScanDiagnostics {
                lines_scanned: 10,
                symbol_rows: 3,
                size_rows: 2,
            },
            3,
            2,
            &sample_layout(),
            &NamingRules::default(),
        )
    }

    #[test]
    fn test_format_layout_json() {
        let json = format_layout(&sample_tables(), OutputFormat::Json).unwrap();
        assert!(json.contains("\"Section\": \"DATA_DSPR0\""));
        assert!(json.contains("\"Free_Space\": \"-0x40\""));
        assert!(json.contains("\"Address/Size\": \"0x140\""));
    }

    #[test]
    fn test_format_layout_yaml() {
        let yaml = format_layout(&sample_tables(), OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("Section: DATA_DSPR0"));
        assert!(yaml.contains("Sub_Section: DATA_DSPR0_.BSS.SHARE"));
    }

    #[test]
    fn test_format_layout_markdown() {
        let md = format_layout(&sample_tables(), OutputFormat::Markdown).unwrap();
        assert!(md.contains("# Memory Layout"));
        assert!(md.contains("| Section | Start_Address | End_Address |"));
        assert!(md.contains("| DATA_DSPR0 | 0x70000000 | 0x70000100 |"));
        assert!(md.contains("## Reset-safe Regions\n\n_none_"));
    }

    #[test]
    fn test_format_layout_table_indents_hierarchy() {
        let table = format_layout(&sample_tables(), OutputFormat::Table).unwrap();
        assert!(table.contains("Regions:"));
        assert!(table.contains("Hierarchy:"));
        assert!(table.contains("\n  _lc_gb_DSPR0"));
        assert!(table.contains("\n    .BSS"));
        assert!(table.contains("\n      SHARE"));
        assert!(!table.contains("Reset-safe:"));
    }

    #[test]
    fn test_format_report_markdown_lists_warnings() {
        let md = format_report(&sample_report(), OutputFormat::Markdown).unwrap();
        assert!(md.contains("# Extraction Report: tc397.map"));
        assert!(md.contains("**Format:** tabular"));
        assert!(md.contains("## Warnings"));
        assert!(md.contains("over-subscribed"));
    }

    #[test]
    fn test_format_report_table_status() {
        let table = format_report(&sample_report(), OutputFormat::Table).unwrap();
        assert!(table.contains("tc397.map"));
        assert!(table.contains("WARN"));
        assert!(table.contains("regions=1"));
    }

    #[test]
    fn test_format_bundle_json_nests_tables_and_report() {
        let bundle = ReportBundle::new(sample_tables(), sample_report(), "2024-05-01T00:00:00Z");
        let json = format_bundle(&bundle, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["tables"]["regions"][0]["Section"], "DATA_DSPR0");
        assert_eq!(value["report"]["input"], "tc397.map");
    }

    #[test]
    fn test_format_checks_table() {
        let checks = check_layout(&sample_layout(), 0x40);
        let table = format_checks(&checks, OutputFormat::Table).unwrap();
        assert!(table.contains("Status"));
        assert!(table.contains("DATA_DSPR0_.BSS.SHARE"));
        assert!(table.contains("OVERFLOW"));
    }

    #[test]
    fn test_format_checks_json() {
        let checks = check_layout(&sample_layout(), 0x40);
        let json = format_checks(&checks, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[1]["parent"], "DATA_DSPR0");
    }
}
