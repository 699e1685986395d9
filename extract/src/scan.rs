//! Single-pass symbol and size table scan.
//!
//! Every line is tested against two independent patterns:
//!
//! - symbol rows: `| NAME | 0xHEX`, collected into the [`SymbolTable`];
//! - size rows: `NAME_SIZE | 0xHEX`, collected into the [`SizeTable`].
//!
//! A line may feed both tables. Lines matching neither are skipped without
//! being counted. Names are upper-cased; a repeated name overwrites the
//! earlier value but keeps its first position.

use std::sync::LazyLock;

use indexmap::IndexMap;
use linkmap_core::NamingRules;
use regex::Regex;
use tracing::{debug, trace};

use crate::error::Result;

/// Symbol name → address, in first-appearance order.
pub type SymbolTable = IndexMap<String, u64>;

/// `<NAME>_SIZE` symbol name → byte count, in first-appearance order.
pub type SizeTable = IndexMap<String, u64>;

static SYMBOL_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\|\s*([A-Za-z0-9_.]+)\s*\|\s*(0x[0-9A-Fa-f]+)").expect("static regex must compile")
});

/// Counters for one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanDiagnostics {
    pub lines_scanned: usize,
    pub symbol_rows: usize,
    pub size_rows: usize,
}

/// Tables produced by [`SymbolScanner::scan`].
#[derive(Debug, Clone, Default)]
pub struct SymbolScan {
    pub symbols: SymbolTable,
    pub sizes: SizeTable,
    pub diagnostics: ScanDiagnostics,
}

impl SymbolScan {
    /// Looks up the size recorded for `name` under the size suffix.
    pub fn size_of(&self, name: &str, size_suffix: &str) -> Option<u64> {
        self.sizes.get(&format!("{name}{size_suffix}")).copied()
    }
}

/// Line scanner built from the configured naming rules.
///
/// # Examples
///
/// ```
/// use linkmap_core::NamingRules;
/// use linkmap_extract::scan::SymbolScanner;
///
/// let scanner = SymbolScanner::new(&NamingRules::default()).unwrap();
/// let scan = scanner.scan("| ram_start | 0x1000 |\n| RAM_SIZE | 0x100 |\n");
///
/// assert_eq!(scan.symbols.get("RAM_START"), Some(&0x1000));
/// assert_eq!(scan.sizes.get("RAM_SIZE"), Some(&0x100));
/// // Size rows are symbol rows too.
/// assert_eq!(scan.symbols.get("RAM_SIZE"), Some(&0x100));
/// ```
#[derive(Debug, Clone)]
pub struct SymbolScanner {
    size_row: Regex,
}

impl SymbolScanner {
    /// Compiles the size-row pattern for the configured size suffix.
    ///
    /// # Errors
    ///
    /// Returns [`Pattern`](crate::ExtractError::Pattern) if the suffix yields
    /// a pattern the regex engine rejects.
    pub fn new(naming: &NamingRules) -> Result<Self> {
        let pattern = format!(
            r"([A-Za-z0-9_.]+{})\s*\|\s*(0x[0-9A-Fa-f]+)",
            regex::escape(&naming.size_suffix)
        );
        Ok(Self {
            size_row: Regex::new(&pattern)?,
        })
    }

    /// Scans `text` once and returns both tables.
    pub fn scan(&self, text: &str) -> SymbolScan {
        let mut scan = SymbolScan::default();

        for line in text.lines() {
            scan.diagnostics.lines_scanned += 1;

            if let Some((name, value)) = capture_entry(&SYMBOL_ROW, line) {
                scan.symbols.insert(name, value);
                scan.diagnostics.symbol_rows += 1;
            }

            if let Some((name, value)) = capture_entry(&self.size_row, line) {
                scan.sizes.insert(name, value);
                scan.diagnostics.size_rows += 1;
            }
        }

        debug!(
            lines = scan.diagnostics.lines_scanned,
            symbols = scan.symbols.len(),
            sizes = scan.sizes.len(),
            "Scanned map symbol table"
        );
        scan
    }
}

fn capture_entry(pattern: &Regex, line: &str) -> Option<(String, u64)> {
    let caps = pattern.captures(line)?;
    let name = caps.get(1)?.as_str();
    let literal = caps.get(2)?.as_str();
    let Ok(value) = u64::from_str_radix(&literal[2..], 16) else {
        trace!(name, literal, "Skipping literal wider than 64 bits");
        return None;
    };
    Some((name.to_ascii_uppercase(), value))
}
