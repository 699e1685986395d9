//! Map-file format detection.

use std::sync::LazyLock;

use linkmap_core::MapFormat;
use regex::Regex;
use tracing::debug;

/// A pipe followed by a hex literal marks a tabular symbol row.
static TABULAR_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|\s*0x[0-9A-Fa-f]+").expect("static regex must compile"));

/// Classifies raw map text.
///
/// The first line holding a pipe-delimited hex literal decides the dialect;
/// text without such a line is [`MapFormat::Unrecognized`].
///
/// # Examples
///
/// ```
/// use linkmap_core::MapFormat;
/// use linkmap_extract::detect_format;
///
/// assert_eq!(detect_format("| RAM_START | 0x1000 |"), MapFormat::Tabular);
/// assert_eq!(detect_format("RAM_START = 0x1000;"), MapFormat::Unrecognized);
/// ```
pub fn detect_format(text: &str) -> MapFormat {
    for (index, line) in text.lines().enumerate() {
        if TABULAR_MARKER.is_match(line) {
            debug!(line = index + 1, "Detected tabular map format");
            return MapFormat::Tabular;
        }
    }
    debug!("No map format marker found");
    MapFormat::Unrecognized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_marker_after_preamble() {
        let text = "\
TASKING VX-toolset for TriCore: object linker
Date: 2024-05-01

| Name            | Address    |
|-----------------|------------|
| DSPR0_START     | 0x70000000 |
";
        assert_eq!(detect_format(text), MapFormat::Tabular);
    }

    #[test]
    fn test_marker_allows_whitespace_after_pipe() {
        assert_eq!(detect_format("|\t  0xABCDEF"), MapFormat::Tabular);
    }

    #[test]
    fn test_pipe_without_hex_is_unrecognized() {
        let text = "| Name | Address |\n|------|---------|\n| foo  | bar     |\n";
        assert_eq!(detect_format(text), MapFormat::Unrecognized);
    }

    #[test]
    fn test_bare_prefix_is_not_a_literal() {
        assert_eq!(detect_format("| 0x |"), MapFormat::Unrecognized);
    }

    #[test]
    fn test_empty_input_is_unrecognized() {
        assert_eq!(detect_format(""), MapFormat::Unrecognized);
    }
}
