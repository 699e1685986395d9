//! Extraction configuration.
//!
//! Every naming convention the extractor relies on lives here instead of in
//! inline literals: the start/size suffixes that pair symbols into regions,
//! the reset-safe marker, and the tokenization rules used to derive the
//! display hierarchy. The map-file conventions never converged on a single
//! splitting rule, so the rule itself is selectable via [`SplitRule`].
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! alignment: 64
//! naming:
//!   start_suffix: _START
//!   size_suffix: _SIZE
//!   reset_safe_marker: RST_SAFE
//! hierarchy:
//!   split_rule: full
//!   denied_infixes: [IOPT_MEMLOC, COREMA]
//!   denied_suffixes: [_START, _END, _SIZE]
//!   group_keywords: [EXPLC, RELOC]
//!   path_separator: "."
//!   word_separator: _
//!   begin_label_prefix: _lc_gb_
//!   end_label_prefix: _lc_ge_
//! ```
//!
//! Omitted fields fall back to their defaults.

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::DEFAULT_ALIGNMENT;
use crate::error::{ConfigError, Result};

/// Configuration format version written by [`MapConfig::default`].
pub const CONFIG_VERSION: &str = "1.0";

pub const DEFAULT_START_SUFFIX: &str = "_START";
pub const DEFAULT_SIZE_SUFFIX: &str = "_SIZE";
pub const DEFAULT_RESET_SAFE_MARKER: &str = "RST_SAFE";

/// Infixes marking linker bookkeeping symbols kept out of the hierarchy.
pub const DENIED_INFIXES: &[&str] = &["IOPT_MEMLOC", "COREMA"];
/// Suffixes of redundant boundary symbols kept out of the hierarchy.
pub const DENIED_SUFFIXES: &[&str] = &["_START", "_END", "_SIZE"];
/// Trailing name tokens promoted to the group level of the hierarchy.
pub const GROUP_KEYWORDS: &[&str] = &["EXPLC", "RELOC"];

pub const BEGIN_LABEL_PREFIX: &str = "_lc_gb_";
pub const END_LABEL_PREFIX: &str = "_lc_ge_";

/// Tokenization variant used to split sub-section names into section/group.
///
/// # Examples
///
/// ```
/// use linkmap_core::SplitRule;
///
/// assert_eq!(SplitRule::default(), SplitRule::Full);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SplitRule {
    /// Path-style split for names starting with the path separator, keyword
    /// split otherwise (the default).
    #[default]
    Full,
    /// Keyword split only; path-style names stay whole.
    KeywordOnly,
    /// No group is ever derived; the stripped name is the section.
    Flat,
}

/// Naming conventions that pair symbols into regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingRules {
    pub start_suffix: String,
    pub size_suffix: String,
    pub reset_safe_marker: String,
}

impl Default for NamingRules {
    fn default() -> Self {
        Self {
            start_suffix: DEFAULT_START_SUFFIX.to_string(),
            size_suffix: DEFAULT_SIZE_SUFFIX.to_string(),
            reset_safe_marker: DEFAULT_RESET_SAFE_MARKER.to_string(),
        }
    }
}

/// Rules for decomposing sub-section names into hierarchy tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyRules {
    pub split_rule: SplitRule,
    pub denied_infixes: Vec<String>,
    pub denied_suffixes: Vec<String>,
    pub group_keywords: Vec<String>,
    pub path_separator: char,
    pub word_separator: char,
    pub begin_label_prefix: String,
    pub end_label_prefix: String,
}

impl Default for HierarchyRules {
    fn default() -> Self {
        Self {
            split_rule: SplitRule::default(),
            denied_infixes: to_strings(DENIED_INFIXES),
            denied_suffixes: to_strings(DENIED_SUFFIXES),
            group_keywords: to_strings(GROUP_KEYWORDS),
            path_separator: '.',
            word_separator: '_',
            begin_label_prefix: BEGIN_LABEL_PREFIX.to_string(),
            end_label_prefix: END_LABEL_PREFIX.to_string(),
        }
    }
}

impl HierarchyRules {
    /// Returns `true` when `name` must never appear in the hierarchy.
    ///
    /// # Examples
    ///
    /// ```
    /// use linkmap_core::HierarchyRules;
    ///
    /// let rules = HierarchyRules::default();
    /// assert!(rules.is_denied("DSPR0_COREMA_DATA"));
    /// assert!(rules.is_denied("DSPR0_BSS_END"));
    /// assert!(!rules.is_denied("DSPR0_BSS_RELOC"));
    /// ```
    pub fn is_denied(&self, name: &str) -> bool {
        self.denied_infixes
            .iter()
            .any(|infix| name.contains(infix.as_str()))
            || self
                .denied_suffixes
                .iter()
                .any(|suffix| name.ends_with(suffix.as_str()))
    }

    /// Returns `true` when `token` is a group keyword.
    pub fn is_group_keyword(&self, token: &str) -> bool {
        self.group_keywords.iter().any(|keyword| keyword == token)
    }
}

/// Top-level extraction configuration.
///
/// # Examples
///
/// ```
/// use linkmap_core::MapConfig;
///
/// let config: MapConfig = serde_yaml::from_str("alignment: 256").unwrap();
/// assert_eq!(config.alignment, 0x100);
/// assert_eq!(config.naming.start_suffix, "_START");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Alignment boundary for range checks; zero disables the check.
    pub alignment: u64,
    pub naming: NamingRules,
    pub hierarchy: HierarchyRules,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            alignment: DEFAULT_ALIGNMENT,
            naming: NamingRules::default(),
            hierarchy: HierarchyRules::default(),
        }
    }
}

impl MapConfig {
    /// Loads configuration from a YAML file and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](ConfigError::Io) if the file cannot be read,
    /// [`Yaml`](ConfigError::Yaml) if parsing fails, or
    /// [`Invalid`](ConfigError::Invalid) if [`validate`](Self::validate)
    /// rejects the values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Checks that every naming rule can match case-folded symbol names.
    ///
    /// Symbol names are upper-cased during scanning, so suffixes, markers and
    /// keywords containing lowercase letters could never match.
    pub fn validate(&self) -> Result<()> {
        let naming = [
            ("start_suffix", &self.naming.start_suffix),
            ("size_suffix", &self.naming.size_suffix),
            ("reset_safe_marker", &self.naming.reset_safe_marker),
        ];
        for (field, value) in naming {
            if value.is_empty() {
                return Err(ConfigError::Invalid(format!("{field} cannot be empty")));
            }
            ensure_upper(field, value)?;
        }

        if self.naming.start_suffix == self.naming.size_suffix {
            return Err(ConfigError::Invalid(
                "start_suffix and size_suffix must differ".to_string(),
            ));
        }

        let hierarchy = &self.hierarchy;
        for value in hierarchy
            .denied_infixes
            .iter()
            .chain(&hierarchy.denied_suffixes)
        {
            if value.is_empty() {
                return Err(ConfigError::Invalid(
                    "denylist entries cannot be empty".to_string(),
                ));
            }
            ensure_upper("denylist entry", value)?;
        }
        for keyword in &hierarchy.group_keywords {
            ensure_upper("group keyword", keyword)?;
        }

        if hierarchy.path_separator == hierarchy.word_separator {
            return Err(ConfigError::Invalid(
                "path_separator and word_separator must differ".to_string(),
            ));
        }

        Ok(())
    }
}

fn ensure_upper(field: &str, value: &str) -> Result<()> {
    if value.chars().any(|ch| ch.is_lowercase()) {
        return Err(ConfigError::Invalid(format!(
            "{field} '{value}' must be upper-case to match case-folded symbol names"
        )));
    }
    Ok(())
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
version: "1.0"
alignment: 32
naming:
  start_suffix: _BEGIN
  size_suffix: _LEN
  reset_safe_marker: NOINIT
hierarchy:
  split_rule: keyword_only
  denied_infixes: [COREMA]
  denied_suffixes: [_END]
  group_keywords: [RELOC, CLEAR]
  path_separator: "/"
  word_separator: _
  begin_label_prefix: begin_
  end_label_prefix: end_
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: MapConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.alignment, 32);
        assert_eq!(config.naming.start_suffix, "_BEGIN");
        assert_eq!(config.naming.reset_safe_marker, "NOINIT");
        assert_eq!(config.hierarchy.split_rule, SplitRule::KeywordOnly);
        assert_eq!(config.hierarchy.group_keywords, vec!["RELOC", "CLEAR"]);
        assert_eq!(config.hierarchy.path_separator, '/');
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_empty_document_uses_defaults() {
        let config: MapConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, MapConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_remaining_defaults() {
        let config: MapConfig =
            serde_yaml::from_str("hierarchy:\n  split_rule: flat\n").unwrap();
        assert_eq!(config.hierarchy.split_rule, SplitRule::Flat);
        assert_eq!(config.hierarchy.group_keywords, vec!["EXPLC", "RELOC"]);
    }

    #[test]
    fn test_validate_rejects_lowercase_suffix() {
        let mut config = MapConfig::default();
        config.naming.start_suffix = "_start".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("start_suffix"));
    }

    #[test]
    fn test_validate_rejects_identical_separators() {
        let mut config = MapConfig::default();
        config.hierarchy.path_separator = '_';
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linkmap.yml");

        let saved: MapConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        saved.save(&path).unwrap();

        let loaded = MapConfig::load(&path).unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MapConfig::load(dir.path().join("missing.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
