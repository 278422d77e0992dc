//! Configuration structures for the extraction pipeline.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, InvextError};
use crate::invoice::FieldKind;

/// Main configuration for invext.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvextConfig {
    /// Text recognition configuration.
    pub ocr: OcrConfig,

    /// Invoice extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Text recognition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Language hint passed along with recognized text.
    pub language: String,

    /// File extensions accepted as recognized-text transcripts.
    pub transcript_extensions: Vec<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            transcript_extensions: vec!["txt".to_string()],
        }
    }
}

/// Where the line-item scan starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionMode {
    /// Scan every line.
    Anywhere,
    /// Scan only after the first section marker; no marker means no items.
    AfterMarker,
    /// Scan after the first section marker, or every line if none exists.
    #[default]
    AfterMarkerIfPresent,
}

/// An additional field pattern supplied by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Regular expression, matched case-insensitively.
    pub pattern: String,

    /// Capture group holding the value.
    #[serde(default = "default_group")]
    pub group: usize,
}

fn default_group() -> usize {
    1
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Line-item section gating.
    pub section_mode: SectionMode,

    /// Regular expressions marking the start of the line-item table.
    pub section_markers: Vec<String>,

    /// Extra patterns per field, tried before the built-in ones.
    pub extra_patterns: BTreeMap<FieldKind, Vec<PatternConfig>>,

    /// Emit a warning for every field that was not found.
    pub warn_on_missing: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            section_mode: SectionMode::default(),
            section_markers: vec![
                "DESCRIPTION".to_string(),
                r"RATE\s+HOURS\s+AMOUNT".to_string(),
            ],
            extra_patterns: BTreeMap::new(),
            warn_on_missing: true,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (json, csv, text, html).
    pub default_format: String,

    /// Pretty-print JSON output.
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "json".to_string(),
            pretty_json: false,
        }
    }
}

impl InvextConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, InvextError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(content: &str) -> Result<Self, InvextError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), InvextError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = InvextConfig::from_json(r#"{"extraction": {"section_mode": "anywhere"}}"#)
            .unwrap();

        assert_eq!(config.extraction.section_mode, SectionMode::Anywhere);
        assert_eq!(config.extraction.section_markers.len(), 2);
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.output.default_format, "json");
    }

    #[test]
    fn test_extra_patterns_keyed_by_field() {
        let config = InvextConfig::from_json(
            r#"{"extraction": {"extra_patterns": {"total": [{"pattern": "amount payable\\s+(\\S+)"}]}}}"#,
        )
        .unwrap();

        let patterns = &config.extraction.extra_patterns[&FieldKind::Total];
        assert_eq!(patterns[0].group, 1);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = InvextConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, InvextError::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = InvextConfig::default();
        config.output.pretty_json = true;
        config.save(&path).unwrap();

        let loaded = InvextConfig::from_file(&path).unwrap();
        assert!(loaded.output.pretty_json);
    }
}
