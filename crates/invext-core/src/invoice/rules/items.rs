//! Line-item extraction for hourly and flat-amount rows.

use regex::Regex;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::models::config::{ExtractionConfig, SectionMode};
use crate::models::invoice::LineItem;

use super::patterns::{FLAT_ROW, HOURLY_ROW, SECTION_DESCRIPTION, SECTION_RATE_HOURS_AMOUNT};

/// Scans normalized lines for billed rows.
#[derive(Debug, Clone)]
pub struct LineItemExtractor {
    mode: SectionMode,
    markers: Vec<Regex>,
}

impl LineItemExtractor {
    /// Create an extractor with the default section markers.
    pub fn new() -> Self {
        Self {
            mode: SectionMode::default(),
            markers: vec![SECTION_DESCRIPTION.clone(), SECTION_RATE_HOURS_AMOUNT.clone()],
        }
    }

    /// Create an extractor from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ConfigError> {
        let markers = config
            .section_markers
            .iter()
            .map(|marker| {
                Regex::new(marker).map_err(|source| ConfigError::Marker {
                    marker: marker.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            mode: config.section_mode,
            markers,
        })
    }

    /// Set the section gating mode.
    pub fn with_section_mode(mut self, mode: SectionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Check if a line starts the line-item table.
    pub fn is_marker(&self, line: &str) -> bool {
        self.markers.iter().any(|m| m.is_match(line))
    }

    /// Parse one line as a row. Hourly rows take precedence over flat rows.
    pub fn parse_row(&self, line: &str) -> Option<LineItem> {
        if let Some(caps) = HOURLY_ROW.captures(line) {
            let description = caps[1].trim();
            if has_text(description) {
                return Some(LineItem::hourly(description, &caps[2], &caps[3], &caps[4]));
            }
        }

        if let Some(caps) = FLAT_ROW.captures(line) {
            let description = caps[1].trim();
            if has_text(description) {
                return Some(LineItem::flat(description, &caps[2], &caps[3]));
            }
        }

        None
    }

    /// Extract all rows in source order.
    pub fn extract(&self, lines: &[&str]) -> Vec<LineItem> {
        let first_marker = lines.iter().position(|line| self.is_marker(line));

        let start = match (self.mode, first_marker) {
            (SectionMode::Anywhere, _) => 0,
            (_, Some(i)) => i + 1,
            (SectionMode::AfterMarker, None) => {
                debug!("No line-item section marker found");
                return Vec::new();
            }
            (SectionMode::AfterMarkerIfPresent, None) => 0,
        };

        let items: Vec<LineItem> = lines[start..]
            .iter()
            .filter(|line| !self.is_marker(line))
            .filter_map(|line| {
                let item = self.parse_row(line);
                if item.is_none() {
                    trace!("Skipping line {:?}", line);
                }
                item
            })
            .collect();

        debug!("Extracted {} line items starting at line {}", items.len(), start);

        items
    }
}

impl Default for LineItemExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn has_text(description: &str) -> bool {
    description.chars().any(char::is_alphanumeric)
}
