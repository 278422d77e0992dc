//! Boundary to the external text recognizer.
//!
//! Recognition itself happens outside this crate. A [`TextRecognizer`]
//! hands over the recognized text together with its language hint; the
//! extraction pipeline only runs once recognition has succeeded.

mod transcript;

pub use transcript::TranscriptRecognizer;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// A recognized word or line with its axis-aligned bounding box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box (x1, y1, x2, y2).
    pub bbox: [f32; 4],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Vertical center of the box.
    pub fn center_y(&self) -> f32 {
        (self.bbox[1] + self.bbox[3]) / 2.0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        (self.bbox[3] - self.bbox[1]).abs()
    }
}

/// Result of text recognition on one input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    /// Full recognized text, one visual line per text line.
    pub text: String,

    /// Language hint the recognizer ran with (e.g. "eng").
    pub language: String,

    /// Where the text came from (file path, "stdin", ...).
    pub source: String,

    /// Recognition time in milliseconds.
    pub processing_time_ms: u64,
}

impl OcrResult {
    /// Create a result from already recognized text.
    pub fn new(
        text: impl Into<String>,
        language: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
            source: source.into(),
            processing_time_ms: 0,
        }
    }

    /// Build a result from positioned boxes, in reading order.
    ///
    /// Boxes whose vertical centers lie within half a box height of the
    /// current row are joined with spaces, left to right.
    pub fn from_boxes(
        mut boxes: Vec<TextBox>,
        language: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        boxes.sort_by(|a, b| {
            a.center_y()
                .partial_cmp(&b.center_y())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut rows: Vec<Vec<TextBox>> = Vec::new();
        let mut row_y = f32::NEG_INFINITY;

        for text_box in boxes {
            let tolerance = (text_box.height() / 2.0).max(1.0);
            match rows.last_mut() {
                Some(row) if (text_box.center_y() - row_y).abs() <= tolerance => {
                    row.push(text_box);
                }
                _ => {
                    row_y = text_box.center_y();
                    rows.push(vec![text_box]);
                }
            }
        }

        let text = rows
            .into_iter()
            .map(|mut row| {
                row.sort_by(|a, b| {
                    a.bbox[0]
                        .partial_cmp(&b.bbox[0])
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                row.iter()
                    .map(|b| b.text.trim())
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n");

        Self::new(text, language, source)
    }

    /// Set the recognition time.
    pub fn with_processing_time(mut self, ms: u64) -> Self {
        self.processing_time_ms = ms;
        self
    }

    /// Check if no text was recognized.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A source of recognized text.
pub trait TextRecognizer {
    /// Recognizer name, for logs and reports.
    fn name(&self) -> &str;

    /// Check if this recognizer can handle the input.
    fn supports(&self, path: &Path) -> bool;

    /// Recognize text from the input.
    fn recognize(&self, path: &Path) -> Result<OcrResult, OcrError>;
}
