//! Error types for the invext-core library.
//!
//! Extraction itself never fails: missing fields and unreadable rows degrade
//! to absent values. Errors only come from the collaborators around it
//! (recognition, configuration, I/O).

use thiserror::Error;

/// Main error type for the invext library.
#[derive(Error, Debug)]
pub enum InvextError {
    /// Text recognition error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a text recognizer before extraction runs.
#[derive(Error, Debug)]
pub enum OcrError {
    /// No input was provided to recognize.
    #[error("no input selected")]
    MissingInput,

    /// The input kind is not supported by the recognizer.
    #[error("unsupported input: {0}")]
    Unsupported(String),

    /// The recognizer failed to produce text.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Reading the input failed.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors in extraction configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configured pattern is not a valid regular expression.
    #[error("invalid pattern for {field}: {source}")]
    Pattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    /// A configured capture group does not exist in its pattern.
    #[error("pattern for {field} has no capture group {group}")]
    CaptureGroup { field: String, group: usize },

    /// A configured section marker is not a valid regular expression.
    #[error("invalid section marker {marker:?}: {source}")]
    Marker {
        marker: String,
        #[source]
        source: regex::Error,
    },

    /// The configuration file could not be parsed.
    #[error("invalid configuration file: {0}")]
    Parse(String),
}

/// Result type for the invext library.
pub type Result<T> = std::result::Result<T, InvextError>;
