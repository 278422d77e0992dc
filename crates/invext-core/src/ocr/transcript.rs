//! Recognizer for text that an external OCR engine already produced.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::{OcrResult, TextRecognizer};

/// Reads recognized-text transcripts from disk.
#[derive(Debug, Clone)]
pub struct TranscriptRecognizer {
    language: String,
    extensions: Vec<String>,
}

impl TranscriptRecognizer {
    /// Create a recognizer for `.txt` transcripts in English.
    pub fn new() -> Self {
        Self::from_config(&OcrConfig::default())
    }

    /// Create a recognizer from OCR configuration.
    pub fn from_config(config: &OcrConfig) -> Self {
        Self {
            language: config.language.clone(),
            extensions: config
                .transcript_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// Set the language hint.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// The language hint attached to results.
    pub fn language(&self) -> &str {
        &self.language
    }
}

impl Default for TranscriptRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRecognizer for TranscriptRecognizer {
    fn name(&self) -> &str {
        "transcript"
    }

    fn supports(&self, path: &Path) -> bool {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        self.extensions.iter().any(|e| *e == extension)
    }

    fn recognize(&self, path: &Path) -> Result<OcrResult, OcrError> {
        if path.as_os_str().is_empty() {
            return Err(OcrError::MissingInput);
        }

        if !self.supports(path) {
            return Err(OcrError::Unsupported(path.display().to_string()));
        }

        let start = Instant::now();
        info!("Reading transcript {} ({})", path.display(), self.language);

        let bytes = std::fs::read(path)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| OcrError::Recognition(format!("transcript is not UTF-8: {}", e)))?;

        debug!("Read {} characters from {}", text.len(), path.display());

        Ok(OcrResult::new(text, self.language.as_str(), path.display().to_string())
            .with_processing_time(start.elapsed().as_millis() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_recognize_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.txt");
        fs::write(&path, "Invoice #1024\n").unwrap();

        let result = TranscriptRecognizer::new().recognize(&path).unwrap();
        assert_eq!(result.text, "Invoice #1024\n");
        assert_eq!(result.language, "eng");
        assert!(result.source.ends_with("invoice.txt"));
    }

    #[test]
    fn test_language_hint_carried_to_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rechnung.txt");
        fs::write(&path, "Rechnung #7\n").unwrap();

        let recognizer = TranscriptRecognizer::new().with_language("deu");
        assert_eq!(recognizer.name(), "transcript");

        let result = recognizer.recognize(&path).unwrap();
        assert_eq!(result.language, "deu");
    }

    #[test]
    fn test_missing_input() {
        let err = TranscriptRecognizer::new().recognize(Path::new("")).unwrap_err();
        assert!(matches!(err, OcrError::MissingInput));
    }

    #[test]
    fn test_unsupported_extension() {
        let recognizer = TranscriptRecognizer::new();
        assert!(recognizer.supports(Path::new("scan.TXT")));
        assert!(!recognizer.supports(Path::new("scan.png")));

        let err = recognizer.recognize(Path::new("scan.png")).unwrap_err();
        assert!(matches!(err, OcrError::Unsupported(_)));
    }

    #[test]
    fn test_nonexistent_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TranscriptRecognizer::new()
            .recognize(&dir.path().join("missing.txt"))
            .unwrap_err();
        assert!(matches!(err, OcrError::Io(_)));
    }

    #[test]
    fn test_invalid_utf8_is_recognition_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbled.txt");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = TranscriptRecognizer::new().recognize(&path).unwrap_err();
        assert!(matches!(err, OcrError::Recognition(_)));
    }

    #[test]
    fn test_configured_language() {
        let config = OcrConfig {
            language: "deu".to_string(),
            transcript_extensions: vec![".OCR".to_string()],
        };
        let recognizer = TranscriptRecognizer::from_config(&config);
        assert_eq!(recognizer.language(), "deu");
        assert!(recognizer.supports(Path::new("page.ocr")));
    }
}
