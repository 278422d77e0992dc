//! Core library for invoice OCR text extraction.
//!
//! This crate provides:
//! - Line normalization of raw OCR output
//! - Configurable field rules (parties, bank details, totals)
//! - Line-item extraction for hourly and flat-amount rows
//! - Invoice record models, a text recognizer boundary, and renderers

pub mod error;
pub mod models;
pub mod ocr;
pub mod invoice;
pub mod render;

pub use error::{ConfigError, InvextError, OcrError, Result};
pub use models::config::InvextConfig;
pub use models::invoice::{BankDetails, InvoiceRecord, LineItem};
pub use ocr::{OcrResult, TextRecognizer, TranscriptRecognizer};
pub use invoice::{
    normalize_lines, ExtractionResult, FieldKind, InvoiceExtractor, InvoiceParser,
    PatternInvoiceParser,
};

/// Extract an invoice record from OCR text using the default rules.
pub fn extract_invoice(text: &str) -> InvoiceRecord {
    PatternInvoiceParser::new().parse(text).invoice
}
