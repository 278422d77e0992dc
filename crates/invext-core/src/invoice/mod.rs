//! Invoice field extraction module.

mod lines;
mod parser;
pub mod rules;

pub use lines::normalize_lines;
pub use parser::{ExtractionResult, InvoiceParser, PatternInvoiceParser};
pub use rules::fields::{FieldKind, FieldPattern, FieldRules};
pub use rules::items::LineItemExtractor;

use crate::models::invoice::InvoiceRecord;
use crate::ocr::OcrResult;

/// Trait for invoice extractors.
///
/// Extraction is total: unrecognized input yields a record with absent
/// fields rather than an error.
pub trait InvoiceExtractor {
    /// Extract invoice data from an OCR result.
    fn extract(&self, ocr_result: &OcrResult) -> InvoiceRecord;

    /// Extract invoice data from plain text.
    fn extract_from_text(&self, text: &str) -> InvoiceRecord;
}
