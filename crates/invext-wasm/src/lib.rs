//! WASM bindings for invoice OCR text extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Recognition runs on the JavaScript side; these bindings take the
//! recognized text (or positioned boxes) and return structured invoices.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use invext_core::invoice::{InvoiceParser, PatternInvoiceParser};
use invext_core::models::invoice::InvoiceRecord;
use invext_core::ocr::{OcrResult, TextBox};
use invext_core::render;
use invext_core::InvextConfig;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Serialize with absent fields as `null` and maps as plain objects.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract invoice data from recognized text.
#[wasm_bindgen]
pub fn extract_invoice_from_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&invext_core::extract_invoice(text))
}

/// Render recognized text next to the extracted invoice as HTML.
#[wasm_bindgen]
pub fn render_side_by_side(text: &str) -> String {
    let invoice = invext_core::extract_invoice(text);
    render::render_side_by_side(text, &invoice)
}

/// Consistency issues in the invoice extracted from `text`.
#[wasm_bindgen]
pub fn validate_invoice(text: &str) -> js_sys::Array {
    invext_core::extract_invoice(text)
        .validate()
        .into_iter()
        .map(|issue| JsValue::from_str(&issue))
        .collect()
}

/// Invoice extractor class for browser use.
#[wasm_bindgen]
pub struct InvoiceExtractor {
    parser: PatternInvoiceParser,
}

#[wasm_bindgen]
impl InvoiceExtractor {
    /// Create an extractor with the built-in rules.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: PatternInvoiceParser::new(),
        }
    }

    /// Create an extractor from a JSON configuration document.
    #[wasm_bindgen]
    pub fn with_config(config_json: &str) -> Result<InvoiceExtractor, JsValue> {
        let config = InvextConfig::from_json(config_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let parser = PatternInvoiceParser::from_config(&config.extraction)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self { parser })
    }

    /// Extract invoice from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.parse(text).invoice)
    }

    /// Get extraction result with metadata.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.parser.parse(text);

        for warning in &result.warnings {
            web_sys::console::debug_1(&JsValue::from_str(warning));
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct ExtractResult {
            invoice: InvoiceRecord,
            raw_text: String,
            missing_fields: Vec<String>,
            warnings: Vec<String>,
            validation_issues: Vec<String>,
            processing_time_ms: u64,
        }

        let output = ExtractResult {
            validation_issues: result.invoice.validate(),
            missing_fields: result
                .missing_fields
                .iter()
                .map(|f| f.key().to_string())
                .collect(),
            invoice: result.invoice,
            raw_text: result.raw_text,
            warnings: result.warnings,
            processing_time_ms: result.processing_time_ms,
        };

        to_js(&output)
    }

    /// Render text and its extracted invoice side by side as HTML.
    #[wasm_bindgen]
    pub fn render(&self, text: &str) -> String {
        let invoice = self.parser.parse(text).invoice;
        render::render_side_by_side(text, &invoice)
    }
}

impl Default for InvoiceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// OCR result from browser-side recognition.
#[wasm_bindgen]
pub struct OcrResultJs {
    boxes: Vec<TextBox>,
    text: String,
    language: String,
}

#[wasm_bindgen]
impl OcrResultJs {
    #[wasm_bindgen(constructor)]
    pub fn new(language: Option<String>) -> Self {
        Self {
            boxes: Vec::new(),
            text: String::new(),
            language: language.unwrap_or_else(|| "eng".to_string()),
        }
    }

    /// Add a recognized box (x1, y1) - (x2, y2).
    #[wasm_bindgen]
    pub fn add_box(&mut self, text: &str, x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32) {
        self.boxes.push(TextBox {
            bbox: [x1, y1, x2, y2],
            text: text.to_string(),
            confidence,
        });
    }

    /// Set the full text, overriding the boxes.
    #[wasm_bindgen]
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    /// Get the full text, assembling boxes in reading order when unset.
    #[wasm_bindgen]
    pub fn get_text(&self) -> String {
        self.to_ocr_result().text
    }

    /// Extract invoice from this OCR result.
    #[wasm_bindgen]
    pub fn extract_invoice(&self) -> Result<JsValue, JsValue> {
        let ocr = self.to_ocr_result();
        if ocr.is_blank() {
            web_sys::console::warn_1(&JsValue::from_str("No text recognized"));
        }
        extract_invoice_from_text(&ocr.text)
    }

    fn to_ocr_result(&self) -> OcrResult {
        if self.text.is_empty() {
            OcrResult::from_boxes(self.boxes.clone(), self.language.as_str(), "browser")
        } else {
            OcrResult::new(self.text.as_str(), self.language.as_str(), "browser")
        }
    }
}

impl Default for OcrResultJs {
    fn default() -> Self {
        Self::new(None)
    }
}
