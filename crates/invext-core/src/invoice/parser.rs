//! Pattern-driven invoice parser: assembles field rules and line items
//! into an invoice record.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::models::config::ExtractionConfig;
use crate::models::invoice::{BankDetails, InvoiceRecord};
use crate::ocr::OcrResult;

use super::lines::normalize_lines;
use super::rules::{FieldKind, FieldRules, LineItemExtractor};
use super::InvoiceExtractor;

/// Result of invoice extraction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Extracted invoice data.
    pub invoice: InvoiceRecord,
    /// Raw recognized text.
    pub raw_text: String,
    /// Fields that were not found.
    pub missing_fields: Vec<FieldKind>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for invoice parsing.
pub trait InvoiceParser {
    /// Parse an invoice from text. Never fails; unmatched fields are absent.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Invoice parser driven by per-field candidate patterns.
#[derive(Debug, Clone)]
pub struct PatternInvoiceParser {
    /// Field candidate patterns.
    rules: FieldRules,
    /// Line-item scanner.
    line_items: LineItemExtractor,
    /// Whether to warn about every missing field.
    warn_on_missing: bool,
}

impl PatternInvoiceParser {
    /// Create a parser with the built-in rules.
    pub fn new() -> Self {
        Self {
            rules: FieldRules::builtin(),
            line_items: LineItemExtractor::new(),
            warn_on_missing: true,
        }
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            rules: FieldRules::from_config(config)?,
            line_items: LineItemExtractor::from_config(config)?,
            warn_on_missing: config.warn_on_missing,
        })
    }

    /// Replace the field rules.
    pub fn with_rules(mut self, rules: FieldRules) -> Self {
        self.rules = rules;
        self
    }

    /// Replace the line-item extractor.
    pub fn with_line_items(mut self, line_items: LineItemExtractor) -> Self {
        self.line_items = line_items;
        self
    }

    /// Set whether missing fields produce warnings.
    pub fn with_missing_warnings(mut self, warn: bool) -> Self {
        self.warn_on_missing = warn;
        self
    }

    /// The field rules in use.
    pub fn rules(&self) -> &FieldRules {
        &self.rules
    }

    /// Build a record from normalized lines.
    pub fn assemble(&self, lines: &[&str]) -> InvoiceRecord {
        let field = |kind: FieldKind| self.rules.extract(kind, lines).map(|m| m.value);

        let bank_details = BankDetails {
            bank: field(FieldKind::BankName),
            account_name: field(FieldKind::AccountName),
            account_number: field(FieldKind::AccountNumber),
            bsb: field(FieldKind::Bsb),
        };

        InvoiceRecord {
            invoice_number: field(FieldKind::InvoiceNumber),
            billed_to: field(FieldKind::BilledTo),
            pay_to: field(FieldKind::PayTo),
            bank_details: bank_details.into_option(),
            line_items: self.line_items.extract(lines),
            subtotal: field(FieldKind::Subtotal),
            discount: field(FieldKind::Discount),
            total: field(FieldKind::Total),
        }
    }

    fn duplicate_warnings(&self, lines: &[&str]) -> Vec<String> {
        let mut warnings = Vec::new();

        for field in FieldKind::ALL {
            let matches = self.rules.extract_all(field, lines);
            let Some(first) = matches.first() else {
                continue;
            };

            let others: Vec<&str> = matches[1..]
                .iter()
                .filter(|m| m.value != first.value)
                .map(|m| m.value.as_str())
                .collect();

            if !others.is_empty() {
                warnings.push(format!(
                    "{} has conflicting values; using '{}' from line {}, ignoring {:?}",
                    field.label(),
                    first.value,
                    first.line + 1,
                    others
                ));
            }
        }

        warnings
    }
}

// wasm32-unknown-unknown has no monotonic clock; report zero there.
#[cfg(not(target_arch = "wasm32"))]
fn start_timer() -> Option<Instant> {
    Some(Instant::now())
}

#[cfg(target_arch = "wasm32")]
fn start_timer() -> Option<Instant> {
    None
}

impl Default for PatternInvoiceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for PatternInvoiceParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = start_timer();

        info!("Parsing invoice from {} characters of text", text.len());

        let lines = normalize_lines(text);
        debug!("Normalized {} lines", lines.len());

        let invoice = self.assemble(&lines);

        let missing_fields: Vec<FieldKind> = FieldKind::ALL
            .into_iter()
            .filter(|&kind| invoice.field(kind).is_none())
            .collect();

        let mut warnings = Vec::new();
        if self.warn_on_missing {
            warnings.extend(
                missing_fields
                    .iter()
                    .map(|kind| format!("Could not extract {}", kind.label())),
            );
            if invoice.line_items.is_empty() {
                warnings.push("Could not extract line items".to_string());
            }
        }
        warnings.extend(self.duplicate_warnings(&lines));

        debug!(
            "Extracted {} of {} fields and {} line items",
            FieldKind::ALL.len() - missing_fields.len(),
            FieldKind::ALL.len(),
            invoice.line_items.len()
        );

        ExtractionResult {
            invoice,
            raw_text: text.to_string(),
            missing_fields,
            warnings,
            processing_time_ms: start.map_or(0, |s| s.elapsed().as_millis() as u64),
        }
    }
}

impl InvoiceExtractor for PatternInvoiceParser {
    fn extract(&self, ocr_result: &OcrResult) -> InvoiceRecord {
        debug!(
            "Extracting invoice from {} (language: {})",
            ocr_result.source, ocr_result.language
        );
        self.parse(&ocr_result.text).invoice
    }

    fn extract_from_text(&self, text: &str) -> InvoiceRecord {
        self.parse(text).invoice
    }
}
