//! Labeled scalar field extraction.
//!
//! Every field maps to an ordered list of candidate patterns. Candidates are
//! tried in order and the first one that yields a value wins; within one
//! pattern the first matching line wins.

use std::collections::BTreeMap;
use std::fmt;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::models::config::{ExtractionConfig, PatternConfig};

use super::patterns::*;
use super::{ExtractionMatch, FieldExtractor};

/// The scalar fields of an invoice record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    InvoiceNumber,
    BilledTo,
    PayTo,
    BankName,
    AccountName,
    AccountNumber,
    Bsb,
    Subtotal,
    Discount,
    Total,
}

impl FieldKind {
    /// All fields, in record order.
    pub const ALL: [FieldKind; 10] = [
        FieldKind::InvoiceNumber,
        FieldKind::BilledTo,
        FieldKind::PayTo,
        FieldKind::BankName,
        FieldKind::AccountName,
        FieldKind::AccountNumber,
        FieldKind::Bsb,
        FieldKind::Subtotal,
        FieldKind::Discount,
        FieldKind::Total,
    ];

    /// Configuration key (snake_case).
    pub fn key(&self) -> &'static str {
        match self {
            FieldKind::InvoiceNumber => "invoice_number",
            FieldKind::BilledTo => "billed_to",
            FieldKind::PayTo => "pay_to",
            FieldKind::BankName => "bank_name",
            FieldKind::AccountName => "account_name",
            FieldKind::AccountNumber => "account_number",
            FieldKind::Bsb => "bsb",
            FieldKind::Subtotal => "subtotal",
            FieldKind::Discount => "discount",
            FieldKind::Total => "total",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::InvoiceNumber => "Invoice Number",
            FieldKind::BilledTo => "Billed To",
            FieldKind::PayTo => "Pay To",
            FieldKind::BankName => "Bank",
            FieldKind::AccountName => "Account Name",
            FieldKind::AccountNumber => "Account Number",
            FieldKind::Bsb => "BSB",
            FieldKind::Subtotal => "Sub-Total",
            FieldKind::Discount => "Discount",
            FieldKind::Total => "Total",
        }
    }

    fn builtin_patterns(&self) -> Vec<&'static Regex> {
        match self {
            FieldKind::InvoiceNumber => vec![&*INVOICE_NUMBER_LABELED, &*INVOICE_NUMBER_HASH],
            FieldKind::BilledTo => vec![&*BILLED_TO, &*INVOICE_TO],
            FieldKind::PayTo => vec![&*PAY_TO],
            FieldKind::BankName => vec![&*BANK_NAME],
            FieldKind::AccountName => vec![&*ACCOUNT_NAME],
            FieldKind::AccountNumber => vec![&*ACCOUNT_NUMBER],
            FieldKind::Bsb => vec![&*BSB],
            FieldKind::Subtotal => vec![&*SUBTOTAL],
            FieldKind::Discount => vec![&*DISCOUNT, &*DISCOUNT_TRAILING],
            FieldKind::Total => vec![&*TOTAL, &*AMOUNT_DUE],
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// How to recognize one scalar field: label, matcher and capture group.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    field: FieldKind,
    regex: Regex,
    group: usize,
}

impl FieldPattern {
    /// Create a pattern, checking that the capture group exists.
    pub fn new(field: FieldKind, regex: Regex, group: usize) -> Result<Self, ConfigError> {
        if group >= regex.captures_len() {
            return Err(ConfigError::CaptureGroup {
                field: field.key().to_string(),
                group,
            });
        }
        Ok(Self { field, regex, group })
    }

    /// Compile a configured pattern; label text matches case-insensitively.
    pub fn from_config(field: FieldKind, config: &PatternConfig) -> Result<Self, ConfigError> {
        let regex = RegexBuilder::new(&config.pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| ConfigError::Pattern {
                field: field.key().to_string(),
                source,
            })?;
        Self::new(field, regex, config.group)
    }

    fn builtin(field: FieldKind, regex: &Regex) -> Self {
        Self {
            field,
            regex: regex.clone(),
            group: 1,
        }
    }

    /// The field this pattern extracts.
    pub fn field(&self) -> FieldKind {
        self.field
    }

    /// The underlying matcher.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Capture a trimmed, non-empty value from one line.
    fn capture(&self, line: &str) -> Option<String> {
        let caps = self.regex.captures(line)?;
        let value = caps.get(self.group)?.as_str().trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

impl FieldExtractor for FieldPattern {
    type Output = ExtractionMatch<String>;

    fn extract(&self, lines: &[&str]) -> Option<Self::Output> {
        lines.iter().enumerate().find_map(|(i, line)| {
            self.capture(line)
                .map(|value| ExtractionMatch::new(value, i, *line))
        })
    }

    fn extract_all(&self, lines: &[&str]) -> Vec<Self::Output> {
        lines
            .iter()
            .enumerate()
            .filter_map(|(i, line)| {
                self.capture(line)
                    .map(|value| ExtractionMatch::new(value, i, *line))
            })
            .collect()
    }
}

/// Extract one field value: the first matching line's capture, or `None`.
pub fn extract_field(lines: &[&str], pattern: &FieldPattern) -> Option<String> {
    pattern.extract(lines).map(|m| m.value)
}

/// Candidate patterns for every field.
#[derive(Debug, Clone)]
pub struct FieldRules {
    patterns: BTreeMap<FieldKind, Vec<FieldPattern>>,
}

impl FieldRules {
    /// Rules with the built-in patterns only.
    pub fn builtin() -> Self {
        let patterns = FieldKind::ALL
            .iter()
            .map(|&field| {
                let candidates = field
                    .builtin_patterns()
                    .into_iter()
                    .map(|re| FieldPattern::builtin(field, re))
                    .collect();
                (field, candidates)
            })
            .collect();

        Self { patterns }
    }

    /// Built-in rules with configured extra patterns tried first.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ConfigError> {
        let mut rules = Self::builtin();

        for (field, extras) in &config.extra_patterns {
            let compiled = extras
                .iter()
                .map(|p| FieldPattern::from_config(*field, p))
                .collect::<Result<Vec<_>, _>>()?;

            debug!("Adding {} configured patterns for {}", compiled.len(), field);

            let candidates = rules.patterns.entry(*field).or_default();
            let builtin = std::mem::replace(candidates, compiled);
            candidates.extend(builtin);
        }

        Ok(rules)
    }

    /// Add a pattern ahead of the existing candidates for its field.
    pub fn with_pattern(mut self, pattern: FieldPattern) -> Self {
        self.patterns
            .entry(pattern.field())
            .or_default()
            .insert(0, pattern);
        self
    }

    /// Candidate patterns for a field, in the order they are tried.
    pub fn candidates(&self, field: FieldKind) -> &[FieldPattern] {
        self.patterns.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Extract a field: the first candidate that yields a value wins.
    pub fn extract(&self, field: FieldKind, lines: &[&str]) -> Option<ExtractionMatch<String>> {
        let found = self
            .candidates(field)
            .iter()
            .find_map(|pattern| pattern.extract(lines));

        match &found {
            Some(m) => trace!("{} = {:?} (line {})", field, m.value, m.line),
            None => trace!("{} not found", field),
        }

        found
    }

    /// Every line any candidate matches for a field, in candidate order.
    ///
    /// A line matched by several candidates is reported once.
    pub fn extract_all(&self, field: FieldKind, lines: &[&str]) -> Vec<ExtractionMatch<String>> {
        let mut results: Vec<ExtractionMatch<String>> = Vec::new();

        for pattern in self.candidates(field) {
            for m in pattern.extract_all(lines) {
                if !results.iter().any(|r| r.line == m.line) {
                    results.push(m);
                }
            }
        }

        results
    }
}

impl Default for FieldRules {
    fn default() -> Self {
        Self::builtin()
    }
}
