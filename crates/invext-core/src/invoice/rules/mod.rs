//! Rule-based extractors for invoice fields and line items.

pub mod amounts;
pub mod fields;
pub mod items;
pub mod patterns;

pub use amounts::parse_amount;
pub use fields::{extract_field, FieldKind, FieldPattern, FieldRules};
pub use items::LineItemExtractor;

/// Trait for extractors that scan normalized lines.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence, in line order.
    fn extract(&self, lines: &[&str]) -> Option<Self::Output>;

    /// Extract every occurrence, in line order.
    fn extract_all(&self, lines: &[&str]) -> Vec<Self::Output>;
}

/// A value found by an extractor, with the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Index of the source line in the normalized sequence.
    pub line: usize,
    /// Source line that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, line: usize, source: impl Into<String>) -> Self {
        Self {
            value,
            line,
            source: source.into(),
        }
    }
}
