//! Amount parsing for advisory checks.
//!
//! Extraction keeps monetary text verbatim; these helpers are only used when
//! a caller asks for numeric consistency checks.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse an OCR-rendered amount (e.g. "$1,234.56", "250.00", "1.234,56").
///
/// Currency symbols and whitespace are ignored. When both `,` and `.` occur,
/// the one that comes last is the decimal separator. A lone `,` followed by
/// exactly two digits is a decimal separator, otherwise a thousands separator.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(c), None) if cleaned.len() - c == 3 && cleaned.matches(',').count() == 1 => {
            cleaned.replace(',', ".")
        }
        (Some(_), None) => cleaned.replace(',', ""),
        _ => cleaned,
    };

    Decimal::from_str(&normalized).ok()
}
