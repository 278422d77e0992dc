//! Built-in regex patterns for invoice extraction.
//!
//! Patterns are applied to single normalized lines. Label text is matched
//! case-insensitively; monetary captures exclude the currency symbol and end
//! on a digit.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Invoice number (e.g. "Invoice #1024")
    pub static ref INVOICE_NUMBER_HASH: Regex = Regex::new(
        r"#\s*(\d+)"
    ).unwrap();

    pub static ref INVOICE_NUMBER_LABELED: Regex = Regex::new(
        r"(?i)\binvoice\s*(?:no\.?|number|num\.?|#)\s*:?\s*#?\s*(\d+)"
    ).unwrap();

    // Parties
    pub static ref BILLED_TO: Regex = Regex::new(
        r"(?i)\bbill(?:ed)?\s*to\b\s*[:\-–]?\s*([^\s:\-–].*)"
    ).unwrap();

    pub static ref INVOICE_TO: Regex = Regex::new(
        r"(?i)\binvoice\s+to\b\s*[:\-–]?\s*([^\s:\-–].*)"
    ).unwrap();

    pub static ref PAY_TO: Regex = Regex::new(
        r"(?i)\bpay(?:able)?\s*to\b\s*[:\-–]?\s*([^\s:\-–].*)"
    ).unwrap();

    // Bank details
    pub static ref BANK_NAME: Regex = Regex::new(
        r"(?i)\bbank(?:\s*name)?\s*:\s*([^\s:].*)"
    ).unwrap();

    pub static ref ACCOUNT_NAME: Regex = Regex::new(
        r"(?i)\baccount\s*name\s*:?\s*([^\s:].*)"
    ).unwrap();

    pub static ref ACCOUNT_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:account|acct|a/c)\.?\s*(?:number|no\.?|num\.?|#)\s*:?\s*(\d(?:[\d \-]*\d)?)"
    ).unwrap();

    pub static ref BSB: Regex = Regex::new(
        r"(?i)\b(?:bsb|routing|sort\s*code)(?:\s*(?:number|no\.?|code|#))?\s*:?\s*(\d(?:[\d \-]*\d)?)"
    ).unwrap();

    // Totals
    pub static ref SUBTOTAL: Regex = Regex::new(
        r"(?i)\bsub[\s\-]*total\b\s*:?\s*\$?\s*(\d(?:[\d.,]*\d)?)"
    ).unwrap();

    // Last "$" amount on a discount line, skipping percentages like "(30%)"
    pub static ref DISCOUNT: Regex = Regex::new(
        r"(?i)\bdiscount(?:s|ed)?\b.*\$\s*(\d(?:[\d.,]*\d)?)"
    ).unwrap();

    pub static ref DISCOUNT_TRAILING: Regex = Regex::new(
        r"(?i)\bdiscount(?:s|ed)?\b[^$]*?(\d(?:[\d.,]*\d)?)\s*$"
    ).unwrap();

    // Anchored so that "Sub-Total" lines never count as the total
    pub static ref TOTAL: Regex = Regex::new(
        r"(?i)^(?:grand\s+|invoice\s+)?total\b(?:\s*(?:due|amount|payable))?\s*:?\s*\$?\s*(\d(?:[\d.,]*\d)?)"
    ).unwrap();

    pub static ref AMOUNT_DUE: Regex = Regex::new(
        r"(?i)\b(?:amount|balance)\s+due\b\s*:?\s*\$?\s*(\d(?:[\d.,]*\d)?)"
    ).unwrap();

    // Start of the line-item table (case-sensitive, as printed in headers)
    pub static ref SECTION_DESCRIPTION: Regex = Regex::new(
        r"DESCRIPTION"
    ).unwrap();

    pub static ref SECTION_RATE_HOURS_AMOUNT: Regex = Regex::new(
        r"RATE\s+HOURS\s+AMOUNT"
    ).unwrap();

    // Line items: "<description> $<rate>/hr <hours> $<amount>"
    pub static ref HOURLY_ROW: Regex = Regex::new(
        r"(?i)^(.*?\S)\s+\$\s?(\d(?:[\d.,]*\d)?)\s*/\s*hr\b\s+(\d+)\s+\$\s?(\d(?:[\d.,]*\d)?)"
    ).unwrap();

    // Line items: "<description> $<rate> $<amount>"
    pub static ref FLAT_ROW: Regex = Regex::new(
        r"^(.*?\S)\s+\$\s?(\d(?:[\d.,]*\d)?)\s+\$\s?(\d(?:[\d.,]*\d)?)"
    ).unwrap();
}
