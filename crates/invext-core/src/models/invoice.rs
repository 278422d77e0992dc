//! Invoice record models produced by the extraction pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::invoice::rules::amounts::parse_amount;
use crate::invoice::FieldKind;

/// Hours value used for rows billed as a flat amount.
pub const HOURS_NOT_APPLICABLE: &str = "N/A";

/// A structured invoice extracted from OCR text.
///
/// Every scalar field is optional: `None` means the field was not found,
/// which is distinct from an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    /// Invoice number (digits following `#`).
    pub invoice_number: Option<String>,

    /// Party the invoice is billed to.
    pub billed_to: Option<String>,

    /// Party to be paid.
    pub pay_to: Option<String>,

    /// Payment bank details, absent when none of its fields were found.
    pub bank_details: Option<BankDetails>,

    /// Line items in source order.
    #[serde(default)]
    pub line_items: Vec<LineItem>,

    /// Sub-total amount text, without currency symbol.
    pub subtotal: Option<String>,

    /// Discount amount text, without currency symbol.
    pub discount: Option<String>,

    /// Total amount text, without currency symbol.
    pub total: Option<String>,
}

/// Bank account details of the payee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    /// Bank name.
    pub bank: Option<String>,

    /// Account holder name.
    pub account_name: Option<String>,

    /// Account number as printed.
    pub account_number: Option<String>,

    /// BSB / routing code.
    pub bsb: Option<String>,
}

impl BankDetails {
    /// Check if no bank field was found.
    pub fn is_empty(&self) -> bool {
        self.bank.is_none()
            && self.account_name.is_none()
            && self.account_number.is_none()
            && self.bsb.is_none()
    }

    /// Wrap into an `Option`, `None` when empty.
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }
}

/// A single billed row.
///
/// Monetary values keep the OCR text verbatim (including `$`, commas and
/// decimals); nothing is parsed or rounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product/service description.
    pub description: String,

    /// Rate text, e.g. `$50/hr` for hourly rows or `$30` for flat rows.
    pub rate: String,

    /// Hours as printed, or `N/A` for flat rows.
    pub hours: String,

    /// Row amount text, e.g. `$250.00`.
    pub amount: String,
}

impl LineItem {
    /// Build an hourly row from its raw captures.
    pub fn hourly(description: impl Into<String>, rate: &str, hours: &str, amount: &str) -> Self {
        Self {
            description: description.into(),
            rate: format!("${}/hr", rate),
            hours: hours.to_string(),
            amount: format!("${}", amount),
        }
    }

    /// Build a flat-amount row from its raw captures.
    pub fn flat(description: impl Into<String>, rate: &str, amount: &str) -> Self {
        Self {
            description: description.into(),
            rate: format!("${}", rate),
            hours: HOURS_NOT_APPLICABLE.to_string(),
            amount: format!("${}", amount),
        }
    }

    /// Whether this row was billed by the hour.
    pub fn is_hourly(&self) -> bool {
        self.hours != HOURS_NOT_APPLICABLE
    }
}

impl InvoiceRecord {
    /// Check if nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.invoice_number.is_none()
            && self.billed_to.is_none()
            && self.pay_to.is_none()
            && self.bank_details.is_none()
            && self.line_items.is_empty()
            && self.subtotal.is_none()
            && self.discount.is_none()
            && self.total.is_none()
    }

    /// Value of a scalar field, if found.
    pub fn field(&self, kind: FieldKind) -> Option<&str> {
        let bank = self.bank_details.as_ref();
        let value = match kind {
            FieldKind::InvoiceNumber => self.invoice_number.as_ref(),
            FieldKind::BilledTo => self.billed_to.as_ref(),
            FieldKind::PayTo => self.pay_to.as_ref(),
            FieldKind::BankName => bank.and_then(|b| b.bank.as_ref()),
            FieldKind::AccountName => bank.and_then(|b| b.account_name.as_ref()),
            FieldKind::AccountNumber => bank.and_then(|b| b.account_number.as_ref()),
            FieldKind::Bsb => bank.and_then(|b| b.bsb.as_ref()),
            FieldKind::Subtotal => self.subtotal.as_ref(),
            FieldKind::Discount => self.discount.as_ref(),
            FieldKind::Total => self.total.as_ref(),
        };
        value.map(String::as_str)
    }

    /// Advisory consistency checks over the extracted values.
    ///
    /// The record is never changed; OCR can misread any digit, so callers
    /// decide what to do with the returned issues.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.invoice_number.is_none() {
            issues.push("Missing invoice number".to_string());
        }

        if self.billed_to.is_none() && self.pay_to.is_none() {
            issues.push("Missing billed-to and pay-to parties".to_string());
        }

        if self.line_items.is_empty() {
            issues.push("No line items".to_string());
        }

        if self.total.is_none() {
            issues.push("Missing total".to_string());
        }

        let tolerance = Decimal::new(1, 2);

        for item in self.line_items.iter().filter(|i| i.is_hourly()) {
            let rate = parse_amount(item.rate.trim_end_matches("/hr"));
            let hours = item.hours.parse::<Decimal>().ok();
            let amount = parse_amount(&item.amount);

            let (Some(rate), Some(hours), Some(amount)) = (rate, hours, amount) else {
                continue;
            };

            match rate.checked_mul(hours) {
                Some(expected) if differs(expected, amount, tolerance) => {
                    issues.push(format!(
                        "Line item '{}': rate x hours ({}) differs from amount ({})",
                        item.description, expected, amount
                    ));
                }
                Some(_) => {}
                None => issues.push(format!(
                    "Line item '{}': rate x hours is out of range",
                    item.description
                )),
            }
        }

        let subtotal = self.subtotal.as_deref().and_then(parse_amount);

        if let Some(subtotal) = subtotal {
            let amounts: Option<Vec<Decimal>> = self
                .line_items
                .iter()
                .map(|i| parse_amount(&i.amount))
                .collect();

            if let Some(amounts) = amounts.filter(|a| !a.is_empty()) {
                let calculated = amounts
                    .into_iter()
                    .try_fold(Decimal::ZERO, |sum, a| sum.checked_add(a));

                match calculated {
                    Some(calculated) if differs(calculated, subtotal, tolerance) => {
                        issues.push(format!(
                            "Line item amounts ({}) differ from sub-total ({})",
                            calculated, subtotal
                        ));
                    }
                    Some(_) => {}
                    None => issues.push("Line item amounts are out of range".to_string()),
                }
            }
        }

        let total = self.total.as_deref().and_then(parse_amount);
        let discount = self
            .discount
            .as_deref()
            .and_then(parse_amount)
            .unwrap_or(Decimal::ZERO);

        if let (Some(subtotal), Some(total)) = (subtotal, total) {
            match subtotal.checked_sub(discount) {
                Some(expected) if differs(expected, total, tolerance) => {
                    issues.push(format!(
                        "Sub-total less discount ({}) differs from total ({})",
                        expected, total
                    ));
                }
                Some(_) => {}
                None => issues.push("Sub-total less discount is out of range".to_string()),
            }
        }

        issues
    }
}

/// Compare two amounts; a difference too large to represent counts as differing.
fn differs(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    a.checked_sub(b).is_none_or(|d| d.abs() > tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> InvoiceRecord {
        InvoiceRecord {
            invoice_number: Some("1024".to_string()),
            billed_to: Some("Acme Co".to_string()),
            pay_to: Some("Jane Smith".to_string()),
            bank_details: None,
            line_items: vec![
                LineItem::hourly("Web Design", "50", "5", "250.00"),
                LineItem::hourly("SEO", "50", "4", "200.00"),
            ],
            subtotal: Some("450.00".to_string()),
            discount: Some("135.00".to_string()),
            total: Some("315.00".to_string()),
        }
    }

    #[test]
    fn test_line_item_shapes() {
        let hourly = LineItem::hourly("Web Design", "50", "5", "250.00");
        assert_eq!(hourly.rate, "$50/hr");
        assert_eq!(hourly.amount, "$250.00");
        assert!(hourly.is_hourly());

        let flat = LineItem::flat("Consulting", "30", "120");
        assert_eq!(flat.rate, "$30");
        assert_eq!(flat.hours, "N/A");
        assert!(!flat.is_hourly());
    }

    #[test]
    fn test_field_lookup() {
        let mut record = sample();
        record.bank_details = Some(BankDetails {
            bsb: Some("123-456".to_string()),
            ..Default::default()
        });

        assert_eq!(record.field(FieldKind::InvoiceNumber), Some("1024"));
        assert_eq!(record.field(FieldKind::Bsb), Some("123-456"));
        assert_eq!(record.field(FieldKind::BankName), None);
        assert_eq!(InvoiceRecord::default().field(FieldKind::Bsb), None);
    }

    #[test]
    fn test_bank_details_into_option() {
        assert_eq!(BankDetails::default().into_option(), None);

        let details = BankDetails {
            bsb: Some("123-456".to_string()),
            ..Default::default()
        };
        assert!(details.into_option().is_some());
    }

    #[test]
    fn test_serializes_absent_fields_as_null() {
        let json = serde_json::to_value(InvoiceRecord::default()).unwrap();

        assert_eq!(json["invoiceNumber"], serde_json::Value::Null);
        assert_eq!(json["bankDetails"], serde_json::Value::Null);
        assert_eq!(json["lineItems"], serde_json::json!([]));
    }

    #[test]
    fn test_validate_consistent_record() {
        assert!(sample().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_mismatches() {
        let mut record = sample();
        record.total = Some("875".to_string());
        record.line_items[1].amount = "$180.00".to_string();

        let issues = record.validate();

        assert!(issues.iter().any(|i| i.starts_with("Line item 'SEO'")));
        assert!(issues.iter().any(|i| i.starts_with("Line item amounts")));
        assert!(issues.iter().any(|i| i.starts_with("Sub-total less discount")));
    }

    #[test]
    fn test_validate_overflowing_hourly_row() {
        let record = InvoiceRecord {
            line_items: vec![LineItem::hourly(
                "Widget",
                "99999999999999999",
                "9999999999999999",
                "1",
            )],
            subtotal: Some("1".to_string()),
            ..sample()
        };

        let issues = record.validate();
        assert!(issues.contains(&"Line item 'Widget': rate x hours is out of range".to_string()));
    }

    #[test]
    fn test_validate_overflowing_item_sum() {
        let huge = "79228162514264337593543950335";
        let record = InvoiceRecord {
            line_items: vec![
                LineItem::flat("A", "1", huge),
                LineItem::flat("B", "1", huge),
            ],
            subtotal: Some("1".to_string()),
            discount: None,
            total: Some("1".to_string()),
            ..sample()
        };

        let issues = record.validate();
        assert!(issues.contains(&"Line item amounts are out of range".to_string()));
    }

    #[test]
    fn test_validate_extreme_totals() {
        let record = InvoiceRecord {
            subtotal: Some("79228162514264337593543950335".to_string()),
            discount: None,
            total: Some("1".to_string()),
            line_items: Vec::new(),
            ..sample()
        };

        let issues = record.validate();
        assert!(issues.iter().any(|i| i.starts_with("Sub-total less discount")));
    }

    #[test]
    fn test_validate_skips_unparsable_amounts() {
        let mut record = sample();
        record.line_items[0].amount = "$??".to_string();
        record.line_items[1].rate = "$abc/hr".to_string();
        record.discount = Some("lots".to_string());
        record.total = Some("450.00".to_string());

        // Garbage values are not compared; the discount falls back to zero
        assert!(record.validate().is_empty());
    }

    #[test]
    fn test_validate_parsed_overflowing_text() {
        use crate::invoice::{InvoiceParser, PatternInvoiceParser};

        let text = "Widget $99999999999999999/hr 9999999999999999 $1\nSub Total $1";
        let invoice = PatternInvoiceParser::new().parse(text).invoice;

        assert!(invoice.line_items[0].is_hourly());
        assert!(invoice.validate().iter().any(|i| i.ends_with("is out of range")));
    }

    #[test]
    fn test_validate_empty_record() {
        let issues = InvoiceRecord::default().validate();
        assert_eq!(
            issues,
            vec![
                "Missing invoice number".to_string(),
                "Missing billed-to and pay-to parties".to_string(),
                "No line items".to_string(),
                "Missing total".to_string(),
            ]
        );
    }
}
