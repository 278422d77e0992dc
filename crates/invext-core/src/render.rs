//! Presentation of extracted invoices: terminal text and the side-by-side
//! HTML comparison view.
//!
//! Renderers only show extracted values. Absent fields print as `N/A`.

use crate::models::invoice::InvoiceRecord;

/// Placeholder for absent values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Escape text for inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

fn money(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("${}", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Render a plain-text summary for terminals.
pub fn render_text(invoice: &InvoiceRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Invoice: {}\n", or_na(invoice.invoice_number.as_deref())));
    output.push_str(&format!("Billed To: {}\n", or_na(invoice.billed_to.as_deref())));
    output.push_str(&format!("Pay To: {}\n", or_na(invoice.pay_to.as_deref())));

    if let Some(bank) = &invoice.bank_details {
        output.push('\n');
        output.push_str("Bank Details:\n");
        output.push_str(&format!("  Bank:           {}\n", or_na(bank.bank.as_deref())));
        output.push_str(&format!("  Account Name:   {}\n", or_na(bank.account_name.as_deref())));
        output.push_str(&format!("  Account Number: {}\n", or_na(bank.account_number.as_deref())));
        output.push_str(&format!("  BSB:            {}\n", or_na(bank.bsb.as_deref())));
    }

    output.push('\n');
    if invoice.line_items.is_empty() {
        output.push_str("Line Items: none\n");
    } else {
        let width = invoice
            .line_items
            .iter()
            .map(|i| i.description.chars().count())
            .max()
            .unwrap_or(0)
            .max("Description".len());

        output.push_str(&format!(
            "{:<width$}  {:>10}  {:>5}  {:>12}\n",
            "Description", "Rate", "Hours", "Amount"
        ));
        for item in &invoice.line_items {
            output.push_str(&format!(
                "{:<width$}  {:>10}  {:>5}  {:>12}\n",
                item.description, item.rate, item.hours, item.amount
            ));
        }
    }

    output.push('\n');
    output.push_str(&format!("Sub-Total: {}\n", money(invoice.subtotal.as_deref())));
    output.push_str(&format!("Discount:  {}\n", money(invoice.discount.as_deref())));
    output.push_str(&format!("Total:     {}\n", money(invoice.total.as_deref())));

    output
}

/// Render raw OCR text next to the extracted invoice as an HTML fragment.
pub fn render_side_by_side(raw_text: &str, invoice: &InvoiceRecord) -> String {
    let th = r#"<th style="text-align: left; padding: 8px;">"#;
    let td = r#"<td style="padding: 8px;">"#;

    let mut html = String::new();

    html.push_str(r#"<div style="display: flex; gap: 20px;">"#);
    html.push('\n');
    html.push_str(
        r#"<div style="flex: 1; border-right: 1px solid #ccc; padding-right: 20px;">"#,
    );
    html.push_str("<h3>Raw Extracted Data</h3>");
    html.push_str(&format!(
        r#"<pre style="white-space: pre-wrap;">{}</pre>"#,
        escape_html(raw_text)
    ));
    html.push_str("</div>\n");

    html.push_str(r#"<div style="flex: 1; padding-left: 20px;">"#);
    html.push_str("<h3>Formatted Invoice Details</h3>\n");
    html.push_str(
        r#"<table style="border-collapse: collapse; width: 100%; margin-bottom: 20px;">"#,
    );
    html.push('\n');

    let mut details = vec![
        ("Invoice Number:", invoice.invoice_number.as_deref()),
        ("Billed To:", invoice.billed_to.as_deref()),
        ("Pay To:", invoice.pay_to.as_deref()),
    ];
    if let Some(bank) = &invoice.bank_details {
        details.push(("Bank:", bank.bank.as_deref()));
        details.push(("Account Name:", bank.account_name.as_deref()));
        details.push(("Account Number:", bank.account_number.as_deref()));
        details.push(("BSB:", bank.bsb.as_deref()));
    }

    for (label, value) in details {
        html.push_str(&format!(
            "<tr style=\"border-bottom: 1px solid #000;\">{}{}</th>{}{}</td></tr>\n",
            th,
            label,
            td,
            escape_html(or_na(value))
        ));
    }
    html.push_str("</table>\n");

    html.push_str("<h3>Product Details</h3>\n");
    html.push_str(r#"<table style="border-collapse: collapse; width: 100%;">"#);
    html.push('\n');
    html.push_str(&format!(
        "<tr style=\"border-bottom: 1px solid #000;\">{th}Description</th>{th}Rate</th>{th}Hours</th>{th}Amount</th></tr>\n",
        th = th
    ));

    for item in &invoice.line_items {
        html.push_str(&format!(
            "<tr style=\"border-bottom: 1px solid #ddd;\">{td}{}</td>{td}{}</td>{td}{}</td>{td}{}</td></tr>\n",
            escape_html(&item.description),
            escape_html(&item.rate),
            escape_html(&item.hours),
            escape_html(&item.amount),
            td = td
        ));
    }

    let totals = [
        ("Sub-Total", invoice.subtotal.as_deref(), "border-top: 2px solid #000;"),
        ("Discount", invoice.discount.as_deref(), ""),
        ("Total", invoice.total.as_deref(), ""),
    ];
    for (label, value, style) in totals {
        html.push_str(&format!(
            "<tr style=\"{}\"><td colspan=\"3\" style=\"text-align: right; padding: 8px;\"><strong>{}</strong></td>{}{}</td></tr>\n",
            style,
            label,
            td,
            escape_html(&money(value))
        ));
    }

    html.push_str("</table>\n</div>\n</div>\n");

    html
}
