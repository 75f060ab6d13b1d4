//! Plain-text report rendering.

use chrono::NaiveDate;

use crate::types::{IpoRecord, Report};

/// Build the email subject and body for the matched IPOs.
///
/// Purely presentational: missing fields get placeholders, nothing is
/// filtered here.
pub fn build_report(matches: &[IpoRecord], threshold: f64, date: NaiveDate) -> Report {
    let subject = format!(
        "High-Value IPOs >${:.0}M ({} found for date {})",
        threshold / 1_000_000.0,
        matches.len(),
        date.format("%Y-%m-%d"),
    );

    let mut body = String::from("Offer amount = IPO price × shares\n\n");
    for ipo in matches {
        body.push_str(&format_line(ipo));
        body.push('\n');
    }

    Report { subject, body }
}

fn format_line(ipo: &IpoRecord) -> String {
    format!(
        "- {}: {} ({} shares @ {})",
        ipo.symbol.as_deref().unwrap_or("N/A"),
        ipo.name.as_deref().unwrap_or("Unknown"),
        group_thousands(ipo.shares()),
        ipo.price.as_deref().unwrap_or("N/A"),
    )
}

/// 15000000 -> "15,000,000"
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
