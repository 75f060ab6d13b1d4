//! Offer-size screening.
//!
//! An IPO's offer amount is the upper bound of its quoted price range times
//! the number of shares offered. Only IPOs whose offer amount is strictly
//! greater than the threshold are kept. Records with an absent or
//! unparseable price are skipped, never treated as matches or errors.

pub mod report;

use tracing::debug;

use crate::types::IpoRecord;

/// Parse the per-share price used for the offer amount.
///
/// The last `-`-separated token is used, so a range "18-20" yields 20 and a
/// single value "20" yields 20.
pub fn parse_price(price: &str) -> Option<f64> {
    price.rsplit('-').next()?.trim().parse::<f64>().ok()
}

/// Offer amount for one record, or `None` when the price can't be read.
pub fn offer_amount(record: &IpoRecord) -> Option<f64> {
    let price = parse_price(record.price.as_deref()?)?;
    Some(price * record.shares() as f64)
}

/// Keep records whose offer amount is strictly greater than `threshold`,
/// preserving feed order.
pub fn filter_by_offer(records: &[IpoRecord], threshold: f64) -> Vec<IpoRecord> {
    records
        .iter()
        .filter(|record| match offer_amount(record) {
            Some(amount) => amount > threshold,
            None => {
                debug!(
                    symbol = record.symbol.as_deref().unwrap_or("?"),
                    price = ?record.price,
                    "Skipping IPO with unreadable price"
                );
                false
            }
        })
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
