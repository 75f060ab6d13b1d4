//! Shared types for the IPO screener.
//!
//! These types form the data model passed between the fetch, filter,
//! report and notify stages. Every early exit of a run is modelled as an
//! explicit outcome value rather than an `Option` or a bare `bool`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use tracing::debug;

// ---------------------------------------------------------------------------
// Calendar records
// ---------------------------------------------------------------------------

/// One entry of the Finnhub IPO calendar.
///
/// Every field is optional: the feed omits or nulls fields freely, and the
/// report renders placeholders for anything missing. A field of the wrong
/// JSON type is read as absent instead of failing the record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpoRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Quoted price, either a single value ("20") or a range ("18-20").
    #[serde(default, deserialize_with = "lenient_string")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "lenient_shares")]
    pub number_of_shares: Option<u64>,
    /// Expected listing date, "YYYY-MM-DD".
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub exchange: Option<String>,
    /// "expected" | "priced" | "filed" | "withdrawn"
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
}

impl IpoRecord {
    /// Shares offered, with absent treated as zero.
    pub fn shares(&self) -> u64 {
        self.number_of_shares.unwrap_or(0)
    }
}

impl fmt::Display for IpoRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {} x {} shares [{} | {}]",
            self.symbol.as_deref().unwrap_or("?"),
            self.price.as_deref().unwrap_or("?"),
            self.shares(),
            self.exchange.as_deref().unwrap_or("-"),
            self.status.as_deref().unwrap_or("-"),
        )
    }
}

/// Body of `GET /calendar/ipo`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IpoCalendar {
    #[serde(rename = "ipoCalendar", default, deserialize_with = "lenient_records")]
    pub ipo_calendar: Vec<IpoRecord>,
}

impl IpoCalendar {
    pub fn len(&self) -> usize {
        self.ipo_calendar.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ipo_calendar.is_empty()
    }
}

/// Read the calendar entry by entry so one malformed entry (e.g. a bare
/// `null`) is skipped without losing the rest of the day. A missing or
/// `null` list is empty.
fn lenient_records<'de, D>(deserializer: D) -> Result<Vec<IpoRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match IpoRecord::deserialize(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(index, error = %e, "Skipping malformed IPO calendar entry");
                None
            }
        })
        .collect())
}

/// Accept a string or a bare number. Anything else is absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accept an integer share count, truncating non-negative floats.
fn lenient_shares<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Plain-text email content for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub subject: String,
    pub body: String,
}

// ---------------------------------------------------------------------------
// Stage outcomes
// ---------------------------------------------------------------------------

/// Result of asking the calendar feed for one day.
#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(IpoCalendar),
    /// Network, HTTP or parse failure. Treated as "no data today".
    Unavailable(FetchError),
}

/// Result of handing a report to a notifier.
#[derive(Debug)]
pub enum DeliveryOutcome {
    Sent,
    /// Credentials incomplete or dry run; no connection attempted.
    Skipped,
    Failed(DeliveryError),
}

impl DeliveryOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DeliveryOutcome::Sent)
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOutcome::Sent => write!(f, "sent"),
            DeliveryOutcome::Skipped => write!(f, "skipped"),
            DeliveryOutcome::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

/// How a screener run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// `FINNHUB_API_KEY` absent; nothing was fetched.
    MissingApiKey,
    /// Feed unavailable or returned no IPOs for the day.
    NoData,
    /// IPOs were fetched but none exceeded the offer threshold.
    NoMatches { fetched: usize },
    /// A report was produced and handed to the notifier (or skipped).
    Reported {
        report: Report,
        matched: usize,
        delivery: DeliveryOutcome,
    },
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failures while fetching the IPO calendar.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Finnhub request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Finnhub API error {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse Finnhub IPO calendar: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures while delivering the report email.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Invalid {field} address: {source}")]
    Address {
        field: &'static str,
        source: lettre::address::AddressError,
    },

    #[error("Failed to build email: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP authentication failed: {0}")]
    Authentication(#[source] lettre::transport::smtp::Error),

    #[error("SMTP error: {0}")]
    Transport(#[source] lettre::transport::smtp::Error),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
