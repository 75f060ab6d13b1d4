//! IPO calendar feeds.
//!
//! Defines the `CalendarSource` trait and the Finnhub implementation.

pub mod finnhub;

use async_trait::async_trait;
use chrono::NaiveDate;
use secrecy::SecretString;

use crate::types::FetchOutcome;

/// Abstraction over an IPO calendar feed.
///
/// Implementors never return an error: any failure is logged and reported
/// as `FetchOutcome::Unavailable` so the run can end cleanly.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Fetch IPOs scheduled in the one-day window starting at `date`.
    async fn fetch(&self, api_key: &SecretString, date: NaiveDate) -> FetchOutcome;
}
