//! Finnhub IPO calendar client.
//!
//! API: `GET {base}/calendar/ipo?from=YYYY-MM-DD&to=YYYY-MM-DD&token={key}`
//! Auth: API key via `token` query param. Free tier key works.
//! Response: `{ "ipoCalendar": [ { symbol, name, price, numberOfShares, ... } ] }`

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use super::CalendarSource;
use crate::types::{FetchError, FetchOutcome, IpoCalendar};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Finnhub REST client for the IPO calendar endpoint.
pub struct FinnhubClient {
    http: Client,
    base_url: String,
}

impl FinnhubClient {
    /// Create a client against `base_url` (e.g. `https://finnhub.io/api/v1`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("ipo-screener/0.1.0")
            .build()
            .context("Failed to build HTTP client for Finnhub")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Full request URL for the one-day window starting at `date`.
    pub fn calendar_url(&self, api_key: &str, date: NaiveDate) -> String {
        let (from, to) = date_window(date);
        format!(
            "{}/calendar/ipo?from={}&to={}&token={}",
            self.base_url,
            from.format(DATE_FORMAT),
            to.format(DATE_FORMAT),
            urlencoding::encode(api_key),
        )
    }

    async fn fetch_calendar(
        &self,
        api_key: &SecretString,
        date: NaiveDate,
    ) -> std::result::Result<IpoCalendar, FetchError> {
        let url = self.calendar_url(api_key.expose_secret(), date);
        debug!(%date, base_url = %self.base_url, "Fetching Finnhub IPO calendar");

        let resp = self.http.get(&url).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let body = resp.text().await?;
        Ok(parse_calendar(&body)?)
    }
}

#[async_trait]
impl CalendarSource for FinnhubClient {
    async fn fetch(&self, api_key: &SecretString, date: NaiveDate) -> FetchOutcome {
        match self.fetch_calendar(api_key, date).await {
            Ok(calendar) => {
                info!(count = calendar.len(), %date, "Fetched IPO calendar");
                FetchOutcome::Fetched(calendar)
            }
            Err(e) => {
                // reqwest errors carry the URL, which includes the token.
                let e = match e {
                    FetchError::Request(inner) => FetchError::Request(inner.without_url()),
                    other => other,
                };
                warn!(error = %e, %date, "Error fetching IPO data");
                FetchOutcome::Unavailable(e)
            }
        }
    }
}

/// The `[from, to)` window queried for a reference date.
pub fn date_window(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let to = date.checked_add_days(Days::new(1)).unwrap_or(date);
    (date, to)
}

/// Parse a raw `/calendar/ipo` response body.
pub fn parse_calendar(body: &str) -> serde_json::Result<IpoCalendar> {
    serde_json::from_str(body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
