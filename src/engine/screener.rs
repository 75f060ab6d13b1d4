//! Run orchestration.
//!
//! One pass of fetch → filter → report → notify. Each early exit is returned
//! as a `RunOutcome` variant; nothing here fails the process.

use chrono::NaiveDate;
use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::calendar::CalendarSource;
use crate::notify::Notifier;
use crate::screening::filter_by_offer;
use crate::screening::report::build_report;
use crate::types::{DeliveryOutcome, FetchOutcome, RunOutcome};

/// Per-run options.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Reference date; the calendar window is `[date, date + 1)`.
    pub date: NaiveDate,
    /// Format and print the report without handing it to the notifier.
    pub dry_run: bool,
}

/// Wires a calendar feed and a notifier into a single screening pass.
pub struct Screener<'a> {
    source: &'a dyn CalendarSource,
    notifier: &'a dyn Notifier,
    threshold: f64,
}

impl<'a> Screener<'a> {
    pub fn new(source: &'a dyn CalendarSource, notifier: &'a dyn Notifier, threshold: f64) -> Self {
        Self {
            source,
            notifier,
            threshold,
        }
    }

    /// Run one screening pass.
    pub async fn run(&self, api_key: Option<&SecretString>, opts: RunOptions) -> RunOutcome {
        let Some(api_key) = api_key else {
            warn!("FINNHUB_API_KEY not set");
            return RunOutcome::MissingApiKey;
        };

        info!(date = %opts.date, threshold = self.threshold, "Starting IPO screen");

        // 1. Fetch
        let calendar = match self.source.fetch(api_key, opts.date).await {
            FetchOutcome::Fetched(calendar) if !calendar.is_empty() => calendar,
            FetchOutcome::Fetched(_) | FetchOutcome::Unavailable(_) => {
                info!(date = %opts.date, "No IPOs found for today");
                return RunOutcome::NoData;
            }
        };
        let fetched = calendar.len();

        // 2. Filter
        let matches = filter_by_offer(&calendar.ipo_calendar, self.threshold);
        if matches.is_empty() {
            info!(
                fetched,
                threshold_musd = self.threshold / 1_000_000.0,
                "No IPOs meet criteria"
            );
            return RunOutcome::NoMatches { fetched };
        }
        for ipo in &matches {
            debug!(ipo = %ipo, "Qualifying IPO");
        }

        // 3. Report
        let report = build_report(&matches, self.threshold, opts.date);
        info!(matched = matches.len(), fetched, "Found qualifying IPOs");
        println!("{}\n\n{}", report.subject, report.body);

        // 4. Notify
        let delivery = if opts.dry_run {
            info!("Dry run: not sending email");
            DeliveryOutcome::Skipped
        } else {
            self.notifier.send(&report).await
        };

        RunOutcome::Reported {
            report,
            matched: matches.len(),
            delivery,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
