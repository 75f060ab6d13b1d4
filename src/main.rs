//! IPO screener — daily high-value IPO alert job
//!
//! Entry point. Loads configuration from the environment, initialises
//! structured logging, runs a single fetch→filter→report→notify pass and
//! exits. Every expected failure is logged and the process exits 0.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::{error, info, warn};

use ipo_screener::calendar::finnhub::FinnhubClient;
use ipo_screener::config::AppConfig;
use ipo_screener::engine::{RunOptions, Screener};
use ipo_screener::notify::smtp::SmtpNotifier;
use ipo_screener::types::{DeliveryOutcome, RunOutcome};

/// Screen today's IPO calendar for large offers and email a summary.
#[derive(Debug, Parser)]
#[command(name = "ipo_screener", version, about)]
struct Cli {
    /// Reference date (YYYY-MM-DD). Defaults to today in local time.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Print the report but do not send email.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    init_logging();

    let AppConfig {
        finnhub,
        mail,
        offer_threshold,
    } = AppConfig::from_env();

    let opts = RunOptions {
        date: cli.date.unwrap_or_else(|| Local::now().date_naive()),
        dry_run: cli.dry_run,
    };

    info!(
        date = %opts.date,
        dry_run = opts.dry_run,
        smtp_server = %mail.smtp_server,
        email_configured = mail.is_complete(),
        "IPO screener starting"
    );

    let source = match FinnhubClient::new(finnhub.base_url) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Could not initialise Finnhub client");
            return Ok(());
        }
    };
    let notifier = SmtpNotifier::new(mail);

    let screener = Screener::new(&source, &notifier, offer_threshold);
    let outcome = screener.run(finnhub.api_key.as_ref(), opts).await;
    log_outcome(&outcome);

    Ok(())
}

/// Log a one-line summary of how the run ended.
fn log_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::MissingApiKey => warn!("Set FINNHUB_API_KEY environment variable"),
        RunOutcome::NoData => info!("Run complete: no IPO data"),
        RunOutcome::NoMatches { fetched } => {
            info!(fetched, "Run complete: no IPOs above threshold")
        }
        RunOutcome::Reported {
            matched, delivery, ..
        } => match delivery {
            DeliveryOutcome::Failed(_) => {
                warn!(matched, delivery = %delivery, "Run complete: email not delivered")
            }
            _ => info!(matched, delivery = %delivery, "Run complete"),
        },
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ipo_screener=info"));

    let json_logging = std::env::var("IPO_SCREENER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
