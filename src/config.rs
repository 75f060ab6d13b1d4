//! Configuration loading from environment variables.
//!
//! All settings come from the process environment (optionally seeded from a
//! `.env` file by the binary). The config is built once at startup and
//! passed by reference into each stage. Secrets are wrapped in
//! `SecretString` so they never appear in `Debug` output or logs.
//!
//! Empty values are treated the same as unset ones.

use secrecy::SecretString;

/// Default Finnhub REST base URL.
pub const DEFAULT_FINNHUB_BASE_URL: &str = "https://finnhub.io/api/v1";

/// Default SMTP relay host.
pub const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";

/// SMTP submission port (STARTTLS).
pub const SMTP_PORT: u16 = 587;

/// Minimum offer amount (price × shares) in USD for an IPO to be reported.
pub const OFFER_AMOUNT_THRESHOLD: f64 = 200_000_000.0;

/// Top-level application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub finnhub: FinnhubConfig,
    pub mail: MailConfig,
    pub offer_threshold: f64,
}

#[derive(Debug)]
pub struct FinnhubConfig {
    /// `FINNHUB_API_KEY`. Absence aborts the run before any network call.
    pub api_key: Option<SecretString>,
    pub base_url: String,
}

/// SMTP delivery settings. Sending is skipped unless sender, password and
/// recipient are all present.
#[derive(Debug)]
pub struct MailConfig {
    pub sender: Option<String>,
    pub password: Option<SecretString>,
    pub recipient: Option<String>,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub security: SmtpSecurity,
}

/// Transport security for the SMTP session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// Upgrade with STARTTLS before authenticating.
    #[default]
    StartTls,
    /// No TLS. Only for relays on a trusted local link.
    Plaintext,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            finnhub: FinnhubConfig {
                api_key: get("FINNHUB_API_KEY").map(SecretString::new),
                base_url: get("FINNHUB_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_FINNHUB_BASE_URL.to_string()),
            },
            mail: MailConfig {
                sender: get("EMAIL_SENDER"),
                password: get("EMAIL_PASSWORD").map(SecretString::new),
                recipient: get("EMAIL_RECIPIENT"),
                smtp_server: get("SMTP_SERVER").unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string()),
                smtp_port: SMTP_PORT,
                security: SmtpSecurity::StartTls,
            },
            offer_threshold: OFFER_AMOUNT_THRESHOLD,
        }
    }
}

impl MailConfig {
    /// Whether sender, password and recipient are all configured.
    pub fn is_complete(&self) -> bool {
        self.sender.is_some() && self.password.is_some() && self.recipient.is_some()
    }
}
