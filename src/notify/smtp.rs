//! SMTP email notifier.
//!
//! Connects to the configured relay on the submission port, upgrades with
//! STARTTLS, authenticates with the sender's credentials and sends one
//! `text/plain; charset=utf-8` message. Gmail requires an app password
//! when two-factor authentication is enabled.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, info, warn};

use super::Notifier;
use crate::config::{MailConfig, SmtpSecurity};
use crate::types::{DeliveryError, DeliveryOutcome, Report};

/// SMTP reply codes that mean the credentials were rejected.
const AUTH_FAILURE_CODES: &[&str] = &["530", "534", "535"];

/// Sends reports by email through an SMTP relay.
pub struct SmtpNotifier {
    config: MailConfig,
}

impl SmtpNotifier {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Build the MIME message for a report.
    pub fn build_message(
        sender: &str,
        recipient: &str,
        report: &Report,
    ) -> Result<Message, DeliveryError> {
        let from: Mailbox = sender
            .parse()
            .map_err(|source| DeliveryError::Address { field: "sender", source })?;
        let to: Mailbox = recipient
            .parse()
            .map_err(|source| DeliveryError::Address { field: "recipient", source })?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(report.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(report.body.clone())?;

        Ok(message)
    }

    async fn deliver(
        &self,
        sender: &str,
        password: &SecretString,
        recipient: &str,
        report: &Report,
    ) -> Result<(), DeliveryError> {
        let message = Self::build_message(sender, recipient, report)?;

        let builder = match self.config.security {
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_server)
                    .map_err(DeliveryError::Transport)?
            }
            SmtpSecurity::Plaintext => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(self.config.smtp_server.as_str())
            }
        };

        let transport = builder
            .port(self.config.smtp_port)
            .credentials(Credentials::new(
                sender.to_string(),
                password.expose_secret().to_string(),
            ))
            .authentication(vec![Mechanism::Plain, Mechanism::Login])
            .build();

        debug!(
            host = %self.config.smtp_server,
            port = self.config.smtp_port,
            security = ?self.config.security,
            "Connecting to SMTP relay"
        );

        transport.send(message).await.map_err(classify_smtp_error)?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, report: &Report) -> DeliveryOutcome {
        let (Some(sender), Some(password), Some(recipient)) = (
            self.config.sender.as_deref(),
            self.config.password.as_ref(),
            self.config.recipient.as_deref(),
        ) else {
            warn!("Email credentials incomplete. Skipping email.");
            return DeliveryOutcome::Skipped;
        };

        match self.deliver(sender, password, recipient, report).await {
            Ok(()) => {
                info!(recipient, "Email sent successfully");
                DeliveryOutcome::Sent
            }
            Err(e @ DeliveryError::Authentication(_)) => {
                error!(
                    error = %e,
                    hint = "use an app password (myaccount.google.com/apppasswords)",
                    "SMTP authentication failed"
                );
                DeliveryOutcome::Failed(e)
            }
            Err(e) => {
                error!(error = %e, "Email error");
                DeliveryOutcome::Failed(e)
            }
        }
    }
}

/// Split credential rejections from every other SMTP failure.
fn classify_smtp_error(err: lettre::transport::smtp::Error) -> DeliveryError {
    let is_auth = err
        .status()
        .map(|code| AUTH_FAILURE_CODES.contains(&code.to_string().as_str()))
        .unwrap_or(false);

    if is_auth {
        DeliveryError::Authentication(err)
    } else {
        DeliveryError::Transport(err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
