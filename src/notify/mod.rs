//! Report delivery.
//!
//! Defines the `Notifier` trait and the SMTP implementation.

pub mod smtp;

use async_trait::async_trait;

use crate::types::{DeliveryOutcome, Report};

/// Abstraction over a report delivery channel.
///
/// Delivery problems are reported through `DeliveryOutcome`, never as an
/// error, so a failed send does not abort the run.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one report.
    async fn send(&self, report: &Report) -> DeliveryOutcome;
}
