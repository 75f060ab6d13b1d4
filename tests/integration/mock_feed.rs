//! Test doubles for integration testing.
//!
//! Provides a deterministic `CalendarSource` that serves a fixed calendar
//! and a `Notifier` that records reports instead of sending them. All state
//! is in-memory with no external dependencies.

use async_trait::async_trait;
use chrono::NaiveDate;
use secrecy::SecretString;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use ipo_screener::calendar::CalendarSource;
use ipo_screener::notify::Notifier;
use ipo_screener::types::*;

/// A calendar feed that returns a fixed set of records.
pub struct MockFeed {
    records: Vec<IpoRecord>,
    calls: Arc<Mutex<Vec<NaiveDate>>>,
}

impl MockFeed {
    pub fn with_records(records: Vec<IpoRecord>) -> Self {
        Self {
            records,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Dates requested so far.
    pub fn calls(&self) -> Vec<NaiveDate> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarSource for MockFeed {
    async fn fetch(&self, _api_key: &SecretString, date: NaiveDate) -> FetchOutcome {
        self.calls.lock().unwrap().push(date);
        FetchOutcome::Fetched(IpoCalendar {
            ipo_calendar: self.records.clone(),
        })
    }
}

/// A notifier that records every report it is given.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Report>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Report> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, report: &Report) -> DeliveryOutcome {
        self.sent.lock().unwrap().push(report.clone());
        DeliveryOutcome::Sent
    }
}

/// Build a calendar record.
pub fn ipo(symbol: &str, price: Option<&str>, shares: Option<u64>) -> IpoRecord {
    IpoRecord {
        symbol: Some(symbol.to_string()),
        name: Some(format!("{symbol} Corp")),
        price: price.map(str::to_string),
        number_of_shares: shares,
        exchange: Some("NASDAQ".to_string()),
        status: Some("expected".to_string()),
        ..Default::default()
    }
}

/// Serve exactly one HTTP response on a local port.
///
/// Returns the base URL to point a client at and a handle resolving to the
/// request line the client sent.
pub async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;

        String::from_utf8_lossy(&request)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    });

    (format!("http://{addr}/api/v1"), handle)
}
