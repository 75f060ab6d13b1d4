//! Finnhub client against a local one-shot HTTP stub.

use chrono::NaiveDate;
use secrecy::SecretString;

use ipo_screener::calendar::finnhub::FinnhubClient;
use ipo_screener::calendar::CalendarSource;
use ipo_screener::types::{FetchError, FetchOutcome};

use crate::mock_feed::serve_once;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn key() -> SecretString {
    SecretString::new("k123".into())
}

const CALENDAR_BODY: &str = r#"{"ipoCalendar":[
    {"date":"2026-10-19","exchange":"NYSE","name":"Big Deal Inc","numberOfShares":15000000,"price":"18-20","status":"expected","symbol":"BIG","totalSharesValue":300000000},
    {"date":"2026-10-19","exchange":"NASDAQ","name":"Small Co","numberOfShares":1000000,"price":"5-6","status":"expected","symbol":"SML","totalSharesValue":6000000}
]}"#;

#[tokio::test]
async fn fetch_parses_calendar_and_sends_window() {
    let (base_url, server) = serve_once("200 OK", CALENDAR_BODY.to_string()).await;
    let client = FinnhubClient::new(base_url).unwrap();

    let outcome = client.fetch(&key(), date()).await;
    let request_line = server.await.unwrap();

    assert_eq!(
        request_line,
        "GET /api/v1/calendar/ipo?from=2026-10-19&to=2026-10-20&token=k123 HTTP/1.1"
    );
    match outcome {
        FetchOutcome::Fetched(calendar) => {
            assert_eq!(calendar.len(), 2);
            assert_eq!(calendar.ipo_calendar[0].symbol.as_deref(), Some("BIG"));
            assert_eq!(calendar.ipo_calendar[1].number_of_shares, Some(1_000_000));
        }
        other => panic!("expected calendar, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_http_error_is_unavailable() {
    let (base_url, server) =
        serve_once("429 Too Many Requests", r#"{"error":"API limit reached"}"#.to_string()).await;
    let client = FinnhubClient::new(base_url).unwrap();

    let outcome = client.fetch(&key(), date()).await;
    server.await.unwrap();

    match outcome {
        FetchOutcome::Unavailable(FetchError::Status { status, body }) => {
            assert_eq!(status.as_u16(), 429);
            assert!(body.contains("API limit"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_malformed_json_is_unavailable() {
    let (base_url, server) = serve_once("200 OK", "{\"ipoCalendar\": [".to_string()).await;
    let client = FinnhubClient::new(base_url).unwrap();

    let outcome = client.fetch(&key(), date()).await;
    server.await.unwrap();

    assert!(matches!(outcome, FetchOutcome::Unavailable(FetchError::Parse(_))));
}

#[tokio::test]
async fn fetch_empty_object_is_empty_calendar() {
    let (base_url, server) = serve_once("200 OK", "{}".to_string()).await;
    let client = FinnhubClient::new(base_url).unwrap();

    let outcome = client.fetch(&key(), date()).await;
    server.await.unwrap();

    match outcome {
        FetchOutcome::Fetched(calendar) => assert!(calendar.is_empty()),
        other => panic!("expected empty calendar, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_keeps_valid_entries_next_to_malformed_ones() {
    let body = r#"{"ipoCalendar":[
        {"symbol":123,"name":null,"exchange":["NYSE"],"price":"10","numberOfShares":1000},
        null,
        {"symbol":"BIG","name":"Big Deal Inc","price":"18-20","numberOfShares":15000000}
    ]}"#;
    let (base_url, server) = serve_once("200 OK", body.to_string()).await;
    let client = FinnhubClient::new(base_url).unwrap();

    let outcome = client.fetch(&key(), date()).await;
    server.await.unwrap();

    match outcome {
        FetchOutcome::Fetched(calendar) => {
            assert_eq!(calendar.len(), 2);
            assert_eq!(calendar.ipo_calendar[0].symbol.as_deref(), Some("123"));
            assert_eq!(calendar.ipo_calendar[1].symbol.as_deref(), Some("BIG"));
        }
        other => panic!("expected calendar, got {other:?}"),
    }
}
