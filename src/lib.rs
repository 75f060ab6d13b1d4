//! IPO screener — daily high-value IPO alert job
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod calendar;
pub mod screening;
pub mod notify;
pub mod engine;
