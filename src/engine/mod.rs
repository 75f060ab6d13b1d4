//! Screening engine.
//!
//! Runs one fetch → filter → report → notify pass.

pub mod screener;

pub use screener::{RunOptions, Screener};
