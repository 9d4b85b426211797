//! Network diagnostics dashboard
//!
//! Desktop client for a diagnostics server: system info, ping, port probe,
//! speed test and multi-host ping, with gauges, bar charts and a log.

pub mod actions;
pub mod charts;
pub mod client;
pub mod dashboard;
pub mod error;
pub mod log;
pub mod model;
pub mod pipeline;
pub mod runner;
pub mod settings;
pub mod theme;
pub mod ui;

#[cfg(test)]
mod testing;

pub use client::{DiagnosticsApi, HttpClient};
pub use error::{ApiError, SettingsError};
