//! # FACEIT Stats
//!
//! Terminal client for FACEIT match history with rolling statistics.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (match records, summaries, profiles)
//! - **calculate**: Aggregation, streaks, estimated metrics and comparison
//! - **fetch**: Stats provider trait and the FACEIT Data API client
//! - **cache**: In-memory TTL cache wrapping any provider
//! - **app**: Operations combining the provider with the calculators
//! - **render**: Plain-text reports
//! - **shell**: Interactive session
//! - **config**: Configuration loading and validation

pub mod app;
pub mod cache;
pub mod calculate;
pub mod config;
pub mod fetch;
pub mod models;
pub mod render;
pub mod shell;

pub use models::*;

use std::time::Duration;

/// Parse a human-friendly duration string (e.g., "6h", "30m", "90s").
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('h') {
        (n, 3600)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else {
        // Bare numbers are seconds
        (s, 1)
    };

    let num: u64 = num_str.trim().parse().ok()?;
    num.checked_mul(multiplier).map(Duration::from_secs)
}
