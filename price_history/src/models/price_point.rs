//! Canonical in-memory representation of a single price observation.
//!
//! This struct is the standard output of every
//! [`HistoryProvider`](crate::providers::HistoryProvider) implementation,
//! regardless of the upstream vendor.

use chrono::{DateTime, Utc};

/// A single observed price at a point in time.
///
/// Produced only by the market data client from raw API payloads; consumers
/// never construct these from scratch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    /// When the price was observed (UTC).
    pub timestamp: DateTime<Utc>,

    /// Price in the quote currency (USD).
    pub price: f64,
}
