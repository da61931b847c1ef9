//! Timeframe utilities for expressing the requested historical span.
//!
//! A [`Timeframe`] is the requested lookback window for a price series. Each
//! variant fixes three things at once: how far back the series reaches, how
//! densely the upstream API samples it, and how long a cached copy stays
//! fresh. Longer lookbacks change slowly, so they both sample coarser and
//! stay fresh longer.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown timeframe: {0:?} (expected 24h, 7d, 30d or 1y)")]
pub struct ParseTimeframeError(String);

/// Sampling granularity the upstream API applies to a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hourly,
    Daily,
}

impl Granularity {
    /// Wire value for the `interval` query parameter.
    pub const fn as_str(self) -> &'static str {
        match self {
            Granularity::Hourly => "hourly",
            Granularity::Daily => "daily",
        }
    }
}

/// The requested historical span for a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    /// Last 24 hours, sampled hourly.
    Day,
    /// Last 7 days, sampled daily.
    Week,
    /// Last 30 days, sampled daily.
    Month,
    /// Last 365 days, sampled daily.
    Year,
}

impl Timeframe {
    /// All variants, in ascending lookback order.
    pub const ALL: [Timeframe; 4] = [
        Timeframe::Day,
        Timeframe::Week,
        Timeframe::Month,
        Timeframe::Year,
    ];

    /// Lookback window sent to the API as the `days` query parameter.
    pub const fn lookback_days(self) -> u32 {
        match self {
            Timeframe::Day => 1,
            Timeframe::Week => 7,
            Timeframe::Month => 30,
            Timeframe::Year => 365,
        }
    }

    /// Sampling granularity the API applies for this lookback.
    pub const fn granularity(self) -> Granularity {
        match self {
            Timeframe::Day => Granularity::Hourly,
            _ => Granularity::Daily,
        }
    }

    /// Maximum age after which a cached series for this timeframe is no
    /// longer served without a fallback annotation.
    pub fn freshness_window(self) -> Duration {
        match self {
            Timeframe::Day => Duration::minutes(5),
            Timeframe::Week => Duration::minutes(15),
            Timeframe::Month => Duration::minutes(30),
            Timeframe::Year => Duration::hours(1),
        }
    }

    /// Formats a point's timestamp for a chart axis label.
    ///
    /// The format follows the displayed span: hour:minute for a day,
    /// weekday abbreviation for a week, day and month for a month, month
    /// abbreviation for a year.
    pub fn axis_label(self, timestamp: DateTime<Utc>) -> String {
        let fmt = match self {
            Timeframe::Day => "%H:%M",
            Timeframe::Week => "%a",
            Timeframe::Month => "%-d %b",
            Timeframe::Year => "%b",
        };
        timestamp.format(fmt).to_string()
    }
}

/// Display/parse for CLI and config ergonomics (`"24h"`, `"7d"`, `"30d"`, `"1y"`).
impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Timeframe::Day => "24h",
            Timeframe::Week => "7d",
            Timeframe::Month => "30d",
            Timeframe::Year => "1y",
        };
        f.write_str(s)
    }
}

impl FromStr for Timeframe {
    type Err = ParseTimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24h" => Ok(Timeframe::Day),
            "7d" => Ok(Timeframe::Week),
            "30d" => Ok(Timeframe::Month),
            "1y" => Ok(Timeframe::Year),
            other => Err(ParseTimeframeError(other.to_string())),
        }
    }
}
