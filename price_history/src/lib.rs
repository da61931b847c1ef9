//! Price-history retrieval and caching for cryptocurrency market data.
//!
//! The crate is organized around three pieces:
//!
//! - [`providers`]: the market data client. Issues HTTP requests to the
//!   upstream API for a coin/timeframe pair and translates raw JSON into
//!   typed [`models::price_point::PricePoint`]s.
//! - [`cache`]: a keyed in-memory store with timeframe-specific freshness
//!   windows and a "stale but usable" fallback state.
//! - [`retrieval`]: the orchestrator tying the two together. Cache fast
//!   path, rate-limit-aware retry with bounded backoff, and graceful
//!   degradation to stale cached data when a fetch fails.

pub mod cache;
pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
pub mod retrieval;

pub use errors::Error;
pub use models::{price_point::PricePoint, series::PriceSeries, timeframe::Timeframe};
pub use retrieval::{RetrievalStatus, Retriever};
