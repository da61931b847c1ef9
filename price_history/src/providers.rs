//! Provider abstraction for price-history sources.
//!
//! This module defines the [`HistoryProvider`] trait, a unified interface
//! for fetching a coin's price history from any market data vendor. The
//! shipped implementation talks to CoinGecko ([`coingecko`]); tests
//! substitute scripted providers.
//!
//! The trait is designed for async usage and supports dynamic dispatch
//! (`dyn HistoryProvider`) for runtime selection of providers.

pub mod coingecko;
pub mod errors;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

pub use errors::FetchError;

use crate::{
    config::MissingEnvVarError,
    models::{price_point::PricePoint, timeframe::Timeframe},
};

/// Trait for fetching a coin's historical prices from a market data vendor.
///
/// Implementations are stateless across calls: the only side effect of
/// [`fetch_history`](HistoryProvider::fetch_history) is the network request
/// itself. Classifying the outcome (success, rate-limited, invalid) is the
/// provider's job; deciding what to do about it belongs to the
/// [`Retriever`](crate::retrieval::Retriever).
#[async_trait]
pub trait HistoryProvider {
    /// Fetches the price history for `coin_id` over `timeframe`.
    ///
    /// # Returns
    ///
    /// * `Ok(points)` - Points in API order (timestamp ascending), never empty.
    /// * `Err(FetchError)` - The classified failure; an empty result is
    ///   [`FetchError::EmptyResult`], never `Ok(vec![])`.
    async fn fetch_history(
        &self,
        coin_id: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<PricePoint>, FetchError>;
}

/// Errors that can occur during the creation of a provider instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// Required environment variable is not set.
    #[snafu(display("Missing environment variable: {source}"))]
    MissingEnvVar {
        source: MissingEnvVarError,
        backtrace: Backtrace,
    },

    /// Failed to init the reqwest client.
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// API key contains characters that cannot appear in a header value.
    #[snafu(display("Invalid API key format: {source}"))]
    InvalidApiKey {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },
}
