use thiserror::Error;

use crate::providers::FetchError;

/// The unified error type for the `price_history` crate.
///
/// Everything recoverable (rate limits and transport failures with cached
/// data on hand) is absorbed by the
/// [`Retriever`](crate::retrieval::Retriever) as a stale fallback; only
/// terminal outcomes surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// Rate-limited with no cached data, and every retry was rate-limited
    /// too.
    #[error("connection lost: rate limited through {attempts} retries")]
    RetriesExhausted { attempts: u32 },

    /// A fetch failed with no cached data to fall back on.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl Error {
    /// The message shown to an end user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            // The original outcome was a rate limit, so that is what the
            // user is told, not the retry mechanics.
            Error::RetriesExhausted { .. } => FetchError::RateLimited.user_message(),
            Error::Fetch(err) => err.user_message(),
        }
    }
}
