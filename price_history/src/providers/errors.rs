use thiserror::Error;

/// Errors that can occur within a [`HistoryProvider`](super::HistoryProvider)
/// implementation.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The coin id cannot form a well-formed request URL. This is a
    /// programming-error-class fault: it never happens with valid coin ids
    /// and should fail fast rather than be retried or masked.
    #[error("invalid request URL for coin id {0:?}")]
    InvalidUrl(String),

    /// The API answered 429; the caller may retry or fall back to cache.
    #[error("API rate limit exceeded")]
    RateLimited,

    /// Unexpected status code or an unparsable body.
    #[error("invalid response from server: {0}")]
    InvalidResponse(String),

    /// A well-formed response carrying zero points. Treated as a failure so
    /// the caller never caches an empty series.
    #[error("response contained no price points")]
    EmptyResult,

    /// Transport-level failure (connection, timeout).
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl FetchError {
    /// Maps the failure onto the message shown to an end user.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::InvalidUrl(_) => "Invalid URL".to_string(),
            FetchError::RateLimited => {
                "Rate limit exceeded. Please try again in a minute.".to_string()
            }
            FetchError::InvalidResponse(_) | FetchError::EmptyResult => {
                "Unable to fetch data from server. Please try again later.".to_string()
            }
            FetchError::Request(err) if err.is_timeout() => {
                "Request timed out. Please try again.".to_string()
            }
            FetchError::Request(err) if err.is_connect() => {
                "No internet connection. Please check your connection and try again.".to_string()
            }
            FetchError::Request(_) => {
                "Failed to fetch price history. Please try again.".to_string()
            }
        }
    }
}
