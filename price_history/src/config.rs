//! Environment-based configuration helpers.

use thiserror::Error;

/// Name of the environment variable holding the upstream API key.
pub const API_KEY_ENV: &str = "COINGECKO_API_KEY";

/// An environment variable required by the application is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an environment variable, returning a structured error if it's missing.
///
/// Thin wrapper around `std::env::var` so that callers get a specific error
/// type instead of `VarError`.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    std::env::var(name).map_err(|_| MissingEnvVarError(name.to_string()))
}
