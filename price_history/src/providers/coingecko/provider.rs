use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;
use tracing::debug;

use crate::{
    config::{API_KEY_ENV, get_env_var},
    models::{price_point::PricePoint, timeframe::Timeframe},
    providers::{
        ClientBuildSnafu, FetchError, HistoryProvider, InvalidApiKeySnafu, MissingEnvVarSnafu,
        ProviderInitError, coingecko::response::parse_market_chart,
    },
};

const BASE_URL: &str = "https://api.coingecko.com/api/v3";
const USER_AGENT: &str = "Mozilla/5.0";
const API_KEY_HEADER: &str = "X-CG-API-KEY";

/// CoinGecko market-chart provider.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
    _api_key: SecretString,
}

impl CoinGeckoProvider {
    /// Creates a new CoinGecko provider.
    ///
    /// Reads the API key from the `COINGECKO_API_KEY` environment variable
    /// and bakes it into the client's default headers.
    pub fn new() -> Result<Self, ProviderInitError> {
        Self::with_base_url(BASE_URL)
    }

    /// Same as [`new`](Self::new) against a non-default API root.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderInitError> {
        let api_key =
            SecretString::from(get_env_var(API_KEY_ENV).context(MissingEnvVarSnafu)?);

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));
        headers.insert(
            API_KEY_HEADER,
            header::HeaderValue::from_str(api_key.expose_secret())
                .context(InvalidApiKeySnafu)?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            _api_key: api_key,
        })
    }

    /// Probes API availability via the `/ping` endpoint.
    ///
    /// Same status classification as a history fetch: 429 maps to
    /// [`FetchError::RateLimited`], any other non-200 to
    /// [`FetchError::InvalidResponse`].
    pub async fn ping(&self) -> Result<(), FetchError> {
        let url = format!("{}/ping", self.base_url);
        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited),
            status => Err(FetchError::InvalidResponse(format!(
                "unexpected status {status} from /ping"
            ))),
        }
    }
}

/// Coin ids are URL path segments; CoinGecko ids are lowercase slugs.
fn validate_coin_id(coin_id: &str) -> Result<(), FetchError> {
    let well_formed = !coin_id.is_empty()
        && coin_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if well_formed {
        Ok(())
    } else {
        Err(FetchError::InvalidUrl(coin_id.to_string()))
    }
}

#[async_trait]
impl HistoryProvider for CoinGeckoProvider {
    async fn fetch_history(
        &self,
        coin_id: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<PricePoint>, FetchError> {
        validate_coin_id(coin_id)?;

        let url = format!("{}/coins/{}/market_chart", self.base_url, coin_id);
        let days = timeframe.lookback_days().to_string();
        let query = [
            ("vs_currency", "usd"),
            ("days", days.as_str()),
            ("interval", timeframe.granularity().as_str()),
        ];

        debug!(coin_id, %timeframe, "requesting market chart");
        let response = self.client.get(&url).query(&query).send().await?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::TOO_MANY_REQUESTS => return Err(FetchError::RateLimited),
            status => {
                return Err(FetchError::InvalidResponse(format!(
                    "unexpected status {status}"
                )));
            }
        }

        let body = response.text().await?;
        parse_market_chart(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coin_id_validation() {
        assert!(validate_coin_id("bitcoin").is_ok());
        assert!(validate_coin_id("wrapped-staked-ether_2").is_ok());
        assert!(validate_coin_id("").is_err());
        assert!(validate_coin_id("bit coin").is_err());
        assert!(validate_coin_id("../admin").is_err());
        assert!(validate_coin_id("coin?x=1").is_err());
    }
}
