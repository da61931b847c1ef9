use chrono::DateTime;
use serde::Deserialize;

use crate::{models::price_point::PricePoint, providers::FetchError};

/// The subset of the `market_chart` payload this crate consumes.
///
/// The API also carries `market_caps` and `total_volumes` arrays of the same
/// shape; they are ignored here.
#[derive(Deserialize, Debug)]
struct MarketChartResponse {
    /// `[epochMillis, price]` pairs. Millis arrive as JSON numbers and may
    /// carry a fractional part, so they deserialize as `f64`.
    prices: Vec<(f64, f64)>,
}

/// Parses a 200-status `market_chart` body into price points.
///
/// Preserves API order. A malformed body is [`FetchError::InvalidResponse`];
/// a well-formed body with zero points is [`FetchError::EmptyResult`] so the
/// caller never treats it as a valid empty series.
pub fn parse_market_chart(body: &str) -> Result<Vec<PricePoint>, FetchError> {
    let parsed: MarketChartResponse = serde_json::from_str(body)
        .map_err(|err| FetchError::InvalidResponse(format!("malformed market_chart body: {err}")))?;

    let points = parsed
        .prices
        .into_iter()
        .map(|(millis, price)| {
            let timestamp = DateTime::from_timestamp_millis(millis as i64).ok_or_else(|| {
                FetchError::InvalidResponse(format!("timestamp {millis} out of range"))
            })?;
            Ok(PricePoint { timestamp, price })
        })
        .collect::<Result<Vec<_>, FetchError>>()?;

    if points.is_empty() {
        return Err(FetchError::EmptyResult);
    }
    Ok(points)
}
