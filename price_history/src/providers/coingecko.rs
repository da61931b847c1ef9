mod provider;
mod response;

pub use provider::CoinGeckoProvider;
pub use response::parse_market_chart;
