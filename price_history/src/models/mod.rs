pub mod price_point;
pub mod series;
pub mod timeframe;
