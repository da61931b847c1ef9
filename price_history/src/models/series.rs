//! A price series together with its derived statistics.

use std::ops::RangeInclusive;

use crate::models::price_point::PricePoint;

/// A displayable price series: the points plus min/max/average.
///
/// Derived data, never stored: it is rebuilt from a cache entry's points
/// every time the displayed data changes, so the statistics always describe
/// exactly the points being shown (fresh or stale fallback alike).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
    min: f64,
    max: f64,
    avg: f64,
}

impl PriceSeries {
    /// Builds a series from points, computing the statistics in one pass.
    ///
    /// An empty point list yields `min = max = avg = 0`.
    pub fn from_points(points: Vec<PricePoint>) -> Self {
        if points.is_empty() {
            return Self::default();
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for point in &points {
            min = min.min(point.price);
            max = max.max(point.price);
            sum += point.price;
        }
        let avg = sum / points.len() as f64;

        Self { points, min, max, avg }
    }

    /// An empty series with zeroed statistics.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn avg(&self) -> f64 {
        self.avg
    }

    /// Vertical chart range: the price extent padded by 10% on each side,
    /// `0.0..=1.0` for an empty series.
    pub fn chart_range(&self) -> RangeInclusive<f64> {
        if self.points.is_empty() {
            return 0.0..=1.0;
        }
        let padding = (self.max - self.min) * 0.1;
        (self.min - padding)..=(self.max + padding)
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    fn point(secs: i64, price: f64) -> PricePoint {
        PricePoint {
            timestamp: DateTime::from_timestamp(secs, 0).unwrap(),
            price,
        }
    }

    #[test]
    fn stats_from_points() {
        let series =
            PriceSeries::from_points(vec![point(0, 100.0), point(60, 110.0), point(120, 90.0)]);
        assert_eq!(series.min(), 90.0);
        assert_eq!(series.max(), 110.0);
        assert_eq!(series.avg(), 100.0);
        assert_eq!(series.points().len(), 3);
    }

    #[test]
    fn empty_series_defaults() {
        let series = PriceSeries::empty();
        assert!(series.is_empty());
        assert_eq!(series.min(), 0.0);
        assert_eq!(series.max(), 0.0);
        assert_eq!(series.avg(), 0.0);
        assert_eq!(series.chart_range(), 0.0..=1.0);
    }

    #[test]
    fn chart_range_pads_by_tenth_of_extent() {
        let series = PriceSeries::from_points(vec![point(0, 100.0), point(60, 200.0)]);
        assert_eq!(series.chart_range(), 90.0..=210.0);
    }

    #[test]
    fn single_point_range_collapses_to_price() {
        let series = PriceSeries::from_points(vec![point(0, 50.0)]);
        assert_eq!(series.chart_range(), 50.0..=50.0);
        assert_eq!(series.avg(), 50.0);
    }
}
