//! Keyed in-memory store for fetched price histories.
//!
//! Each `(coin id, timeframe)` pair maps to at most one [`CacheEntry`];
//! writes replace, never append. Validity is a pure function of entry age
//! against the timeframe's freshness window, so an entry must always be
//! looked up by the full key: the window belongs to the timeframe, not to
//! the stored entry.
//!
//! The store is unbounded by design: its population is capped in practice by
//! coins × four timeframes, entries are replaced in place on re-fetch, and
//! stale entries are deliberately kept around as fallback data for failed
//! fetches. [`HistoryCache::evict_expired`] exists as a manual maintenance
//! hook; nothing evicts in the background.
//!
//! No interior locking: the cache expects a single logical owner (the
//! [`Retriever`](crate::retrieval::Retriever)). Sharing it across concurrent
//! callers requires external mutual exclusion so a fresher write cannot be
//! clobbered by a stale one arriving late.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{price_point::PricePoint, timeframe::Timeframe};

/// Composite cache key: one entry per coin per timeframe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub coin_id: String,
    pub timeframe: Timeframe,
}

impl CacheKey {
    pub fn new(coin_id: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            coin_id: coin_id.into(),
            timeframe,
        }
    }
}

/// A fetched price history and the instant it was fetched.
///
/// `points` is ordered by timestamp ascending, as returned by the API, and
/// is never empty: an empty fetch result is a failure upstream and is never
/// cached.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub points: Vec<PricePoint>,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(points: Vec<PricePoint>, fetched_at: DateTime<Utc>) -> Self {
        debug_assert!(!points.is_empty(), "empty fetch results are never cached");
        Self { points, fetched_at }
    }

    /// Whether the entry is still fresh for the given timeframe at `now`.
    ///
    /// An entry aged exactly the freshness window is already stale.
    pub fn is_valid(&self, timeframe: Timeframe, now: DateTime<Utc>) -> bool {
        now - self.fetched_at < timeframe.freshness_window()
    }
}

/// In-memory price-history cache, keyed by `(coin id, timeframe)`.
#[derive(Debug, Default)]
pub struct HistoryCache {
    entries: HashMap<CacheKey, CacheEntry>,
}

impl HistoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `key`, fresh or stale, if one was ever stored.
    pub fn get(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Stores `entry` under `key`, replacing any previous entry.
    pub fn put(&mut self, key: CacheKey, entry: CacheEntry) {
        self.entries.insert(key, entry);
    }

    /// Drops every entry that is no longer valid at `now`, returning how
    /// many were removed.
    ///
    /// Manual maintenance only. Note that evicted entries are also lost as
    /// stale-fallback data, so call this only when that trade-off is wanted.
    pub fn evict_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|key, entry| entry.is_valid(key.timeframe, now));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn points_at(now: DateTime<Utc>) -> Vec<PricePoint> {
        vec![PricePoint {
            timestamp: now,
            price: 42.0,
        }]
    }

    #[test]
    fn validity_boundary_is_exclusive() {
        let now = Utc::now();
        let entry = CacheEntry::new(points_at(now), now);
        let window = Timeframe::Day.freshness_window();

        assert!(entry.is_valid(Timeframe::Day, now));
        assert!(entry.is_valid(Timeframe::Day, now + window - Duration::seconds(1)));
        // Exactly at the window boundary the entry is stale.
        assert!(!entry.is_valid(Timeframe::Day, now + window));
        assert!(!entry.is_valid(Timeframe::Day, now + window + Duration::seconds(1)));
    }

    #[test]
    fn validity_depends_on_timeframe_window() {
        let now = Utc::now();
        let entry = CacheEntry::new(points_at(now), now);
        let probe = now + Duration::minutes(10);

        // Ten minutes old: stale for Day (5 min window), fresh for Week (15 min).
        assert!(!entry.is_valid(Timeframe::Day, probe));
        assert!(entry.is_valid(Timeframe::Week, probe));
    }

    #[test]
    fn put_replaces_existing_entry() {
        let now = Utc::now();
        let key = CacheKey::new("bitcoin", Timeframe::Day);
        let mut cache = HistoryCache::new();

        cache.put(key.clone(), CacheEntry::new(points_at(now), now));
        let later = now + Duration::minutes(1);
        cache.put(key.clone(), CacheEntry::new(points_at(later), later));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key).unwrap().fetched_at, later);
    }

    #[test]
    fn keys_differ_per_timeframe() {
        let now = Utc::now();
        let mut cache = HistoryCache::new();
        cache.put(
            CacheKey::new("bitcoin", Timeframe::Day),
            CacheEntry::new(points_at(now), now),
        );
        cache.put(
            CacheKey::new("bitcoin", Timeframe::Week),
            CacheEntry::new(points_at(now), now),
        );

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&CacheKey::new("bitcoin", Timeframe::Month)).is_none());
    }

    #[test]
    fn evict_expired_keeps_fresh_entries() {
        let now = Utc::now();
        let mut cache = HistoryCache::new();
        // Fresh for Year (1 h window), stale for Day (5 min window).
        let fetched = now - Duration::minutes(30);
        cache.put(
            CacheKey::new("bitcoin", Timeframe::Day),
            CacheEntry::new(points_at(fetched), fetched),
        );
        cache.put(
            CacheKey::new("bitcoin", Timeframe::Year),
            CacheEntry::new(points_at(fetched), fetched),
        );

        assert_eq!(cache.evict_expired(now), 1);
        assert!(cache.get(&CacheKey::new("bitcoin", Timeframe::Day)).is_none());
        assert!(cache.get(&CacheKey::new("bitcoin", Timeframe::Year)).is_some());
    }
}
