//! In-memory per-URL feed cache.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reader_core::FeedSnapshot;

/// Keeps the most recent snapshot per feed URL for a bounded time.
#[derive(Default)]
pub struct FeedCache {
    entries: HashMap<String, CachedFeed>,
}

struct CachedFeed {
    snapshot: FeedSnapshot,
    stored_at: Instant,
}

impl FeedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached snapshot when it is younger than `ttl`.
    pub fn get(&self, url: &str, ttl: Duration) -> Option<FeedSnapshot> {
        let cached = self.entries.get(url)?;
        if cached.stored_at.elapsed() < ttl {
            Some(cached.snapshot.clone())
        } else {
            None
        }
    }

    /// Stores a snapshot, replacing any previous one for the same URL.
    pub fn insert(&mut self, url: &str, snapshot: FeedSnapshot) {
        self.entries.insert(
            url.to_string(),
            CachedFeed {
                snapshot,
                stored_at: Instant::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(title: &str) -> FeedSnapshot {
        FeedSnapshot::new(title.to_string(), Vec::new())
    }

    #[test]
    fn fresh_entry_is_returned() {
        let mut cache = FeedCache::new();
        cache.insert("https://example.com/rss", snapshot("Fresh"));

        let hit = cache.get("https://example.com/rss", Duration::from_secs(300));
        assert_eq!(hit.map(|s| s.title), Some("Fresh".to_string()));
    }

    #[test]
    fn zero_ttl_always_misses() {
        let mut cache = FeedCache::new();
        cache.insert("https://example.com/rss", snapshot("Stale"));

        assert!(cache.get("https://example.com/rss", Duration::ZERO).is_none());
    }

    #[test]
    fn unknown_url_misses() {
        let cache = FeedCache::new();
        assert!(cache.get("https://example.com/rss", Duration::from_secs(300)).is_none());
    }

    #[test]
    fn insert_replaces_previous_snapshot() {
        let mut cache = FeedCache::new();
        cache.insert("https://example.com/rss", snapshot("First"));
        cache.insert("https://example.com/rss", snapshot("Second"));

        let hit = cache.get("https://example.com/rss", Duration::from_secs(300));
        assert_eq!(hit.map(|s| s.title), Some("Second".to_string()));
    }
}
