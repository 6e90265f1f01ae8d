//! HTTP feed fetcher.

use std::time::Duration;

use reader_core::{FeedSnapshot, ReaderConfig, ReaderError};

use crate::cache::FeedCache;
use crate::parse::parse_feed;

/// Feed fetcher with a per-URL snapshot cache.
pub struct FeedClient {
    http: reqwest::Client,
    cache: FeedCache,
    config: ReaderConfig,
}

impl FeedClient {
    /// Create a client with a default `reqwest::Client`.
    pub fn new(config: ReaderConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, config: ReaderConfig) -> Self {
        Self {
            http,
            cache: FeedCache::new(),
            config,
        }
    }

    /// Fetch and parse a feed.
    ///
    /// A snapshot younger than `config.cache_ttl_secs` is served from the
    /// cache without touching the network.
    pub async fn fetch(&mut self, url: &str) -> crate::Result<FeedSnapshot> {
        let ttl = Duration::from_secs(self.config.cache_ttl_secs);
        if let Some(snapshot) = self.cache.get(url, ttl) {
            tracing::debug!("Feed cache hit for: {}", url);
            return Ok(snapshot);
        }

        tracing::debug!("Fetching feed from: {}", url);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| ReaderError::Fetch(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReaderError::Fetch(format!(
                "HTTP {} when fetching {}",
                status, url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| ReaderError::Fetch(err.to_string()))?;

        let snapshot = parse_feed(&bytes, &self.config)?;
        tracing::debug!("Parsed {} entries from {}", snapshot.entries.len(), url);

        self.cache.insert(url, snapshot.clone());
        Ok(snapshot)
    }
}
