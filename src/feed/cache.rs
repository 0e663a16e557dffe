use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::feed::error::FeedError;
use crate::feed::parsing::{parse_feed, validate_set};
use crate::feed::source::FeedSource;
use crate::feed::types::{Fetched, OrbitalElementRecord, Source};

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CacheEntry {
    key: String,
    records: Arc<Vec<OrbitalElementRecord>>,
    fetched_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_fresh_for(&self, key: &str, now: Instant) -> bool {
        self.key == key && now.saturating_duration_since(self.fetched_at) < self.ttl
    }
}

/// Single-slot, time-bounded cache in front of a [`FeedSource`].
///
/// Only the most recently fetched set is resident. The slot lock is held
/// across the upstream fetch, so concurrent requests for the same set share
/// one fetch.
pub struct TleCache<F> {
    source: F,
    ttl: Duration,
    slot: Mutex<Option<CacheEntry>>,
}

impl<F: FeedSource> TleCache<F> {
    #[cfg(test)]
    pub fn new(source: F) -> Self {
        Self::with_ttl(source, DEFAULT_TTL)
    }

    pub fn with_ttl(source: F, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the records for `set`, refetching when the resident entry is
    /// stale or belongs to another set.
    ///
    /// A failed fetch is reported even if a stale entry is still resident.
    pub async fn get(&self, set: &str) -> Result<Fetched, FeedError> {
        validate_set(set)?;

        let mut slot = self.slot.lock().await;

        if let Some(entry) = slot
            .as_ref()
            .filter(|entry| entry.is_fresh_for(set, Instant::now()))
        {
            log::debug!("Serving {} records for {} from cache", entry.records.len(), set);
            return Ok(Fetched {
                source: Source::Cache,
                records: entry.records.clone(),
            });
        }

        let body = match self.source.fetch(set).await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Failed to fetch set {}: {}", set, e);
                return Err(e);
            }
        };

        let records = Arc::new(parse_feed(&body));
        log::info!("Fetched {} records for set {}", records.len(), set);

        *slot = if records.is_empty() {
            log::warn!("Set {} returned no complete records, not caching", set);
            None
        } else {
            Some(CacheEntry {
                key: set.to_string(),
                records: records.clone(),
                fetched_at: Instant::now(),
                ttl: self.ttl,
            })
        };

        Ok(Fetched {
            source: Source::Upstream,
            records,
        })
    }
}
