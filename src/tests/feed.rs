use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::feed::{FeedError, FeedSource};

#[derive(Default)]
struct Inner {
    body: String,
    unavailable: AtomicBool,
    fetches: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

/// In-memory feed serving the same body for every set.
#[derive(Clone, Default)]
pub struct StaticFeed {
    inner: Arc<Inner>,
    latency: Option<Duration>,
}

impl StaticFeed {
    pub fn new(body: String) -> Self {
        Self {
            inner: Arc::new(Inner {
                body,
                ..Default::default()
            }),
            latency: None,
        }
    }

    /// Sleep on the tokio clock before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn set_unavailable(&self) {
        self.inner.unavailable.store(true, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> usize {
        self.inner.fetches.load(Ordering::SeqCst)
    }

    pub fn requested_sets(&self) -> Vec<String> {
        self.inner.requested.lock().unwrap().clone()
    }
}

impl FeedSource for StaticFeed {
    async fn fetch(&self, set: &str) -> Result<String, FeedError> {
        self.inner.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.requested.lock().unwrap().push(set.to_string());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(FeedError::UpstreamUnavailable(format!(
                "{}: connection refused",
                set
            )));
        }
        Ok(self.inner.body.clone())
    }
}
