use std::future::Future;
use std::time::Duration;

use crate::feed::error::FeedError;

pub const DEFAULT_URL_TEMPLATE: &str = "https://celestrak.org/NORAD/elements/{set}.txt";

/// Upstream provider of plaintext element feeds, keyed by set name.
pub trait FeedSource: Send + Sync {
    fn fetch(&self, set: &str) -> impl Future<Output = Result<String, FeedError>> + Send;
}

pub struct HttpFeed {
    client: reqwest::Client,
    url_template: String,
}

impl HttpFeed {
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url_template: url_template.into(),
        })
    }

    pub fn url_for(&self, set: &str) -> String {
        self.url_template.replace("{set}", set)
    }
}

impl FeedSource for HttpFeed {
    async fn fetch(&self, set: &str) -> Result<String, FeedError> {
        let url = self.url_for(set);
        log::debug!("Fetching feed {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::UpstreamUnavailable(format!(
                "{}: HTTP {}",
                url, status
            )));
        }

        Ok(response.text().await?)
    }
}
