use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("invalid set name: {0:?}")]
    InvalidSet(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::UpstreamUnavailable(format!("request timed out: {}", err))
        } else {
            FeedError::UpstreamUnavailable(err.to_string())
        }
    }
}
