mod cache;
mod error;
mod parsing;
mod source;
mod types;

pub use cache::{TleCache, DEFAULT_TTL};
pub use error::FeedError;
pub use source::{FeedSource, HttpFeed, DEFAULT_URL_TEMPLATE};
pub use types::{first_records, OrbitalElementRecord, Source};
