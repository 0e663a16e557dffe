use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrbitalElementRecord {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Source {
    Cache,
    Upstream,
}

#[derive(Debug, Clone)]
pub struct Fetched {
    pub source: Source,
    pub records: Arc<Vec<OrbitalElementRecord>>,
}

pub fn first_records(records: &[OrbitalElementRecord], limit: Option<usize>) -> Vec<OrbitalElementRecord> {
    records
        .iter()
        .take(limit.unwrap_or(records.len()))
        .cloned()
        .collect()
}
