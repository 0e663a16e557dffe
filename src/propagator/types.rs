use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::feed::OrbitalElementRecord;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Replace the tracked set, restart ticking and publish immediately.
    Init { records: Vec<OrbitalElementRecord> },
    Config(Configure),
    /// Replace the tracked set, keeping the current timer.
    UpdateTles { records: Vec<OrbitalElementRecord> },
    Stop,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct Configure {
    #[serde(default)]
    pub tick_interval_ms: Option<u64>,
    #[serde(default)]
    pub time_scale: Option<f64>,
}

impl Configure {
    pub fn validate(&self) -> Result<(), String> {
        if self.tick_interval_ms == Some(0) {
            return Err("tick_interval_ms must be positive".into());
        }
        if let Some(scale) = self.time_scale {
            if !scale.is_finite() {
                return Err("time_scale must be finite".into());
            }
        }
        Ok(())
    }
}
