use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::feed::OrbitalElementRecord;
use crate::propagator::buffer::{PositionBuffer, RenderPosition, INVALID_POSITION};
use crate::propagator::ephemeris::Ephemeris;
use crate::propagator::error::PropagateError;
use crate::render::eci_to_render;

pub struct TrackedSet<S> {
    generation: u64,
    names: Arc<[String]>,
    states: Vec<S>,
}

impl<S> TrackedSet<S> {
    pub fn empty() -> Self {
        Self {
            generation: 0,
            names: Arc::from(Vec::new()),
            states: Vec::new(),
        }
    }

    pub fn parse<E>(ephemeris: &E, records: &[OrbitalElementRecord], generation: u64) -> Self
    where
        E: Ephemeris<State = S>,
    {
        let mut names = Vec::with_capacity(records.len());
        let mut states = Vec::with_capacity(records.len());

        for record in records {
            match ephemeris.parse(record) {
                Ok(state) => {
                    names.push(record.name.clone());
                    states.push(state);
                }
                Err(e) => log::warn!("Dropping {}: {}", record.name, e),
            }
        }

        Self {
            generation,
            names: names.into(),
            states,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Propagate every object to `instant`. An object that fails gets
    /// [`INVALID_POSITION`] and the rest are unaffected.
    pub fn propagate<E>(
        &self,
        ephemeris: &E,
        instant: DateTime<Utc>,
        tick_interval: Duration,
    ) -> PositionBuffer
    where
        E: Ephemeris<State = S>,
    {
        let positions = self
            .states
            .iter()
            .enumerate()
            .map(|(index, state)| match position(ephemeris, state, instant) {
                Ok(position) => position,
                Err(e) => {
                    log::debug!("{} not positionable: {}", self.names[index], e);
                    INVALID_POSITION
                }
            })
            .collect();

        PositionBuffer::new(self.generation, tick_interval, self.names.clone(), positions)
    }

    pub fn unpositionable(&self, tick_interval: Duration) -> PositionBuffer {
        PositionBuffer::new(
            self.generation,
            tick_interval,
            self.names.clone(),
            vec![INVALID_POSITION; self.len()],
        )
    }
}

fn position<E: Ephemeris>(
    ephemeris: &E,
    state: &E::State,
    instant: DateTime<Utc>,
) -> Result<RenderPosition, PropagateError> {
    let position_km = ephemeris.position_km(state, instant)?;
    if position_km.iter().any(|c| !c.is_finite()) {
        return Err(PropagateError::PropagationFailure(
            "non-finite position".to_string(),
        ));
    }
    Ok(eci_to_render(position_km))
}

/// Wall-clock time multiplied by `time_scale`, or `None` when the product
/// falls outside the representable range.
pub fn simulated_instant(now: DateTime<Utc>, time_scale: f64) -> Option<DateTime<Utc>> {
    let millis = now.timestamp_millis() as f64 * time_scale;
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}
