use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::feed::OrbitalElementRecord;
use crate::propagator::error::PropagateError;

/// Orbital-mechanics boundary: turns element records into an opaque state
/// once, then answers "where is it at this instant" in an Earth-centered
/// inertial frame (km).
pub trait Ephemeris: Send + Sync + 'static {
    type State: Send + Sync + 'static;

    fn parse(&self, record: &OrbitalElementRecord) -> Result<Self::State, PropagateError>;

    fn position_km(
        &self,
        state: &Self::State,
        instant: DateTime<Utc>,
    ) -> Result<[f64; 3], PropagateError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sgp4Ephemeris;

pub struct Sgp4State {
    elements: Elements,
    constants: Constants,
}

impl Ephemeris for Sgp4Ephemeris {
    type State = Sgp4State;

    fn parse(&self, record: &OrbitalElementRecord) -> Result<Sgp4State, PropagateError> {
        let elements = Elements::from_tle(
            Some(record.name.clone()),
            record.line1.as_bytes(),
            record.line2.as_bytes(),
        )?;
        let constants = Constants::from_elements(&elements)?;
        Ok(Sgp4State {
            elements,
            constants,
        })
    }

    fn position_km(
        &self,
        state: &Sgp4State,
        instant: DateTime<Utc>,
    ) -> Result<[f64; 3], PropagateError> {
        let minutes = state
            .elements
            .datetime_to_minutes_since_epoch(&instant.naive_utc())
            .map_err(|e| PropagateError::PropagationFailure(e.to_string()))?;

        let prediction = state.constants.propagate(minutes)?;
        Ok(prediction.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{iss_epoch, iss_record};

    #[test]
    fn propagates_near_epoch() {
        let state = Sgp4Ephemeris.parse(&iss_record()).unwrap();
        let [x, y, z] = Sgp4Ephemeris.position_km(&state, iss_epoch()).unwrap();
        let radius = (x * x + y * y + z * z).sqrt();
        assert!((6600.0..7000.0).contains(&radius), "radius {}", radius);
    }

    #[test]
    fn rejects_corrupted_lines() {
        let mut record = iss_record();
        record.line1 = record.line1.replace("25544U", "2554XU");
        assert!(matches!(
            Sgp4Ephemeris.parse(&record),
            Err(PropagateError::UnparsableElements(_))
        ));

        let mut record = iss_record();
        record.line2.truncate(20);
        assert!(Sgp4Ephemeris.parse(&record).is_err());
    }
}
