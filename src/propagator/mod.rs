mod buffer;
mod ephemeris;
mod error;
mod tracked;
mod types;
mod worker;

pub use buffer::{is_positionable, PositionBuffer, RenderPosition, INVALID_POSITION};
pub use ephemeris::{Ephemeris, Sgp4Ephemeris};
pub use error::{PropagateError, PropagatorError};
pub use tracked::TrackedSet;
pub use types::Configure;
pub use worker::{PositionReceiver, PropagatorHandle, PropagatorSettings, DEFAULT_TICK_INTERVAL};
