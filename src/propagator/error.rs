use thiserror::Error;

/// Per-object failures. Never fatal to a tick or to a tracked set.
#[derive(Debug, Error)]
pub enum PropagateError {
    #[error("unparsable elements: {0}")]
    UnparsableElements(String),
    #[error("propagation failure: {0}")]
    PropagationFailure(String),
}

impl From<sgp4::TleError> for PropagateError {
    fn from(err: sgp4::TleError) -> Self {
        PropagateError::UnparsableElements(err.to_string())
    }
}

impl From<sgp4::ElementsError> for PropagateError {
    fn from(err: sgp4::ElementsError) -> Self {
        PropagateError::UnparsableElements(err.to_string())
    }
}

impl From<sgp4::Error> for PropagateError {
    fn from(err: sgp4::Error) -> Self {
        PropagateError::PropagationFailure(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum PropagatorError {
    #[error("propagator worker has exited")]
    Stopped,
}
