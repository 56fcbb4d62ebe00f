use thiserror::Error;

/// Failures raised while setting up or driving a simulation.
///
/// Exhaustion of the event loop is not an error: `Engine::iterate` reports it
/// by returning `false`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SsaError {
    #[error("reactant '{label}' not found in the species list")]
    ReactantNotFound { label: String },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("end time {end_time} is not reachable from current time {current}")]
    InvalidEndTime { end_time: f64, current: f64 },
    #[error("reaction index {0} is out of range")]
    UnknownReaction(usize),
}

impl SsaError {
    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SsaError>;
