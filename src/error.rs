//! Error taxonomy for the classification pipeline.
//!
//! Configuration problems are fatal at startup; invalid input is an invariant
//! failure isolated to one frame; device errors pause capture until the
//! microphone comes back.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Sample rate, frame length, or model dimensions disagree with the
    /// configured front-end. Must prevent the pipeline from starting.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A malformed value reached a boundary that correct pipelines never
    /// feed, e.g. a feature vector of the wrong length.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Audio capture failure: device lost, permission revoked, stream died.
    #[error("audio device error: {0}")]
    Device(String),
}
