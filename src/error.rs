use thiserror::Error;

/// A ping engine result.
pub type Result<T> = std::result::Result<T, Error>;

/// A ping engine error.
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration was missing or invalid.
    #[error("invalid config: {0}")]
    BadConfig(String),
    /// The network layer refused to transmit a probe.
    #[error("probe send failed: {0}")]
    ProbeFailed(String),
    /// The framework signalled a failure for this instance.
    #[error("algorithm failure")]
    AlgorithmFailure,
}
