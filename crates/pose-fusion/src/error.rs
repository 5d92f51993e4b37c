//! Fusion error types

use thiserror::Error;

/// Failures reported by the keypoint estimator for one frame
#[derive(Debug, Clone, Error)]
pub enum EstimatorError {
    /// Estimator ran out of memory, buffers or compute budget
    #[error("Estimator resources exhausted: {0}")]
    ResourceExhausted(String),

    /// Frame could not be interpreted
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    /// Any other backend failure
    #[error("Estimator backend error: {0}")]
    Backend(String),
}

/// Errors surfaced by the fusion service
#[derive(Debug, Error)]
pub enum FusionError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Fusion worker failed to start: {0}")]
    Spawn(String),

    #[error("Fusion worker is not running")]
    WorkerStopped,

    #[error("Logging setup failed: {0}")]
    Logging(String),
}
