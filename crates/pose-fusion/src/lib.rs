//! Pose Fusion
//!
//! Turns noisy per-frame keypoint estimates into a stable, classified
//! "current pose":
//! - Frame throttling and single-flight processing
//! - Extraction, temporal smoothing and classification per frame
//! - History carry-forward when a frame has no signal
//! - Whole-value publication of the fused pose to readers

pub mod config;
pub mod engine;
pub mod error;
pub mod estimator;
pub mod gate;
pub mod service;

pub use self::config::{FusionConfig, HistoryConfig, ThrottleConfig};
pub use engine::FusionEngine;
pub use error::{EstimatorError, FusionError};
pub use estimator::{Frame, KeypointEstimator};
pub use gate::{Admission, FrameGate};
pub use service::{FusionService, FusionStats, PoseSlot};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install a global fmt subscriber at INFO
pub fn init_logging() -> Result<(), FusionError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| FusionError::Logging(e.to_string()))
}
