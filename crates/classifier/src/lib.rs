//! Pose Classifiers
//!
//! Pure functions of the current frame's smoothed keypoints:
//! - Detection mode (full body / upper body / face and hands)
//! - Posture via weighted voting over geometric indicators
//! - Smile score from mouth landmark geometry

pub mod config;
pub mod detection;
pub mod posture;
pub mod smile;

pub use config::{DetectionConfig, PostureConfig, SmileConfig};
pub use detection::DetectionClassifier;
pub use posture::{Indicator, PostureClassifier, PostureScores};
pub use smile::SmileEstimator;
