//! Fusion configuration
//!
//! Defaults reproduce the tuned pipeline constants. `FusionConfig::load`
//! layers an optional file and `POSE_FUSION_*` environment variables on top.

use classifier::{DetectionConfig, PostureConfig, SmileConfig};
use extractor::ExtractionConfig;
use serde::{Deserialize, Serialize};
use smoothing::SmoothingConfig;
use std::path::Path;
use std::time::Duration;

use crate::FusionError;

/// Frame acceptance rate limit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Maximum accepted frames per second
    pub max_fps: f64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self { max_fps: 30.0 }
    }
}

impl ThrottleConfig {
    /// Minimum spacing between accepted frames
    pub fn min_interval(&self) -> Result<Duration, FusionError> {
        if !self.max_fps.is_finite() || self.max_fps <= 0.0 {
            return Err(FusionError::InvalidConfig(format!(
                "throttle.max_fps must be positive, got {}",
                self.max_fps
            )));
        }

        Duration::try_from_secs_f64(1.0 / self.max_fps).map_err(|e| {
            FusionError::InvalidConfig(format!(
                "throttle.max_fps {} gives an unusable interval: {}",
                self.max_fps, e
            ))
        })
    }
}

/// History window capacities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Fused poses retained for fallback and EMA
    pub pose_capacity: usize,
    /// Faces, hand lists and posture verdicts retained
    pub signal_capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            pose_capacity: history::POSE_HISTORY_CAPACITY,
            signal_capacity: history::SIGNAL_HISTORY_CAPACITY,
        }
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub throttle: ThrottleConfig,
    pub history: HistoryConfig,
    pub extraction: ExtractionConfig,
    pub smoothing: SmoothingConfig,
    pub detection: DetectionConfig,
    pub posture: PostureConfig,
    pub smile: SmileConfig,
}

impl FusionConfig {
    /// Load from an optional config file plus `POSE_FUSION` environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FusionError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("POSE_FUSION")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: FusionConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), FusionError> {
        self.throttle.min_interval()?;

        if self.history.pose_capacity == 0 || self.history.signal_capacity == 0 {
            return Err(FusionError::InvalidConfig(
                "history capacities must be > 0".to_string(),
            ));
        }

        if self.extraction.max_hands == 0 {
            return Err(FusionError::InvalidConfig(
                "extraction.max_hands must be > 0".to_string(),
            ));
        }

        let extraction = &self.extraction;
        let smoothing = &self.smoothing;
        let unit_values = [
            ("extraction.critical_threshold", extraction.critical_threshold),
            ("extraction.standard_threshold", extraction.standard_threshold),
            ("extraction.lower_body_reduction", extraction.lower_body_reduction),
            ("extraction.threshold_floor", extraction.threshold_floor),
            ("extraction.fallback_min_confidence", extraction.fallback_min_confidence),
            ("extraction.stale_decay", extraction.stale_decay),
            ("extraction.blend_below_confidence", extraction.blend_below_confidence),
            ("extraction.hand_threshold", extraction.hand_threshold),
            ("smoothing.joint_alpha", smoothing.joint_alpha),
            ("smoothing.face_trust_confidence", smoothing.face_trust_confidence),
            ("smoothing.hand_trust_confidence", smoothing.hand_trust_confidence),
            ("smoothing.hand_history_decay", smoothing.hand_history_decay),
            ("detection.confident_joint_threshold", self.detection.confident_joint_threshold),
            ("posture.indicator_confidence", self.posture.indicator_confidence),
            ("posture.decision_threshold", self.posture.decision_threshold),
            ("posture.max_confidence", self.posture.max_confidence),
        ];
        for (field, value) in unit_values {
            if !(0.0..=1.0).contains(&value) {
                return Err(FusionError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    field, value
                )));
            }
        }

        let ranges = [
            ("smile.width_range", self.smile.width_range),
            ("smile.corner_lift_range", self.smile.corner_lift_range),
            ("smile.open_range", self.smile.open_range),
        ];
        for (field, value) in ranges {
            if !value.is_finite() || value <= 0.0 {
                return Err(FusionError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    field, value
                )));
            }
        }

        Ok(())
    }
}
