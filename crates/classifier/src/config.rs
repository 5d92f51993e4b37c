//! Classifier configuration

use serde::{Deserialize, Serialize};

/// Detection-mode configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Joints above this confidence count as confident
    pub confident_joint_threshold: f32,

    /// Confident joints needed for full or upper body tracking
    pub min_body_joints: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            confident_joint_threshold: 0.3,
            min_body_joints: 8,
        }
    }
}

/// Posture indicator thresholds and vote weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureConfig {
    /// Joints present in the frame before posture is evaluated
    pub min_joints: usize,

    /// Indicator joints must exceed this confidence
    pub indicator_confidence: f32,

    /// Knee angle below which the leg reads as bent (degrees)
    pub knee_angle_sitting_deg: f32,
    pub knee_angle_sitting_weight: f32,
    pub knee_angle_standing_weight: f32,

    /// Hip-knee vertical gap below which the thigh reads as horizontal
    pub hip_knee_sitting_distance: f32,
    pub hip_knee_sitting_weight: f32,
    pub hip_knee_standing_weight: f32,

    /// Torso lean from vertical under which the torso reads as upright (degrees)
    pub torso_upright_deg: f32,
    pub torso_standing_weight: f32,
    pub torso_sitting_weight: f32,

    /// Head-to-hip share of total body height below which the body reads as folded
    pub height_ratio_sitting: f32,
    pub height_ratio_sitting_weight: f32,
    pub height_ratio_standing_weight: f32,

    /// Mean ankle confidence below which ankles read as hidden
    pub ankle_visibility_sitting: f32,
    pub ankle_sitting_weight: f32,
    pub ankle_standing_weight: f32,

    /// Normalized score a verdict must exceed
    pub decision_threshold: f32,

    /// Cap on the reported verdict confidence
    pub max_confidence: f32,
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            min_joints: 5,
            indicator_confidence: 0.3,
            knee_angle_sitting_deg: 120.0,
            knee_angle_sitting_weight: 0.8,
            knee_angle_standing_weight: 0.7,
            hip_knee_sitting_distance: 0.15,
            hip_knee_sitting_weight: 0.7,
            hip_knee_standing_weight: 0.6,
            torso_upright_deg: 15.0,
            torso_standing_weight: 0.6,
            torso_sitting_weight: 0.5,
            height_ratio_sitting: 0.4,
            height_ratio_sitting_weight: 0.6,
            height_ratio_standing_weight: 0.5,
            ankle_visibility_sitting: 0.3,
            ankle_sitting_weight: 0.5,
            ankle_standing_weight: 0.4,
            decision_threshold: 0.5,
            max_confidence: 0.95,
        }
    }
}

/// Smile heuristic normalization constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmileConfig {
    /// Mouth width that scores zero
    pub width_baseline: f32,
    /// Width above baseline that scores one
    pub width_range: f32,
    /// Corner lift that scores one
    pub corner_lift_range: f32,
    /// Mouth opening tolerated before penalty
    pub open_baseline: f32,
    /// Opening above baseline that yields the full penalty
    pub open_range: f32,
    pub width_weight: f32,
    pub corner_weight: f32,
    pub open_penalty_weight: f32,
}

impl Default for SmileConfig {
    fn default() -> Self {
        Self {
            width_baseline: 0.40,
            width_range: 0.25,
            corner_lift_range: 0.12,
            open_baseline: 0.22,
            open_range: 0.10,
            width_weight: 0.6,
            corner_weight: 0.5,
            open_penalty_weight: 0.3,
        }
    }
}
