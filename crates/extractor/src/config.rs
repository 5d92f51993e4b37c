//! Extraction configuration

use serde::{Deserialize, Serialize};

/// Thresholds applied while gating raw keypoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Threshold for head, eyes, ears, wrists and neck
    pub critical_threshold: f32,

    /// Threshold for every other body joint
    pub standard_threshold: f32,

    /// Reduction applied to hips, knees, ankles and root
    pub lower_body_reduction: f32,

    /// Lowest threshold the reduction may reach
    pub threshold_floor: f32,

    /// A historical joint must exceed this to be reused
    pub fallback_min_confidence: f32,

    /// Confidence multiplier for joints reused from history
    pub stale_decay: f32,

    /// Joints below this (but above threshold) are blended with history
    pub blend_below_confidence: f32,

    /// Threshold for hand joints
    pub hand_threshold: f32,

    /// Hands kept per frame
    pub max_hands: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            critical_threshold: 0.30,
            standard_threshold: 0.10,
            lower_body_reduction: 0.05,
            threshold_floor: 0.05,
            fallback_min_confidence: 0.30,
            stale_decay: 0.7,
            blend_below_confidence: 0.5,
            hand_threshold: 0.2,
            max_hands: 2,
        }
    }
}
