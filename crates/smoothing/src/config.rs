//! Smoothing configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// EMA weight on the current joint value (0-1, higher = more responsive)
    pub joint_alpha: f32,

    /// Faces above this confidence are used unmodified
    pub face_trust_confidence: f32,

    /// Hands above this confidence are used unmodified
    pub hand_trust_confidence: f32,

    /// Historical hand-joint confidence is scaled by this before comparison
    pub hand_history_decay: f32,

    /// Posture entries needed before voting
    pub posture_min_votes: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            joint_alpha: 0.7,
            face_trust_confidence: 0.7,
            hand_trust_confidence: 0.6,
            hand_history_decay: 0.8,
            posture_min_votes: 2,
        }
    }
}
