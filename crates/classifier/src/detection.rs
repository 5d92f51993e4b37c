//! Detection-mode classification

use pose_model::{DetectedFace, DetectedHand, DetectionMode, JointName, JointSet};

use crate::DetectionConfig;

const LOWER_BODY_MARKERS: [JointName; 4] = [
    JointName::LeftHip,
    JointName::RightHip,
    JointName::LeftKnee,
    JointName::RightKnee,
];

/// Decides which tracking regime the current frame supports
#[derive(Debug, Clone, Default)]
pub struct DetectionClassifier {
    config: DetectionConfig,
}

impl DetectionClassifier {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Classify from the current frame only; no history is consulted.
    ///
    /// With no confident joints and no face or hands the result is
    /// `FaceAndHands`, a default that carries no real signal.
    pub fn classify(
        &self,
        joints: &JointSet,
        face: Option<&DetectedFace>,
        hands: &[DetectedHand],
    ) -> DetectionMode {
        let threshold = self.config.confident_joint_threshold;
        let confident = joints.count_confident(threshold);

        if confident >= self.config.min_body_joints {
            let lower_body = LOWER_BODY_MARKERS
                .iter()
                .any(|&name| joints.get_confident(name, threshold).is_some());
            return if lower_body {
                DetectionMode::FullBody
            } else {
                DetectionMode::UpperBody
            };
        }

        if face.is_some() || !hands.is_empty() {
            DetectionMode::FaceAndHands
        } else if confident > 0 {
            DetectionMode::UpperBody
        } else {
            DetectionMode::FaceAndHands
        }
    }
}
