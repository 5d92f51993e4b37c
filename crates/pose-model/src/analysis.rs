//! Classification results and the published fused pose

use image::GrayImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::face::DetectedFace;
use crate::hand::DetectedHand;
use crate::joint::{Joint, JointName, JointSet};

/// Posture verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Posture {
    Standing,
    Sitting,
    #[default]
    Unknown,
}

impl fmt::Display for Posture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Posture::Standing => "standing",
            Posture::Sitting => "sitting",
            Posture::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Posture verdict with confidence and the indicators behind it
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PostureAnalysis {
    pub posture: Posture,
    /// Confidence in [0, 1]
    pub confidence: f32,
    /// Human-readable indicator descriptions, in evaluation order
    pub reasoning: Vec<String>,
}

impl PostureAnalysis {
    /// Indicator descriptions joined into one sentence list
    pub fn reasoning_text(&self) -> String {
        self.reasoning.join("; ")
    }
}

/// Coarse tracking regime supported by the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DetectionMode {
    FullBody,
    UpperBody,
    /// Also the default when nothing at all was detected
    #[default]
    FaceAndHands,
}

/// Person-segmentation mask aligned with its frame
#[derive(Debug, Clone)]
pub struct SegmentationMask(Arc<GrayImage>);

impl SegmentationMask {
    pub fn new(mask: GrayImage) -> Self {
        Self(Arc::new(mask))
    }

    pub fn image(&self) -> &GrayImage {
        &self.0
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }
}

impl PartialEq for SegmentationMask {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// The smoothed, classified snapshot published for one frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FusedPose {
    pub joints: JointSet,
    /// Frame timestamp (nanoseconds)
    pub timestamp_ns: u64,
    #[serde(skip)]
    pub segmentation_mask: Option<SegmentationMask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posture: Option<PostureAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face: Option<DetectedFace>,
    /// Zero to two hands
    pub hands: Vec<DetectedHand>,
    pub detection_mode: DetectionMode,
}

impl FusedPose {
    pub fn joint(&self, name: JointName) -> Option<&Joint> {
        self.joints.get(name)
    }

    /// True when no body, face or hand signal is present
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty() && self.face.is_none() && self.hands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point2;

    #[test]
    fn test_reasoning_text() {
        let analysis = PostureAnalysis {
            posture: Posture::Sitting,
            confidence: 0.7,
            reasoning: vec!["knee bent".to_string(), "hip low".to_string()],
        };
        assert_eq!(analysis.reasoning_text(), "knee bent; hip low");
    }

    #[test]
    fn test_mask_identity_equality() {
        let a = SegmentationMask::new(GrayImage::new(4, 4));
        let b = SegmentationMask::new(GrayImage::new(4, 4));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.dimensions(), (4, 4));
    }

    #[test]
    fn test_fused_pose_json_skips_mask() {
        let mut joints = JointSet::new();
        joints.insert(Joint::new(JointName::Nose, Point2::new(0.5, 0.2), 0.9));
        let pose = FusedPose {
            joints,
            timestamp_ns: 42,
            segmentation_mask: Some(SegmentationMask::new(GrayImage::new(2, 2))),
            detection_mode: DetectionMode::UpperBody,
            ..Default::default()
        };

        let json = serde_json::to_value(&pose).unwrap();
        assert!(json.get("segmentation_mask").is_none());
        assert!(json.get("posture").is_none());
        assert_eq!(json["detection_mode"], "UpperBody");
        assert_eq!(json["joints"].as_array().map(|a| a.len()), Some(1));
        assert!(!pose.is_empty());
    }
}
