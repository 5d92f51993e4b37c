//! Raw estimator candidates
//!
//! Everything the opaque keypoint estimator hands over for one frame, still in
//! the estimator's own coordinate convention. `normalize_point` is the only
//! place that convention is translated.

use serde::{Deserialize, Serialize};

use crate::analysis::SegmentationMask;
use crate::face::{BoundingBox, FaceRegion};
use crate::geometry::Point2;
use crate::hand::{Chirality, HandJointName};
use crate::joint::JointName;

/// Vertical origin of the estimator's normalized coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoordinateOrigin {
    #[default]
    TopLeft,
    /// y grows upward, as in most platform vision frameworks
    BottomLeft,
}

/// Translate an estimator point into the pipeline's top-left, y-down convention
pub fn normalize_point(x: f32, y: f32, origin: CoordinateOrigin) -> Point2 {
    match origin {
        CoordinateOrigin::TopLeft => Point2::new(x, y),
        CoordinateOrigin::BottomLeft => Point2::new(x, 1.0 - y),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawJoint {
    pub name: JointName,
    pub x: f32,
    pub y: f32,
    pub confidence: f32,
}

/// Body-pose candidate: named joints with location and confidence
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawBodyCandidate {
    pub joints: Vec<RawJoint>,
}

impl RawBodyCandidate {
    pub fn joint(&self, name: JointName) -> Option<&RawJoint> {
        self.joints.iter().find(|j| j.name == name)
    }
}

/// Points of one face region, relative to the face bounding box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFaceRegion {
    pub region: FaceRegion,
    pub points: Vec<(f32, f32)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFaceCandidate {
    pub regions: Vec<RawFaceRegion>,
    pub confidence: f32,
    /// Bounding box in the estimator's convention
    pub bounding_box: BoundingBox,
}

impl RawFaceCandidate {
    /// Bounding box in the pipeline's convention
    pub fn normalized_box(&self, origin: CoordinateOrigin) -> BoundingBox {
        let b = &self.bounding_box;
        let a = normalize_point(b.x, b.y, origin);
        let c = normalize_point(b.x + b.width, b.y + b.height, origin);
        BoundingBox::new(a.x.min(c.x), a.y.min(c.y), b.width, b.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawHandJoint {
    pub name: HandJointName,
    pub x: f32,
    pub y: f32,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHandCandidate {
    pub joints: Vec<RawHandJoint>,
    pub chirality: Chirality,
    pub confidence: f32,
}

/// Raw estimator output for one frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawObservation {
    pub origin: CoordinateOrigin,
    pub body: Option<RawBodyCandidate>,
    pub face: Option<RawFaceCandidate>,
    pub hands: Vec<RawHandCandidate>,
    #[serde(skip)]
    pub segmentation_mask: Option<SegmentationMask>,
}

impl RawObservation {
    /// True when the estimator reported no body, face or hand candidate
    pub fn is_empty(&self) -> bool {
        self.body.is_none() && self.face.is_none() && self.hands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bottom_left_flips_y() {
        let p = normalize_point(0.25, 0.8, CoordinateOrigin::BottomLeft);
        assert!((p.x - 0.25).abs() < 1e-6);
        assert!((p.y - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_top_left_is_identity() {
        let p = normalize_point(0.25, 0.8, CoordinateOrigin::TopLeft);
        assert_eq!(p, Point2::new(0.25, 0.8));
    }

    #[test]
    fn test_normalized_box_keeps_extent() {
        let face = RawFaceCandidate {
            regions: vec![],
            confidence: 0.9,
            bounding_box: BoundingBox::new(0.2, 0.6, 0.3, 0.3),
        };

        let flipped = face.normalized_box(CoordinateOrigin::BottomLeft);
        assert!((flipped.x - 0.2).abs() < 1e-6);
        assert!((flipped.y - 0.1).abs() < 1e-6);
        assert!((flipped.height - 0.3).abs() < 1e-6);

        assert_eq!(face.normalized_box(CoordinateOrigin::TopLeft), face.bounding_box);
    }
}
