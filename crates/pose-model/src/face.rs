//! Face landmark definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::geometry::Point2;
use crate::ModelError;

/// Named landmark regions a face partitions into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FaceRegion {
    FaceContour,
    LeftEye,
    RightEye,
    LeftEyebrow,
    RightEyebrow,
    LeftPupil,
    RightPupil,
    Nose,
    NoseCrest,
    MedianLine,
    OuterLips,
    InnerLips,
}

impl FaceRegion {
    pub const ALL: [FaceRegion; 12] = [
        FaceRegion::FaceContour,
        FaceRegion::LeftEye,
        FaceRegion::RightEye,
        FaceRegion::LeftEyebrow,
        FaceRegion::RightEyebrow,
        FaceRegion::LeftPupil,
        FaceRegion::RightPupil,
        FaceRegion::Nose,
        FaceRegion::NoseCrest,
        FaceRegion::MedianLine,
        FaceRegion::OuterLips,
        FaceRegion::InnerLips,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FaceRegion::FaceContour => "face_contour",
            FaceRegion::LeftEye => "left_eye",
            FaceRegion::RightEye => "right_eye",
            FaceRegion::LeftEyebrow => "left_eyebrow",
            FaceRegion::RightEyebrow => "right_eyebrow",
            FaceRegion::LeftPupil => "left_pupil",
            FaceRegion::RightPupil => "right_pupil",
            FaceRegion::Nose => "nose",
            FaceRegion::NoseCrest => "nose_crest",
            FaceRegion::MedianLine => "median_line",
            FaceRegion::OuterLips => "outer_lips",
            FaceRegion::InnerLips => "inner_lips",
        }
    }
}

impl fmt::Display for FaceRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FaceRegion {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FaceRegion::ALL
            .iter()
            .copied()
            .find(|region| region.as_str() == s)
            .ok_or_else(|| ModelError::UnknownRegion(s.to_string()))
    }
}

/// One landmark point of a face region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceLandmark {
    pub region: FaceRegion,
    /// Index of the point within its region
    pub index: usize,
    /// Position relative to the face bounding box (top-left origin)
    pub position: Point2,
    pub confidence: f32,
}

/// Axis-aligned box in normalized image space, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point2 {
        Point2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Map a box-relative point into image space
    pub fn to_image_space(&self, relative: &Point2) -> Point2 {
        Point2::new(
            self.x + relative.x * self.width,
            self.y + relative.y * self.height,
        )
    }
}

/// A detected face with its landmarks and derived smile score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFace {
    /// Landmarks in region order, then point order
    pub landmarks: Vec<FaceLandmark>,
    pub bounding_box: BoundingBox,
    /// Overall detection confidence
    pub confidence: f32,
    /// Smile score in [0, 1]
    pub smile_score: f32,
}

impl DetectedFace {
    /// Points of one region, in point order
    pub fn region(&self, region: FaceRegion) -> Vec<Point2> {
        self.landmarks
            .iter()
            .filter(|lm| lm.region == region)
            .map(|lm| lm.position)
            .collect()
    }

    pub fn has_region(&self, region: FaceRegion) -> bool {
        self.landmarks.iter().any(|lm| lm.region == region)
    }

    /// Map a landmark into image space
    pub fn to_image_space(&self, landmark: &FaceLandmark) -> Point2 {
        self.bounding_box.to_image_space(&landmark.position)
    }
}
