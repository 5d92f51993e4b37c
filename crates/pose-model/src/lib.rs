//! Pose Data Model
//!
//! Value types flowing through the fusion pipeline:
//! - Body joints in a fixed, ordinal-indexed set
//! - Face landmarks partitioned into named regions
//! - Hand joints with chirality
//! - Posture verdicts, detection modes and the published fused pose
//! - Raw estimator candidates and the single coordinate normalization step

pub mod analysis;
pub mod face;
pub mod geometry;
pub mod hand;
pub mod joint;
pub mod raw;

pub use analysis::{DetectionMode, FusedPose, Posture, PostureAnalysis, SegmentationMask};
pub use face::{BoundingBox, DetectedFace, FaceLandmark, FaceRegion};
pub use geometry::Point2;
pub use hand::{Chirality, DetectedHand, HandJoint, HandJointName};
pub use joint::{Joint, JointName, JointSet};
pub use raw::{
    normalize_point, CoordinateOrigin, RawBodyCandidate, RawFaceCandidate, RawFaceRegion,
    RawHandCandidate, RawHandJoint, RawJoint, RawObservation,
};

use thiserror::Error;

/// Model error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown body joint: {0}")]
    UnknownJoint(String),

    #[error("Unknown hand joint: {0}")]
    UnknownHandJoint(String),

    #[error("Unknown face region: {0}")]
    UnknownRegion(String),
}
