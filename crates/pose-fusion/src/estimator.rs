//! Keypoint estimator seam
//!
//! The estimator itself is opaque; this crate only needs a frame in and raw
//! candidates out.

use image::RgbImage;
use pose_model::RawObservation;
use std::sync::Arc;

use crate::EstimatorError;

/// A captured frame handed to the estimator
#[derive(Debug, Clone)]
pub struct Frame {
    /// RGB pixels
    pub image: Arc<RgbImage>,
    /// Arrival timestamp (nanoseconds, monotonic)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl Frame {
    pub fn new(image: RgbImage, timestamp_ns: u64, sequence: u32) -> Self {
        Self {
            image: Arc::new(image),
            timestamp_ns,
            sequence,
        }
    }
}

/// Produces raw body, face and hand candidates for a frame
pub trait KeypointEstimator: Send + 'static {
    fn estimate(&mut self, frame: &Frame) -> Result<RawObservation, EstimatorError>;
}

impl<F> KeypointEstimator for F
where
    F: FnMut(&Frame) -> Result<RawObservation, EstimatorError> + Send + 'static,
{
    fn estimate(&mut self, frame: &Frame) -> Result<RawObservation, EstimatorError> {
        self(frame)
    }
}
