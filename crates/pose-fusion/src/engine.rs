//! Single-frame fusion pipeline
//!
//! The engine owns every history window and is their only writer. Each
//! component receives read-only windows and hands back new values.

use classifier::{DetectionClassifier, PostureClassifier, SmileEstimator};
use extractor::KeypointExtractor;
use history::HistoryBuffer;
use pose_model::{
    DetectedFace, DetectedHand, FusedPose, JointSet, PostureAnalysis, RawObservation,
};
use smoothing::TemporalSmoother;
use tracing::debug;

use crate::{FusionConfig, FusionError};

/// Extraction, smoothing and classification with the history they depend on
pub struct FusionEngine {
    extractor: KeypointExtractor,
    smoother: TemporalSmoother,
    detection: DetectionClassifier,
    posture: PostureClassifier,
    smile: SmileEstimator,
    pose_history: HistoryBuffer<FusedPose>,
    face_history: HistoryBuffer<Option<DetectedFace>>,
    hand_history: HistoryBuffer<Vec<DetectedHand>>,
    posture_history: HistoryBuffer<PostureAnalysis>,
}

impl FusionEngine {
    /// Validate the configuration and build an engine with empty history
    pub fn new(config: &FusionConfig) -> Result<Self, FusionError> {
        config.validate()?;

        Ok(Self {
            extractor: KeypointExtractor::new(config.extraction.clone()),
            smoother: TemporalSmoother::new(config.smoothing.clone()),
            detection: DetectionClassifier::new(config.detection.clone()),
            posture: PostureClassifier::new(config.posture.clone()),
            smile: SmileEstimator::new(config.smile.clone()),
            pose_history: HistoryBuffer::new(config.history.pose_capacity),
            face_history: HistoryBuffer::new(config.history.signal_capacity),
            hand_history: HistoryBuffer::new(config.history.signal_capacity),
            posture_history: HistoryBuffer::new(config.history.signal_capacity),
        })
    }

    /// Fuse one observation into a pose and record it in history.
    ///
    /// Returns `None` only when the observation carries no body, face or hand
    /// signal and history holds no joint still above the fallback bar.
    pub fn process(
        &mut self,
        observation: RawObservation,
        timestamp_ns: u64,
    ) -> Option<FusedPose> {
        let extraction = self.extractor.extract(&observation, &self.pose_history);

        let joints = self
            .smoother
            .smooth_joints(&extraction.joints, self.pose_history.latest());

        let face_observed = extraction.face.is_some();
        let face = self
            .smoother
            .smooth_face(extraction.face, &self.face_history)
            .map(|face| DetectedFace {
                smile_score: self.smile.score_face(&face),
                ..face
            });

        let hands = self.smoother.smooth_hands(extraction.hands, &self.hand_history);

        self.face_history
            .push(if face_observed { face.clone() } else { None });
        self.hand_history.push(hands.clone());

        if joints.is_empty() && face.is_none() && hands.is_empty() {
            return self.carry_forward(observation, timestamp_ns);
        }

        let detection_mode = self.detection.classify(&joints, face.as_ref(), &hands);

        let posture = if self.posture.has_enough_joints(&joints) {
            let current = self.posture.classify(&joints);
            self.posture_history.push(current.clone());
            Some(self.smoother.vote_posture(&current, &self.posture_history))
        } else {
            None
        };

        let pose = FusedPose {
            joints,
            timestamp_ns,
            segmentation_mask: observation.segmentation_mask,
            posture,
            face,
            hands,
            detection_mode,
        };

        self.pose_history.push(pose.clone());
        Some(pose)
    }

    /// Republish the previous pose, decayed, for a frame with no usable signal.
    ///
    /// Carried joints lose `stale_decay` per frame and are dropped once they
    /// reach the fallback bar, so a vanished person stops being published
    /// after a few frames.
    fn carry_forward(
        &mut self,
        observation: RawObservation,
        timestamp_ns: u64,
    ) -> Option<FusedPose> {
        let Some(previous) = self.pose_history.latest() else {
            debug!("No signal and no history, discarding frame at {}", timestamp_ns);
            return None;
        };

        let config = self.extractor.config();
        let joints: JointSet = previous
            .joints
            .decayed(config.stale_decay)
            .iter()
            .filter(|joint| joint.confidence > config.fallback_min_confidence)
            .copied()
            .collect();

        if joints.is_empty() {
            debug!("No signal at {} and history exhausted, discarding frame", timestamp_ns);
            return None;
        }

        debug!("No signal at {}, carrying {} joints forward", timestamp_ns, joints.len());
        let pose = FusedPose {
            detection_mode: self.detection.classify(&joints, None, &[]),
            posture: previous
                .posture
                .clone()
                .filter(|_| self.posture.has_enough_joints(&joints)),
            segmentation_mask: observation
                .segmentation_mask
                .or_else(|| previous.segmentation_mask.clone()),
            joints,
            timestamp_ns,
            face: None,
            hands: Vec::new(),
        };

        self.pose_history.push(pose.clone());
        Some(pose)
    }

    /// Forget every history window
    pub fn reset(&mut self) {
        self.pose_history.clear();
        self.face_history.clear();
        self.hand_history.clear();
        self.posture_history.clear();
        debug!("Fusion history cleared");
    }

    pub fn pose_history(&self) -> &HistoryBuffer<FusedPose> {
        &self.pose_history
    }

    pub fn posture_history(&self) -> &HistoryBuffer<PostureAnalysis> {
        &self.posture_history
    }
}
