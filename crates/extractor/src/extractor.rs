//! Keypoint extraction with gating and history fallback

use history::HistoryBuffer;
use pose_model::{
    normalize_point, CoordinateOrigin, DetectedFace, DetectedHand, FaceLandmark, FusedPose,
    HandJoint, Joint, JointName, JointSet, RawBodyCandidate, RawFaceCandidate, RawHandCandidate,
    RawObservation,
};
use tracing::debug;

use crate::ExtractionConfig;

/// Gated records for one frame, before temporal smoothing
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extraction {
    pub joints: JointSet,
    pub face: Option<DetectedFace>,
    pub hands: Vec<DetectedHand>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty() && self.face.is_none() && self.hands.is_empty()
    }
}

/// Converts raw estimator candidates into gated joint, face and hand records
#[derive(Debug, Clone, Default)]
pub struct KeypointExtractor {
    config: ExtractionConfig,
}

impl KeypointExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract every modality of one observation
    pub fn extract(
        &self,
        observation: &RawObservation,
        history: &HistoryBuffer<FusedPose>,
    ) -> Extraction {
        let origin = observation.origin;
        Extraction {
            joints: observation
                .body
                .as_ref()
                .map(|body| self.extract_joints(body, origin, history))
                .unwrap_or_default(),
            face: observation
                .face
                .as_ref()
                .map(|face| self.extract_face(face, origin)),
            hands: self.extract_hands(&observation.hands, origin),
        }
    }

    /// Confidence a joint must exceed to count as observed this frame
    pub fn threshold_for(&self, name: JointName) -> f32 {
        let base = if name.is_critical() {
            self.config.critical_threshold
        } else {
            self.config.standard_threshold
        };

        if name.is_lower_body() {
            (base - self.config.lower_body_reduction).max(self.config.threshold_floor)
        } else {
            base
        }
    }

    /// Gate every body joint; joints missing from the candidate count as unobserved
    pub fn extract_joints(
        &self,
        body: &RawBodyCandidate,
        origin: CoordinateOrigin,
        history: &HistoryBuffer<FusedPose>,
    ) -> JointSet {
        let mut stale = 0usize;
        let joints: JointSet = JointName::ALL
            .iter()
            .filter_map(|&name| {
                let observed = body.joint(name).map(|raw| {
                    Joint::new(name, normalize_point(raw.x, raw.y, origin), raw.confidence)
                });
                let fresh = observed.is_some_and(|j| j.confidence > self.threshold_for(name));
                let resolved = self.resolve_joint(name, observed, history);
                if resolved.is_some() && !fresh {
                    stale += 1;
                }
                resolved
            })
            .collect();

        if stale > 0 {
            debug!("Reused {} joints from history", stale);
        }
        joints
    }

    /// Observed joint if it clears its threshold, else a decayed historical one, else nothing
    fn resolve_joint(
        &self,
        name: JointName,
        observed: Option<Joint>,
        history: &HistoryBuffer<FusedPose>,
    ) -> Option<Joint> {
        let threshold = self.threshold_for(name);

        observed
            .filter(|joint| joint.confidence > threshold)
            .map(|joint| self.stabilize(joint, history))
            .or_else(|| self.fallback(name, history))
    }

    /// Blend an uncertain joint toward its last known position, weighted by its confidence
    fn stabilize(&self, joint: Joint, history: &HistoryBuffer<FusedPose>) -> Joint {
        if joint.confidence >= self.config.blend_below_confidence {
            return joint;
        }

        match history.find_recent(|pose| pose.joints.get(joint.name).copied()) {
            Some(previous) => Joint {
                position: previous.position.lerp(&joint.position, joint.confidence),
                ..joint
            },
            None => joint,
        }
    }

    fn fallback(&self, name: JointName, history: &HistoryBuffer<FusedPose>) -> Option<Joint> {
        history
            .find_recent(|pose| {
                pose.joints
                    .get_confident(name, self.config.fallback_min_confidence)
                    .copied()
            })
            .map(|previous| Joint {
                confidence: previous.confidence * self.config.stale_decay,
                ..previous
            })
    }

    /// Face landmarks keep only region presence; no per-point threshold
    pub fn extract_face(&self, face: &RawFaceCandidate, origin: CoordinateOrigin) -> DetectedFace {
        let landmarks = face
            .regions
            .iter()
            .flat_map(|region| {
                region
                    .points
                    .iter()
                    .enumerate()
                    .map(move |(index, &(x, y))| FaceLandmark {
                        region: region.region,
                        index,
                        position: normalize_point(x, y, origin),
                        confidence: face.confidence,
                    })
            })
            .collect();

        DetectedFace {
            landmarks,
            bounding_box: face.normalized_box(origin),
            confidence: face.confidence,
            smile_score: 0.0,
        }
    }

    /// Keep the most confident hands and drop joints below the hand threshold
    pub fn extract_hands(
        &self,
        hands: &[RawHandCandidate],
        origin: CoordinateOrigin,
    ) -> Vec<DetectedHand> {
        let mut ranked: Vec<&RawHandCandidate> = hands.iter().collect();
        ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        ranked
            .into_iter()
            .take(self.config.max_hands)
            .filter_map(|hand| {
                let joints: Vec<HandJoint> = hand
                    .joints
                    .iter()
                    .filter(|j| j.confidence >= self.config.hand_threshold)
                    .map(|j| HandJoint {
                        name: j.name,
                        position: normalize_point(j.x, j.y, origin),
                        confidence: j.confidence,
                    })
                    .collect();

                if joints.is_empty() {
                    debug!("Dropping {:?} hand with no usable joints", hand.chirality);
                    return None;
                }

                Some(DetectedHand {
                    joints,
                    chirality: hand.chirality,
                    confidence: hand.confidence,
                })
            })
            .collect()
    }
}
