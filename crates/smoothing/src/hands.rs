//! Hand smoothing against the previous frame

use history::HistoryBuffer;
use pose_model::{DetectedHand, HandJoint};

use crate::TemporalSmoother;

impl TemporalSmoother {
    /// Blend uncertain hands with the same-chirality hand of the previous entry.
    ///
    /// If every current hand is trusted the list passes through. Otherwise each
    /// joint moves toward its current position by the current joint's
    /// confidence, and keeps the larger of its confidence and the decayed
    /// historical confidence.
    pub fn smooth_hands(
        &self,
        current: Vec<DetectedHand>,
        history: &HistoryBuffer<Vec<DetectedHand>>,
    ) -> Vec<DetectedHand> {
        if current
            .iter()
            .all(|hand| hand.confidence > self.config.hand_trust_confidence)
        {
            return current;
        }

        let Some(previous) = history.latest() else {
            return current;
        };

        current
            .into_iter()
            .map(|hand| {
                match previous.iter().find(|p| p.chirality == hand.chirality) {
                    Some(matched) => self.blend_hand(hand, matched),
                    None => hand,
                }
            })
            .collect()
    }

    fn blend_hand(&self, hand: DetectedHand, previous: &DetectedHand) -> DetectedHand {
        let decay = self.config.hand_history_decay;
        let joints = hand
            .joints
            .iter()
            .map(|joint| match previous.joint(joint.name) {
                Some(prev) => HandJoint {
                    name: joint.name,
                    position: prev.position.lerp(&joint.position, joint.confidence),
                    confidence: joint.confidence.max(prev.confidence * decay),
                },
                None => *joint,
            })
            .collect();

        DetectedHand { joints, ..hand }
    }
}
