//! Face selection across frames

use history::HistoryBuffer;
use pose_model::DetectedFace;
use tracing::debug;

use crate::TemporalSmoother;

impl TemporalSmoother {
    /// Pick between the current face and the recent face history.
    ///
    /// A trusted current face wins outright. An untrusted one yields to the
    /// previous frame's face only when that face is strictly more confident.
    /// With no current face, the most recent face in the window is carried.
    pub fn smooth_face(
        &self,
        current: Option<DetectedFace>,
        history: &HistoryBuffer<Option<DetectedFace>>,
    ) -> Option<DetectedFace> {
        match current {
            Some(face) if face.confidence > self.config.face_trust_confidence => Some(face),
            Some(face) => match history.latest() {
                Some(Some(previous)) if previous.confidence > face.confidence => {
                    debug!(
                        "Keeping previous face ({:.2}) over current ({:.2})",
                        previous.confidence, face.confidence
                    );
                    Some(previous.clone())
                }
                _ => Some(face),
            },
            None => history.find_recent(|entry| entry.clone()),
        }
    }
}
