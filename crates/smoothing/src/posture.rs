//! Majority-vote smoothing of posture verdicts

use history::HistoryBuffer;
use pose_model::{Posture, PostureAnalysis};

use crate::TemporalSmoother;

impl TemporalSmoother {
    /// Vote across the posture window, which already contains `current`.
    ///
    /// Standing and sitting counts decide; ties (including no votes) keep the
    /// current verdict. The winner's confidence is the mean over window
    /// entries sharing it, while reasoning always comes from `current`.
    pub fn vote_posture(
        &self,
        current: &PostureAnalysis,
        window: &HistoryBuffer<PostureAnalysis>,
    ) -> PostureAnalysis {
        if window.len() < self.config.posture_min_votes {
            return current.clone();
        }

        let count = |posture: Posture| window.iter().filter(|a| a.posture == posture).count();
        let standing = count(Posture::Standing);
        let sitting = count(Posture::Sitting);

        let winner = if standing > sitting {
            Posture::Standing
        } else if sitting > standing {
            Posture::Sitting
        } else {
            return current.clone();
        };

        let confidences: Vec<f32> = window
            .iter()
            .filter(|a| a.posture == winner)
            .map(|a| a.confidence)
            .collect();
        let confidence = confidences.iter().sum::<f32>() / confidences.len() as f32;

        PostureAnalysis {
            posture: winner,
            confidence,
            reasoning: current.reasoning.clone(),
        }
    }
}
