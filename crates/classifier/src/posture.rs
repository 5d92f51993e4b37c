//! Posture classification by weighted indicator voting
//!
//! Five independent geometric indicators each vote sitting or standing with a
//! fixed weight. Indicators whose joints are missing are skipped, and the
//! scores are normalized by the weight actually cast.

use pose_model::{Joint, JointName, JointSet, Posture, PostureAnalysis};
use tracing::debug;

use crate::PostureConfig;

const INSUFFICIENT_DATA: &str = "Insufficient data for posture analysis";

/// One computed indicator's vote
#[derive(Debug, Clone, PartialEq)]
pub struct Indicator {
    pub vote: Posture,
    pub weight: f32,
    pub description: String,
}

/// Normalized vote totals; `sitting + standing == 1` whenever any indicator voted
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostureScores {
    pub sitting: f32,
    pub standing: f32,
    pub indicators: Vec<Indicator>,
}

/// Classifies standing vs sitting from body joints
#[derive(Debug, Clone, Default)]
pub struct PostureClassifier {
    config: PostureConfig,
}

impl PostureClassifier {
    pub fn new(config: PostureConfig) -> Self {
        Self { config }
    }

    /// Whether a frame has enough joints to be worth classifying
    pub fn has_enough_joints(&self, joints: &JointSet) -> bool {
        joints.len() >= self.config.min_joints
    }

    pub fn classify(&self, joints: &JointSet) -> PostureAnalysis {
        let scores = self.score(joints);

        if scores.indicators.is_empty() {
            return PostureAnalysis {
                posture: Posture::Unknown,
                confidence: 0.0,
                reasoning: vec![INSUFFICIENT_DATA.to_string()],
            };
        }

        let threshold = self.config.decision_threshold;
        let sitting_wins = scores.sitting > scores.standing && scores.sitting > threshold;
        let standing_wins = scores.standing > scores.sitting && scores.standing > threshold;
        let (posture, confidence) = if sitting_wins {
            (Posture::Sitting, scores.sitting.min(self.config.max_confidence))
        } else if standing_wins {
            (Posture::Standing, scores.standing.min(self.config.max_confidence))
        } else {
            (Posture::Unknown, scores.sitting.max(scores.standing))
        };

        debug!(
            "Posture {} (sitting={:.2}, standing={:.2}, indicators={})",
            posture,
            scores.sitting,
            scores.standing,
            scores.indicators.len()
        );

        PostureAnalysis {
            posture,
            confidence,
            reasoning: scores
                .indicators
                .into_iter()
                .map(|indicator| indicator.description)
                .collect(),
        }
    }

    /// Evaluate every computable indicator and normalize the vote
    pub fn score(&self, joints: &JointSet) -> PostureScores {
        let indicators: Vec<Indicator> = [
            self.knee_angle(joints),
            self.hip_knee_distance(joints),
            self.torso_angle(joints),
            self.body_height_ratio(joints),
            self.ankle_visibility(joints),
        ]
        .into_iter()
        .flatten()
        .collect();

        let total: f32 = indicators.iter().map(|i| i.weight).sum();
        if total <= 0.0 {
            return PostureScores {
                indicators,
                ..Default::default()
            };
        }

        let cast = |posture: Posture| -> f32 {
            indicators
                .iter()
                .filter(|i| i.vote == posture)
                .map(|i| i.weight)
                .sum()
        };

        PostureScores {
            sitting: cast(Posture::Sitting) / total,
            standing: cast(Posture::Standing) / total,
            indicators,
        }
    }

    fn confident(&self, joints: &JointSet, name: JointName) -> Option<Joint> {
        joints
            .get_confident(name, self.config.indicator_confidence)
            .copied()
    }

    /// Left-side joints if all are confident, otherwise the right side
    fn side<const N: usize>(
        &self,
        joints: &JointSet,
        left: [JointName; N],
        right: [JointName; N],
    ) -> Option<[Joint; N]> {
        let pick = |names: [JointName; N]| -> Option<[Joint; N]> {
            let found: Vec<Joint> = names
                .iter()
                .map(|&name| self.confident(joints, name))
                .collect::<Option<_>>()?;
            found.try_into().ok()
        };
        pick(left).or_else(|| pick(right))
    }

    fn either(&self, joints: &JointSet, left: JointName, right: JointName) -> Option<Joint> {
        self.confident(joints, left)
            .or_else(|| self.confident(joints, right))
    }

    fn knee_angle(&self, joints: &JointSet) -> Option<Indicator> {
        let [hip, knee, ankle] = self.side(
            joints,
            [JointName::LeftHip, JointName::LeftKnee, JointName::LeftAnkle],
            [JointName::RightHip, JointName::RightKnee, JointName::RightAnkle],
        )?;

        let (ax, ay) = (hip.position.x - knee.position.x, hip.position.y - knee.position.y);
        let (bx, by) = (ankle.position.x - knee.position.x, ankle.position.y - knee.position.y);
        let norm = (ax.hypot(ay)) * (bx.hypot(by));
        if norm <= f32::EPSILON {
            return None;
        }
        let angle = ((ax * bx + ay * by) / norm).clamp(-1.0, 1.0).acos().to_degrees();

        Some(if angle < self.config.knee_angle_sitting_deg {
            Indicator {
                vote: Posture::Sitting,
                weight: self.config.knee_angle_sitting_weight,
                description: format!("Knee bent at {:.0}° suggests sitting", angle),
            }
        } else {
            Indicator {
                vote: Posture::Standing,
                weight: self.config.knee_angle_standing_weight,
                description: format!("Knee extended at {:.0}° suggests standing", angle),
            }
        })
    }

    fn hip_knee_distance(&self, joints: &JointSet) -> Option<Indicator> {
        let [hip, knee] = self.side(
            joints,
            [JointName::LeftHip, JointName::LeftKnee],
            [JointName::RightHip, JointName::RightKnee],
        )?;

        let distance = (hip.position.y - knee.position.y).abs();

        Some(if distance < self.config.hip_knee_sitting_distance {
            Indicator {
                vote: Posture::Sitting,
                weight: self.config.hip_knee_sitting_weight,
                description: format!("Hip level with knee ({:.2}) suggests sitting", distance),
            }
        } else {
            Indicator {
                vote: Posture::Standing,
                weight: self.config.hip_knee_standing_weight,
                description: format!("Hip above knee ({:.2}) suggests standing", distance),
            }
        })
    }

    fn torso_angle(&self, joints: &JointSet) -> Option<Indicator> {
        let [shoulder, hip] = self.side(
            joints,
            [JointName::LeftShoulder, JointName::LeftHip],
            [JointName::RightShoulder, JointName::RightHip],
        )?;

        let dx = hip.position.x - shoulder.position.x;
        let dy = hip.position.y - shoulder.position.y;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        let angle = dx.atan2(dy).to_degrees();

        Some(if angle.abs() < self.config.torso_upright_deg {
            Indicator {
                vote: Posture::Standing,
                weight: self.config.torso_standing_weight,
                description: format!("Upright torso ({:.0}°) suggests standing", angle),
            }
        } else {
            Indicator {
                vote: Posture::Sitting,
                weight: self.config.torso_sitting_weight,
                description: format!("Leaning torso ({:.0}°) suggests sitting", angle),
            }
        })
    }

    fn body_height_ratio(&self, joints: &JointSet) -> Option<Indicator> {
        let head = self.confident(joints, JointName::Nose)?;
        let hip = self.either(joints, JointName::LeftHip, JointName::RightHip)?;
        let ankle = self.either(joints, JointName::LeftAnkle, JointName::RightAnkle)?;

        let upper = head.position.distance(&hip.position);
        let lower = hip.position.distance(&ankle.position);
        if upper + lower <= f32::EPSILON {
            return None;
        }
        let ratio = upper / (upper + lower);

        Some(if ratio < self.config.height_ratio_sitting {
            Indicator {
                vote: Posture::Sitting,
                weight: self.config.height_ratio_sitting_weight,
                description: format!("Compressed body height ratio {:.2} suggests sitting", ratio),
            }
        } else {
            Indicator {
                vote: Posture::Standing,
                weight: self.config.height_ratio_standing_weight,
                description: format!("Full body height ratio {:.2} suggests standing", ratio),
            }
        })
    }

    /// Needs at least one ankle; a missing ankle counts as zero confidence
    fn ankle_visibility(&self, joints: &JointSet) -> Option<Indicator> {
        let left = joints.get(JointName::LeftAnkle);
        let right = joints.get(JointName::RightAnkle);
        if left.is_none() && right.is_none() {
            return None;
        }

        let confidence = |joint: Option<&Joint>| joint.map_or(0.0, |j| j.confidence);
        let visibility = (confidence(left) + confidence(right)) / 2.0;

        Some(if visibility < self.config.ankle_visibility_sitting {
            Indicator {
                vote: Posture::Sitting,
                weight: self.config.ankle_sitting_weight,
                description: format!("Ankles barely visible ({:.2}) suggests sitting", visibility),
            }
        } else {
            Indicator {
                vote: Posture::Standing,
                weight: self.config.ankle_standing_weight,
                description: format!("Ankles visible ({:.2}) suggests standing", visibility),
            }
        })
    }
}
