//! Exponential smoothing of body joints

use pose_model::{FusedPose, Joint, JointSet};

use crate::TemporalSmoother;

impl TemporalSmoother {
    /// EMA each joint against the same joint of the previous fused pose.
    /// Joints without a previous counterpart pass through.
    pub fn smooth_joints(&self, current: &JointSet, previous: Option<&FusedPose>) -> JointSet {
        let alpha = self.config.joint_alpha;

        current
            .iter()
            .map(|joint| match previous.and_then(|p| p.joints.get(joint.name)) {
                Some(prev) => Joint {
                    name: joint.name,
                    position: prev.position.lerp(&joint.position, alpha),
                    confidence: alpha * joint.confidence + (1.0 - alpha) * prev.confidence,
                },
                None => *joint,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_model::{JointName, Point2};
    use proptest::prelude::*;

    fn pose_with(joint: Joint) -> FusedPose {
        FusedPose {
            joints: vec![joint].into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_ema_blend() {
        let smoother = TemporalSmoother::default();
        let previous = pose_with(Joint::new(JointName::Neck, Point2::new(0.0, 0.0), 0.5));
        let current: JointSet =
            vec![Joint::new(JointName::Neck, Point2::new(1.0, 0.5), 1.0)].into();

        let smoothed = smoother.smooth_joints(&current, Some(&previous));
        let neck = smoothed.get(JointName::Neck).unwrap();

        assert!((neck.position.x - 0.7).abs() < 1e-6);
        assert!((neck.position.y - 0.35).abs() < 1e-6);
        assert!((neck.confidence - 0.85).abs() < 1e-6);
    }

    #[test]
    fn test_new_joint_passes_through() {
        let smoother = TemporalSmoother::default();
        let previous = pose_with(Joint::new(JointName::Neck, Point2::new(0.0, 0.0), 0.5));
        let joint = Joint::new(JointName::Nose, Point2::new(0.4, 0.1), 0.9);

        let current: JointSet = vec![joint].into();

        let smoothed = smoother.smooth_joints(&current, Some(&previous));
        assert_eq!(smoothed.get(JointName::Nose), Some(&joint));
        assert!(!smoothed.contains(JointName::Neck));
    }

    #[test]
    fn test_no_previous_pose() {
        let smoother = TemporalSmoother::default();
        let current: JointSet =
            vec![Joint::new(JointName::Root, Point2::new(0.5, 0.5), 0.6)].into();
        assert_eq!(smoother.smooth_joints(&current, None), current);
    }

    proptest! {
        #[test]
        fn prop_ema_stays_within_bounds(
            px in 0.0f32..1.0, py in 0.0f32..1.0, pc in 0.0f32..1.0,
            cx in 0.0f32..1.0, cy in 0.0f32..1.0, cc in 0.0f32..1.0,
        ) {
            let smoother = TemporalSmoother::default();
            let previous = pose_with(Joint::new(JointName::Neck, Point2::new(px, py), pc));
            let current: JointSet =
                vec![Joint::new(JointName::Neck, Point2::new(cx, cy), cc)].into();

            let smoothed = smoother.smooth_joints(&current, Some(&previous));
            let neck = smoothed.get(JointName::Neck).unwrap();

            let within = |value: f32, a: f32, b: f32| {
                let eps = 1e-5;
                value >= a.min(b) - eps && value <= a.max(b) + eps
            };
            prop_assert!(within(neck.position.x, px, cx));
            prop_assert!(within(neck.position.y, py, cy));
            prop_assert!(within(neck.confidence, pc, cc));
        }
    }
}
