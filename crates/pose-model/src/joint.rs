//! Body joint definitions
//!
//! Joints are identified by a closed enumeration whose ordinal indexes a
//! fixed-size slot table, so a `JointSet` never needs a hash map.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::geometry::Point2;
use crate::ModelError;

/// Named body landmarks reported by the keypoint estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum JointName {
    Nose = 0,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    Neck,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    /// Pelvis center
    Root,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl JointName {
    /// Number of body joints
    pub const COUNT: usize = 19;

    /// Every joint in ordinal order
    pub const ALL: [JointName; Self::COUNT] = [
        JointName::Nose,
        JointName::LeftEye,
        JointName::RightEye,
        JointName::LeftEar,
        JointName::RightEar,
        JointName::Neck,
        JointName::LeftShoulder,
        JointName::RightShoulder,
        JointName::LeftElbow,
        JointName::RightElbow,
        JointName::LeftWrist,
        JointName::RightWrist,
        JointName::Root,
        JointName::LeftHip,
        JointName::RightHip,
        JointName::LeftKnee,
        JointName::RightKnee,
        JointName::LeftAnkle,
        JointName::RightAnkle,
    ];

    /// Slot index in a `JointSet`
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Head, eyes, ears, wrists and neck get a stricter confidence bar
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            JointName::Nose
                | JointName::LeftEye
                | JointName::RightEye
                | JointName::LeftEar
                | JointName::RightEar
                | JointName::LeftWrist
                | JointName::RightWrist
                | JointName::Neck
        )
    }

    /// Hips, knees, ankles and root, often occluded when seated
    pub fn is_lower_body(&self) -> bool {
        matches!(
            self,
            JointName::Root
                | JointName::LeftHip
                | JointName::RightHip
                | JointName::LeftKnee
                | JointName::RightKnee
                | JointName::LeftAnkle
                | JointName::RightAnkle
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JointName::Nose => "nose",
            JointName::LeftEye => "left_eye",
            JointName::RightEye => "right_eye",
            JointName::LeftEar => "left_ear",
            JointName::RightEar => "right_ear",
            JointName::Neck => "neck",
            JointName::LeftShoulder => "left_shoulder",
            JointName::RightShoulder => "right_shoulder",
            JointName::LeftElbow => "left_elbow",
            JointName::RightElbow => "right_elbow",
            JointName::LeftWrist => "left_wrist",
            JointName::RightWrist => "right_wrist",
            JointName::Root => "root",
            JointName::LeftHip => "left_hip",
            JointName::RightHip => "right_hip",
            JointName::LeftKnee => "left_knee",
            JointName::RightKnee => "right_knee",
            JointName::LeftAnkle => "left_ankle",
            JointName::RightAnkle => "right_ankle",
        }
    }
}

impl fmt::Display for JointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JointName {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JointName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ModelError::UnknownJoint(s.to_string()))
    }
}

/// A single gated body joint. Replaced each frame, never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub name: JointName,
    pub position: Point2,
    /// Confidence in [0, 1]
    pub confidence: f32,
}

impl Joint {
    pub fn new(name: JointName, position: Point2, confidence: f32) -> Self {
        Self {
            name,
            position,
            confidence,
        }
    }
}

/// Joints of one frame, indexed by `JointName` ordinal
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Joint>", into = "Vec<Joint>")]
pub struct JointSet {
    slots: [Option<Joint>; JointName::COUNT],
}

impl JointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the joint in its slot
    pub fn insert(&mut self, joint: Joint) {
        self.slots[joint.name.index()] = Some(joint);
    }

    pub fn get(&self, name: JointName) -> Option<&Joint> {
        self.slots[name.index()].as_ref()
    }

    /// Joint if present with confidence strictly above `min_confidence`
    pub fn get_confident(&self, name: JointName, min_confidence: f32) -> Option<&Joint> {
        self.get(name).filter(|j| j.confidence > min_confidence)
    }

    pub fn remove(&mut self, name: JointName) -> Option<Joint> {
        self.slots[name.index()].take()
    }

    pub fn contains(&self, name: JointName) -> bool {
        self.slots[name.index()].is_some()
    }

    /// Present joints in ordinal order
    pub fn iter(&self) -> impl Iterator<Item = &Joint> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Number of present joints
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Number of joints with confidence strictly above `min_confidence`
    pub fn count_confident(&self, min_confidence: f32) -> usize {
        self.iter().filter(|j| j.confidence > min_confidence).count()
    }

    /// Copy of this set with every confidence scaled by `factor`
    pub fn decayed(&self, factor: f32) -> JointSet {
        self.iter()
            .map(|j| Joint {
                confidence: j.confidence * factor,
                ..*j
            })
            .collect()
    }
}

impl FromIterator<Joint> for JointSet {
    fn from_iter<I: IntoIterator<Item = Joint>>(iter: I) -> Self {
        let mut set = JointSet::new();
        for joint in iter {
            set.insert(joint);
        }
        set
    }
}

impl From<Vec<Joint>> for JointSet {
    fn from(joints: Vec<Joint>) -> Self {
        joints.into_iter().collect()
    }
}

impl From<JointSet> for Vec<Joint> {
    fn from(set: JointSet) -> Self {
        set.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_match_table() {
        for (i, name) in JointName::ALL.iter().enumerate() {
            assert_eq!(name.index(), i);
        }
    }

    #[test]
    fn test_categories_disjoint() {
        for name in JointName::ALL {
            assert!(!(name.is_critical() && name.is_lower_body()), "{name}");
        }
        assert!(JointName::Neck.is_critical());
        assert!(JointName::Root.is_lower_body());
        assert!(!JointName::LeftShoulder.is_critical());
    }

    #[test]
    fn test_parse_round_trip() {
        for name in JointName::ALL {
            assert_eq!(name.as_str().parse::<JointName>(), Ok(name));
        }
        assert!("tail".parse::<JointName>().is_err());
    }

    #[test]
    fn test_joint_set_insert_replace() {
        let mut set = JointSet::new();
        set.insert(Joint::new(JointName::Nose, Point2::new(0.5, 0.1), 0.4));
        set.insert(Joint::new(JointName::Nose, Point2::new(0.6, 0.1), 0.9));
        set.insert(Joint::new(JointName::LeftHip, Point2::new(0.4, 0.5), 0.2));

        assert_eq!(set.len(), 2);
        assert_eq!(set.get(JointName::Nose).map(|j| j.confidence), Some(0.9));
        assert_eq!(set.count_confident(0.3), 1);
        assert!(set.get_confident(JointName::LeftHip, 0.3).is_none());
    }

    #[test]
    fn test_decayed_scales_confidence_only() {
        let set: JointSet = vec![
            Joint::new(JointName::Nose, Point2::new(0.5, 0.1), 0.8),
            Joint::new(JointName::LeftKnee, Point2::new(0.4, 0.7), 0.5),
        ]
        .into();

        let decayed = set.decayed(0.5);
        assert_eq!(decayed.len(), 2);
        let knee = decayed.get(JointName::LeftKnee).unwrap();
        assert!((knee.confidence - 0.25).abs() < 1e-6);
        assert_eq!(knee.position, Point2::new(0.4, 0.7));
        assert_eq!(set.get(JointName::Nose).unwrap().confidence, 0.8);
    }

    #[test]
    fn test_serializes_as_list() {
        let set: JointSet = vec![Joint::new(JointName::Neck, Point2::new(0.5, 0.2), 0.8)].into();
        let json = serde_json::to_string(&set).unwrap();
        assert!(json.starts_with('['));
        let back: JointSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
