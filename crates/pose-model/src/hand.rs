//! Hand joint definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::geometry::Point2;
use crate::ModelError;

/// Left/right handedness of a detected hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chirality {
    Left,
    Right,
}

/// Wrist plus four joints for each of the five fingers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum HandJointName {
    Wrist = 0,
    ThumbCmc,
    ThumbMp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    LittleMcp,
    LittlePip,
    LittleDip,
    LittleTip,
}

impl HandJointName {
    pub const COUNT: usize = 21;

    pub const ALL: [HandJointName; Self::COUNT] = [
        HandJointName::Wrist,
        HandJointName::ThumbCmc,
        HandJointName::ThumbMp,
        HandJointName::ThumbIp,
        HandJointName::ThumbTip,
        HandJointName::IndexMcp,
        HandJointName::IndexPip,
        HandJointName::IndexDip,
        HandJointName::IndexTip,
        HandJointName::MiddleMcp,
        HandJointName::MiddlePip,
        HandJointName::MiddleDip,
        HandJointName::MiddleTip,
        HandJointName::RingMcp,
        HandJointName::RingPip,
        HandJointName::RingDip,
        HandJointName::RingTip,
        HandJointName::LittleMcp,
        HandJointName::LittlePip,
        HandJointName::LittleDip,
        HandJointName::LittleTip,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HandJointName::Wrist => "wrist",
            HandJointName::ThumbCmc => "thumb_cmc",
            HandJointName::ThumbMp => "thumb_mp",
            HandJointName::ThumbIp => "thumb_ip",
            HandJointName::ThumbTip => "thumb_tip",
            HandJointName::IndexMcp => "index_mcp",
            HandJointName::IndexPip => "index_pip",
            HandJointName::IndexDip => "index_dip",
            HandJointName::IndexTip => "index_tip",
            HandJointName::MiddleMcp => "middle_mcp",
            HandJointName::MiddlePip => "middle_pip",
            HandJointName::MiddleDip => "middle_dip",
            HandJointName::MiddleTip => "middle_tip",
            HandJointName::RingMcp => "ring_mcp",
            HandJointName::RingPip => "ring_pip",
            HandJointName::RingDip => "ring_dip",
            HandJointName::RingTip => "ring_tip",
            HandJointName::LittleMcp => "little_mcp",
            HandJointName::LittlePip => "little_pip",
            HandJointName::LittleDip => "little_dip",
            HandJointName::LittleTip => "little_tip",
        }
    }
}

impl fmt::Display for HandJointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HandJointName {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HandJointName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ModelError::UnknownHandJoint(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandJoint {
    pub name: HandJointName,
    pub position: Point2,
    pub confidence: f32,
}

/// A detected hand; a frame carries at most two
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedHand {
    /// Gated joints in ordinal order
    pub joints: Vec<HandJoint>,
    pub chirality: Chirality,
    /// Overall detection confidence
    pub confidence: f32,
}

impl DetectedHand {
    pub fn joint(&self, name: HandJointName) -> Option<&HandJoint> {
        self.joints.iter().find(|j| j.name == name)
    }
}
