//! History Buffers
//!
//! Bounded FIFO windows that retain the last few fused outputs per signal
//! (pose, face, hands, posture) for smoothing and fallback.

mod buffer;

pub use buffer::HistoryBuffer;

/// Capacity of the fused pose window
pub const POSE_HISTORY_CAPACITY: usize = 5;

/// Capacity of the face, hand and posture windows
pub const SIGNAL_HISTORY_CAPACITY: usize = 3;
