//! Temporal Smoothing Engine
//!
//! Blends the current extraction against the most recent fused history:
//! - Joints: exponential moving average against the previous fused pose
//! - Face: keep the more trustworthy of current and previous face
//! - Hands: confidence-weighted blend against the same-chirality hand
//! - Posture: majority vote over the posture window
//!
//! The smoother never owns history; callers pass read-only windows and get
//! new values back.

mod config;
mod face;
mod hands;
mod joints;
mod posture;

pub use config::SmoothingConfig;

/// Stateless smoother parameterized by its configuration
#[derive(Debug, Clone, Default)]
pub struct TemporalSmoother {
    config: SmoothingConfig,
}

impl TemporalSmoother {
    pub fn new(config: SmoothingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SmoothingConfig {
        &self.config
    }
}
