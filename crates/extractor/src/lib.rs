//! Keypoint Extractor
//!
//! Turns raw per-frame estimator candidates into gated, oriented,
//! confidence-annotated records:
//! - Body joints with category thresholds and single-step history fallback
//! - Face landmarks grouped by region
//! - Hand joints with a fixed threshold and no fallback

pub mod config;
pub mod extractor;

pub use config::ExtractionConfig;
pub use extractor::{Extraction, KeypointExtractor};
