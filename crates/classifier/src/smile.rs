//! Smile score from mouth landmark geometry

use pose_model::{DetectedFace, FaceRegion, Point2};

use crate::SmileConfig;

/// Derives a 0-1 smile score from outer and inner lip landmarks
#[derive(Debug, Clone, Default)]
pub struct SmileEstimator {
    config: SmileConfig,
}

impl SmileEstimator {
    pub fn new(config: SmileConfig) -> Self {
        Self { config }
    }

    /// Score a face from its lip regions
    pub fn score_face(&self, face: &DetectedFace) -> f32 {
        let outer = face.region(FaceRegion::OuterLips);
        let inner = face.region(FaceRegion::InnerLips);
        self.score(&outer, &inner)
    }

    /// Wide mouth and lifted corners raise the score; a wide-open mouth lowers it.
    /// Without outer-lip points the score is zero.
    pub fn score(&self, outer: &[Point2], inner: &[Point2]) -> f32 {
        let Some((left, right)) = corners(outer) else {
            return 0.0;
        };
        let cfg = &self.config;

        let width = right.x - left.x;
        let height = vertical_span(if inner.is_empty() { outer } else { inner });
        let center_y = outer.iter().map(|p| p.y).sum::<f32>() / outer.len() as f32;
        let corner_lift = (center_y - (left.y + right.y) / 2.0).max(0.0);

        let width_score = ((width - cfg.width_baseline) / cfg.width_range).clamp(0.0, 1.0);
        let corner_score = (corner_lift / cfg.corner_lift_range).clamp(0.0, 1.0);
        let open_penalty = ((height - cfg.open_baseline) / cfg.open_range).clamp(0.0, 1.0);

        let raw = cfg.width_weight * width_score + cfg.corner_weight * corner_score
            - cfg.open_penalty_weight * open_penalty;
        raw.clamp(0.0, 1.0)
    }
}

/// Leftmost and rightmost points
fn corners(points: &[Point2]) -> Option<(Point2, Point2)> {
    let left = points.iter().copied().min_by(|a, b| a.x.total_cmp(&b.x))?;
    let right = points.iter().copied().max_by(|a, b| a.x.total_cmp(&b.x))?;
    Some((left, right))
}

fn vertical_span(points: &[Point2]) -> f32 {
    let (min, max) = points
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
    if min.is_finite() {
        max - min
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_model::{BoundingBox, FaceLandmark};
    use proptest::prelude::*;

    fn p(x: f32, y: f32) -> Point2 {
        Point2::new(x, y)
    }

    /// Outer lip with corners at x = 0 and x = width, center row `mid_y`
    fn outer_lip(width: f32, mid_y: f32) -> Vec<Point2> {
        vec![p(0.0, 0.5), p(width * 0.3, mid_y), p(width * 0.7, mid_y), p(width, 0.5)]
    }

    #[test]
    fn test_broad_smile_saturates() {
        let estimator = SmileEstimator::default();
        // Corners at y 0.5, middle at 0.74: mean 0.62, lift 0.12
        let outer = vec![p(0.175, 0.5), p(0.4, 0.74), p(0.6, 0.74), p(0.825, 0.5)];
        let inner = vec![p(0.4, 0.6), p(0.6, 0.65)];

        assert_eq!(estimator.score(&outer, &inner), 1.0);
    }

    #[test]
    fn test_neutral_mouth_scores_zero() {
        let estimator = SmileEstimator::default();
        let outer = vec![p(0.35, 0.5), p(0.5, 0.48), p(0.65, 0.5)];
        assert_eq!(estimator.score(&outer, &[]), 0.0);
    }

    #[test]
    fn test_wide_open_mouth_penalized() {
        let estimator = SmileEstimator::default();
        let outer = outer_lip(0.65, 0.5);
        let closed = estimator.score(&outer, &[p(0.3, 0.5), p(0.3, 0.55)]);
        let open = estimator.score(&outer, &[p(0.3, 0.3), p(0.3, 0.65)]);

        assert!((closed - 0.6).abs() < 1e-5);
        assert!((open - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_outer_used_for_height_without_inner() {
        let estimator = SmileEstimator::default();
        let outer = vec![p(0.0, 0.2), p(0.3, 0.6), p(0.65, 0.2)];

        // Outer height 0.4 draws the full penalty: 0.6 + 0.5 - 0.3
        let score = estimator.score(&outer, &[]);
        assert!((score - 0.8).abs() < 1e-5);

        let score = estimator.score(&outer, &[p(0.3, 0.4), p(0.3, 0.45)]);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_missing_outer_lips() {
        let estimator = SmileEstimator::default();
        assert_eq!(estimator.score(&[], &[p(0.5, 0.5)]), 0.0);
    }

    #[test]
    fn test_score_face_reads_regions() {
        let estimator = SmileEstimator::default();
        let landmarks = outer_lip(0.65, 0.5)
            .into_iter()
            .enumerate()
            .map(|(index, position)| FaceLandmark {
                region: FaceRegion::OuterLips,
                index,
                position,
                confidence: 0.9,
            })
            .collect();
        let face = DetectedFace {
            landmarks,
            bounding_box: BoundingBox::new(0.3, 0.2, 0.4, 0.4),
            confidence: 0.9,
            smile_score: 0.0,
        };

        assert!((estimator.score_face(&face) - 0.6).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_wider_mouth_never_scores_lower(
            w1 in 0.0f32..1.0,
            w2 in 0.0f32..1.0,
            mid_y in 0.4f32..0.7,
            h in 0.0f32..0.5,
        ) {
            let estimator = SmileEstimator::default();
            let (narrow, wide) = if w1 <= w2 { (w1, w2) } else { (w2, w1) };
            let inner = vec![p(0.0, 0.0), p(0.0, h)];

            let a = estimator.score(&outer_lip(narrow, mid_y), &inner);
            let b = estimator.score(&outer_lip(wide, mid_y), &inner);
            prop_assert!(a <= b);
        }

        #[test]
        fn prop_taller_opening_never_scores_higher(
            h1 in 0.22f32..1.0,
            h2 in 0.22f32..1.0,
            width in 0.0f32..1.0,
            mid_y in 0.4f32..0.7,
        ) {
            let estimator = SmileEstimator::default();
            let (low, high) = if h1 <= h2 { (h1, h2) } else { (h2, h1) };
            let outer = outer_lip(width, mid_y);

            let a = estimator.score(&outer, &[p(0.0, 0.0), p(0.0, low)]);
            let b = estimator.score(&outer, &[p(0.0, 0.0), p(0.0, high)]);
            prop_assert!(a >= b);
        }
    }
}
