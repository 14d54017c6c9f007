//! Full-layer detection: is the topmost layer completely filled?

use serde::Serialize;
use tracing::debug;

use crate::counting::cluster::Layer;
use crate::counting::metrics;
use crate::counting::rect::Rect;

/// Why the detector reached its verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FullReason {
    EmptyLayers,
    MatchTemplate,
    ContinuousFilled,
    LowCoverageOrGap,
}

impl FullReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyLayers => "empty_layers",
            Self::MatchTemplate => "match_template",
            Self::ContinuousFilled => "continuous_filled",
            Self::LowCoverageOrGap => "low_coverage_or_gap",
        }
    }
}

/// Metrics for the evaluated top layer, rounded to 3 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TopLayerReport {
    /// 1-based index; the evaluated layer is always the topmost.
    pub index: usize,
    /// Expected box count from the template
    pub expected: u32,
    /// Boxes actually detected in the layer
    pub observed: u32,
    pub coverage: f32,
    pub cv_gap: f32,
    pub cv_width: f32,
}

/// Every metric the decision saw, with the thresholds in force, for
/// auditability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetectionMetrics {
    pub coverage: f32,
    pub cv_gap: f32,
    pub cv_width: f32,
    pub coverage_threshold: f32,
    pub cv_gap_threshold: f32,
}

/// Outcome of one full-layer evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionResult {
    pub full: bool,
    pub reason: FullReason,
    pub top_layer: Option<TopLayerReport>,
    pub metrics: Option<DetectionMetrics>,
}

/// Pluggable verdict on the topmost corrected layer.
///
/// Implement this to swap in a different fill policy; the factory calls
/// it without knowing which variant it holds.
pub trait FullLayerDetector {
    fn detect(&self, layers: &[Layer], template: &[u32], pile_roi: &Rect) -> DetectionResult;
}

/// Configuration for the coverage-based detector.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub coverage_threshold: f32,
    pub cv_gap_threshold: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            coverage_threshold: 0.9,
            cv_gap_threshold: 0.4,
        }
    }
}

/// Default detector: trusts an exact template match outright, otherwise
/// accepts wall-to-wall fill with regular spacing.
#[derive(Debug, Clone, Default)]
pub struct CoverageDetector {
    config: DetectorConfig,
}

impl CoverageDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }
}

impl FullLayerDetector for CoverageDetector {
    fn detect(&self, layers: &[Layer], template: &[u32], pile_roi: &Rect) -> DetectionResult {
        // Layer order may have been disturbed upstream; smallest avg_y is top.
        let Some(top) = layers.iter().min_by(|a, b| a.avg_y.total_cmp(&b.avg_y)) else {
            return DetectionResult {
                full: false,
                reason: FullReason::EmptyLayers,
                top_layer: None,
                metrics: None,
            };
        };

        let expected = template.first().copied().unwrap_or(0);
        let observed = top.boxes.len() as u32;

        let coverage = metrics::coverage(&top.boxes, pile_roi);
        let cv_gap = metrics::cv_gap(&top.boxes);
        let cv_width = metrics::cv_width(&top.boxes);

        let (full, reason) = if observed == expected {
            (true, FullReason::MatchTemplate)
        } else if coverage > self.config.coverage_threshold
            && cv_gap < self.config.cv_gap_threshold
        {
            (true, FullReason::ContinuousFilled)
        } else {
            (false, FullReason::LowCoverageOrGap)
        };

        debug!(
            observed,
            expected,
            coverage,
            cv_gap,
            cv_width,
            full,
            reason = reason.as_str(),
            "full-layer verdict"
        );

        DetectionResult {
            full,
            reason,
            top_layer: Some(TopLayerReport {
                index: 1,
                expected,
                observed,
                coverage: round3(coverage),
                cv_gap: round3(cv_gap),
                cv_width: round3(cv_width),
            }),
            metrics: Some(DetectionMetrics {
                coverage: round3(coverage),
                cv_gap: round3(cv_gap),
                cv_width: round3(cv_width),
                coverage_threshold: self.config.coverage_threshold,
                cv_gap_threshold: self.config.cv_gap_threshold,
            }),
        }
    }
}

fn round3(v: f32) -> f32 {
    (v * 1000.0).round() / 1000.0
}
