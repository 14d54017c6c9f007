//! Orchestration: detector verdict, processor selection, consolidated result.

use serde::Serialize;
use tracing::debug;

use crate::counting::cluster::Layer;
use crate::counting::detector::{
    CoverageDetector, DetectionResult, FullLayerDetector, FullReason, TopLayerReport,
};
use crate::counting::processor::{
    FullStackProcessor, PartialStackProcessor, ProcessingResult, TemplateFullProcessor,
    TemplatePartialProcessor,
};
use crate::counting::rect::Rect;

/// Consolidated per-frame result, directly JSON-serializable.
#[derive(Debug, Clone, Serialize)]
pub struct StackReport {
    pub full: bool,
    pub total: u32,
    pub detection: DetectionResult,
    pub processing: ProcessingResult,
    pub top_layer: Option<TopLayerReport>,
    pub reason: FullReason,
}

/// Wires detector and processors together.
///
/// The single integration point: runs the configured detector, routes to
/// the full or partial processor on its verdict, and assembles the
/// consolidated report without re-deriving anything either stage already
/// computed. Strategies are injected at construction; new detectors or
/// processors implement the traits without touching this type.
pub struct StackProcessorFactory {
    detector: Box<dyn FullLayerDetector>,
    full_processor: Box<dyn FullStackProcessor>,
    partial_processor: Box<dyn PartialStackProcessor>,
}

impl Default for StackProcessorFactory {
    fn default() -> Self {
        Self::new(
            Box::new(CoverageDetector::default()),
            Box::new(TemplateFullProcessor),
            Box::new(TemplatePartialProcessor),
        )
    }
}

impl StackProcessorFactory {
    pub fn new(
        detector: Box<dyn FullLayerDetector>,
        full_processor: Box<dyn FullStackProcessor>,
        partial_processor: Box<dyn PartialStackProcessor>,
    ) -> Self {
        Self {
            detector,
            full_processor,
            partial_processor,
        }
    }

    pub fn process(&self, layers: &[Layer], template: &[u32], pile_roi: &Rect) -> StackReport {
        let detection = self.detector.detect(layers, template, pile_roi);

        let processing = if detection.full {
            self.full_processor.process(layers, template, &detection)
        } else {
            self.partial_processor.process(layers, template, &detection)
        };

        debug!(
            full = detection.full,
            total = processing.total,
            reason = detection.reason.as_str(),
            strategy = processing.strategy.as_str(),
            "stack evaluation complete"
        );

        StackReport {
            full: detection.full,
            total: processing.total,
            top_layer: detection.top_layer,
            reason: detection.reason,
            detection,
            processing,
        }
    }
}
