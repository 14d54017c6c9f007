//! End-to-end counting pipeline for a single frame.

use thiserror::Error;
use tracing::debug;

use crate::counting::{
    Detection, LayerClusterer, LayerCorrector, SceneError, ScenePreparer, StackProcessorFactory,
    StackReport,
};

use super::DetectionSource;

/// Why a frame produced no count.
#[derive(Debug, Error)]
pub enum PipelineError<E> {
    /// The detection backend failed to produce detections.
    #[error("detection backend error")]
    Detection(E),
    /// The frame's detections could not be turned into a usable scene.
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// A combined counter that bundles detection inference with the
/// counting stages.
///
/// Runs the whole evaluation per frame: detect, prepare the scene,
/// cluster boxes into layers, correct the layers, then count through the
/// processor factory. Each stage keeps its own configuration; pass
/// customized instances to [`CountingPipeline::new`] to change
/// thresholds or policies.
pub struct CountingPipeline<D: DetectionSource> {
    source: D,
    preparer: ScenePreparer,
    clusterer: LayerClusterer,
    corrector: LayerCorrector,
    factory: StackProcessorFactory,
}

impl<D: DetectionSource> CountingPipeline<D> {
    /// Create a new counting pipeline with explicit stage instances.
    pub fn new(
        source: D,
        preparer: ScenePreparer,
        clusterer: LayerClusterer,
        corrector: LayerCorrector,
        factory: StackProcessorFactory,
    ) -> Self {
        Self {
            source,
            preparer,
            clusterer,
            corrector,
            factory,
        }
    }

    /// Create a new counting pipeline with default stage configuration.
    pub fn with_defaults(source: D) -> Self {
        Self::new(
            source,
            ScenePreparer::default(),
            LayerClusterer::default(),
            LayerCorrector::default(),
            StackProcessorFactory::default(),
        )
    }

    /// Process a single frame and return the consolidated count.
    ///
    /// Runs detection on the input image, then evaluates the detections
    /// against the stack-type template.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `template` - Expected box count per layer, topmost first
    pub fn process_frame(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
        template: &[u32],
    ) -> Result<StackReport, PipelineError<D::Error>> {
        let detections = self
            .source
            .detect(input, width, height)
            .map_err(PipelineError::Detection)?;
        debug!(detections = detections.len(), "frame detected");
        self.evaluate(&detections, template)
    }

    /// Evaluate detections the caller already has, without running the
    /// backend. One evaluation is independent of any other; callers may
    /// run many in parallel on separate pipeline instances.
    pub fn evaluate(
        &self,
        detections: &[Detection],
        template: &[u32],
    ) -> Result<StackReport, PipelineError<D::Error>> {
        let scene = self.preparer.prepare(detections)?;
        let layers = self.clusterer.cluster(&scene.boxes, &scene.pile_roi);
        let layers = self.corrector.correct(layers);
        Ok(self.factory.process(&layers, template, &scene.pile_roi))
    }

    /// Get a reference to the underlying detection source.
    pub fn source(&self) -> &D {
        &self.source
    }

    /// Get a mutable reference to the underlying detection source.
    pub fn source_mut(&mut self) -> &mut D {
        &mut self.source
    }
}
