mod cluster;
mod correct;
mod detection;
mod detector;
mod factory;
mod metrics;
mod processor;
mod rect;
mod scene;

pub use cluster::{ClusterConfig, Layer, LayerClusterer};
pub use correct::{CorrectorConfig, FrontRow, LayerCorrector};
pub use detection::{Detection, DetectionClass};
pub use detector::{
    CoverageDetector, DetectionMetrics, DetectionResult, DetectorConfig, FullLayerDetector,
    FullReason, TopLayerReport,
};
pub use factory::{StackProcessorFactory, StackReport};
pub use metrics::{coverage, cv_gap, cv_width};
pub use processor::{
    FullStackProcessor, PartialStackProcessor, ProcessingDetails, ProcessingResult, Strategy,
    TemplateFullProcessor, TemplatePartialProcessor,
};
pub use rect::{Rect, bounding_extent};
pub use scene::{PreparedScene, SceneCounts, SceneError, ScenePreparer};
