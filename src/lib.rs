//! Estimate how many boxes a palletized stack holds from a single
//! camera frame's object detections.
//!
//! The input is a list of classed detections (`pile`, `box`, `barcode`)
//! from an external model such as YOLO. The crate resolves the pile
//! region, groups in-pile boxes into horizontal layers, corrects for
//! oblique-camera artifacts, decides whether the top layer is full, and
//! combines the verdict with a per-stack-type template into a final
//! count.
//!
//! The [`counting`] module is the pure core: every stage is a value-in,
//! value-out function with no I/O and no state between frames. The
//! [`integration`] module connects detection backends, template
//! configuration and the per-frame pipeline.
//!
//! # Example
//!
//! ```
//! use stackcount_rs::counting::{
//!     Detection, DetectionClass, LayerClusterer, LayerCorrector, Rect, ScenePreparer,
//!     StackProcessorFactory,
//! };
//!
//! let detections = vec![
//!     Detection::new(DetectionClass::Pile, Rect::new(0.0, 0.0, 100.0, 200.0), 0.9),
//!     Detection::new(DetectionClass::Box, Rect::new(0.0, 150.0, 50.0, 190.0), 0.8),
//!     Detection::new(DetectionClass::Box, Rect::new(50.0, 150.0, 100.0, 190.0), 0.8),
//! ];
//!
//! let scene = ScenePreparer::default().prepare(&detections).unwrap();
//! let layers = LayerClusterer::default().cluster(&scene.boxes, &scene.pile_roi);
//! let layers = LayerCorrector::default().correct(layers);
//! let report = StackProcessorFactory::default().process(&layers, &[2], &scene.pile_roi);
//!
//! assert!(report.full);
//! assert_eq!(report.total, 2);
//! ```

pub mod counting;
pub mod integration;

pub use counting::{
    Detection, DetectionClass, DetectionResult, FullReason, Layer, ProcessingResult, Rect,
    SceneError, StackProcessorFactory, StackReport, Strategy,
};
pub use integration::{CountingPipeline, DetectionBuilder, DetectionSource, TemplateStore};
