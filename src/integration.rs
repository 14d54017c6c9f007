//! Integration module for connecting external collaborators to the
//! counting core.
//!
//! Provides the detection-backend trait, a detection builder, the
//! per-frame counting pipeline and the stack-type template store.

mod builder;
mod pipeline;
mod source;
mod templates;

pub use builder::DetectionBuilder;
pub use pipeline::{CountingPipeline, PipelineError};
pub use source::{DetectionSource, IntoDetections};
pub use templates::{TemplateError, TemplateStore, fallback_template};
