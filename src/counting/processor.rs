//! Stack processors: turn a full-layer verdict plus a template into a
//! final box count.

use serde::Serialize;
use tracing::{debug, warn};

use crate::counting::cluster::Layer;
use crate::counting::detector::DetectionResult;

/// How the final total was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    FullMatch,
    PartialVisible,
    ExceedTemplate,
    PartialWithTemplate,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullMatch => "full_match",
            Self::PartialVisible => "partial_visible",
            Self::ExceedTemplate => "exceed_template",
            Self::PartialWithTemplate => "partial_with_template",
        }
    }
}

/// Raw counts behind a processing decision.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingDetails {
    pub n_detected: usize,
    pub n_template: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_sum: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_layer_observed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_layers_sum: Option<u32>,
    /// Human-readable account of the arithmetic
    pub calculation: String,
}

/// Result of converting a verdict into a count. The total is a sum of
/// non-negative template entries and observed counts, so it cannot go
/// negative.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingResult {
    pub total: u32,
    pub strategy: Strategy,
    pub details: ProcessingDetails,
}

/// Counting policy for a stack whose top layer is full.
pub trait FullStackProcessor {
    fn process(
        &self,
        layers: &[Layer],
        template: &[u32],
        detection: &DetectionResult,
    ) -> ProcessingResult;
}

/// Counting policy for a stack whose top layer is short.
pub trait PartialStackProcessor {
    fn process(
        &self,
        layers: &[Layer],
        template: &[u32],
        detection: &DetectionResult,
    ) -> ProcessingResult;
}

/// Template-driven full-stack count.
///
/// Fewer detected layers than template layers means the camera missed
/// the uppermost layers, so only the visible prefix of the template is
/// summed. More detected layers than configured is anomalous; falls
/// back to the full template sum.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateFullProcessor;

impl FullStackProcessor for TemplateFullProcessor {
    fn process(
        &self,
        layers: &[Layer],
        template: &[u32],
        _detection: &DetectionResult,
    ) -> ProcessingResult {
        let n_detected = layers.len();
        let n_template = template.len();
        let template_sum: u32 = template.iter().sum();

        let (total, strategy, calculation) = if n_detected == n_template {
            (
                template_sum,
                Strategy::FullMatch,
                format!(
                    "detected layers ({n_detected}) match template layers ({n_template}); \
                     total is the full template sum"
                ),
            )
        } else if n_detected < n_template {
            let visible: u32 = template[..n_detected].iter().sum();
            (
                visible,
                Strategy::PartialVisible,
                format!(
                    "detected layers ({n_detected}) below template layers ({n_template}); \
                     total is the sum of the first {n_detected} template entries"
                ),
            )
        } else {
            warn!(
                n_detected,
                n_template, "more layers detected than the template configures"
            );
            (
                template_sum,
                Strategy::ExceedTemplate,
                format!(
                    "detected layers ({n_detected}) exceed template layers ({n_template}); \
                     falling back to the full template sum"
                ),
            )
        };

        debug!(total, strategy = strategy.as_str(), "full stack processed");

        ProcessingResult {
            total,
            strategy,
            details: ProcessingDetails {
                n_detected,
                n_template,
                template_sum: Some(template_sum),
                top_layer_observed: None,
                lower_layers_sum: None,
                calculation,
            },
        }
    }
}

/// Template-driven partial-stack count: every template layer except the
/// topmost is assumed full, and the top layer contributes what was
/// actually observed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplatePartialProcessor;

impl PartialStackProcessor for TemplatePartialProcessor {
    fn process(
        &self,
        layers: &[Layer],
        template: &[u32],
        detection: &DetectionResult,
    ) -> ProcessingResult {
        let n_detected = layers.len();
        let n_template = template.len();

        let observed = detection
            .top_layer
            .as_ref()
            .map(|t| t.observed)
            .unwrap_or(0);

        let lower_layers_sum: u32 = if n_template > 1 {
            template[..n_template - 1].iter().sum()
        } else {
            0
        };
        let total = lower_layers_sum + observed;

        let calculation = format!(
            "top layer short; lower template sum ({lower_layers_sum}) \
             plus observed top boxes ({observed}) gives {total}"
        );
        debug!(
            total,
            lower_layers_sum, observed, "partial stack processed"
        );

        ProcessingResult {
            total,
            strategy: Strategy::PartialWithTemplate,
            details: ProcessingDetails {
                n_detected,
                n_template,
                template_sum: None,
                top_layer_observed: Some(observed),
                lower_layers_sum: Some(lower_layers_sum),
                calculation,
            },
        }
    }
}
