//! Grouping in-pile boxes into horizontal layers by vertical position.

use serde::Serialize;
use tracing::debug;

use crate::counting::detection::Detection;
use crate::counting::rect::{Rect, bounding_extent};

/// One physical horizontal layer of the stack.
#[derive(Debug, Clone, Serialize)]
pub struct Layer {
    /// Member boxes. Mutually exclusive across layers, collectively
    /// exhaustive over the clusterer's input.
    pub boxes: Vec<Detection>,
    /// Mean of the member boxes' vertical centers. Smaller = higher.
    pub avg_y: f32,
    /// Bounding extent of the member boxes at clustering time.
    pub roi: Rect,
    /// Boxes removed by rear-row suppression, for diagnostics.
    pub rear_removed: usize,
}

impl Layer {
    fn from_boxes(boxes: Vec<Detection>) -> Self {
        let avg_y =
            boxes.iter().map(|b| b.bbox.center_y()).sum::<f32>() / boxes.len().max(1) as f32;
        let roi = bounding_extent(boxes.iter().map(|b| &b.bbox)).unwrap_or_default();
        Self {
            boxes,
            avg_y,
            roi,
            rear_removed: 0,
        }
    }
}

/// Configuration for the layer clusterer.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// A new layer starts when the vertical-center gap between adjacent
    /// boxes exceeds this fraction of the median box height.
    pub gap_ratio: f32,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self { gap_ratio: 0.5 }
    }
}

/// Gap-based 1-D clusterer over vertical box centers.
///
/// Boxes whose centers sit within the split threshold of each other end
/// up in the same layer; layers come back sorted ascending by `avg_y`,
/// topmost first. A single outlier box still forms its own layer.
#[derive(Debug, Clone, Default)]
pub struct LayerClusterer {
    config: ClusterConfig,
}

impl LayerClusterer {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    pub fn cluster(&self, boxes: &[Detection], pile_roi: &Rect) -> Vec<Layer> {
        if boxes.is_empty() {
            return Vec::new();
        }

        let mut sorted: Vec<Detection> = boxes.to_vec();
        sorted.sort_by(|a, b| a.bbox.center_y().total_cmp(&b.bbox.center_y()));

        let threshold = self.split_threshold(&sorted, pile_roi);

        let mut layers: Vec<Layer> = Vec::new();
        let mut current: Vec<Detection> = Vec::new();
        let mut prev_y = f32::NEG_INFINITY;
        for det in sorted {
            let yc = det.bbox.center_y();
            if !current.is_empty() && yc - prev_y > threshold {
                layers.push(Layer::from_boxes(std::mem::take(&mut current)));
            }
            prev_y = yc;
            current.push(det);
        }
        if !current.is_empty() {
            layers.push(Layer::from_boxes(current));
        }

        debug!(
            boxes = boxes.len(),
            layers = layers.len(),
            threshold,
            "clustered boxes into layers"
        );
        layers
    }

    /// Split threshold proportional to the median box height, falling
    /// back to a fraction of the pile height when every box is flat.
    fn split_threshold(&self, sorted: &[Detection], pile_roi: &Rect) -> f32 {
        let mut heights: Vec<f32> = sorted.iter().map(|d| d.bbox.height()).collect();
        heights.sort_by(f32::total_cmp);
        let median = heights[heights.len() / 2];
        if median > 0.0 {
            self.config.gap_ratio * median
        } else {
            0.05 * pile_roi.height().max(0.0)
        }
    }
}
