//! Layer corrections for oblique-camera artifacts.
//!
//! Two independent heuristics, each a no-op when its preconditions do
//! not hold: rear-row suppression and fake-top-layer removal.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::counting::cluster::Layer;
use crate::counting::rect::bounding_extent;

/// Rear suppression applies only to layers with more boxes than this.
const MIN_SPLIT_BOXES: usize = 3;

/// Which vertical side of a layer is the front (camera-near) row.
///
/// Coordinate-system-dependent: with a camera tilted down at the stack,
/// larger image y is nearer. Kept configurable because the convention
/// flips if the frame is rectified or the camera mounted differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontRow {
    LargerY,
    SmallerY,
}

/// Configuration for the layer corrector.
#[derive(Debug, Clone)]
pub struct CorrectorConfig {
    /// Drop the top layer when `width_top / width_next` falls below this.
    pub width_ratio_thr: f32,
    /// Front-row sign convention for rear suppression.
    pub front_row: FrontRow,
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        Self {
            width_ratio_thr: 0.7,
            front_row: FrontRow::LargerY,
        }
    }
}

/// Applies rear-row suppression and fake-top removal after clustering.
#[derive(Debug, Clone, Default)]
pub struct LayerCorrector {
    config: CorrectorConfig,
}

impl LayerCorrector {
    pub fn new(config: CorrectorConfig) -> Self {
        Self { config }
    }

    /// Both corrections in order: rear suppression, then fake-top removal.
    pub fn correct(&self, mut layers: Vec<Layer>) -> Vec<Layer> {
        self.suppress_rear_rows(&mut layers);
        self.remove_fake_top_layer(layers)
    }

    /// Remove occluded rear-row boxes from multi-layer stacks.
    ///
    /// Single-layer stacks are assumed fully visible and left alone.
    /// Within a layer of more than `MIN_SPLIT_BOXES` boxes, keep the
    /// boxes on the front side of the mean vertical center and record
    /// how many were dropped. The layer's `avg_y` and `roi` keep their
    /// clustering-time values.
    pub fn suppress_rear_rows(&self, layers: &mut [Layer]) {
        if layers.len() <= 1 {
            return;
        }
        for layer in layers.iter_mut() {
            if layer.boxes.len() <= MIN_SPLIT_BOXES {
                continue;
            }
            let y_mean = layer.boxes.iter().map(|b| b.bbox.center_y()).sum::<f32>()
                / layer.boxes.len() as f32;
            let before = layer.boxes.len();
            layer.boxes.retain(|b| match self.config.front_row {
                FrontRow::LargerY => b.bbox.center_y() >= y_mean,
                FrontRow::SmallerY => b.bbox.center_y() <= y_mean,
            });
            layer.rear_removed = before - layer.boxes.len();
            if layer.rear_removed > 0 {
                debug!(
                    avg_y = layer.avg_y,
                    kept = layer.boxes.len(),
                    rear_removed = layer.rear_removed,
                    "suppressed rear row"
                );
            }
        }
    }

    /// Drop a spurious thin top layer caused by perspective truncation.
    ///
    /// Compares the topmost layer's horizontal extent against the next
    /// layer's; a top layer narrower than `width_ratio_thr` of the one
    /// below is judged a sliver caught at the frame edge and discarded.
    /// No-op with fewer than 2 layers.
    pub fn remove_fake_top_layer(&self, layers: Vec<Layer>) -> Vec<Layer> {
        if layers.len() < 2 {
            return layers;
        }
        let width_top = layer_width(&layers[0]);
        let width_next = layer_width(&layers[1]);
        let ratio = width_top / width_next.max(1e-6);

        debug!(width_top, width_next, ratio, "fake-top width check");

        if ratio < self.config.width_ratio_thr {
            debug!("top layer judged a perspective artifact, removing");
            return layers.into_iter().skip(1).collect();
        }
        layers
    }
}

/// Horizontal extent of a layer, from the stored ROI when it is usable
/// and recomputed from member boxes otherwise.
fn layer_width(layer: &Layer) -> f32 {
    let w = layer.roi.width();
    if w > 0.0 {
        return w;
    }
    bounding_extent(layer.boxes.iter().map(|b| &b.bbox))
        .map(|r| r.width())
        .unwrap_or(0.0)
}
