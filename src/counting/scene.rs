//! Scene preparation: resolve the pile ROI and keep only in-pile detections.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::counting::detection::{Detection, DetectionClass};
use crate::counting::rect::Rect;

/// Why a scene could not be prepared.
#[derive(Debug, Error)]
pub enum SceneError {
    /// No `pile` detection reached the confidence threshold. Callers
    /// decide how to react (skip the frame, request a recapture).
    #[error("no pile detection at or above the confidence threshold")]
    PileNotFound,
    /// The winning pile bounding box is empty or inverted, which breaks
    /// the upstream detector's contract.
    #[error("malformed pile bounding box ({x1}, {y1}, {x2}, {y2})")]
    MalformedBBox { x1: f32, y1: f32, x2: f32, y2: f32 },
}

/// How many detections of each kind survived the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SceneCounts {
    pub boxes: usize,
    pub barcodes: usize,
}

/// Filtered frame contents: the pile region and everything inside it.
#[derive(Debug, Clone, Serialize)]
pub struct PreparedScene {
    pub pile_roi: Rect,
    pub boxes: Vec<Detection>,
    pub barcodes: Vec<Detection>,
    pub counts: SceneCounts,
}

/// Filters raw detections down to the single best pile and its contents.
///
/// Pure function of its inputs; detections below threshold or outside
/// the pile are dropped silently.
#[derive(Debug, Clone)]
pub struct ScenePreparer {
    conf_thr: f32,
}

impl Default for ScenePreparer {
    fn default() -> Self {
        Self { conf_thr: 0.6 }
    }
}

impl ScenePreparer {
    pub fn new(conf_thr: f32) -> Self {
        Self { conf_thr }
    }

    /// Select the highest-confidence qualifying pile as the ROI, then
    /// retain every detection whose center lies inside it (threshold
    /// applied to all classes alike).
    pub fn prepare(&self, detections: &[Detection]) -> Result<PreparedScene, SceneError> {
        let pile = detections
            .iter()
            .filter(|d| d.class == DetectionClass::Pile && d.score >= self.conf_thr)
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or(SceneError::PileNotFound)?;

        let pile_roi = pile.bbox;
        if !pile_roi.is_valid() {
            return Err(SceneError::MalformedBBox {
                x1: pile_roi.x1,
                y1: pile_roi.y1,
                x2: pile_roi.x2,
                y2: pile_roi.y2,
            });
        }

        let mut boxes = Vec::new();
        let mut barcodes = Vec::new();
        for det in detections {
            if det.score < self.conf_thr {
                continue;
            }
            let (cx, cy) = det.bbox.center();
            if !pile_roi.contains_point(cx, cy) {
                continue;
            }
            match det.class {
                DetectionClass::Box => boxes.push(det.clone()),
                DetectionClass::Barcode => barcodes.push(det.clone()),
                _ => {}
            }
        }

        let counts = SceneCounts {
            boxes: boxes.len(),
            barcodes: barcodes.len(),
        };
        debug!(
            pile_score = pile.score,
            boxes = counts.boxes,
            barcodes = counts.barcodes,
            "scene prepared"
        );

        Ok(PreparedScene {
            pile_roi,
            boxes,
            barcodes,
            counts,
        })
    }
}
