//! Builder for creating Detection objects from various input formats.

use crate::counting::{Detection, DetectionClass, Rect};

/// Builder for creating `Detection` objects from the coordinate formats
/// detection models commonly emit.
#[derive(Debug, Clone)]
pub struct DetectionBuilder {
    class: DetectionClass,
    bbox: Rect,
    score: f32,
}

impl Default for DetectionBuilder {
    fn default() -> Self {
        Self {
            class: DetectionClass::Box,
            bbox: Rect::default(),
            score: 0.0,
        }
    }
}

impl DetectionBuilder {
    /// Create a new detection builder (class defaults to `Box`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the object class.
    pub fn class(mut self, class: DetectionClass) -> Self {
        self.class = class;
        self
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.bbox = Rect::new(x1, y1, x2, y2);
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::from_xywh(cx, cy, w, h);
        self
    }

    /// Set bounding box in TLWH format (top-left x, top-left y, width, height).
    pub fn tlwh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::from_tlwh(x, y, w, h);
        self
    }

    /// Set the confidence score.
    pub fn score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    /// Build the final `Detection`.
    pub fn build(self) -> Detection {
        Detection::new(self.class, self.bbox, self.score)
    }
}
