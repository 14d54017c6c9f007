//! Geometric fill metrics over a layer's boxes.
//!
//! All metrics guard their degenerate cases (zero-width ROI, too few
//! boxes, zero mean) by returning 0.0 instead of dividing by zero.

use ndarray::Array1;

use crate::counting::detection::Detection;
use crate::counting::rect::Rect;

/// Fraction of the pile's horizontal extent spanned by the union of the
/// boxes' `[x1, x2]` intervals, clamped to [0, 1].
///
/// Overlapping and adjacent intervals are merged before summing, so
/// side-by-side boxes spanning the whole ROI yield exactly 1.0.
pub fn coverage(boxes: &[Detection], pile_roi: &Rect) -> f32 {
    if boxes.is_empty() {
        return 0.0;
    }
    let pile_w = pile_roi.width();
    if pile_w <= 0.0 {
        return 0.0;
    }

    let mut intervals: Vec<(f32, f32)> =
        boxes.iter().map(|b| (b.bbox.x1, b.bbox.x2)).collect();
    intervals.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut merged: Vec<(f32, f32)> = Vec::with_capacity(intervals.len());
    for (start, end) in intervals {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }

    let covered: f32 = merged.iter().map(|(s, e)| e - s).sum();
    (covered / pile_w).clamp(0.0, 1.0)
}

/// Coefficient of variation of the horizontal spacing between box centers.
///
/// 0.0 when fewer than 3 boxes or when the mean gap is 0 (stacked
/// centers). Scale-invariant: scaling all coordinates by a positive
/// constant leaves it unchanged.
pub fn cv_gap(boxes: &[Detection]) -> f32 {
    if boxes.len() < 3 {
        return 0.0;
    }
    let mut centers: Vec<f32> = boxes.iter().map(|b| b.bbox.center().0).collect();
    centers.sort_by(f32::total_cmp);

    let gaps = Array1::from_iter(centers.windows(2).map(|w| w[1] - w[0]));
    coefficient_of_variation(&gaps)
}

/// Coefficient of variation of box widths. Diagnostic only; 0.0 when
/// fewer than 2 boxes.
pub fn cv_width(boxes: &[Detection]) -> f32 {
    if boxes.len() < 2 {
        return 0.0;
    }
    let widths = Array1::from_iter(boxes.iter().map(|b| b.bbox.width()));
    coefficient_of_variation(&widths)
}

/// Population std over mean, 0.0 when the mean is 0.
fn coefficient_of_variation(values: &Array1<f32>) -> f32 {
    let mean = values.mean().unwrap_or(0.0);
    if mean == 0.0 {
        return 0.0;
    }
    values.std(0.0) / mean
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counting::detection::DetectionClass;

    fn boxed(x1: f32, y1: f32, x2: f32, y2: f32) -> Detection {
        Detection::new(DetectionClass::Box, Rect::new(x1, y1, x2, y2), 0.8)
    }

    fn scaled(det: &Detection, k: f32) -> Detection {
        let r = det.bbox;
        boxed(r.x1 * k, r.y1 * k, r.x2 * k, r.y2 * k)
    }

    #[test]
    fn test_coverage_full_split() {
        // Two boxes splitting a 100-wide ROI exactly in half
        let roi = Rect::new(0.0, 0.0, 100.0, 200.0);
        let boxes = vec![boxed(0.0, 0.0, 50.0, 30.0), boxed(50.0, 0.0, 100.0, 30.0)];
        assert!((coverage(&boxes, &roi) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_coverage_overlapping_boxes_merge() {
        let roi = Rect::new(0.0, 0.0, 100.0, 200.0);
        // 0..60 and 40..80 merge into 0..80
        let boxes = vec![boxed(0.0, 0.0, 60.0, 30.0), boxed(40.0, 0.0, 80.0, 30.0)];
        assert!((coverage(&boxes, &roi) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_coverage_bounds() {
        let roi = Rect::new(0.0, 0.0, 100.0, 200.0);
        assert_eq!(coverage(&[], &roi), 0.0);

        // Boxes spilling past the ROI still clamp to 1.0
        let boxes = vec![boxed(-20.0, 0.0, 140.0, 30.0)];
        assert_eq!(coverage(&boxes, &roi), 1.0);
    }

    #[test]
    fn test_coverage_zero_width_roi() {
        let roi = Rect::new(50.0, 0.0, 50.0, 200.0);
        let boxes = vec![boxed(0.0, 0.0, 50.0, 30.0)];
        assert_eq!(coverage(&boxes, &roi), 0.0);
    }

    #[test]
    fn test_cv_gap_guards() {
        assert_eq!(cv_gap(&[]), 0.0);
        let two = vec![boxed(0.0, 0.0, 10.0, 10.0), boxed(20.0, 0.0, 30.0, 10.0)];
        assert_eq!(cv_gap(&two), 0.0);

        // Three boxes with identical centers: mean gap 0
        let stacked = vec![
            boxed(0.0, 0.0, 10.0, 10.0),
            boxed(0.0, 10.0, 10.0, 20.0),
            boxed(0.0, 20.0, 10.0, 30.0),
        ];
        assert_eq!(cv_gap(&stacked), 0.0);
    }

    #[test]
    fn test_cv_gap_even_spacing_is_zero() {
        let boxes = vec![
            boxed(0.0, 0.0, 10.0, 10.0),
            boxed(20.0, 0.0, 30.0, 10.0),
            boxed(40.0, 0.0, 50.0, 10.0),
        ];
        assert!(cv_gap(&boxes) < 1e-6);
    }

    #[test]
    fn test_cv_width_guards() {
        assert_eq!(cv_width(&[]), 0.0);
        assert_eq!(cv_width(&[boxed(0.0, 0.0, 10.0, 10.0)]), 0.0);
    }

    #[test]
    fn test_cv_scale_invariance() {
        let boxes = vec![
            boxed(0.0, 0.0, 12.0, 10.0),
            boxed(15.0, 0.0, 30.0, 10.0),
            boxed(33.0, 0.0, 50.0, 10.0),
            boxed(58.0, 0.0, 70.0, 10.0),
        ];
        let big: Vec<Detection> = boxes.iter().map(|b| scaled(b, 2.5)).collect();

        assert!((cv_gap(&boxes) - cv_gap(&big)).abs() < 1e-5);
        assert!((cv_width(&boxes) - cv_width(&big)).abs() < 1e-5);
    }
}
