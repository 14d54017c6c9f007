use stackcount_rs::counting::{
    CoverageDetector, Detection, DetectionClass, DetectorConfig, FullLayerDetector, FullReason,
    LayerClusterer, LayerCorrector, Rect, ScenePreparer, StackProcessorFactory, Strategy,
};
use stackcount_rs::integration::fallback_template;

fn det(class: DetectionClass, x1: f32, y1: f32, x2: f32, y2: f32, score: f32) -> Detection {
    Detection::new(class, Rect::new(x1, y1, x2, y2), score)
}

#[test]
fn test_full_stack_end_to_end() {
    // One pile (0,0)-(100,200), one layer of 3 boxes evenly covering
    // x in [0, 100], template [3]
    let detections = vec![
        det(DetectionClass::Pile, 0.0, 0.0, 100.0, 200.0, 0.9),
        det(DetectionClass::Box, 0.0, 150.0, 33.0, 190.0, 0.7),
        det(DetectionClass::Box, 33.0, 150.0, 66.0, 190.0, 0.65),
        det(DetectionClass::Box, 66.0, 150.0, 100.0, 190.0, 0.6),
    ];

    let scene = ScenePreparer::default().prepare(&detections).unwrap();
    assert_eq!(scene.counts.boxes, 3);

    let layers = LayerClusterer::default().cluster(&scene.boxes, &scene.pile_roi);
    assert_eq!(layers.len(), 1);

    let layers = LayerCorrector::default().correct(layers);
    let report = StackProcessorFactory::default().process(&layers, &[3], &scene.pile_roi);

    assert!(report.full);
    assert_eq!(report.total, 3);
    assert_eq!(report.reason, FullReason::MatchTemplate);
    assert_eq!(report.processing.strategy, Strategy::FullMatch);
}

#[test]
fn test_partial_stack_end_to_end() {
    // Three-layer template [10, 10, 10], but the visible top layer holds
    // only 4 boxes in a corner: expect lower template sum + observed top.
    let mut detections = vec![det(DetectionClass::Pile, 0.0, 0.0, 400.0, 300.0, 0.95)];
    // Top layer: 4 boxes spread across the width but sparse, so the
    // layer is wide enough to be real yet far from filled
    for x in [0.0, 100.0, 200.0, 330.0] {
        detections.push(det(DetectionClass::Box, x, 10.0, x + 38.0, 50.0, 0.8));
    }
    // Middle and bottom layers: 10 boxes each, wall to wall
    for y in [110.0, 210.0] {
        for i in 0..10 {
            let x = i as f32 * 40.0;
            detections.push(det(DetectionClass::Box, x, y, x + 38.0, y + 40.0, 0.8));
        }
    }

    let scene = ScenePreparer::default().prepare(&detections).unwrap();
    let layers = LayerClusterer::default().cluster(&scene.boxes, &scene.pile_roi);
    assert_eq!(layers.len(), 3);

    let layers = LayerCorrector::default().correct(layers);
    let report =
        StackProcessorFactory::default().process(&layers, &[10, 10, 10], &scene.pile_roi);

    assert!(!report.full);
    assert_eq!(report.reason, FullReason::LowCoverageOrGap);
    assert_eq!(report.processing.strategy, Strategy::PartialWithTemplate);
    // sum(template[..2]) + 4 observed on top
    assert_eq!(report.total, 24);
}

#[test]
fn test_fake_top_layer_is_dropped_before_counting() {
    // A 1-box sliver above a full 3-box layer: corrector removes it and
    // the real layer matches the template.
    let detections = vec![
        det(DetectionClass::Pile, 0.0, 0.0, 100.0, 200.0, 0.9),
        // Sliver at the very top, width 20 vs 100 below
        det(DetectionClass::Box, 40.0, 0.0, 60.0, 30.0, 0.7),
        det(DetectionClass::Box, 0.0, 80.0, 33.0, 120.0, 0.7),
        det(DetectionClass::Box, 33.0, 80.0, 66.0, 120.0, 0.7),
        det(DetectionClass::Box, 66.0, 80.0, 100.0, 120.0, 0.7),
    ];

    let scene = ScenePreparer::default().prepare(&detections).unwrap();
    let layers = LayerClusterer::default().cluster(&scene.boxes, &scene.pile_roi);
    assert_eq!(layers.len(), 2);

    let layers = LayerCorrector::default().correct(layers);
    assert_eq!(layers.len(), 1);

    let report = StackProcessorFactory::default().process(&layers, &[3], &scene.pile_roi);
    assert!(report.full);
    assert_eq!(report.total, 3);
}

#[test]
fn test_fallback_template_counts_observed_layers() {
    let detections = vec![
        det(DetectionClass::Pile, 0.0, 0.0, 100.0, 200.0, 0.9),
        det(DetectionClass::Box, 0.0, 20.0, 50.0, 60.0, 0.7),
        det(DetectionClass::Box, 50.0, 20.0, 100.0, 60.0, 0.7),
        det(DetectionClass::Box, 0.0, 120.0, 50.0, 160.0, 0.7),
        det(DetectionClass::Box, 50.0, 120.0, 100.0, 160.0, 0.7),
    ];

    let scene = ScenePreparer::default().prepare(&detections).unwrap();
    let layers = LayerClusterer::default().cluster(&scene.boxes, &scene.pile_roi);
    let template = fallback_template(&layers);
    assert_eq!(template, vec![2, 2]);

    let report = StackProcessorFactory::default().process(&layers, &template, &scene.pile_roi);
    assert!(report.full);
    assert_eq!(report.total, 4);
}

#[test]
fn test_custom_detector_thresholds_change_verdict() {
    // 4 boxes, 0.8 coverage: not full under defaults, full once the
    // coverage threshold drops below what the layer achieves.
    let detections = vec![
        det(DetectionClass::Pile, 0.0, 0.0, 100.0, 200.0, 0.9),
        det(DetectionClass::Box, 0.0, 150.0, 20.0, 190.0, 0.7),
        det(DetectionClass::Box, 25.0, 150.0, 45.0, 190.0, 0.7),
        det(DetectionClass::Box, 50.0, 150.0, 70.0, 190.0, 0.7),
        det(DetectionClass::Box, 75.0, 150.0, 95.0, 190.0, 0.7),
    ];

    let scene = ScenePreparer::default().prepare(&detections).unwrap();
    let layers = LayerClusterer::default().cluster(&scene.boxes, &scene.pile_roi);

    let strict = CoverageDetector::default().detect(&layers, &[5], &scene.pile_roi);
    assert!(!strict.full);

    let lenient = CoverageDetector::new(DetectorConfig {
        coverage_threshold: 0.75,
        cv_gap_threshold: 0.4,
    });
    let verdict = lenient.detect(&layers, &[5], &scene.pile_roi);
    assert!(verdict.full);
    assert_eq!(verdict.reason, FullReason::ContinuousFilled);
}
