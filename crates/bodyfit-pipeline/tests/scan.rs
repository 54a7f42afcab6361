//! End-to-end scan pipeline test with a stub predictor.

use anyhow::Result;
use bodyfit_core::{ParamVector, ScanTier, Sex, ShapePosePrediction, Subject, Vec3};
use bodyfit_measure::{MESH_FACE_COUNT, MESH_VERTEX_COUNT};
use bodyfit_pipeline::{ScanPipeline, ShapePosePredictor};

/// Returns a fixed prediction, with the first shape component derived from
/// the image bytes so the two views disagree slightly.
struct StubPredictor;

impl ShapePosePredictor for StubPredictor {
    fn predict(&self, image: &[u8]) -> Result<ShapePosePrediction> {
        let lean = if image.starts_with(b"front") { 0.2 } else { -0.2 };
        let mut shape = ParamVector::zeros(10);
        shape[0] = lean;
        shape[1] = 0.1;
        Ok(ShapePosePrediction {
            shape,
            pose: ParamVector::zeros(72),
            camera: Vec3::new(1.0, 0.0, 0.0),
            confidence: 0.8,
        })
    }
}

fn subject() -> Subject {
    Subject {
        height_cm: 175.0,
        weight_kg: 72.0,
        age: 28,
        sex: Sex::Male,
    }
}

#[test]
fn photo_scan_produces_complete_report() {
    let pipeline = ScanPipeline::new(Box::new(StubPredictor));
    let report = pipeline
        .process(b"front-image", b"side-image", &subject(), None, None)
        .unwrap();

    assert_eq!(report.scan_tier, ScanTier::Photo);
    assert_eq!(report.mesh_vertices.len(), MESH_VERTEX_COUNT);
    assert_eq!(report.mesh_faces.len(), MESH_FACE_COUNT);
    assert!((0.0..=1.0).contains(&report.confidence));
    assert!(report.optimization_loss >= 0.0);

    assert_eq!(report.measurements["height_cm"], 175.0);
    assert!(report.measurements["waist_cm"] > 0.0);
    assert!(report.body_composition.body_fat_pct >= 3.0);
    assert!(report.body_composition.body_fat_pct <= 60.0);
    let masses = report.body_composition.fat_mass_kg + report.body_composition.lean_mass_kg;
    assert!((masses - 72.0).abs() < 1e-9);
}

#[test]
fn depth_buffer_upgrades_scan_tier() {
    let depths: Vec<u8> = std::iter::repeat(1.5f32)
        .take(256 * 192)
        .flat_map(|d| d.to_le_bytes())
        .collect();

    let pipeline = ScanPipeline::new(Box::new(StubPredictor));
    let report = pipeline
        .process(b"front-image", b"side-image", &subject(), Some(&depths), None)
        .unwrap();
    assert_eq!(report.scan_tier, ScanTier::Lidar);
}

#[test]
fn malformed_depth_is_skipped_but_keeps_lidar_tier() {
    // An undecodable buffer contributes no signal to the optimizer, yet
    // the tier and the depth confidence bonus track that depth bytes were
    // supplied with the scan.
    let pipeline = ScanPipeline::new(Box::new(StubPredictor));
    let no_depth = pipeline
        .process(b"front-image", b"side-image", &subject(), None, None)
        .unwrap();
    let bad_depth = pipeline
        .process(
            b"front-image",
            b"side-image",
            &subject(),
            Some(&[1, 2, 3]),
            None,
        )
        .unwrap();

    assert_eq!(bad_depth.scan_tier, ScanTier::Lidar);
    // The failed buffer never reaches the optimizer, so the solve and its
    // loss match the photo-only scan exactly.
    assert_eq!(bad_depth.optimization_loss, no_depth.optimization_loss);
    assert!(bad_depth.confidence > no_depth.confidence);
}

#[test]
fn invalid_subject_is_rejected_before_prediction() {
    let pipeline = ScanPipeline::new(Box::new(StubPredictor));
    let bad = Subject {
        height_cm: 20.0,
        ..subject()
    };
    assert!(pipeline
        .process(b"front-image", b"side-image", &bad, None, None)
        .is_err());
}

#[test]
fn report_serializes_to_json() {
    let pipeline = ScanPipeline::new(Box::new(StubPredictor));
    let report = pipeline
        .process(b"front-image", b"side-image", &subject(), None, None)
        .unwrap();
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"scan_tier\":\"photo\""));
    assert!(json.contains("\"waist_cm\""));
}
