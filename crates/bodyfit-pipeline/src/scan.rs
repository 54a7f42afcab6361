//! The scan pipeline: prediction → optimization → measurements → report.

use crate::composition::{CompositionEstimator, CompositionMethod, CompositionOutcome};
use crate::predictor::ShapePosePredictor;
use anyhow::{Context, Result};
use bodyfit_core::{BodyComposition, DepthSignal, Real, ScanTier, Subject};
use bodyfit_depth::{process_depth, DepthIntrinsics, DEPTH_HEIGHT, DEPTH_WIDTH};
use bodyfit_measure::{body_mesh, extract_measurements};
use bodyfit_optim::{optimize, OptimizeOptions};
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

/// Full scan result.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Flat `{name}_cm → value` measurement map.
    pub measurements: BTreeMap<String, Real>,
    pub body_composition: BodyComposition,
    pub composition_method: CompositionMethod,
    pub mesh_vertices: Vec<[Real; 3]>,
    pub mesh_faces: Vec<[u32; 3]>,
    /// Overall scan confidence in `[0, 1]`.
    pub confidence: Real,
    pub scan_tier: ScanTier,
    /// Final optimization loss, kept for diagnostics.
    pub optimization_loss: Real,
}

/// Scan pipeline context.
///
/// Owns the predictor and per-stage configuration; constructed once and
/// passed by reference wherever scans are processed. Holds no per-scan
/// state, so concurrent `process` calls are independent.
pub struct ScanPipeline {
    predictor: Box<dyn ShapePosePredictor>,
    optimize_options: OptimizeOptions,
    composition: CompositionEstimator,
    depth_intrinsics: Option<DepthIntrinsics>,
}

impl ScanPipeline {
    pub fn new(predictor: Box<dyn ShapePosePredictor>) -> Self {
        Self {
            predictor,
            optimize_options: OptimizeOptions::default(),
            composition: CompositionEstimator::new(),
            depth_intrinsics: None,
        }
    }

    pub fn with_optimize_options(mut self, options: OptimizeOptions) -> Self {
        self.optimize_options = options;
        self
    }

    pub fn with_composition(mut self, composition: CompositionEstimator) -> Self {
        self.composition = composition;
        self
    }

    /// Depth camera calibration to use instead of the nominal intrinsics.
    pub fn with_depth_intrinsics(mut self, intrinsics: DepthIntrinsics) -> Self {
        self.depth_intrinsics = Some(intrinsics);
        self
    }

    /// Run the full scan pipeline on a front and a side photo.
    ///
    /// Depth buffers are optional; a malformed buffer is logged and
    /// skipped by the optimizer rather than failing the scan. The scan
    /// tier and the confidence depth bonus reflect whether depth data was
    /// supplied, not whether it decoded.
    pub fn process(
        &self,
        front_image: &[u8],
        side_image: &[u8],
        subject: &Subject,
        depth_front: Option<&[u8]>,
        depth_side: Option<&[u8]>,
    ) -> Result<ScanReport> {
        subject.validate().context("invalid subject demographics")?;

        let has_depth_input = depth_front.is_some() || depth_side.is_some();
        info!(
            "processing scan: {:?}, {}yo, {}cm, {}kg, depth={}",
            subject.sex,
            subject.age,
            subject.height_cm,
            subject.weight_kg,
            if has_depth_input { "yes" } else { "no" }
        );
        let t0 = Instant::now();

        let t = Instant::now();
        let front_pred = self
            .predictor
            .predict(front_image)
            .context("front view prediction failed")?;
        let side_pred = self
            .predictor
            .predict(side_image)
            .context("side view prediction failed")?;
        info!("prediction: {:.3}s", t.elapsed().as_secs_f64());

        let known_height_m = subject.height_cm / 100.0;
        let depth_front = self.ingest_depth(depth_front, known_height_m, "front");
        let depth_side = self.ingest_depth(depth_side, known_height_m, "side");

        let t = Instant::now();
        let opt = optimize(
            &front_pred,
            &side_pred,
            depth_front.as_ref(),
            depth_side.as_ref(),
            &self.optimize_options,
        )
        .context("multi-view optimization failed")?;
        info!(
            "optimization: {:.3}s, loss={:.6}",
            t.elapsed().as_secs_f64(),
            opt.loss
        );

        let t = Instant::now();
        let measurements = extract_measurements(&opt.shape, subject.height_cm);
        let mesh = body_mesh(&opt.shape, subject.height_cm);
        info!("measurement extraction: {:.3}s", t.elapsed().as_secs_f64());

        let t = Instant::now();
        let CompositionOutcome { method, chosen, .. } =
            self.composition.estimate(&opt.shape, subject, &measurements);
        info!("body composition: {:.3}s", t.elapsed().as_secs_f64());

        let confidence = scan_confidence(
            front_pred.confidence,
            side_pred.confidence,
            opt.loss,
            has_depth_input,
        );
        let scan_tier = if has_depth_input {
            ScanTier::Lidar
        } else {
            ScanTier::Photo
        };

        let report = ScanReport {
            measurements: measurements.to_map(),
            body_composition: chosen,
            composition_method: method,
            mesh_vertices: mesh.vertices.iter().map(|v| [v.x, v.y, v.z]).collect(),
            mesh_faces: mesh.faces,
            confidence,
            scan_tier,
            optimization_loss: opt.loss,
        };

        info!(
            "scan complete in {:.2}s — tier={:?}, confidence={:.2}",
            t0.elapsed().as_secs_f64(),
            report.scan_tier,
            report.confidence
        );
        Ok(report)
    }

    fn ingest_depth(
        &self,
        raw: Option<&[u8]>,
        known_height_m: Real,
        view: &str,
    ) -> Option<DepthSignal> {
        let raw = raw?;
        match process_depth(
            raw,
            self.depth_intrinsics,
            known_height_m,
            DEPTH_WIDTH,
            DEPTH_HEIGHT,
        ) {
            Ok(signal) => Some(signal),
            Err(err) => {
                warn!("{view} depth processing failed: {err}");
                None
            }
        }
    }
}

/// Overall scan confidence.
///
/// Blends the mean predictor confidence with an inverse-loss optimization
/// quality score, plus a fixed bonus when depth data backed the scan.
pub fn scan_confidence(
    front_confidence: Real,
    side_confidence: Real,
    optimization_loss: Real,
    has_depth: bool,
) -> Real {
    let predictor_conf = (front_confidence + side_confidence) / 2.0;
    let opt_conf = (1.0 / (1.0 + optimization_loss * 10.0)).clamp(0.0, 1.0);
    let depth_bonus = if has_depth { 0.1 } else { 0.0 };

    let confidence = 0.5 * predictor_conf + 0.4 * opt_conf + depth_bonus;
    ((confidence * 100.0).round() / 100.0).clamp(0.0, 1.0)
}
