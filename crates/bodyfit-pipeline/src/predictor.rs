//! Seam for the external image → shape/pose regressor.

use anyhow::Result;
use bodyfit_core::ShapePosePrediction;

/// Per-image shape/pose predictor.
///
/// Implementations wrap whatever inference backend produces the shape,
/// pose, and weak-perspective camera vectors (typically an HMR-style
/// neural regressor running out of process). The pipeline treats it as a
/// black box: one invocation per view, no state shared between calls.
pub trait ShapePosePredictor: Send + Sync {
    /// Predict shape and pose parameters from an encoded RGB image.
    fn predict(&self, image: &[u8]) -> Result<ShapePosePrediction>;
}
