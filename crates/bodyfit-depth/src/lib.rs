//! Depth map processing for metric scale recovery.
//!
//! Consumes raw float32 depth buffers (iPhone LiDAR format, 256×192,
//! row-major, meters), back-projects them into a point cloud with the
//! pinhole model, and estimates a scale factor by comparing the observed
//! vertical extent of the subject to their known height. The resulting
//! [`DepthSignal`] feeds the multi-view optimizer's depth-alignment term.

use bodyfit_core::{DepthSignal, Real, Vec3};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default depth map width (iPhone LiDAR).
pub const DEPTH_WIDTH: usize = 256;
/// Default depth map height (iPhone LiDAR).
pub const DEPTH_HEIGHT: usize = 192;
/// Depth readings at or beyond this range are treated as invalid.
pub const MAX_DEPTH_M: Real = 10.0;

/// Errors produced while decoding a depth buffer.
#[derive(Debug, Error)]
pub enum DepthError {
    #[error("depth buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },
}

/// Pinhole intrinsics of the depth camera.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DepthIntrinsics {
    pub fx: Real,
    pub fy: Real,
    pub cx: Real,
    pub cy: Real,
}

impl DepthIntrinsics {
    /// Nominal intrinsics for a depth map of the given size, used when the
    /// capturing device did not report calibration.
    pub fn nominal(width: usize, height: usize) -> Self {
        Self {
            fx: 200.0,
            fy: 200.0,
            cx: width as Real / 2.0,
            cy: height as Real / 2.0,
        }
    }
}

/// A decoded depth map. Invalid readings are stored as NaN.
#[derive(Debug, Clone)]
pub struct DepthMap {
    pub width: usize,
    pub height: usize,
    values: Vec<Real>,
}

impl DepthMap {
    /// Depth at pixel `(u, v)` in meters; NaN when invalid.
    pub fn at(&self, u: usize, v: usize) -> Real {
        self.values[v * self.width + u]
    }

    /// Number of pixels carrying a valid depth reading.
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|d| d.is_finite()).count()
    }
}

/// Decode a raw little-endian float32 depth buffer into a [`DepthMap`].
///
/// Readings outside `(0, MAX_DEPTH_M)` are marked invalid.
pub fn load_depth_map(raw: &[u8], width: usize, height: usize) -> Result<DepthMap, DepthError> {
    let expected = width * height * 4;
    if raw.len() != expected {
        return Err(DepthError::BufferSizeMismatch {
            expected,
            actual: raw.len(),
        });
    }

    let values = raw
        .chunks_exact(4)
        .map(|b| {
            let d = f32::from_le_bytes([b[0], b[1], b[2], b[3]]) as Real;
            if d > 0.0 && d < MAX_DEPTH_M {
                d
            } else {
                Real::NAN
            }
        })
        .collect();

    Ok(DepthMap {
        width,
        height,
        values,
    })
}

/// Back-project valid depth pixels into camera-frame 3D points.
///
/// Pinhole model: `X = (u - cx) Z / fx`, `Y = (v - cy) Z / fy`, `Z = depth`.
pub fn depth_to_point_cloud(map: &DepthMap, k: &DepthIntrinsics) -> Vec<Vec3> {
    let mut points = Vec::with_capacity(map.valid_count());
    for v in 0..map.height {
        for u in 0..map.width {
            let z = map.at(u, v);
            if !z.is_finite() {
                continue;
            }
            let x = (u as Real - k.cx) * z / k.fx;
            let y = (v as Real - k.cy) * z / k.fy;
            points.push(Vec3::new(x, y, z));
        }
    }
    points
}

/// Nearest-rank percentile of an ascending-sorted sample.
fn percentile(sorted: &[Real], pct: Real) -> Real {
    let idx = ((pct / 100.0) * (sorted.len() - 1) as Real).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Estimate a metric scale factor from a point cloud and a known height.
///
/// The subject's vertical extent is taken as the 2nd–98th percentile span
/// of the Y coordinates, trimming floor/ceiling outliers. Degenerate clouds
/// (too few points, or an extent under 10 cm) yield a neutral scale of 1.0.
pub fn estimate_scale_from_depth(points: &[Vec3], known_height_m: Real) -> Real {
    if points.len() < 10 {
        warn!("too few depth points for scale estimation ({})", points.len());
        return 1.0;
    }

    let mut ys: Vec<Real> = points.iter().map(|p| p.y).collect();
    ys.sort_by(|a, b| a.total_cmp(b));
    let observed_height = (percentile(&ys, 98.0) - percentile(&ys, 2.0)).abs();

    if observed_height < 0.1 {
        warn!("observed height too small: {observed_height:.3}m");
        return 1.0;
    }

    let scale = known_height_m / observed_height;
    info!(
        "depth scale: observed={observed_height:.3}m, known={known_height_m:.3}m, scale={scale:.4}"
    );
    scale
}

/// Full depth processing: decode, back-project, and estimate scale.
pub fn process_depth(
    raw: &[u8],
    intrinsics: Option<DepthIntrinsics>,
    known_height_m: Real,
    width: usize,
    height: usize,
) -> Result<DepthSignal, DepthError> {
    let k = intrinsics.unwrap_or_else(|| DepthIntrinsics::nominal(width, height));
    let map = load_depth_map(raw, width, height)?;
    let points = depth_to_point_cloud(&map, &k);
    debug!("depth map decoded: {} valid points", points.len());
    let scale_factor = estimate_scale_from_depth(&points, known_height_m);

    Ok(DepthSignal {
        scale_factor,
        point_count: points.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(depths: &[f32]) -> Vec<u8> {
        depths.iter().flat_map(|d| d.to_le_bytes()).collect()
    }

    #[test]
    fn rejects_wrong_buffer_size() {
        let err = load_depth_map(&[0u8; 10], 4, 4).unwrap_err();
        match err {
            DepthError::BufferSizeMismatch { expected, actual } => {
                assert_eq!(expected, 64);
                assert_eq!(actual, 10);
            }
        }
    }

    #[test]
    fn filters_invalid_depth_readings() {
        let raw = encode(&[1.5, 0.0, -2.0, 12.0]);
        let map = load_depth_map(&raw, 2, 2).unwrap();
        assert_eq!(map.valid_count(), 1);
        assert!((map.at(0, 0) - 1.5).abs() < 1e-9);
        assert!(map.at(1, 0).is_nan());
        assert!(map.at(1, 1).is_nan());
    }

    #[test]
    fn back_projection_inverts_pinhole_model() {
        let raw = encode(&[2.0, 0.0, 0.0, 0.0]);
        let map = load_depth_map(&raw, 2, 2).unwrap();
        let k = DepthIntrinsics {
            fx: 100.0,
            fy: 100.0,
            cx: 1.0,
            cy: 1.0,
        };
        let points = depth_to_point_cloud(&map, &k);
        assert_eq!(points.len(), 1);
        // Pixel (0, 0) at depth 2: X = (0-1)*2/100, Y = (0-1)*2/100.
        assert!((points[0].x - (-0.02)).abs() < 1e-9);
        assert!((points[0].y - (-0.02)).abs() < 1e-9);
        assert!((points[0].z - 2.0).abs() < 1e-9);
    }

    #[test]
    fn scale_recovers_known_ratio() {
        // Column of points spanning 0..=0.9m vertically.
        let points: Vec<Vec3> = (0..100)
            .map(|i| Vec3::new(0.0, i as Real * 0.9 / 99.0, 1.0))
            .collect();
        let scale = estimate_scale_from_depth(&points, 1.8);
        // Nearest-rank trim keeps indices 2..=97, so the extent is 95/99 of 0.9.
        assert!((scale - 1.8 / (0.9 * 95.0 / 99.0)).abs() < 0.05, "scale={scale}");
    }

    #[test]
    fn degenerate_clouds_fall_back_to_unit_scale() {
        let few: Vec<Vec3> = (0..5).map(|_| Vec3::zeros()).collect();
        assert_eq!(estimate_scale_from_depth(&few, 1.8), 1.0);

        let flat: Vec<Vec3> = (0..50).map(|_| Vec3::new(0.0, 0.5, 1.0)).collect();
        assert_eq!(estimate_scale_from_depth(&flat, 1.8), 1.0);
    }

    #[test]
    fn process_depth_produces_signal() {
        let depths: Vec<f32> = vec![1.0; DEPTH_WIDTH * DEPTH_HEIGHT];
        let raw = encode(&depths);
        let signal = process_depth(&raw, None, 1.75, DEPTH_WIDTH, DEPTH_HEIGHT).unwrap();
        assert_eq!(signal.point_count, DEPTH_WIDTH * DEPTH_HEIGHT);
        assert!(signal.scale_factor > 0.0);
    }
}
