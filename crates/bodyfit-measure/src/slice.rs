//! Horizontal mesh slicing and contour circumference.

use bodyfit_core::{Real, Vec3};

/// Band half-width used to select vertices near the slicing plane, meters.
pub const SLICE_TOLERANCE: Real = 0.01;

/// Collect the (x, z) contour of vertices near the plane `y = y_height`.
///
/// Widens the band ×3 when fewer than three vertices fall inside it;
/// returns an empty contour when the widened band is still degenerate.
pub fn slice_contour(vertices: &[Vec3], y_height: Real, tolerance: Real) -> Vec<(Real, Real)> {
    let band = |tol: Real| -> Vec<(Real, Real)> {
        vertices
            .iter()
            .filter(|v| (v.y - y_height).abs() < tol)
            .map(|v| (v.x, v.z))
            .collect()
    };

    let contour = band(tolerance);
    if contour.len() >= 3 {
        return contour;
    }
    let widened = band(tolerance * 3.0);
    if widened.len() >= 3 {
        widened
    } else {
        Vec::new()
    }
}

/// Perimeter of a 2D contour, meters.
///
/// Sorts the points by angle around their centroid and sums the segment
/// lengths of the resulting closed polygon. Degenerate contours (< 3
/// points) measure zero.
pub fn contour_circumference(contour: &[(Real, Real)]) -> Real {
    if contour.len() < 3 {
        return 0.0;
    }

    let n = contour.len() as Real;
    let cx = contour.iter().map(|p| p.0).sum::<Real>() / n;
    let cz = contour.iter().map(|p| p.1).sum::<Real>() / n;

    let mut sorted: Vec<(Real, Real)> = contour.to_vec();
    sorted.sort_by(|a, b| {
        let ang_a = (a.1 - cz).atan2(a.0 - cx);
        let ang_b = (b.1 - cz).atan2(b.0 - cx);
        ang_a.total_cmp(&ang_b)
    });

    let mut perimeter = 0.0;
    for i in 0..sorted.len() {
        let (x0, z0) = sorted[i];
        let (x1, z1) = sorted[(i + 1) % sorted.len()];
        perimeter += ((x1 - x0).powi(2) + (z1 - z0).powi(2)).sqrt();
    }
    perimeter
}
