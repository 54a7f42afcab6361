//! Measurement extraction from shape parameters.

use crate::landmarks::{self, region_slice};
use crate::mesh::{generate_body_mesh, BodyMesh};
use crate::slice::{contour_circumference, slice_contour, SLICE_TOLERANCE};
use bodyfit_core::{BodyRegion, MeasurementSet, ParamVector, Real, Vec3};
use log::{debug, info};

fn landmark_distance_cm(vertices: &[Vec3], a: usize, b: usize) -> Real {
    if a >= vertices.len() || b >= vertices.len() {
        return 0.0;
    }
    (vertices[a] - vertices[b]).norm() * 100.0
}

/// Generate the body mesh for a shape and scale it to the known height.
pub fn body_mesh(shape: &ParamVector, height_cm: Real) -> BodyMesh {
    let mut mesh = generate_body_mesh(shape);
    let mesh_height = mesh.height();
    if mesh_height > 0.0 {
        mesh.scale((height_cm / 100.0) / mesh_height);
    }
    mesh
}

/// Extract all body measurements from shape parameters.
///
/// Synthesizes the T-pose mesh, scales it so its vertical extent matches
/// the known height, slices it at each region's anatomical plane for
/// circumferences, and measures lengths between landmark pairs.
pub fn extract_measurements(shape: &ParamVector, height_cm: Real) -> MeasurementSet {
    info!("extracting measurements from body mesh");

    let mesh = body_mesh(shape, height_cm);
    debug!("mesh scaled to {:.3}m", mesh.height());

    let mut measurements = MeasurementSet {
        height: height_cm,
        ..MeasurementSet::default()
    };

    for region in BodyRegion::ALL {
        let slice = region_slice(region);
        if slice.landmark_a >= mesh.vertices.len() || slice.landmark_b >= mesh.vertices.len() {
            continue;
        }
        let y_a = mesh.vertices[slice.landmark_a].y;
        let y_b = mesh.vertices[slice.landmark_b].y;
        let slice_y = (y_a + y_b) / 2.0 + slice.y_offset;

        let contour = slice_contour(&mesh.vertices, slice_y, SLICE_TOLERANCE);
        let circumference_cm = contour_circumference(&contour) * 100.0;
        measurements.set_circumference(region, circumference_cm);
    }

    measurements.arm_span =
        landmark_distance_cm(&mesh.vertices, landmarks::LEFT_HAND_TIP, landmarks::RIGHT_HAND_TIP);
    measurements.shoulder_width = landmark_distance_cm(
        &mesh.vertices,
        landmarks::LEFT_SHOULDER_TIP,
        landmarks::RIGHT_SHOULDER_TIP,
    );
    measurements.torso_length =
        landmark_distance_cm(&mesh.vertices, landmarks::STERNUM, landmarks::CROTCH);
    measurements.inseam =
        landmark_distance_cm(&mesh.vertices, landmarks::CROTCH, landmarks::LEFT_ANKLE);

    info!(
        "measurement extraction complete: waist={:.1}cm, chest={:.1}cm, hips={:.1}cm",
        measurements.circumference(BodyRegion::Waist),
        measurements.circumference(BodyRegion::Chest),
        measurements.circumference(BodyRegion::Hips)
    );

    measurements
}
