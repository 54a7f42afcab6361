//! Placeholder T-pose body mesh synthesis.
//!
//! Generates a simplified human-shaped mesh parameterized by the first
//! three shape components (overall size, width, depth). The real pipeline
//! substitutes the official SMPL model here; the placeholder keeps the
//! vertex/face counts and the landmark-indexable topology size so the
//! measurement stage works unchanged.

use bodyfit_core::{ParamVector, Real, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// SMPL topology vertex count.
pub const MESH_VERTEX_COUNT: usize = 6890;
/// SMPL topology face count.
pub const MESH_FACE_COUNT: usize = 13776;

/// Fixed jitter seed so identical shape parameters give identical meshes.
const MESH_SEED: u64 = 42;

/// A triangle mesh of the body in T-pose, meters, standing on y = 0.
#[derive(Debug, Clone)]
pub struct BodyMesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<[u32; 3]>,
}

impl BodyMesh {
    /// Vertical extent of the mesh in meters.
    pub fn height(&self) -> Real {
        let mut min = Real::INFINITY;
        let mut max = Real::NEG_INFINITY;
        for v in &self.vertices {
            min = min.min(v.y);
            max = max.max(v.y);
        }
        if min.is_finite() {
            max - min
        } else {
            0.0
        }
    }

    /// Scale all vertices uniformly in place.
    pub fn scale(&mut self, factor: Real) {
        for v in &mut self.vertices {
            *v *= factor;
        }
    }
}

struct Segment {
    y_start: Real,
    y_end: Real,
    count: usize,
    radius_x: Real,
    radius_z: Real,
}

struct ArmSegment {
    y_start: Real,
    y_end: Real,
    count: usize,
    radius: Real,
    x_offset: Real,
}

// Body segments as (y range, vertex budget, elliptical radii), base height
// ~1.75 m before shape scaling.
const SEGMENTS: [Segment; 10] = [
    Segment { y_start: 0.00, y_end: 0.10, count: 400, radius_x: 0.05, radius_z: 0.05 }, // feet
    Segment { y_start: 0.10, y_end: 0.45, count: 1200, radius_x: 0.06, radius_z: 0.05 }, // calves
    Segment { y_start: 0.45, y_end: 0.50, count: 200, radius_x: 0.05, radius_z: 0.05 }, // knees
    Segment { y_start: 0.50, y_end: 0.82, count: 1200, radius_x: 0.08, radius_z: 0.07 }, // thighs
    Segment { y_start: 0.82, y_end: 0.85, count: 200, radius_x: 0.04, radius_z: 0.04 }, // crotch
    Segment { y_start: 0.85, y_end: 1.05, count: 800, radius_x: 0.14, radius_z: 0.10 }, // hips
    Segment { y_start: 1.05, y_end: 1.20, count: 600, radius_x: 0.13, radius_z: 0.09 }, // waist
    Segment { y_start: 1.20, y_end: 1.45, count: 800, radius_x: 0.15, radius_z: 0.11 }, // chest
    Segment { y_start: 1.45, y_end: 1.55, count: 300, radius_x: 0.04, radius_z: 0.04 }, // neck
    Segment { y_start: 1.55, y_end: 1.75, count: 400, radius_x: 0.09, radius_z: 0.09 }, // head
];

const ARM_SEGMENTS: [ArmSegment; 3] = [
    ArmSegment { y_start: 1.20, y_end: 1.40, count: 200, radius: 0.040, x_offset: 0.20 },
    ArmSegment { y_start: 0.95, y_end: 1.20, count: 200, radius: 0.035, x_offset: 0.22 },
    ArmSegment { y_start: 0.85, y_end: 0.95, count: 90, radius: 0.025, x_offset: 0.23 },
];

fn linspace(start: Real, end: Real, n: usize) -> impl Iterator<Item = Real> {
    let step = if n > 1 { (end - start) / (n - 1) as Real } else { 0.0 };
    (0..n).map(move |i| start + step * i as Real)
}

/// Generate the placeholder body mesh from shape parameters.
///
/// The first three components scale overall height, width, and depth; the
/// remaining components are ignored by the placeholder.
pub fn generate_body_mesh(shape: &ParamVector) -> BodyMesh {
    let beta = |i: usize| if i < shape.len() { shape[i] } else { 0.0 };
    let height_scale = 1.0 + 0.05 * beta(0);
    let width_scale = 1.0 + 0.03 * beta(1);
    let depth_scale = 1.0 + 0.02 * beta(2);

    let mut rng = StdRng::seed_from_u64(MESH_SEED);
    let mut vertices: Vec<Vec3> = Vec::with_capacity(MESH_VERTEX_COUNT);
    let tau = 2.0 * std::f64::consts::PI;

    for seg in &SEGMENTS {
        let n = seg.count.min(MESH_VERTEX_COUNT - vertices.len());
        if n == 0 {
            break;
        }
        let ys: Vec<Real> = linspace(seg.y_start, seg.y_end, n).collect();
        for (i, y) in ys.into_iter().enumerate() {
            let angle = tau * i as Real / n as Real + rng.gen_range(0.0..0.1);
            let jx: Real = rng.sample(StandardNormal);
            let jz: Real = rng.sample(StandardNormal);
            vertices.push(Vec3::new(
                seg.radius_x * width_scale * angle.cos() * (1.0 + 0.05 * jx),
                y * height_scale,
                seg.radius_z * depth_scale * angle.sin() * (1.0 + 0.05 * jz),
            ));
        }
    }

    'arms: for seg in &ARM_SEGMENTS {
        for side in [1.0, -1.0] {
            let n = seg.count.min(MESH_VERTEX_COUNT - vertices.len());
            if n == 0 {
                break 'arms;
            }
            let ys: Vec<Real> = linspace(seg.y_start, seg.y_end, n).collect();
            for (i, y) in ys.into_iter().enumerate() {
                let angle = tau * i as Real / n as Real;
                let jx: Real = rng.sample(StandardNormal);
                let jz: Real = rng.sample(StandardNormal);
                vertices.push(Vec3::new(
                    side * seg.x_offset * width_scale + seg.radius * angle.cos() * (1.0 + 0.03 * jx),
                    y * height_scale,
                    seg.radius * angle.sin() * (1.0 + 0.03 * jz),
                ));
            }
        }
    }

    // Scatter any remaining budget along the torso axis.
    while vertices.len() < MESH_VERTEX_COUNT {
        let jx: Real = rng.sample(StandardNormal);
        let jz: Real = rng.sample(StandardNormal);
        let y: Real = rng.gen_range(0.0..1.75);
        vertices.push(Vec3::new(jx * 0.02, y * height_scale, jz * 0.02));
    }

    // Fixed fan topology standing in for the real SMPL face table.
    let n = MESH_VERTEX_COUNT as u32;
    let faces = (0..MESH_FACE_COUNT as u32)
        .map(|i| {
            let base = i % (n - 2);
            [base, (base + 1) % n, (base + 2) % n]
        })
        .collect();

    BodyMesh { vertices, faces }
}
