//! Mathematical utilities and type definitions.
//!
//! Provides the scalar and vector types used throughout the library and the
//! axis-angle rotation helper needed for pose handling.

use nalgebra::{DVector, Matrix3, Vector3};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;
/// Dynamically-sized parameter vector (shape or pose coefficients).
pub type ParamVector = DVector<Real>;

/// Minimum rotation angle magnitude used to avoid division by zero when
/// normalizing an axis-angle vector.
pub const MIN_ROTATION_ANGLE: Real = 1e-8;

/// Skew-symmetric cross-product matrix of a 3D vector.
pub fn skew(v: &Vec3) -> Mat3 {
    Mat3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}

/// Convert an axis-angle vector into a rotation matrix via Rodrigues' formula.
///
/// The angle is the vector's norm, clamped to [`MIN_ROTATION_ANGLE`] before
/// the axis normalization so a zero-magnitude input yields the identity
/// rotation rather than a division by zero.
///
/// `R = I + sin(θ) K + (1 - cos(θ)) K²` where `K` is the skew matrix of the
/// unit axis.
pub fn axis_angle_to_rotation(axis_angle: &Vec3) -> Mat3 {
    let angle = axis_angle.norm().max(MIN_ROTATION_ANGLE);
    let axis = axis_angle / angle;
    let (sin_a, cos_a) = angle.sin_cos();
    let k = skew(&axis);
    Mat3::identity() + k * sin_a + k * k * (1.0 - cos_a)
}
