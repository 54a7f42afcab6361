//! Anthropometric measurement extraction from a body mesh.
//!
//! Takes optimized shape parameters, synthesizes a T-pose body mesh,
//! scales it to the subject's known height, slices it at anatomical planes
//! to compute circumferences, and derives length measurements from
//! landmark distances.

pub mod extractor;
pub mod landmarks;
pub mod mesh;
pub mod slice;

pub use extractor::{body_mesh, extract_measurements};
pub use mesh::{generate_body_mesh, BodyMesh, MESH_FACE_COUNT, MESH_VERTEX_COUNT};
