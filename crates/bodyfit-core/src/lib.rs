//! Core math and data model for `bodyfit`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Vec3`, `ParamVector`, ...),
//! - the axis-angle → rotation matrix (Rodrigues) helper,
//! - the shared data model passed between pipeline stages
//!   ([`ShapePosePrediction`], [`DepthSignal`], [`MeasurementSet`], ...).
//!
//! Parameter vectors follow the SMPL convention: a 10-component shape
//! vector with roughly standard-normal components, and a 72-component
//! pose vector of per-joint axis-angle triples (24 joints × 3).

/// Linear algebra type aliases and rotation helpers.
pub mod math;
/// Shared data model for predictions, measurements, and composition.
pub mod types;

pub use math::*;
pub use types::*;
