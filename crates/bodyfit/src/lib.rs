//! High-level entry crate for the `bodyfit` toolbox.
//!
//! Estimates a 3D body shape and anthropometric measurements from two
//! photographs (plus optional depth data). The heart of the library is the
//! multi-view optimizer in [`optim`], which reconciles independent
//! per-view shape/pose predictions into one consistent body shape.
//!
//! ```no_run
//! use bodyfit::pipeline::{ScanPipeline, ShapePosePredictor};
//! use bodyfit::core::{Sex, Subject};
//!
//! # fn main() -> anyhow::Result<()> {
//! let predictor: Box<dyn ShapePosePredictor> = /* wrap your inference backend */
//! # unimplemented!();
//! let pipeline = ScanPipeline::new(predictor);
//!
//! let subject = Subject {
//!     height_cm: 175.0,
//!     weight_kg: 72.0,
//!     age: 28,
//!     sex: Sex::Male,
//! };
//! let front = std::fs::read("front.jpg")?;
//! let side = std::fs::read("side.jpg")?;
//!
//! let report = pipeline.process(&front, &side, &subject, None, None)?;
//! println!("waist: {} cm", report.measurements["waist_cm"]);
//! # Ok(())
//! # }
//! ```
//!
//! For custom workflows the stage crates compose directly: run
//! [`optim::optimize`] on two predictions, then feed the shared shape into
//! [`measure::extract_measurements`].

/// Core types and math primitives.
pub use bodyfit_core as core;
/// Depth buffer processing and metric scale estimation.
pub use bodyfit_depth as depth;
/// Body mesh synthesis and measurement extraction.
pub use bodyfit_measure as measure;
/// Multi-view shape optimization.
pub use bodyfit_optim as optim;
/// Scan orchestration.
pub use bodyfit_pipeline as pipeline;

pub use bodyfit_core::{
    BodyComposition, BodyRegion, DepthSignal, MeasurementSet, ScanTier, Sex, ShapePosePrediction,
    Subject,
};
pub use bodyfit_optim::{optimize, OptimizationResult, OptimizeOptions};
pub use bodyfit_pipeline::{ScanPipeline, ScanReport, ShapePosePredictor};
