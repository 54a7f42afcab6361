//! Scan orchestration.
//!
//! Sequences the full flow: per-view shape/pose prediction, depth
//! ingestion, multi-view optimization, measurement extraction, body
//! composition, and confidence scoring, assembling everything into one
//! [`ScanReport`].

pub mod composition;
pub mod predictor;
pub mod scan;

pub use composition::{
    formula_body_composition, CompositionEstimator, CompositionMethod, CompositionOutcome,
    LearnedComposition,
};
pub use predictor::ShapePosePredictor;
pub use scan::{ScanPipeline, ScanReport};
