//! Multi-view shape optimization.
//!
//! Given independent, per-image shape/pose predictions from a front and a
//! side view, recovers a single consistent shape vector and two plausible
//! poses via gradient-based minimization of a composite loss, optionally
//! constrained by depth-derived scale signals.
//!
//! The solver is a first-order adaptive-moment loop with a step-decay
//! learning rate; all loss terms are quadratic, so their gradients are
//! computed analytically.

pub mod adam;
pub mod multiview;
pub mod options;

pub use multiview::{optimize, OptimizationResult, OptimizeError};
pub use options::{LossWeights, OptimizeOptions};
