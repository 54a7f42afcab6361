//! Solver options and loss term weights.

use bodyfit_core::Real;
use serde::{Deserialize, Serialize};

/// Fixed weights of the composite loss.
///
/// The weights encode relative trust between terms: cross-view agreement on
/// shape dominates, pose stays near its own view's prediction, and the
/// priors apply a gentle pull toward the population-average body and the
/// neutral pose.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LossWeights {
    /// Shared shape must match both per-view predictions.
    pub shape_consistency: Real,
    /// Each pose must stay near its own view's prediction.
    pub pose_fidelity: Real,
    /// Regularize shape toward the all-zero (average) body.
    pub shape_prior: Real,
    /// Regularize both poses toward the neutral pose.
    pub pose_prior: Real,
    /// Depth-alignment term, active only when a depth signal is supplied.
    pub depth_alignment: Real,
    /// Reserved for a future camera-consistency term. No active loss
    /// computation reads this weight.
    pub camera: Real,
}

impl Default for LossWeights {
    fn default() -> Self {
        Self {
            shape_consistency: 10.0,
            pose_fidelity: 1.0,
            shape_prior: 0.01,
            pose_prior: 0.001,
            depth_alignment: 5.0,
            camera: 0.1,
        }
    }
}

/// Options for the multi-view solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeOptions {
    /// Iteration cap; the last iterate is accepted if it is reached.
    pub max_iterations: usize,
    /// Initial learning rate.
    pub learning_rate: Real,
    /// Stop when the absolute loss change between iterations drops below this.
    pub convergence_threshold: Real,
    /// Multiply the learning rate by `lr_decay_factor` every this many iterations.
    pub lr_decay_every: usize,
    pub lr_decay_factor: Real,
    pub weights: LossWeights,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            learning_rate: 0.01,
            convergence_threshold: 1e-6,
            lr_decay_every: 80,
            lr_decay_factor: 0.5,
            weights: LossWeights::default(),
        }
    }
}

impl OptimizeOptions {
    /// Learning rate in effect at a given (zero-based) iteration.
    pub fn learning_rate_at(&self, iteration: usize) -> Real {
        let steps = iteration / self.lr_decay_every.max(1);
        self.learning_rate * self.lr_decay_factor.powi(steps as i32)
    }
}
