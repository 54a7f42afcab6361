//! Per-parameter adaptive-moment gradient stepper.

use bodyfit_core::{ParamVector, Real};

/// Adam state over a flat parameter vector.
///
/// Standard first and second moment estimates with bias correction. The
/// learning rate is supplied per step so the caller can apply its decay
/// schedule.
#[derive(Debug, Clone)]
pub struct Adam {
    m: ParamVector,
    v: ParamVector,
    t: u32,
    beta1: Real,
    beta2: Real,
    eps: Real,
}

impl Adam {
    pub fn new(dim: usize) -> Self {
        Self {
            m: ParamVector::zeros(dim),
            v: ParamVector::zeros(dim),
            t: 0,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
        }
    }

    /// Apply one update in place: `x -= lr * m̂ / (√v̂ + ε)`.
    pub fn step(&mut self, x: &mut ParamVector, grad: &ParamVector, lr: Real) {
        debug_assert_eq!(x.len(), grad.len());
        self.t += 1;
        let bc1 = 1.0 - self.beta1.powi(self.t as i32);
        let bc2 = 1.0 - self.beta2.powi(self.t as i32);

        for i in 0..x.len() {
            let g = grad[i];
            self.m[i] = self.beta1 * self.m[i] + (1.0 - self.beta1) * g;
            self.v[i] = self.beta2 * self.v[i] + (1.0 - self.beta2) * g * g;
            let m_hat = self.m[i] / bc1;
            let v_hat = self.v[i] / bc2;
            x[i] -= lr * m_hat / (v_hat.sqrt() + self.eps);
        }
    }
}
