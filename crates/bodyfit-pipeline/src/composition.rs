//! Body composition estimation.
//!
//! The baseline is a formula ensemble: the U.S. Navy circumference formula
//! and the CUN-BAE estimator, blended 60/40 after clamping. A learned
//! regression model can be plugged in behind [`LearnedComposition`]; its
//! estimate is used only when it agrees with the formula baseline within a
//! trust window, and the outcome type exposes both candidates so callers
//! can see which path was taken.

use bodyfit_core::{BodyComposition, BodyRegion, MeasurementSet, ParamVector, Real, Sex, Subject};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Clamp range for a body-fat percentage estimate.
const BODY_FAT_MIN_PCT: Real = 3.0;
const BODY_FAT_MAX_PCT: Real = 60.0;

/// Maximum body-fat disagreement (percentage points) at which a learned
/// estimate is still trusted over the formula baseline.
pub const TRUST_WINDOW_PCT: Real = 10.0;

/// U.S. Navy circumference body-fat formula.
///
/// Male:   `86.010·log10(waist − neck) − 70.041·log10(height) + 36.76`
/// Female: `163.205·log10(waist + hip − neck) − 97.684·log10(height) − 78.387`
///
/// Non-positive log arguments fall back to a lean default.
pub fn navy_body_fat(sex: Sex, waist_cm: Real, neck_cm: Real, hip_cm: Real, height_cm: Real) -> Real {
    match sex {
        Sex::Male => {
            let diff = waist_cm - neck_cm;
            if diff <= 0.0 {
                return 5.0;
            }
            86.010 * diff.log10() - 70.041 * height_cm.log10() + 36.76
        }
        Sex::Female => {
            let total = waist_cm + hip_cm - neck_cm;
            if total <= 0.0 {
                return 10.0;
            }
            163.205 * total.log10() - 97.684 * height_cm.log10() - 78.387
        }
    }
}

/// CUN-BAE body-fat estimator from BMI, age, and sex.
pub fn cunbae_body_fat(bmi: Real, age: u32, sex: Sex) -> Real {
    let s = if sex == Sex::Female { 1.0 } else { 0.0 };
    let age = age as Real;
    -44.988 + 0.503 * age + 10.689 * s + 3.172 * bmi - 0.026 * bmi * bmi + 0.181 * bmi * s
        - 0.02 * bmi * age
        - 0.005 * bmi * bmi * s
        + 0.00021 * bmi * bmi * age
}

fn clamp_body_fat(pct: Real) -> Real {
    pct.clamp(BODY_FAT_MIN_PCT, BODY_FAT_MAX_PCT)
}

/// Formula-only composition estimate: Navy + CUN-BAE ensemble, 60/40.
///
/// Unmeasured circumferences fall back to population defaults so the
/// formulas stay defined.
pub fn formula_body_composition(subject: &Subject, measurements: &MeasurementSet) -> BodyComposition {
    let bmi = subject.bmi();

    let measured_or = |region: BodyRegion, default: Real| {
        let v = measurements.circumference(region);
        if v > 0.0 {
            v
        } else {
            default
        }
    };
    let waist = measured_or(BodyRegion::Waist, 80.0);
    let neck = measured_or(BodyRegion::Neck, 38.0);
    let hips = measured_or(BodyRegion::Hips, 95.0);

    let navy = clamp_body_fat(navy_body_fat(subject.sex, waist, neck, hips, subject.height_cm));
    let cunbae = clamp_body_fat(cunbae_body_fat(bmi, subject.age, subject.sex));

    let body_fat_pct = navy * 0.6 + cunbae * 0.4;
    let fat_mass_kg = body_fat_pct / 100.0 * subject.weight_kg;
    let lean_mass_kg = subject.weight_kg - fat_mass_kg;
    let waist_hip_ratio = if hips > 0.0 { waist / hips } else { 0.0 };

    BodyComposition {
        body_fat_pct,
        lean_mass_kg,
        fat_mass_kg,
        bmi,
        body_fat_navy: navy,
        body_fat_cunbae: cunbae,
        waist_hip_ratio,
    }
}

/// A pluggable learned composition model (e.g. a regression trained on
/// paired scan/DEXA data). External to this crate.
pub trait LearnedComposition: Send + Sync {
    fn estimate(&self, shape: &ParamVector, subject: &Subject) -> anyhow::Result<BodyComposition>;
}

/// Which estimate a [`CompositionOutcome`] settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositionMethod {
    Learned,
    Ensemble,
}

/// Result of a composition estimate, carrying the selected value together
/// with both candidates so the trust-region decision stays inspectable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionOutcome {
    pub method: CompositionMethod,
    pub chosen: BodyComposition,
    pub formula: BodyComposition,
    pub learned: Option<BodyComposition>,
}

/// Composition estimator with an optional learned model.
#[derive(Default)]
pub struct CompositionEstimator {
    learned: Option<Box<dyn LearnedComposition>>,
}

impl CompositionEstimator {
    pub fn new() -> Self {
        Self { learned: None }
    }

    pub fn with_learned(model: Box<dyn LearnedComposition>) -> Self {
        Self {
            learned: Some(model),
        }
    }

    /// Estimate composition, preferring the learned model when its
    /// body-fat estimate stays within [`TRUST_WINDOW_PCT`] of the formula
    /// baseline.
    pub fn estimate(
        &self,
        shape: &ParamVector,
        subject: &Subject,
        measurements: &MeasurementSet,
    ) -> CompositionOutcome {
        let formula = formula_body_composition(subject, measurements);

        let learned = match &self.learned {
            Some(model) => match model.estimate(shape, subject) {
                Ok(estimate) => Some(estimate),
                Err(err) => {
                    warn!("learned composition model failed: {err:#}, using formula");
                    None
                }
            },
            None => None,
        };

        if let Some(ref estimate) = learned {
            let diff = (estimate.body_fat_pct - formula.body_fat_pct).abs();
            if diff < TRUST_WINDOW_PCT {
                info!(
                    "using learned composition: bf={:.1}% (formula={:.1}%)",
                    estimate.body_fat_pct, formula.body_fat_pct
                );
                return CompositionOutcome {
                    method: CompositionMethod::Learned,
                    chosen: estimate.clone(),
                    formula,
                    learned,
                };
            }
            warn!(
                "learned/formula disagreement ({diff:.1} points), falling back to formula"
            );
        }

        CompositionOutcome {
            method: CompositionMethod::Ensemble,
            chosen: formula.clone(),
            formula,
            learned,
        }
    }
}
