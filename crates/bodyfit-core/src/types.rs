//! Shared data model for the scan pipeline.
//!
//! Defines the prediction, depth, measurement, and composition types that
//! flow between the predictor, the multi-view optimizer, and the
//! measurement/composition stages.

use crate::math::{ParamVector, Real, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Number of shape coefficients in a prediction (SMPL betas).
pub const SHAPE_DIM: usize = 10;
/// Number of pose coefficients in a prediction (24 joints × 3 axis-angle).
pub const POSE_DIM: usize = 72;
/// Weak-perspective camera parameter count: `[scale, tx, ty]`.
pub const CAMERA_DIM: usize = 3;

/// Per-view output of the image → shape/pose predictor.
///
/// Produced once per image by an external regressor and consumed only by
/// the multi-view optimizer.
#[derive(Debug, Clone)]
pub struct ShapePosePrediction {
    /// Shape coefficients, roughly standard-normal per component.
    pub shape: ParamVector,
    /// Per-joint axis-angle pose coefficients.
    pub pose: ParamVector,
    /// Weak-perspective camera `[scale, tx, ty]`.
    pub camera: Vec3,
    /// Predictor confidence in `[0, 1]`.
    pub confidence: Real,
}

/// Depth-derived metric scale signal for one view.
///
/// The scale factor is the ratio between the subject's known height and
/// the vertical extent observed in the depth point cloud.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DepthSignal {
    pub scale_factor: Real,
    /// Number of valid points the estimate was derived from.
    pub point_count: usize,
}

/// Subject sex, as used by the body composition formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Scan acquisition tier: whether depth data accompanied the photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanTier {
    Lidar,
    Photo,
}

/// Subject demographics supplied with a scan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Subject {
    pub height_cm: Real,
    pub weight_kg: Real,
    pub age: u32,
    pub sex: Sex,
}

/// Validation errors for [`Subject`].
#[derive(Debug, Error)]
pub enum SubjectError {
    #[error("height must be in (50, 300) cm, got {0}")]
    HeightOutOfRange(Real),
    #[error("weight must be in (20, 500) kg, got {0}")]
    WeightOutOfRange(Real),
    #[error("age must be in [10, 120] years, got {0}")]
    AgeOutOfRange(u32),
}

impl Subject {
    /// Check that demographics are physically plausible.
    pub fn validate(&self) -> Result<(), SubjectError> {
        if !(self.height_cm > 50.0 && self.height_cm < 300.0) {
            return Err(SubjectError::HeightOutOfRange(self.height_cm));
        }
        if !(self.weight_kg > 20.0 && self.weight_kg < 500.0) {
            return Err(SubjectError::WeightOutOfRange(self.weight_kg));
        }
        if !(10..=120).contains(&self.age) {
            return Err(SubjectError::AgeOutOfRange(self.age));
        }
        Ok(())
    }

    /// Body mass index, kg/m².
    pub fn bmi(&self) -> Real {
        let h_m = self.height_cm / 100.0;
        self.weight_kg / (h_m * h_m)
    }
}

/// Body regions measured as circumferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyRegion {
    Neck,
    Chest,
    Waist,
    Hips,
    Shoulders,
    LeftBicep,
    RightBicep,
    LeftForearm,
    RightForearm,
    LeftThigh,
    RightThigh,
    LeftCalf,
    RightCalf,
    Wrist,
}

impl BodyRegion {
    /// All measured regions, in export order.
    pub const ALL: [BodyRegion; 14] = [
        BodyRegion::Neck,
        BodyRegion::Chest,
        BodyRegion::Waist,
        BodyRegion::Hips,
        BodyRegion::Shoulders,
        BodyRegion::LeftBicep,
        BodyRegion::RightBicep,
        BodyRegion::LeftForearm,
        BodyRegion::RightForearm,
        BodyRegion::LeftThigh,
        BodyRegion::RightThigh,
        BodyRegion::LeftCalf,
        BodyRegion::RightCalf,
        BodyRegion::Wrist,
    ];

    /// Snake-case name used for export keys.
    pub fn name(&self) -> &'static str {
        match self {
            BodyRegion::Neck => "neck",
            BodyRegion::Chest => "chest",
            BodyRegion::Waist => "waist",
            BodyRegion::Hips => "hips",
            BodyRegion::Shoulders => "shoulders",
            BodyRegion::LeftBicep => "left_bicep",
            BodyRegion::RightBicep => "right_bicep",
            BodyRegion::LeftForearm => "left_forearm",
            BodyRegion::RightForearm => "right_forearm",
            BodyRegion::LeftThigh => "left_thigh",
            BodyRegion::RightThigh => "right_thigh",
            BodyRegion::LeftCalf => "left_calf",
            BodyRegion::RightCalf => "right_calf",
            BodyRegion::Wrist => "wrist",
        }
    }
}

/// Full set of body measurements extracted from the body mesh.
///
/// Circumferences are keyed by [`BodyRegion`]; regions whose contour was
/// degenerate are absent and read back as zero. All values are in cm.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeasurementSet {
    pub circumferences: BTreeMap<BodyRegion, Real>,
    pub height: Real,
    pub arm_span: Real,
    pub shoulder_width: Real,
    pub torso_length: Real,
    pub inseam: Real,
}

fn round1(v: Real) -> Real {
    (v * 10.0).round() / 10.0
}

impl MeasurementSet {
    /// Circumference for a region, or 0 when it could not be measured.
    pub fn circumference(&self, region: BodyRegion) -> Real {
        self.circumferences.get(&region).copied().unwrap_or(0.0)
    }

    pub fn set_circumference(&mut self, region: BodyRegion, value_cm: Real) {
        self.circumferences.insert(region, value_cm);
    }

    /// Flat `{name}_cm → value` export map, rounded to 0.1 cm.
    pub fn to_map(&self) -> BTreeMap<String, Real> {
        let mut map = BTreeMap::new();
        for region in BodyRegion::ALL {
            map.insert(
                format!("{}_cm", region.name()),
                round1(self.circumference(region)),
            );
        }
        map.insert("height_cm".to_owned(), round1(self.height));
        map.insert("arm_span_cm".to_owned(), round1(self.arm_span));
        map.insert("shoulder_width_cm".to_owned(), round1(self.shoulder_width));
        map.insert("torso_length_cm".to_owned(), round1(self.torso_length));
        map.insert("inseam_cm".to_owned(), round1(self.inseam));
        map
    }
}

/// Body composition estimates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BodyComposition {
    pub body_fat_pct: Real,
    pub lean_mass_kg: Real,
    pub fat_mass_kg: Real,
    pub bmi: Real,
    pub body_fat_navy: Real,
    pub body_fat_cunbae: Real,
    pub waist_hip_ratio: Real,
}
