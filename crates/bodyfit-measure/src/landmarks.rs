//! Anatomical landmark vertex indices and measurement region definitions.
//!
//! The indices address the standard 6890-vertex SMPL topology and follow
//! the SMPL-Anthropometry landmark table.

use bodyfit_core::{BodyRegion, Real};

// Head / neck
pub const TOP_OF_HEAD: usize = 411;
pub const CHIN: usize = 3386;
pub const NECK_FRONT: usize = 3068;
pub const NECK_BACK: usize = 829;
pub const NECK_LEFT: usize = 3165;
pub const NECK_RIGHT: usize = 672;

// Shoulders
pub const LEFT_SHOULDER: usize = 3010;
pub const RIGHT_SHOULDER: usize = 6470;
pub const LEFT_SHOULDER_TIP: usize = 3015;
pub const RIGHT_SHOULDER_TIP: usize = 6475;

// Chest / torso
pub const STERNUM: usize = 3076;
pub const CHEST_LEFT: usize = 1325;
pub const CHEST_RIGHT: usize = 4742;
pub const NAVEL: usize = 3500;
pub const LEFT_HIP_JOINT: usize = 1799;
pub const RIGHT_HIP_JOINT: usize = 5262;
pub const CROTCH: usize = 3149;

// Waist
pub const WAIST_FRONT: usize = 3504;
pub const WAIST_BACK: usize = 3021;
pub const WAIST_LEFT: usize = 1325;
pub const WAIST_RIGHT: usize = 4742;

// Hips
pub const HIP_FRONT: usize = 3145;
pub const HIP_BACK: usize = 3117;
pub const HIP_LEFT: usize = 1812;
pub const HIP_RIGHT: usize = 5275;

// Left arm
pub const LEFT_BICEP_UPPER: usize = 1308;
pub const LEFT_BICEP_LOWER: usize = 1315;
pub const LEFT_ELBOW: usize = 1657;
pub const LEFT_FOREARM: usize = 1943;
pub const LEFT_WRIST: usize = 2108;
pub const LEFT_HAND_TIP: usize = 2445;

// Right arm
pub const RIGHT_BICEP_UPPER: usize = 4777;
pub const RIGHT_BICEP_LOWER: usize = 4782;
pub const RIGHT_ELBOW: usize = 5121;
pub const RIGHT_FOREARM: usize = 5407;
pub const RIGHT_WRIST: usize = 5572;
pub const RIGHT_HAND_TIP: usize = 5905;

// Left leg
pub const LEFT_THIGH_UPPER: usize = 1003;
pub const LEFT_THIGH_LOWER: usize = 1012;
pub const LEFT_KNEE: usize = 1058;
pub const LEFT_CALF: usize = 1112;
pub const LEFT_ANKLE: usize = 3327;
pub const LEFT_HEEL: usize = 3387;
pub const LEFT_TOE: usize = 3233;

// Right leg
pub const RIGHT_THIGH_UPPER: usize = 4463;
pub const RIGHT_THIGH_LOWER: usize = 4472;
pub const RIGHT_KNEE: usize = 4518;
pub const RIGHT_CALF: usize = 4572;
pub const RIGHT_ANKLE: usize = 6787;
pub const RIGHT_HEEL: usize = 6847;
pub const RIGHT_TOE: usize = 6693;

/// A circumference region's slicing plane: the plane's height is the
/// midpoint of the two landmarks' Y coordinates plus an offset in meters.
#[derive(Debug, Clone, Copy)]
pub struct RegionSlice {
    pub landmark_a: usize,
    pub landmark_b: usize,
    pub y_offset: Real,
}

/// Slicing definition for a measured region.
pub fn region_slice(region: BodyRegion) -> RegionSlice {
    let (landmark_a, landmark_b, y_offset) = match region {
        BodyRegion::Neck => (NECK_FRONT, NECK_BACK, 0.0),
        BodyRegion::Chest => (STERNUM, STERNUM, 0.0),
        // Natural waist sits slightly above the navel.
        BodyRegion::Waist => (NAVEL, NAVEL, 0.02),
        BodyRegion::Hips => (HIP_FRONT, HIP_BACK, 0.0),
        BodyRegion::Shoulders => (LEFT_SHOULDER_TIP, RIGHT_SHOULDER_TIP, 0.0),
        BodyRegion::LeftBicep => (LEFT_BICEP_UPPER, LEFT_BICEP_LOWER, 0.0),
        BodyRegion::RightBicep => (RIGHT_BICEP_UPPER, RIGHT_BICEP_LOWER, 0.0),
        BodyRegion::LeftForearm => (LEFT_ELBOW, LEFT_FOREARM, 0.0),
        BodyRegion::RightForearm => (RIGHT_ELBOW, RIGHT_FOREARM, 0.0),
        BodyRegion::LeftThigh => (LEFT_THIGH_UPPER, LEFT_THIGH_LOWER, 0.0),
        BodyRegion::RightThigh => (RIGHT_THIGH_UPPER, RIGHT_THIGH_LOWER, 0.0),
        BodyRegion::LeftCalf => (LEFT_KNEE, LEFT_CALF, 0.0),
        BodyRegion::RightCalf => (RIGHT_KNEE, RIGHT_CALF, 0.0),
        BodyRegion::Wrist => (LEFT_WRIST, LEFT_WRIST, 0.0),
    };
    RegionSlice {
        landmark_a,
        landmark_b,
        y_offset,
    }
}
