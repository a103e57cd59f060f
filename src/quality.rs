//! Heuristic face quality score.
//!
//! The score starts from the detector confidence and adds fixed bonuses for
//! landmark completeness, face size and a near-frontal pose. Poses outside the
//! thresholds only forfeit their bonus; nothing is ever subtracted.

use crate::types::{FaceObservation, LandmarkRole};

const BOTH_EYEBROWS_BONUS: f32 = 0.20;
const ONE_EYEBROW_BONUS: f32 = 0.10;
const LARGE_FACE_BONUS: f32 = 0.20;
/// Normalized box area above which a face counts as large enough.
const LARGE_FACE_AREA: f32 = 0.1;
const BOTH_EYES_BONUS: f32 = 0.10;
const NOSE_BONUS: f32 = 0.10;
const POSE_BONUS: f32 = 0.05;

const MAX_ROLL_DEGREES: f32 = 30.0;
const MAX_YAW_DEGREES: f32 = 35.0;
const MAX_PITCH_DEGREES: f32 = 30.0;

/// Everything the score depends on for one face.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QualityInputs {
    pub confidence: f32,
    pub has_left_eyebrow: bool,
    pub has_right_eyebrow: bool,
    pub has_left_eye: bool,
    pub has_right_eye: bool,
    pub has_nose: bool,
    /// Normalized width × height of the face box.
    pub box_area: f32,
    /// Pose angles in radians.
    pub roll: Option<f32>,
    pub pitch: Option<f32>,
    pub yaw: Option<f32>,
}

impl QualityInputs {
    pub fn from_observation(obs: &FaceObservation) -> Self {
        Self {
            confidence: obs.confidence,
            has_left_eyebrow: obs.has_landmark(LandmarkRole::LeftEyebrow),
            has_right_eyebrow: obs.has_landmark(LandmarkRole::RightEyebrow),
            has_left_eye: obs.has_landmark(LandmarkRole::LeftEye),
            has_right_eye: obs.has_landmark(LandmarkRole::RightEye),
            has_nose: obs.has_landmark(LandmarkRole::Nose),
            box_area: obs.bounding_box.area(),
            roll: obs.roll,
            pitch: obs.pitch,
            yaw: obs.yaw,
        }
    }
}

/// Score a face in [0, 1].
pub fn evaluate(inputs: &QualityInputs) -> f32 {
    let mut score = inputs.confidence;

    score += match (inputs.has_left_eyebrow, inputs.has_right_eyebrow) {
        (true, true) => BOTH_EYEBROWS_BONUS,
        (true, false) | (false, true) => ONE_EYEBROW_BONUS,
        (false, false) => 0.0,
    };

    if inputs.box_area > LARGE_FACE_AREA {
        score += LARGE_FACE_BONUS;
    }

    // The nose only counts once both eyes are in.
    if inputs.has_left_eye && inputs.has_right_eye {
        score += BOTH_EYES_BONUS;
        if inputs.has_nose {
            score += NOSE_BONUS;
        }
    }

    if let (Some(roll), Some(pitch), Some(yaw)) = (inputs.roll, inputs.pitch, inputs.yaw) {
        if roll.to_degrees().abs() < MAX_ROLL_DEGREES {
            score += POSE_BONUS;
        }
        if yaw.to_degrees().abs() < MAX_YAW_DEGREES {
            score += POSE_BONUS;
        }
        if pitch.to_degrees().abs() < MAX_PITCH_DEGREES {
            score += POSE_BONUS;
        }
    }

    score.clamp(0.0, 1.0)
}

/// Score a detector observation directly.
pub fn score_observation(obs: &FaceObservation) -> f32 {
    evaluate(&QualityInputs::from_observation(obs))
}
