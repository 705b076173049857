//! Per-frame feature vectors and their derivation from a parsed clip.
//!
//! A vector is emitted per sampled frame in strict frame order. Two of its
//! fields are written retroactively by the next one or two frames (the hip
//! look-ahead), so a vector is complete only once two further frames have
//! been processed or the sequence ends. The write-back goes through indices
//! into the output vector; the last two emitted entries form a sliding
//! window; nothing aliases once a frame's extraction is done.

use serde::{Deserialize, Serialize};

use crate::config::SkeletonTargets;
use crate::error::ExtractError;
use crate::fk::KinematicsSolver;
use crate::math::Vec3;
use crate::parse::MotionClip;
use crate::skeleton::ChannelKind;

/// Serialized feature-vector width (the hip position itself is not part of
/// the layout).
pub const FEATURE_DIM: usize = 27;

/// Fixed-layout per-frame feature record.
///
/// Serialized field order: left-foot position/velocity, right-foot
/// position/velocity, hip velocity, hip position one and two frames ahead,
/// and the direction deltas derived from those.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Sequence name of the source clip.
    pub name: String,
    /// Frame index relative to the first sampled frame.
    pub frame: usize,
    pub left_foot_position: Vec3,
    pub left_foot_velocity: Vec3,
    pub right_foot_position: Vec3,
    pub right_foot_velocity: Vec3,
    pub hip_position: Vec3,
    pub hip_velocity: Vec3,
    /// Hip position one frame ahead (zero for the last vector of a sequence).
    pub hip_position_next1: Vec3,
    /// Hip position two frames ahead (zero for the last two vectors).
    pub hip_position_next2: Vec3,
    pub hip_dir_next1: Vec3,
    pub hip_dir_next2: Vec3,
}

impl FeatureVector {
    pub fn new(name: String, frame: usize) -> Self {
        Self {
            name,
            frame,
            ..Default::default()
        }
    }

    /// Flatten into the canonical 27-element query layout.
    pub fn to_array(&self) -> [f32; FEATURE_DIM] {
        let mut out = [0.0; FEATURE_DIM];
        let fields = [
            self.left_foot_position,
            self.left_foot_velocity,
            self.right_foot_position,
            self.right_foot_velocity,
            self.hip_velocity,
            self.hip_position_next1,
            self.hip_position_next2,
            self.hip_dir_next1,
            self.hip_dir_next2,
        ];
        for (i, v) in fields.iter().enumerate() {
            out[i * 3] = v.x;
            out[i * 3 + 1] = v.y;
            out[i * 3 + 2] = v.z;
        }
        out
    }

    /// Canonical database row: `name, frame, f0, ..., f26`.
    pub fn to_record_line(&self) -> String {
        let mut line = format!("{}, {}", self.name, self.frame);
        for value in self.to_array() {
            line.push_str(", ");
            line.push_str(&value.to_string());
        }
        line
    }
}

/// Derive one feature vector per sampled frame of `clip`.
///
/// The hip, left-foot, and right-foot joints are resolved case-insensitively
/// from `targets`; a missing joint is fatal. Velocities are finite differences
/// against the previous frame divided by the frame time, zero at the first
/// sampled frame. The final one or two vectors keep zero look-ahead fields,
/// an accepted boundary artifact, not an error.
pub fn extract_features(
    clip: &MotionClip,
    targets: &SkeletonTargets,
) -> Result<Vec<FeatureVector>, ExtractError> {
    let skeleton = &clip.skeleton;
    let hip = skeleton
        .find_joint(&targets.hip)
        .ok_or_else(|| ExtractError::MissingJoint(targets.hip.clone()))?;
    let left_foot = skeleton
        .find_joint(&targets.left_foot)
        .ok_or_else(|| ExtractError::MissingJoint(targets.left_foot.clone()))?;
    let right_foot = skeleton
        .find_joint(&targets.right_foot)
        .ok_or_else(|| ExtractError::MissingJoint(targets.right_foot.clone()))?;

    let solver = KinematicsSolver::new(skeleton, Some(hip));
    let hip_joint = skeleton.joint(hip);

    let mut vectors: Vec<FeatureVector> = Vec::with_capacity(clip.sampled_frames());
    let mut prev_left = Vec3::ZERO;
    let mut prev_right = Vec3::ZERO;
    let mut prev_hip = Vec3::ZERO;

    for frame in clip.start_frame..clip.end_frame {
        let left_position = solver.bone_position(left_foot, frame);
        let right_position = solver.bone_position(right_foot, frame);
        let hip_position = Vec3::new(
            hip_joint.channel_value(ChannelKind::PosX, frame),
            hip_joint.channel_value(ChannelKind::PosY, frame),
            hip_joint.channel_value(ChannelKind::PosZ, frame),
        );

        let first = vectors.is_empty();
        let mut vector = FeatureVector::new(clip.name.clone(), frame - clip.start_frame);
        vector.left_foot_position = left_position;
        vector.right_foot_position = right_position;
        vector.hip_position = hip_position;
        if !first {
            vector.left_foot_velocity = (left_position - prev_left) / clip.frame_time;
            vector.right_foot_velocity = (right_position - prev_right) / clip.frame_time;
            vector.hip_velocity = (hip_position - prev_hip) / clip.frame_time;
        }

        // Look-ahead write-back into the last two emitted vectors.
        let emitted = vectors.len();
        if emitted >= 1 {
            let prev1 = &mut vectors[emitted - 1];
            prev1.hip_position_next1 = hip_position;
            prev1.hip_dir_next1 = hip_position - prev1.hip_position;
        }
        if emitted >= 2 {
            let prev2 = &mut vectors[emitted - 2];
            prev2.hip_position_next2 = hip_position;
            prev2.hip_dir_next2 = prev2.hip_position_next2 - prev2.hip_position_next1;
        }

        prev_left = left_position;
        prev_right = right_position;
        prev_hip = hip_position;
        vectors.push(vector);
    }

    Ok(vectors)
}
