//! Forward kinematics: world-space joint positions by parent-chain
//! accumulation.
//!
//! Each joint in the chain contributes `Rz · Ry · Rx · T`: translate first,
//! then rotate X, Y, Z from the joint's rotation-channel values at the frame
//! (zero when a channel is disabled). The designated hip/root joint is
//! special-cased: its static offset is excluded and its translation comes from
//! its positional channels instead, since root motion lives in those channels.
//!
//! Every call recomputes the full chain; no caching. Depth is tens of joints
//! at most, so the O(depth) cost per query is acceptable.

use crate::math::{rotate_x, rotate_y, rotate_z, Vec3};
use crate::skeleton::{ChannelKind, JointId, Skeleton};

/// Position solver over a skeleton with bound motion buffers.
#[derive(Debug)]
pub struct KinematicsSolver<'a> {
    skeleton: &'a Skeleton,
    hip: Option<JointId>,
}

impl<'a> KinematicsSolver<'a> {
    /// `hip` marks the joint whose static offset is replaced by its
    /// positional channel values (usually the root).
    pub fn new(skeleton: &'a Skeleton, hip: Option<JointId>) -> Self {
        Self { skeleton, hip }
    }

    /// World-space position of `joint` at `frame`.
    pub fn bone_position(&self, joint: JointId, frame: usize) -> Vec3 {
        let mut position = Vec3::ZERO;
        let mut current = Some(joint);
        while let Some(id) = current {
            let node = self.skeleton.joint(id);
            let translation = if self.hip == Some(id) {
                Vec3::new(
                    node.channel_value(ChannelKind::PosX, frame),
                    node.channel_value(ChannelKind::PosY, frame),
                    node.channel_value(ChannelKind::PosZ, frame),
                )
            } else {
                node.offset
            };
            position = position + translation;
            position = rotate_x(position, node.channel_value(ChannelKind::RotX, frame));
            position = rotate_y(position, node.channel_value(ChannelKind::RotY, frame));
            position = rotate_z(position, node.channel_value(ChannelKind::RotZ, frame));
            current = node.parent;
        }
        position
    }
}
