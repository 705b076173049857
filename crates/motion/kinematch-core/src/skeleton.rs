//! Skeleton data model: joint arena, channel bindings, motion buffers.
//!
//! Joints live in an arena indexed by `JointId`, in *registration order*: the
//! order the parser closes each joint body (children before their parent).
//! That order is load-bearing: motion lines are consumed one float per enabled
//! channel per joint walking this same arena left to right.

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// One animated degree of freedom. The six slots have fixed indices 0..5
/// independent of declaration order; declaration order only controls how raw
/// values are read off the motion lines.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    PosX,
    PosY,
    PosZ,
    RotX,
    RotY,
    RotZ,
}

impl ChannelKind {
    pub const COUNT: usize = 6;

    #[inline]
    pub fn index(self) -> usize {
        match self {
            ChannelKind::PosX => 0,
            ChannelKind::PosY => 1,
            ChannelKind::PosZ => 2,
            ChannelKind::RotX => 3,
            ChannelKind::RotY => 4,
            ChannelKind::RotZ => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(ChannelKind::PosX),
            1 => Some(ChannelKind::PosY),
            2 => Some(ChannelKind::PosZ),
            3 => Some(ChannelKind::RotX),
            4 => Some(ChannelKind::RotY),
            5 => Some(ChannelKind::RotZ),
            _ => None,
        }
    }

    #[inline]
    pub fn is_rotation(self) -> bool {
        self.index() >= 3
    }
}

/// Arena index of a joint within its skeleton.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct JointId(pub usize);

/// Per-channel motion buffer. Disabled channels keep an empty buffer and read
/// as zero displacement/rotation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionChannel {
    pub enabled: bool,
    pub values: Vec<f32>,
}

/// One node of the skeleton tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub name: String,
    /// Static translation from the parent joint.
    pub offset: Vec3,
    /// Channel kinds in declaration order (1–6 entries). Governs motion-line
    /// reading only; rotations always compose Z, then Y, then X.
    pub channel_order: Vec<ChannelKind>,
    /// The six channel slots, addressed by `ChannelKind::index()`.
    pub channels: [MotionChannel; 6],
    pub parent: Option<JointId>,
    pub children: Vec<JointId>,
}

impl Joint {
    pub fn new(name: String, offset: Vec3) -> Self {
        Self {
            name,
            offset,
            channel_order: Vec::new(),
            channels: Default::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Number of enabled channels (equals the declared channel count).
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channel_order.len()
    }

    /// Bound channel value at `frame`, or 0.0 when the channel is disabled or
    /// the frame lies outside the sampled range.
    #[inline]
    pub fn channel_value(&self, kind: ChannelKind, frame: usize) -> f32 {
        let channel = &self.channels[kind.index()];
        if channel.enabled {
            channel.values.get(frame).copied().unwrap_or(0.0)
        } else {
            0.0
        }
    }
}

/// Joint tree plus channel bindings, stored as an arena in registration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    pub joints: Vec<Joint>,
    pub root: JointId,
}

impl Skeleton {
    #[inline]
    pub fn joint(&self, id: JointId) -> &Joint {
        &self.joints[id.0]
    }

    #[inline]
    pub fn joint_mut(&mut self, id: JointId) -> &mut Joint {
        &mut self.joints[id.0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Joints in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (JointId, &Joint)> {
        self.joints.iter().enumerate().map(|(i, j)| (JointId(i), j))
    }

    /// Case-insensitive lookup by joint name (first match in registration
    /// order).
    pub fn find_joint(&self, name: &str) -> Option<JointId> {
        self.joints
            .iter()
            .position(|j| j.name.eq_ignore_ascii_case(name))
            .map(JointId)
    }

    /// Total enabled channels across all joints.
    pub fn total_channels(&self) -> usize {
        self.joints.iter().map(Joint::channel_count).sum()
    }

    /// `Root/.../Parent/Joint` path of a joint.
    pub fn bone_path(&self, id: JointId) -> String {
        let mut path = self.joint(id).name.clone();
        let mut parent = self.joint(id).parent;
        while let Some(pid) = parent {
            let joint = self.joint(pid);
            path = format!("{}/{}", joint.name, path);
            parent = joint.parent;
        }
        path
    }
}
