//! Motion sampling: channel-buffer allocation and per-frame value streaming.
//!
//! Buffers are bound only after the whole skeleton is parsed, because the
//! frame count appears later in the file. Each frame line is then consumed as
//! one float per enabled channel per joint in registration order, each joint's
//! channels in declared order.

use crate::error::ParseError;
use crate::scan::Scanner;
use crate::skeleton::Skeleton;

/// Allocate one buffer of `len` slots per enabled channel.
pub(crate) fn bind_buffers(skeleton: &mut Skeleton, len: usize) {
    for joint in &mut skeleton.joints {
        for i in 0..joint.channel_order.len() {
            let slot = joint.channel_order[i].index();
            joint.channels[slot].values = vec![0.0; len];
        }
    }
}

/// Stream frame values into buffer slots `[start, end)`.
///
/// Lines are consumed sequentially from the cursor; the first line lands in
/// slot `start`. Slots outside the range are never visited and keep their
/// zero default (intentional partial-coverage support, not an error).
pub(crate) fn read_frames(
    scan: &mut Scanner<'_>,
    skeleton: &mut Skeleton,
    start: usize,
    end: usize,
) -> Result<(), ParseError> {
    for frame in start..end {
        scan.expect_newline()?;
        for joint_index in 0..skeleton.joints.len() {
            for channel_index in 0..skeleton.joints[joint_index].channel_order.len() {
                scan.skip_inline_whitespace();
                let value = scan
                    .read_float()
                    .ok_or_else(|| scan.error("channel value"))?;
                let slot = skeleton.joints[joint_index].channel_order[channel_index].index();
                skeleton.joints[joint_index].channels[slot].values[frame] = value as f32;
            }
        }
    }
    Ok(())
}
