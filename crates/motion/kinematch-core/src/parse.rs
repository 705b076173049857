//! Recursive-descent parser for hierarchical-skeleton recordings.
//!
//! Grammar (keywords case-insensitive):
//!
//! ```text
//! file    := ws HIERARCHY ws root ws MOTION ws FRAMES: ws INT ws FRAME TIME: ws FLOAT frames
//! root    := ROOT name { OFFSET f f f CHANNELS n token* child* }
//! joint   := JOINT name ...same body as root... }
//! endsite := End Site { OFFSET f f f }
//! child   := joint | endsite | "}"
//! ```
//!
//! Joints register into the arena when their body closes, children before
//! their parent. Any unmet expectation aborts the whole parse; there is no
//! partial-skeleton recovery.

use serde::{Deserialize, Serialize};

use crate::config::ClipOptions;
use crate::error::ParseError;
use crate::math::Vec3;
use crate::sample::{bind_buffers, read_frames};
use crate::scan::{fold, Scanner};
use crate::skeleton::{Joint, JointId, Skeleton};

/// A parsed recording: skeleton with bound motion buffers plus frame timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionClip {
    /// Sequence name (carried into feature vectors and database records).
    pub name: String,
    pub skeleton: Skeleton,
    /// Frame count declared by the recording.
    pub frames: usize,
    /// Seconds per frame.
    pub frame_time: f32,
    /// First sampled buffer slot.
    pub start_frame: usize,
    /// Exclusive end of the sampled range (declared count clamped by the
    /// configured end frame).
    pub end_frame: usize,
}

impl MotionClip {
    pub fn parse(text: &str, name: &str, options: &ClipOptions) -> Result<Self, ParseError> {
        parse_clip(text, name, options)
    }

    /// Number of sampled frames.
    #[inline]
    pub fn sampled_frames(&self) -> usize {
        self.end_frame.saturating_sub(self.start_frame)
    }

    /// One-line textual summary.
    pub fn summary(&self) -> String {
        format!(
            "clip '{}': {} frames @ {}s, root {}",
            self.name,
            self.frames,
            self.frame_time,
            self.skeleton.joint(self.skeleton.root).name
        )
    }
}

/// Parse a recording into a [`MotionClip`].
pub fn parse_clip(text: &str, name: &str, options: &ClipOptions) -> Result<MotionClip, ParseError> {
    let mut parser = ClipParser {
        scan: Scanner::new(text),
        joints: Vec::new(),
    };

    parser.scan.skip_whitespace();
    parser.scan.expect_literal("HIERARCHY")?;
    let root = parser.parse_joint(true)?;

    parser.scan.skip_whitespace();
    parser.scan.expect_literal("MOTION")?;
    parser.scan.skip_whitespace();
    parser.scan.expect_literal("FRAMES:")?;
    parser.scan.skip_whitespace();
    let frames = parser
        .scan
        .read_int()
        .filter(|n| *n >= 0)
        .ok_or_else(|| parser.scan.error("frame count"))? as usize;
    parser.scan.skip_whitespace();
    parser.scan.expect_literal("FRAME TIME:")?;
    parser.scan.skip_whitespace();
    let frame_time = parser
        .scan
        .read_float()
        .ok_or_else(|| parser.scan.error("frame time"))? as f32;
    let frame_time = options.frame_time_override.unwrap_or(frame_time);

    let mut skeleton = Skeleton {
        joints: parser.joints,
        root,
    };

    let end_frame = options.end_frame.map_or(frames, |e| e.min(frames));
    bind_buffers(&mut skeleton, end_frame);
    read_frames(&mut parser.scan, &mut skeleton, options.start_frame, end_frame)?;

    Ok(MotionClip {
        name: name.to_string(),
        skeleton,
        frames,
        frame_time,
        start_frame: options.start_frame,
        end_frame,
    })
}

struct ClipParser<'a> {
    scan: Scanner<'a>,
    joints: Vec<Joint>,
}

impl ClipParser<'_> {
    /// Parse one `ROOT`/`JOINT` body, registering children first, then the
    /// joint itself. Returns the registered id.
    fn parse_joint(&mut self, is_root: bool) -> Result<JointId, ParseError> {
        self.scan.skip_whitespace();
        self.scan
            .expect_literal(if is_root { "ROOT" } else { "JOINT" })?;
        let name = self
            .scan
            .read_line_trimmed()
            .ok_or_else(|| self.scan.error("joint name"))?;

        self.scan.skip_whitespace();
        self.scan.expect_literal("{")?;
        self.scan.skip_whitespace();
        self.scan.expect_literal("OFFSET")?;
        let offset = self.read_offset()?;
        self.scan.skip_whitespace();
        self.scan.expect_literal("CHANNELS")?;

        self.scan.skip_whitespace();
        let channel_number = self
            .scan
            .read_int()
            .ok_or_else(|| self.scan.error("channel number"))?;
        if !(1..=6).contains(&channel_number) {
            return Err(self.scan.error("channel number between 1 and 6"));
        }

        let mut joint = Joint::new(name, offset);
        for _ in 0..channel_number {
            self.scan.skip_whitespace();
            let kind = self
                .scan
                .read_channel_token()
                .ok_or_else(|| self.scan.error("channel ID"))?;
            joint.channel_order.push(kind);
            joint.channels[kind.index()].enabled = true;
        }

        let mut children: Vec<JointId> = Vec::new();
        loop {
            self.scan.skip_whitespace();
            let peeked = self
                .scan
                .peek()
                .ok_or_else(|| self.scan.error("child joint"))?;
            match fold(peeked as u8) {
                b'J' => children.push(self.parse_joint(false)?),
                b'E' => self.parse_end_site()?,
                b'}' => {
                    self.scan.expect_literal("}")?;
                    break;
                }
                _ => return Err(self.scan.error("child joint")),
            }
        }

        let id = JointId(self.joints.len());
        for &child in &children {
            self.joints[child.0].parent = Some(id);
        }
        joint.children = children;
        self.joints.push(joint);
        Ok(id)
    }

    /// `End Site { OFFSET f f f }`; offsets are read and discarded.
    fn parse_end_site(&mut self) -> Result<(), ParseError> {
        self.scan.expect_literal("End Site")?;
        self.scan.skip_whitespace();
        self.scan.expect_literal("{")?;
        self.scan.skip_whitespace();
        self.scan.expect_literal("OFFSET")?;
        self.read_offset()?;
        self.scan.skip_whitespace();
        self.scan.expect_literal("}")?;
        Ok(())
    }

    fn read_offset(&mut self) -> Result<Vec3, ParseError> {
        self.scan.skip_whitespace();
        let x = self
            .scan
            .read_float()
            .ok_or_else(|| self.scan.error("offset X"))?;
        self.scan.skip_whitespace();
        let y = self
            .scan
            .read_float()
            .ok_or_else(|| self.scan.error("offset Y"))?;
        self.scan.skip_whitespace();
        let z = self
            .scan
            .read_float()
            .ok_or_else(|| self.scan.error("offset Z"))?;
        Ok(Vec3::new(x as f32, y as f32, z as f32))
    }
}
