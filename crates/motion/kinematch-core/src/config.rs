//! Options for clip parsing and feature extraction.

use serde::{Deserialize, Serialize};

/// Frame-range and timing options applied while parsing a recording.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClipOptions {
    /// First buffer slot to fill. Motion lines are consumed from the start of
    /// the data; slots below this index stay zero.
    pub start_frame: usize,
    /// Exclusive end of the sampled range, clamped to the recording's frame
    /// count. `None` samples through the last frame.
    pub end_frame: Option<usize>,
    /// Replace the recording's `FRAME TIME:` value (seconds per frame).
    pub frame_time_override: Option<f32>,
}

/// Joint names the feature extractor resolves against the skeleton
/// (case-insensitive).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SkeletonTargets {
    pub hip: String,
    pub left_foot: String,
    pub right_foot: String,
}

impl Default for SkeletonTargets {
    fn default() -> Self {
        Self {
            hip: "Hips".to_string(),
            left_foot: "LeftFoot".to_string(),
            right_foot: "RightFoot".to_string(),
        }
    }
}
