//! Shared text fixtures for kinematch tests and benches.
//!
//! Static fixtures live under the workspace `fixtures/` directory and are
//! embedded at compile time; `chain_clip` generates synthetic recordings of
//! arbitrary size for round-trip and throughput tests.

use once_cell::sync::Lazy;

/// Minimal two-joint recording: `ROOT Hips` (6 channels) with a single
/// `JOINT LeftFoot` (3 positional channels), 2 frames, frame time 0.5s.
pub fn two_joint_clip() -> &'static str {
    include_str!("../../../../fixtures/two_joint.bvh")
}

/// `ROOT Hips` with LeftFoot/RightFoot children (rotation channels only),
/// 4 frames of straight-line hip motion, frame time 0.25s.
pub fn two_feet_clip() -> &'static str {
    include_str!("../../../../fixtures/two_feet.bvh")
}

/// Four serialized records across the sequences `walk`/`Walk`/`turn`, with
/// every feature field of record k equal to a single constant.
pub fn mini_database() -> &'static str {
    include_str!("../../../../fixtures/mini_database.csv")
}

/// Generate a single-chain recording: `joint0` is the root (6 channels,
/// positions then Z/Y/X rotations), every descendant `jointN` carries 3
/// rotation channels and offset `(1, 0, 0)`, and the deepest joint ends in an
/// `End Site`.
///
/// Motion values are a running counter across each line, so
/// `frame * total_channels + column` reproduces any buffer slot. Columns
/// follow registration order (deepest joint first).
pub fn chain_clip(joints: usize, frames: usize) -> String {
    assert!(joints >= 1, "chain needs at least a root");

    let mut text = String::from("HIERARCHY\n");
    for depth in 0..joints {
        let indent = "  ".repeat(depth);
        if depth == 0 {
            text.push_str("ROOT joint0\n{\n");
            text.push_str(
                "  OFFSET 0.0 0.0 0.0\n  CHANNELS 6 Xposition Yposition Zposition Zrotation Yrotation Xrotation\n",
            );
        } else {
            text.push_str(&format!("{indent}JOINT joint{depth}\n{indent}{{\n"));
            text.push_str(&format!(
                "{indent}  OFFSET 1.0 0.0 0.0\n{indent}  CHANNELS 3 Zrotation Yrotation Xrotation\n"
            ));
        }
    }
    let deepest = "  ".repeat(joints);
    text.push_str(&format!(
        "{deepest}End Site\n{deepest}{{\n{deepest}  OFFSET 1.0 0.0 0.0\n{deepest}}}\n"
    ));
    for depth in (0..joints).rev() {
        let indent = "  ".repeat(depth);
        text.push_str(&format!("{indent}}}\n"));
    }

    let total_channels = 6 + 3 * (joints - 1);
    text.push_str(&format!("MOTION\nFRAMES: {frames}\nFRAME TIME: 0.033333\n"));
    for frame in 0..frames {
        let line: Vec<String> = (0..total_channels)
            .map(|column| (frame * total_channels + column).to_string())
            .collect();
        text.push_str(&line.join(" "));
        text.push('\n');
    }
    text
}

static LONG_CHAIN: Lazy<String> = Lazy::new(|| chain_clip(8, 120));

/// Lazily built 8-joint, 120-frame chain recording.
pub fn long_chain_clip() -> &'static str {
    &LONG_CHAIN
}
