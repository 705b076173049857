use kinematch_core::{parse_clip, ChannelKind, ClipOptions, MotionClip, ParseError};
use kinematch_test_fixtures::{chain_clip, two_joint_clip};

/// it should build the joint tree with post-order registration and correct
/// channel bindings
#[test]
fn two_joint_structure() {
    let clip = MotionClip::parse(two_joint_clip(), "walk", &ClipOptions::default()).unwrap();
    let skeleton = &clip.skeleton;

    assert_eq!(skeleton.len(), 2);
    // Children register before their parent.
    assert_eq!(skeleton.joints[0].name, "LeftFoot");
    assert_eq!(skeleton.joints[1].name, "Hips");
    assert_eq!(skeleton.root.0, 1);
    assert_eq!(skeleton.joints[0].parent, Some(skeleton.root));
    assert_eq!(skeleton.joints[1].children, vec![kinematch_core::JointId(0)]);

    assert_eq!(skeleton.joints[1].channel_count(), 6);
    assert_eq!(skeleton.joints[0].channel_count(), 3);
    assert_eq!(skeleton.total_channels(), 9);
    assert_eq!(
        skeleton.joints[1].channel_order,
        vec![
            ChannelKind::PosX,
            ChannelKind::PosY,
            ChannelKind::PosZ,
            ChannelKind::RotZ,
            ChannelKind::RotY,
            ChannelKind::RotX,
        ]
    );
    assert!(!skeleton.joints[0].channels[ChannelKind::RotX.index()].enabled);

    assert_eq!(clip.frames, 2);
    assert!((clip.frame_time - 0.5).abs() < 1e-6);
}

/// it should stream motion lines in registration order (deepest joint's
/// channels first)
#[test]
fn motion_columns_follow_registration_order() {
    let clip = MotionClip::parse(two_joint_clip(), "walk", &ClipOptions::default()).unwrap();
    let foot = &clip.skeleton.joints[0];
    let hips = &clip.skeleton.joints[1];

    // First three floats of each line land in LeftFoot's buffers.
    assert_eq!(foot.channels[ChannelKind::PosX.index()].values, vec![-1.0, -1.5]);
    assert_eq!(foot.channels[ChannelKind::PosY.index()].values, vec![-2.0, -2.5]);
    assert_eq!(foot.channels[ChannelKind::PosZ.index()].values, vec![-3.0, -3.5]);
    // Then the root's six.
    assert_eq!(hips.channels[ChannelKind::PosX.index()].values, vec![10.0, 10.5]);
    assert_eq!(hips.channels[ChannelKind::RotZ.index()].values, vec![0.0, 0.0]);
}

/// it should yield N registered joints and per-channel buffers of length F
/// for a generated N-joint, F-frame recording
#[test]
fn chain_round_trip_counts_and_values() {
    let joints = 5;
    let frames = 7;
    let text = chain_clip(joints, frames);
    let clip = parse_clip(&text, "chain", &ClipOptions::default()).unwrap();
    let skeleton = &clip.skeleton;

    assert_eq!(skeleton.len(), joints);
    assert_eq!(skeleton.total_channels(), 6 + 3 * (joints - 1));
    // Deepest joint registers first, root last.
    assert_eq!(skeleton.joints[0].name, format!("joint{}", joints - 1));
    assert_eq!(skeleton.joint(skeleton.root).name, "joint0");

    // Every buffer slot holds frame * total + column, walking the arena in
    // registration order with each joint's channels in declared order.
    let total = skeleton.total_channels();
    for frame in 0..frames {
        let mut column = 0;
        for joint in &skeleton.joints {
            for kind in &joint.channel_order {
                let expected = (frame * total + column) as f32;
                assert_eq!(joint.channels[kind.index()].values.len(), frames);
                assert_eq!(joint.channels[kind.index()].values[frame], expected);
                column += 1;
            }
        }
        assert_eq!(column, total);
    }
}

/// it should read the first lines of motion data into the configured slot
/// range, leaving other slots zero
#[test]
fn frame_range_partial_coverage() {
    let text = chain_clip(2, 3);
    let options = ClipOptions {
        start_frame: 1,
        end_frame: Some(3),
        ..Default::default()
    };
    let clip = parse_clip(&text, "chain", &options).unwrap();
    let root = clip.skeleton.joint(clip.skeleton.root);
    let total = clip.skeleton.total_channels();

    assert_eq!(clip.start_frame, 1);
    assert_eq!(clip.end_frame, 3);
    assert_eq!(clip.sampled_frames(), 2);

    let xpos = &root.channels[ChannelKind::PosX.index()].values;
    assert_eq!(xpos.len(), 3);
    // Slot 0 is never visited.
    assert_eq!(xpos[0], 0.0);
    // The first motion line (frame-0 data, root's Xposition is column 3)
    // lands in slot 1, the second line in slot 2.
    assert_eq!(xpos[1], 3.0);
    assert_eq!(xpos[2], (total + 3) as f32);
}

/// it should clamp the configured end frame to the declared frame count
#[test]
fn end_frame_clamped_to_frame_count() {
    let text = chain_clip(2, 3);
    let options = ClipOptions {
        end_frame: Some(100),
        ..Default::default()
    };
    let clip = parse_clip(&text, "chain", &options).unwrap();
    assert_eq!(clip.end_frame, 3);
    let root = clip.skeleton.joint(clip.skeleton.root);
    assert_eq!(root.channels[ChannelKind::PosX.index()].values.len(), 3);
}

/// it should apply the frame-time override in place of the parsed value
#[test]
fn frame_time_override() {
    let options = ClipOptions {
        frame_time_override: Some(0.0125),
        ..Default::default()
    };
    let clip = MotionClip::parse(two_joint_clip(), "walk", &options).unwrap();
    assert!((clip.frame_time - 0.0125).abs() < 1e-6);
}

/// it should accept lowercase keywords and End Site blocks
#[test]
fn keywords_are_case_insensitive() {
    let text = "hierarchy\n\
        root Hips\n{\n\
        offset 0.0 0.0 0.0\n\
        channels 3 Xposition Yposition Zposition\n\
        end site\n{\noffset 0.0 1.0 0.0\n}\n\
        }\n\
        motion\nframes: 1\nframe time: 0.1\n\
        1.0 2.0 3.0\n";
    let clip = parse_clip(text, "lc", &ClipOptions::default()).unwrap();
    assert_eq!(clip.skeleton.len(), 1);
    assert_eq!(
        clip.skeleton.joints[0].channels[ChannelKind::PosY.index()].values,
        vec![2.0]
    );
}

/// it should abort with offset and bracketed context on a bad keyword
#[test]
fn bad_keyword_is_fatal_with_context() {
    let err = parse_clip("HIERRCHY\n", "bad", &ClipOptions::default()).unwrap_err();
    match err {
        ParseError::Syntax {
            offset,
            expected,
            context,
        } => {
            assert_eq!(offset, 0);
            assert_eq!(expected, "HIERARCHY");
            assert!(context.contains("<<<"));
        }
    }
}

/// it should reject channel counts outside 1..=6
#[test]
fn channel_count_out_of_range_is_fatal() {
    let text = "HIERARCHY\nROOT Hips\n{\nOFFSET 0.0 0.0 0.0\nCHANNELS 7 \
        Xposition Yposition Zposition Xrotation Yrotation Zrotation Xposition\n}\n";
    let err = parse_clip(text, "bad", &ClipOptions::default()).unwrap_err();
    let ParseError::Syntax { expected, .. } = err;
    assert!(expected.contains("channel number"));
}

/// it should reject a missing newline before frame data
#[test]
fn missing_newline_before_frames_is_fatal() {
    let text = "HIERARCHY\nROOT Hips\n{\nOFFSET 0.0 0.0 0.0\n\
        CHANNELS 3 Xposition Yposition Zposition\nEnd Site\n{\nOFFSET 0.0 1.0 0.0\n}\n}\n\
        MOTION\nFRAMES: 1\nFRAME TIME: 0.1 1.0 2.0 3.0";
    let err = parse_clip(text, "bad", &ClipOptions::default()).unwrap_err();
    let ParseError::Syntax { expected, .. } = err;
    assert_eq!(expected, "newline");
}

/// it should reject a non-numeric offset
#[test]
fn non_numeric_offset_is_fatal() {
    let text = "HIERARCHY\nROOT Hips\n{\nOFFSET a 0.0 0.0\n";
    let err = parse_clip(text, "bad", &ClipOptions::default()).unwrap_err();
    let ParseError::Syntax { expected, .. } = err;
    assert_eq!(expected, "offset X");
}

/// it should report a one-line summary naming the root
#[test]
fn clip_summary() {
    let clip = MotionClip::parse(two_joint_clip(), "walk", &ClipOptions::default()).unwrap();
    let summary = clip.summary();
    assert!(summary.contains("walk"));
    assert!(summary.contains("Hips"));
    assert!(summary.contains('2'));
}

/// it should round-trip a parsed clip through serde
#[test]
fn clip_serde_round_trip() {
    let clip = MotionClip::parse(two_joint_clip(), "walk", &ClipOptions::default()).unwrap();
    let json = serde_json::to_string(&clip).unwrap();
    let back: MotionClip = serde_json::from_str(&json).unwrap();
    assert_eq!(clip, back);
}
