use super::*;

#[test]
fn default_config_is_thirty_fps_one_second_prefix() {
    let cfg = PlayerConfig::default();
    assert_eq!(cfg.fps, Fps { num: 30, den: 1 });
    assert_eq!(cfg.start, StartPolicy::Prefix(30));
}

#[test]
fn threshold_is_clamped_to_sequence() {
    assert_eq!(StartPolicy::Prefix(30).threshold(3), 3);
    assert_eq!(StartPolicy::Prefix(0).threshold(3), 1);
    assert_eq!(StartPolicy::Prefix(2).threshold(240), 2);
    assert_eq!(StartPolicy::AllFrames.threshold(240), 240);
}

#[test]
fn overrides_ignore_garbage() {
    let cfg = PlayerConfig::default().with_overrides(|key| match key {
        ENV_FPS => Some("24".to_string()),
        ENV_START_THRESHOLD => Some("nope".to_string()),
        _ => None,
    });
    assert_eq!(cfg.fps, Fps { num: 24, den: 1 });
    assert_eq!(cfg.start, StartPolicy::Prefix(30));

    let cfg = PlayerConfig::default().with_overrides(|key| match key {
        ENV_FPS => Some("0".to_string()),
        ENV_START_THRESHOLD => Some(" 5 ".to_string()),
        _ => None,
    });
    assert_eq!(cfg.fps, Fps::default());
    assert_eq!(cfg.start, StartPolicy::Prefix(5));
}

#[test]
fn manifest_accepts_numbered_frames() {
    let m = ReelManifest::from_json_str(
        r#"{
            "base_path": "/hero-frames",
            "frames": { "prefix": "ezgif-frame-", "count": 240 },
            "player": { "start": "all_frames" }
        }"#,
    )
    .unwrap();
    let seq = m.sequence().unwrap();
    assert_eq!(seq.len(), 240);
    assert_eq!(seq.get(0), Some("ezgif-frame-001.png"));
    assert_eq!(m.player.start, StartPolicy::AllFrames);
    assert_eq!(m.player.fps, Fps::default());
}

#[test]
fn manifest_accepts_explicit_frames_and_prefix_policy() {
    let m = ReelManifest::from_json_str(
        r#"{
            "base_path": "frames",
            "frames": ["b.png", "a.png"],
            "player": { "fps": { "num": 12, "den": 1 }, "start": { "prefix": 1 } }
        }"#,
    )
    .unwrap();
    assert_eq!(m.sequence().unwrap().get(0), Some("b.png"));
    assert_eq!(m.player.start, StartPolicy::Prefix(1));
}

#[test]
fn manifest_rejects_invalid_input() {
    let err = ReelManifest::from_json_str(r#"{ "base_path": "x", "frames": [] }"#).unwrap_err();
    assert!(err.to_string().contains("validation error:"));

    let err = ReelManifest::from_json_str(
        r#"{ "base_path": "x", "frames": ["a"], "player": { "fps": { "num": 0, "den": 1 } } }"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("validation error:"));

    let err = ReelManifest::from_json_str("{").unwrap_err();
    assert!(err.to_string().contains("serialization error:"));
}

#[test]
fn manifest_rejects_oversized_numbered_sequence() {
    let json = r#"{ "base_path": "/f", "frames": { "prefix": "f-", "count": 4000000000 } }"#;
    assert!(ReelManifest::from_json_str(json).is_err());
}
