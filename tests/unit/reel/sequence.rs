use super::*;

#[test]
fn rejects_empty_and_duplicate_frames() {
    assert!(Sequence::new(Vec::<String>::new()).is_err());
    assert!(Sequence::new(["a.png", "b.png", "a.png"]).is_err());
    assert!(Sequence::new(["a.png", ""]).is_err());
}

#[test]
fn keeps_construction_order() {
    let seq = Sequence::new(["c.png", "a.png", "b.png"]).unwrap();
    assert_eq!(seq.len(), 3);
    assert_eq!(seq.last_index(), 2);
    assert_eq!(seq.iter().collect::<Vec<_>>(), ["c.png", "a.png", "b.png"]);
    assert_eq!(seq.get(3), None);
}

#[test]
fn numbered_pads_to_digits() {
    let seq = Sequence::numbered("ezgif-frame-", 3, 1, 240, "png").unwrap();
    assert_eq!(seq.len(), 240);
    assert_eq!(seq.get(0), Some("ezgif-frame-001.png"));
    assert_eq!(seq.get(239), Some("ezgif-frame-240.png"));

    let bare = Sequence::numbered("f", 2, 9, 2, "").unwrap();
    assert_eq!(bare.iter().collect::<Vec<_>>(), ["f09", "f10"]);

    assert!(Sequence::numbered("f", 2, 0, 0, "png").is_err());
}

#[test]
fn deserialize_validates() {
    let ok: Sequence = serde_json::from_str(r#"["a.png","b.png"]"#).unwrap();
    assert_eq!(ok.len(), 2);
    assert!(serde_json::from_str::<Sequence>("[]").is_err());
    assert!(serde_json::from_str::<Sequence>(r#"["a","a"]"#).is_err());
}

#[test]
fn numbered_count_is_bounded() {
    assert!(Sequence::numbered("f-", 3, 1, MAX_NUMBERED_FRAMES, "png").is_ok());
    let err = Sequence::numbered("f-", 3, 1, 4_000_000_000, "png").unwrap_err();
    assert!(err.to_string().contains("exceeds"), "{err}");
}
