use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CutplanError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        CutplanError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CutplanError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn violations_report_kind_and_range() {
    let range = TimeRange::new(1.0, 2.0).unwrap();
    let v = TimelineViolation::IncompletePartition { range };
    assert_eq!(v.kind(), "IncompletePartition");
    assert_eq!(v.original_range(), Some(range));

    let err = CutplanError::from(v);
    assert!(err.to_string().contains("IncompletePartition"));
    assert!(err.to_string().contains("[1.000s, 2.000s)"));
    assert_eq!(err.original_range(), Some(range));
}

#[test]
fn missing_range_renders_as_none() {
    let v = TimelineViolation::NonContiguousOrder {
        position: 2,
        found: 3,
        range: None,
    };
    assert!(v.to_string().contains("original none"));
}

#[test]
fn dangling_reference_points_at_anchor() {
    let v = TimelineViolation::DanglingBrollReference {
        order: 1,
        media_ref: MediaRef::new("clip-9"),
        at: 4.5,
    };
    assert_eq!(v.original_range(), Some(TimeRange::point(4.5)));
    assert!(v.to_string().contains("clip-9"));
}
