use super::*;
use crate::interval::CutOrigin;
use crate::timeline::{BrollInsert, ZoomEffect};

fn keep(start: f64, end: f64) -> Segment {
    Segment {
        output_order: 0,
        original_range: Some(TimeRange { start, end }),
        output_range: TimeRange::point(0.0),
        action: SegmentAction::Keep,
    }
}

fn cut(start: f64, end: f64) -> Segment {
    Segment {
        action: SegmentAction::Cut(CutOrigin {
            silence: true,
            filler: false,
        }),
        ..keep(start, end)
    }
}

fn broll(at: f64, media: &str) -> Segment {
    Segment {
        output_order: 0,
        original_range: None,
        output_range: TimeRange::point(0.0),
        action: SegmentAction::InsertBroll(BrollInsert {
            at,
            duration: 2.0,
            media_ref: MediaRef::new(media),
        }),
    }
}

fn kind_of(err: CutplanError) -> &'static str {
    match err {
        CutplanError::Invariant(v) => v.kind(),
        other => panic!("expected invariant violation, got {other}"),
    }
}

fn no_media() -> KnownMedia {
    KnownMedia::new()
}

#[test]
fn well_formed_timeline_passes() {
    let tl = Timeline::renumbered(
        vec![
            keep(0.0, 1.0),
            Segment {
                output_order: 0,
                original_range: Some(TimeRange::point(1.0)),
                output_range: TimeRange::point(0.0),
                action: SegmentAction::Zoom(ZoomEffect {
                    at: 1.0,
                    factor: 1.1,
                    anchor: None,
                    span: 1.0,
                }),
            },
            cut(1.0, 2.0),
            keep(2.0, 3.0),
        ],
        3.0,
    );
    let v = validate_timeline(tl.clone(), &no_media()).unwrap();
    assert_eq!(v.timeline(), &tl);
    assert_eq!(v.segments().len(), 4);
    assert_eq!(v.into_inner(), tl);
}

#[test]
fn wrong_output_order_is_non_contiguous() {
    let mut segs = Timeline::renumbered(vec![keep(0.0, 1.0), keep(1.0, 2.0)], 2.0)
        .segments()
        .to_vec();
    segs[1].output_order = 5;
    let err = validate_timeline(Timeline::from_segments(segs, 2.0), &no_media()).unwrap_err();
    assert_eq!(err.original_range(), Some(TimeRange { start: 1.0, end: 2.0 }));
    assert_eq!(kind_of(err), "NonContiguousOrder");
}

#[test]
fn shifted_segment_overlaps_or_gaps() {
    let base = Timeline::renumbered(vec![keep(0.0, 1.0), keep(1.0, 2.0)], 2.0);

    let mut overlapping = base.segments().to_vec();
    overlapping[1].output_range = TimeRange { start: 0.5, end: 1.5 };
    let err = validate_timeline(Timeline::from_segments(overlapping, 2.0), &no_media())
        .unwrap_err();
    assert_eq!(kind_of(err), "OverlappingOutput");

    let mut gapped = base.segments().to_vec();
    gapped[1].output_range = TimeRange { start: 1.5, end: 2.5 };
    let err =
        validate_timeline(Timeline::from_segments(gapped, 2.0), &no_media()).unwrap_err();
    assert_eq!(kind_of(err), "OutputGap");
}

#[test]
fn stretched_output_is_a_duration_mismatch() {
    let mut segs = Timeline::renumbered(vec![keep(0.0, 1.0)], 1.0).segments().to_vec();
    segs[0].output_range = TimeRange { start: 0.0, end: 1.5 };
    let err = validate_timeline(Timeline::from_segments(segs, 1.0), &no_media()).unwrap_err();
    assert_eq!(kind_of(err), "OutputDurationMismatch");
}

#[test]
fn missing_original_time_is_incomplete_partition() {
    let tl = Timeline::renumbered(vec![keep(0.0, 1.0), keep(1.5, 2.0)], 2.0);
    let err = validate_timeline(tl, &no_media()).unwrap_err();
    assert_eq!(err.original_range(), Some(TimeRange { start: 1.0, end: 2.0 }));
    assert_eq!(kind_of(err), "IncompletePartition");

    let short = Timeline::renumbered(vec![keep(0.0, 1.0)], 2.0);
    let err = validate_timeline(short, &no_media()).unwrap_err();
    assert_eq!(err.original_range(), Some(TimeRange { start: 1.0, end: 2.0 }));
}

#[test]
fn out_of_order_sources_are_incomplete_partition() {
    let tl = Timeline::renumbered(vec![keep(1.0, 2.0), cut(0.0, 1.0)], 2.0);
    let err = validate_timeline(tl, &no_media()).unwrap_err();
    assert_eq!(kind_of(err), "IncompletePartition");
}

#[test]
fn broll_must_resolve() {
    let segs = vec![keep(0.0, 1.0), broll(1.0, "stock:7"), keep(1.0, 2.0)];
    let tl = Timeline::renumbered(segs, 2.0);

    let err = validate_timeline(tl.clone(), &no_media()).unwrap_err();
    assert_eq!(err.original_range(), Some(TimeRange::point(1.0)));
    assert_eq!(kind_of(err), "DanglingBrollReference");

    let known: KnownMedia = [MediaRef::new("stock:7")].into_iter().collect();
    assert_eq!(known.len(), 1);
    let ok = validate_timeline(tl, &known).unwrap();
    assert!((ok.timeline().output_duration() - 4.0).abs() < 1e-12);
}

#[test]
fn validated_timeline_serializes_as_plain_timeline() {
    let tl = Timeline::renumbered(vec![keep(0.0, 1.0)], 1.0);
    let v = validate_timeline(tl.clone(), &no_media()).unwrap();
    assert_eq!(
        serde_json::to_value(&v).unwrap(),
        serde_json::to_value(&tl).unwrap()
    );
}

#[test]
fn nan_source_range_is_not_a_cover() {
    let tl = Timeline::renumbered(vec![keep(f64::NAN, f64::NAN)], 1.0);
    let err = validate_timeline(tl, &no_media()).unwrap_err();
    assert_eq!(kind_of(err), "IncompletePartition");

    let tl = Timeline::renumbered(vec![keep(0.0, 0.5), cut(0.5, f64::NAN)], 1.0);
    let err = validate_timeline(tl, &no_media()).unwrap_err();
    assert_eq!(kind_of(err), "IncompletePartition");
}

#[test]
fn nan_output_range_is_rejected() {
    let mut seg = keep(0.0, 1.0);
    seg.output_range = TimeRange {
        start: f64::NAN,
        end: f64::NAN,
    };
    let tl = Timeline::from_segments(vec![seg], 1.0);
    let err = validate_timeline(tl, &no_media()).unwrap_err();
    assert_eq!(kind_of(err), "OutputDurationMismatch");
}

#[test]
fn nan_total_duration_is_rejected() {
    let tl = Timeline::renumbered(vec![keep(0.0, 1.0)], f64::NAN);
    let err = validate_timeline(tl, &no_media()).unwrap_err();
    assert_eq!(kind_of(err), "IncompletePartition");
}
