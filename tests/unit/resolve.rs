use super::*;
use crate::algebra::build_partition;
use crate::builder::build_base_timeline;
use crate::effects::{BrollRequest, TransitionKind, TransitionRequest, ZoomRequest};
use crate::foundation::core::MediaRef;
use crate::interval::Interval;
use crate::transcript::{Transcript, Word};

fn scenario_base() -> Timeline {
    let t = Transcript::new(
        vec![
            Word::new("I", 0.0, 0.3),
            Word::new("um", 0.3, 0.6),
            Word::new("think", 1.8, 2.1),
        ],
        2.1,
    )
    .unwrap();
    let p = build_partition(
        &t,
        &[Interval::filler(0.3, 0.6), Interval::silence(0.6, 1.8)],
        &EngineConfig::default(),
    )
    .partition;
    build_base_timeline(&p)
}

fn zoom(at: f64) -> EffectRequest {
    EffectRequest::Zoom(ZoomRequest {
        at,
        factor: None,
        anchor: None,
        duration: None,
    })
}

fn broll(at: f64, duration: f64) -> EffectRequest {
    EffectRequest::Broll(BrollRequest {
        at,
        duration,
        media_ref: MediaRef::new("stock:clip"),
    })
}

fn transition(at: f64, duration: f64) -> EffectRequest {
    EffectRequest::Transition(TransitionRequest {
        at,
        kind: TransitionKind::Fade,
        duration,
    })
}

fn names(tl: &Timeline) -> Vec<&'static str> {
    tl.segments().iter().map(Segment::action_name).collect()
}

#[test]
fn broll_inside_cut_is_dropped_and_timeline_unchanged() {
    let base = scenario_base();
    let out = place_effects(&base, &[broll(1.0, 2.0)], &EngineConfig::default());
    assert_eq!(out.applied, 0);
    assert_eq!(out.diagnostics.len(), 1);
    match &out.diagnostics[0] {
        Diagnostic::AnchorInCutRegion { cut, .. } => {
            assert_eq!(*cut, TimeRange { start: 0.3, end: 1.8 });
        }
        other => panic!("unexpected diagnostic {other:?}"),
    }
    assert_eq!(out.timeline, base);
}

#[test]
fn zoom_splits_keep_and_renumbers() {
    let base = Timeline::renumbered(base_single_keep(), 0.3);
    let out = place_effects(&base, &[zoom(0.15)], &EngineConfig::default());
    assert!(out.diagnostics.is_empty());
    assert_eq!(names(&out.timeline), vec!["KEEP", "ZOOM", "KEEP"]);

    let segs = out.timeline.segments();
    let orders: Vec<usize> = segs.iter().map(|s| s.output_order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
    assert_eq!(segs[0].original_range, Some(TimeRange { start: 0.0, end: 0.15 }));
    assert_eq!(segs[1].original_range, Some(TimeRange::point(0.15)));
    assert_eq!(segs[2].original_range, Some(TimeRange { start: 0.15, end: 0.3 }));

    let SegmentAction::Zoom(z) = &segs[1].action else {
        panic!("expected zoom");
    };
    assert_eq!(z.factor, EngineConfig::default().zoom_factor_default);
    assert!((z.span - 0.15).abs() < 1e-12);
    assert!((out.timeline.output_duration() - 0.3).abs() < 1e-12);
}

fn base_single_keep() -> Vec<Segment> {
    vec![Segment {
        output_order: 0,
        original_range: Some(TimeRange { start: 0.0, end: 0.3 }),
        output_range: TimeRange { start: 0.0, end: 0.3 },
        action: SegmentAction::Keep,
    }]
}

#[test]
fn zoom_in_scenario_timeline_keeps_later_segments_in_order() {
    let out = place_effects(&scenario_base(), &[zoom(0.15)], &EngineConfig::default());
    assert_eq!(names(&out.timeline), vec!["KEEP", "ZOOM", "KEEP", "CUT", "KEEP"]);
    for (i, s) in out.timeline.segments().iter().enumerate() {
        assert_eq!(s.output_order, i);
    }
    assert!((out.timeline.segments()[4].output_range.start - 0.3).abs() < 1e-12);
}

#[test]
fn boundary_effects_precede_broll_and_shorter_first() {
    let base = scenario_base();
    let reqs = vec![broll(0.15, 1.0), transition(0.15, 0.5), transition(0.15, 0.2)];
    let out = place_effects(&base, &reqs, &EngineConfig::default());
    assert_eq!(out.applied, 3);
    let segs = out.timeline.segments();
    assert_eq!(
        names(&out.timeline)[..5],
        ["KEEP", "TRANSITION", "TRANSITION", "INSERT_BROLL", "KEEP"]
    );
    assert_eq!(segs[1].output_duration(), 0.2);
    assert_eq!(segs[2].output_duration(), 0.5);
}

#[test]
fn submission_order_tie_break_keeps_input_order() {
    let cfg = EngineConfig {
        effect_tie_break: EffectTieBreak::SubmissionOrder,
        ..EngineConfig::default()
    };
    let reqs = vec![broll(0.15, 1.0), transition(0.15, 0.5)];
    let out = place_effects(&scenario_base(), &reqs, &cfg);
    assert_eq!(
        names(&out.timeline)[..4],
        ["KEEP", "INSERT_BROLL", "TRANSITION", "KEEP"]
    );
}

#[test]
fn broll_and_transition_extend_output_duration() {
    let base = scenario_base();
    let out = place_effects(
        &base,
        &[broll(2.0, 3.0), transition(0.1, 0.25)],
        &EngineConfig::default(),
    );
    assert!((out.timeline.output_duration() - (0.6 + 3.0 + 0.25)).abs() < 1e-9);
    let inserted = out
        .timeline
        .segments()
        .iter()
        .find(|s| s.action_name() == "INSERT_BROLL")
        .unwrap();
    assert_eq!(inserted.original_range, None);
}

#[test]
fn anchor_at_keep_start_after_cut_inserts_without_split() {
    let out = place_effects(&scenario_base(), &[zoom(1.8)], &EngineConfig::default());
    assert_eq!(names(&out.timeline), vec!["KEEP", "CUT", "ZOOM", "KEEP"]);
    assert_eq!(
        out.timeline.segments()[3].original_range,
        Some(TimeRange { start: 1.8, end: 2.1 })
    );
}

#[test]
fn out_of_range_and_invalid_requests_are_reported() {
    let out = place_effects(
        &scenario_base(),
        &[zoom(2.1), zoom(-0.5), broll(0.1, -1.0)],
        &EngineConfig::default(),
    );
    let kinds: Vec<&str> = out.diagnostics.iter().map(Diagnostic::kind).collect();
    assert_eq!(
        kinds,
        vec!["AnchorOutOfRange", "AnchorOutOfRange", "InvalidRequest"]
    );
    assert_eq!(out.applied, 0);
}

#[test]
fn requested_zoom_span_is_clamped_to_segment_remainder() {
    let req = EffectRequest::Zoom(ZoomRequest {
        at: 1.9,
        factor: Some(1.3),
        anchor: None,
        duration: Some(5.0),
    });
    let out = place_effects(&scenario_base(), &[req], &EngineConfig::default());
    let z = out
        .timeline
        .segments()
        .iter()
        .find_map(|s| match &s.action {
            SegmentAction::Zoom(z) => Some(z.clone()),
            _ => None,
        })
        .unwrap();
    assert!((z.span - 0.2).abs() < 1e-9);
    assert_eq!(z.factor, 1.3);
}

#[test]
fn effects_on_both_edges_of_a_cut_are_placed() {
    let base = scenario_base();
    let out = place_effects(
        &base,
        &[transition(0.3, 0.2), transition(1.8, 0.4)],
        &EngineConfig::default(),
    );
    assert!(out.diagnostics.is_empty());
    assert_eq!(out.applied, 2);
    assert_eq!(
        names(&out.timeline),
        vec!["KEEP", "TRANSITION", "CUT", "TRANSITION", "KEEP"]
    );

    let segs = out.timeline.segments();
    assert_eq!(segs[1].output_range, TimeRange { start: 0.3, end: 0.5 });
    assert_eq!(segs[2].original_range, Some(TimeRange { start: 0.3, end: 1.8 }));
}

#[test]
fn effects_at_cut_start_follow_the_closing_keep_in_tie_break_order() {
    let base = scenario_base();
    let out = place_effects(
        &base,
        &[broll(0.3, 1.0), transition(0.3, 0.5), transition(0.3, 0.2)],
        &EngineConfig::default(),
    );
    assert!(out.diagnostics.is_empty());
    assert_eq!(
        names(&out.timeline),
        vec!["KEEP", "TRANSITION", "TRANSITION", "INSERT_BROLL", "CUT", "KEEP"]
    );
    let durations: Vec<f64> = out.timeline.segments()[1..3]
        .iter()
        .map(Segment::output_duration)
        .collect();
    assert_eq!(durations, vec![0.2, 0.5]);
}

#[test]
fn zoom_at_cut_start_has_no_footage_and_is_dropped() {
    let base = scenario_base();
    let out = place_effects(&base, &[zoom(0.3)], &EngineConfig::default());
    assert_eq!(out.applied, 0);
    assert_eq!(out.diagnostics[0].kind(), "AnchorInCutRegion");
    assert_eq!(out.timeline, base);
}
