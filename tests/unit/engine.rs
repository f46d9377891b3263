use super::*;
use crate::detect::StaticDetector;
use crate::detect::face::FaceSample;
use crate::detect::filler::FillerWordDetector;
use crate::detect::silence::WordGapSilenceDetector;
use crate::detect::Detection;
use crate::effects::{BrollRequest, ZoomRequest};
use crate::foundation::core::{Point, TimeRange};

fn scenario_inputs() -> EditInputs {
    EditInputs {
        words: vec![
            Word::new("I", 0.0, 0.3),
            Word::new("um", 0.3, 0.6),
            Word::new("think", 1.8, 2.1),
        ],
        intervals: vec![Interval::filler(0.3, 0.6), Interval::silence(0.6, 1.8)],
        ..EditInputs::new(2.1)
    }
}

fn engine() -> EditEngine {
    EditEngine::new(EngineConfig::default()).unwrap()
}

#[test]
fn plain_run_reports_stats() {
    let out = engine().run(&scenario_inputs(), &KnownMedia::new()).unwrap();
    assert!(out.diagnostics.is_empty());
    assert_eq!(out.timeline.segments().len(), 3);
    assert!((out.stats.output_duration - 0.6).abs() < 1e-9);
    assert!((out.stats.removed_duration - 1.5).abs() < 1e-9);
    assert_eq!(out.stats.silence_cuts, 1);
    assert_eq!(out.stats.filler_cuts, 1);
    assert_eq!(out.stats.effects_applied, 0);
}

#[test]
fn dropped_effect_is_counted() {
    let mut inputs = scenario_inputs();
    inputs.effects.push(EffectRequest::Broll(BrollRequest {
        at: 1.0,
        duration: 2.0,
        media_ref: MediaRef::new("stock:1"),
    }));
    let out = engine().run(&inputs, &KnownMedia::new()).unwrap();
    assert_eq!(out.stats.effects_dropped, 1);
    assert_eq!(out.diagnostics[0].kind(), "AnchorInCutRegion");
}

#[test]
fn jump_cut_zoom_lands_after_each_cut_and_uses_faces() {
    let cfg = EngineConfig {
        jump_cut_zoom: true,
        ..EngineConfig::default()
    };
    let mut inputs = scenario_inputs();
    inputs.faces = FaceTrack::new([FaceSample {
        at: 1.9,
        center: Point::new(640.0, 360.0),
    }]);
    let out = EditEngine::new(cfg).unwrap().run(&inputs, &KnownMedia::new()).unwrap();

    let names: Vec<&str> = out.timeline.segments().iter().map(|s| s.action_name()).collect();
    assert_eq!(names, vec!["KEEP", "CUT", "ZOOM", "KEEP"]);
    let SegmentAction::Zoom(z) = &out.timeline.segments()[2].action else {
        panic!("expected zoom");
    };
    assert_eq!(z.factor, 1.05);
    assert_eq!(z.anchor, Some(Point::new(640.0, 360.0)));
}

#[test]
fn explicit_zoom_anchor_is_not_replaced_by_faces() {
    let mut inputs = scenario_inputs();
    inputs.effects.push(EffectRequest::Zoom(ZoomRequest {
        at: 0.1,
        factor: None,
        anchor: Some(Point::new(1.0, 2.0)),
        duration: None,
    }));
    inputs.faces = FaceTrack::new([FaceSample {
        at: 0.1,
        center: Point::new(640.0, 360.0),
    }]);
    let out = engine().run(&inputs, &KnownMedia::new()).unwrap();
    let zoom = out
        .timeline
        .segments()
        .iter()
        .find_map(|s| match &s.action {
            SegmentAction::Zoom(z) => Some(z.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(zoom.anchor, Some(Point::new(1.0, 2.0)));
}

#[test]
fn dangling_broll_is_fatal() {
    let mut inputs = scenario_inputs();
    inputs.effects.push(EffectRequest::Broll(BrollRequest {
        at: 2.0,
        duration: 1.0,
        media_ref: MediaRef::new("stock:missing"),
    }));
    let err = engine().run(&inputs, &KnownMedia::new()).unwrap_err();
    assert!(err.to_string().contains("DanglingBrollReference"));
    assert_eq!(err.original_range(), Some(TimeRange::point(2.0)));
}

#[test]
fn malformed_words_are_fatal() {
    let mut inputs = scenario_inputs();
    inputs.words.push(Word::new("late", 2.0, 3.0));
    let err = engine().run(&inputs, &KnownMedia::new()).unwrap_err();
    assert!(matches!(
        err,
        CutplanError::DurationMismatch { .. } | CutplanError::MalformedTranscript { .. }
    ));
}

#[test]
fn detectors_feed_the_plan() {
    let inputs = EditInputs {
        words: vec![
            Word::new("uh", 0.0, 0.4),
            Word::new("welcome", 0.4, 1.0),
            Word::new("back", 3.0, 3.5),
        ],
        ..EditInputs::new(3.5)
    };
    let detectors: Vec<Box<dyn FeatureDetector>> = vec![
        Box::new(WordGapSilenceDetector::new(0.5)),
        Box::new(FillerWordDetector::default()),
        Box::new(StaticDetector::new(
            "broll",
            Detection::Effects(vec![EffectRequest::Broll(BrollRequest {
                at: 3.2,
                duration: 1.0,
                media_ref: MediaRef::new("stock:city"),
            })]),
        )),
    ];
    let known: KnownMedia = [MediaRef::new("stock:city")].into_iter().collect();
    let out = engine()
        .run_with_detectors(&inputs, &MediaRef::new("talk.mp4"), &detectors, &known)
        .unwrap();

    let names: Vec<&str> = out.timeline.segments().iter().map(|s| s.action_name()).collect();
    assert_eq!(names, vec!["CUT", "KEEP", "CUT", "KEEP", "INSERT_BROLL", "KEEP"]);
    assert!((out.stats.output_duration - 0.6 - 0.5 - 1.0).abs() < 1e-9);
}
