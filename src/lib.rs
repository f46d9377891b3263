//! Cutplan turns a word-level transcript plus detected silences, filler words, and effect
//! requests into a validated, renderer-ready edit timeline.
//!
//! The pipeline is pure and deterministic:
//!
//! - Normalize words into a [`Transcript`]
//! - Build the speech/cut [`Partition`] with [`build_partition`]
//! - Emit the base [`Timeline`] with [`build_base_timeline`]
//! - Splice zooms, transitions, and B-roll with [`place_effects`]
//! - Check every invariant with [`validate_timeline`]
//!
//! [`EditEngine`] chains the stages; detectors and transcription sit behind traits.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod algebra;
/// Base timeline construction.
pub mod builder;
/// Engine configuration.
pub mod config;
pub mod detect;
/// Recoverable problems reported alongside a timeline.
pub mod diagnostic;
/// Effect requests and effect suggestions.
pub mod effects;
/// End-to-end orchestration.
pub mod engine;
/// Stable content hashes.
pub mod fingerprint;
/// Detector intervals and the speech/cut partition.
pub mod interval;
pub mod render;
pub mod resolve;
/// Timeline segments.
pub mod timeline;
pub mod transcribe;
/// Word map normalization.
pub mod transcript;
pub mod validate;

pub use crate::foundation::core::{MediaRef, Point, Rect, Size, TIME_EPS, TimeRange, same_instant};
pub use crate::foundation::error::{CutplanError, CutplanResult, TimelineViolation};

pub use crate::algebra::{AlgebraOutput, build_partition, snap_range};
pub use crate::builder::build_base_timeline;
pub use crate::config::{EffectTieBreak, EngineConfig, SnapPolicy};
pub use crate::detect::face::{FaceSample, FaceTrack, zoom_crop_region};
pub use crate::detect::filler::{DEFAULT_FILLERS, FillerWordDetector};
pub use crate::detect::silence::WordGapSilenceDetector;
pub use crate::detect::{
    DetectedFeatures, Detection, FeatureDetector, StaticDetector, run_detectors,
};
pub use crate::diagnostic::Diagnostic;
pub use crate::effects::{
    BrollRequest, EffectClass, EffectRequest, SlideDirection, TransitionKind, TransitionRequest,
    ZoomRequest, anchor_zooms_on_faces, jump_cut_zooms,
};
pub use crate::engine::{EditEngine, EditInputs, EditOutcome, EditProject, EditStats};
pub use crate::fingerprint::{AudioFingerprint, TimelineFingerprint, fingerprint_timeline};
pub use crate::interval::{
    CutOrigin, Interval, IntervalKind, Partition, PartitionEntry, PartitionKind,
};
pub use crate::render::{EdlWriter, TimelineRenderer};
pub use crate::resolve::{Placement, place_effects};
pub use crate::timeline::{
    BrollInsert, Segment, SegmentAction, Timeline, TransitionEffect, ZoomEffect,
};
pub use crate::transcribe::{
    InMemoryTranscriptCache, TranscriptAcquisition, TranscriptCache, TranscriptionProvider,
    acquire_transcript,
};
pub use crate::transcript::{Transcript, Word};
pub use crate::validate::{KnownMedia, MediaResolver, ValidatedTimeline, validate_timeline};
