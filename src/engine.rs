use crate::algebra::build_partition;
use crate::builder::build_base_timeline;
use crate::config::EngineConfig;
use crate::detect::face::FaceTrack;
use crate::detect::{FeatureDetector, run_detectors};
use crate::diagnostic::Diagnostic;
use crate::effects::{EffectRequest, anchor_zooms_on_faces, jump_cut_zooms};
use crate::foundation::core::MediaRef;
use crate::foundation::error::{CutplanError, CutplanResult};
use crate::interval::Interval;
use crate::resolve::place_effects;
use crate::timeline::SegmentAction;
use crate::transcript::{Transcript, Word};
use crate::validate::{KnownMedia, MediaResolver, ValidatedTimeline, validate_timeline};

/// Everything one editing run consumes, in original time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EditInputs {
    /// Source media duration in seconds.
    pub total_duration: f64,
    /// Recognized words; empty when no transcript is available.
    #[serde(default)]
    pub words: Vec<Word>,
    /// Precomputed detector intervals.
    #[serde(default)]
    pub intervals: Vec<Interval>,
    /// Requested effects.
    #[serde(default)]
    pub effects: Vec<EffectRequest>,
    /// Face positions used to centre zooms.
    #[serde(default)]
    pub faces: FaceTrack,
}

impl EditInputs {
    /// Inputs with no words, intervals, effects, or faces.
    pub fn new(total_duration: f64) -> Self {
        Self {
            total_duration,
            words: Vec::new(),
            intervals: Vec::new(),
            effects: Vec::new(),
            faces: FaceTrack::default(),
        }
    }
}

/// On-disk project: source media handle, inputs, and the B-roll library.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EditProject {
    /// Source recording.
    pub media: MediaRef,
    /// Run inputs.
    #[serde(flatten)]
    pub inputs: EditInputs,
    /// B-roll handles the renderer can fetch.
    #[serde(default)]
    pub known_media: KnownMedia,
}

impl EditProject {
    /// Parse a project from JSON.
    pub fn from_json(s: &str) -> CutplanResult<Self> {
        serde_json::from_str(s).map_err(|e| CutplanError::serde(e.to_string()))
    }
}

/// Summary numbers for one run.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct EditStats {
    /// Source duration in seconds.
    pub original_duration: f64,
    /// Rendered duration in seconds.
    pub output_duration: f64,
    /// Original seconds covered by cuts.
    pub removed_duration: f64,
    /// Cuts with a silence contribution.
    pub silence_cuts: usize,
    /// Cuts with a filler contribution. Merged cuts count here and in `silence_cuts`.
    pub filler_cuts: usize,
    /// Effects spliced into the timeline.
    pub effects_applied: usize,
    /// Effects dropped with a diagnostic.
    pub effects_dropped: usize,
}

impl EditStats {
    fn of(timeline: &ValidatedTimeline, effects_applied: usize, effects_dropped: usize) -> Self {
        let mut stats = Self {
            original_duration: timeline.timeline().total_duration(),
            output_duration: timeline.timeline().output_duration(),
            effects_applied,
            effects_dropped,
            ..Self::default()
        };
        for seg in timeline.segments() {
            if let SegmentAction::Cut(origin) = &seg.action {
                stats.removed_duration += seg.original_range.map_or(0.0, |r| r.len_secs());
                stats.silence_cuts += usize::from(origin.silence);
                stats.filler_cuts += usize::from(origin.filler);
            }
        }
        stats
    }
}

/// Result of a successful run.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EditOutcome {
    /// The validated timeline, ready for a renderer.
    pub timeline: ValidatedTimeline,
    /// Every recoverable problem, in pipeline order.
    pub diagnostics: Vec<Diagnostic>,
    /// Summary numbers.
    pub stats: EditStats,
}

/// Drives transcript normalization, the interval algebra, timeline building, effect placement,
/// and validation.
#[derive(Clone, Debug)]
pub struct EditEngine {
    cfg: EngineConfig,
}

impl EditEngine {
    /// Engine with a validated configuration.
    pub fn new(cfg: EngineConfig) -> CutplanResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Plan a timeline from precomputed inputs.
    #[tracing::instrument(skip_all, fields(total = inputs.total_duration))]
    pub fn run(
        &self,
        inputs: &EditInputs,
        media: &dyn MediaResolver,
    ) -> CutplanResult<EditOutcome> {
        let transcript = Transcript::new(inputs.words.clone(), inputs.total_duration)?;
        self.plan(
            &transcript,
            &inputs.intervals,
            inputs.effects.clone(),
            &inputs.faces,
            media,
            Vec::new(),
        )
    }

    /// Run `detectors` first and plan from their output merged with `inputs`.
    ///
    /// Supplied intervals, effects, and faces come before detected ones.
    #[tracing::instrument(
        skip_all,
        fields(total = inputs.total_duration, detectors = detectors.len())
    )]
    pub fn run_with_detectors(
        &self,
        inputs: &EditInputs,
        source: &MediaRef,
        detectors: &[Box<dyn FeatureDetector>],
        media: &dyn MediaResolver,
    ) -> CutplanResult<EditOutcome> {
        let transcript = Transcript::new(inputs.words.clone(), inputs.total_duration)?;
        let detected = run_detectors(
            detectors,
            &transcript,
            source,
            self.cfg.parallel_detectors,
            self.cfg.detector_threads,
        )?;

        let mut intervals = inputs.intervals.clone();
        intervals.extend(detected.intervals);
        let mut effects = inputs.effects.clone();
        effects.extend(detected.effects);
        let mut faces = inputs.faces.clone();
        faces.extend(detected.faces.samples().iter().copied());

        self.plan(
            &transcript,
            &intervals,
            effects,
            &faces,
            media,
            detected.diagnostics,
        )
    }

    fn plan(
        &self,
        transcript: &Transcript,
        intervals: &[Interval],
        mut effects: Vec<EffectRequest>,
        faces: &FaceTrack,
        media: &dyn MediaResolver,
        mut diagnostics: Vec<Diagnostic>,
    ) -> CutplanResult<EditOutcome> {
        let algebra = build_partition(transcript, intervals, &self.cfg);
        diagnostics.extend(algebra.diagnostics);

        let base = build_base_timeline(&algebra.partition);

        if self.cfg.jump_cut_zoom {
            effects.extend(jump_cut_zooms(&base, self.cfg.jump_cut_zoom_factor));
        }
        let effects = anchor_zooms_on_faces(effects, faces, self.cfg.face_anchor_window);

        let placement = place_effects(&base, &effects, &self.cfg);
        let dropped = placement.diagnostics.len();
        diagnostics.extend(placement.diagnostics);

        let timeline = validate_timeline(placement.timeline, media)?;
        let stats = EditStats::of(&timeline, placement.applied, dropped);
        tracing::info!(
            segments = timeline.segments().len(),
            original_secs = stats.original_duration,
            output_secs = stats.output_duration,
            diagnostics = diagnostics.len(),
            "planned timeline"
        );
        Ok(EditOutcome {
            timeline,
            diagnostics,
            stats,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/engine.rs"]
mod tests;
