use crate::foundation::error::{CutplanError, CutplanResult};

/// How cut boundaries that land inside a word are moved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapPolicy {
    /// Cut start moves to the word start (the cut grows), cut end moves to the word start (the cut
    /// shrinks). A word touched by a cut's start is removed whole; one touched by its end is kept.
    #[default]
    ExtendStartShrinkEnd,
    /// Both boundaries move away from the word so no word is ever removed.
    PreserveWords,
    /// Both boundaries move outward so every touched word is removed.
    CoverWords,
}

/// Ordering of several effects that resolve to the same split point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTieBreak {
    /// Zoom/transition before B-roll, then ascending requested duration, then submission order.
    #[default]
    BoundaryEffectsFirst,
    /// Submission order only.
    SubmissionOrder,
}

/// Engine tuning. Every field has a default, so an empty JSON object is a valid config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Silence-only cut candidates shorter than this (seconds) are kept.
    pub min_silence_duration: f64,
    /// Zoom factor for requests that do not carry one.
    pub zoom_factor_default: f64,
    /// Boundary snapping policy.
    pub snap_policy: SnapPolicy,
    /// Tie-break for effects sharing a split point.
    pub effect_tie_break: EffectTieBreak,
    /// Add a punch-in zoom after every cut.
    pub jump_cut_zoom: bool,
    /// Factor used for jump-cut zooms.
    pub jump_cut_zoom_factor: f64,
    /// Max distance (seconds) between a zoom anchor time and the face sample used to centre it.
    pub face_anchor_window: f64,
    /// Run detectors on a rayon thread pool.
    pub parallel_detectors: bool,
    /// Detector pool size. `None` uses rayon defaults.
    pub detector_threads: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_silence_duration: 1.0,
            zoom_factor_default: 1.1,
            snap_policy: SnapPolicy::default(),
            effect_tie_break: EffectTieBreak::default(),
            jump_cut_zoom: false,
            jump_cut_zoom_factor: 1.05,
            face_anchor_window: 0.5,
            parallel_detectors: true,
            detector_threads: None,
        }
    }
}

impl EngineConfig {
    /// Check every numeric field.
    pub fn validate(&self) -> CutplanResult<()> {
        if !self.min_silence_duration.is_finite() || self.min_silence_duration < 0.0 {
            return Err(CutplanError::validation(
                "min_silence_duration must be finite and >= 0",
            ));
        }
        if !self.zoom_factor_default.is_finite() || self.zoom_factor_default <= 0.0 {
            return Err(CutplanError::validation(
                "zoom_factor_default must be finite and > 0",
            ));
        }
        if !self.jump_cut_zoom_factor.is_finite() || self.jump_cut_zoom_factor <= 0.0 {
            return Err(CutplanError::validation(
                "jump_cut_zoom_factor must be finite and > 0",
            ));
        }
        if !self.face_anchor_window.is_finite() || self.face_anchor_window < 0.0 {
            return Err(CutplanError::validation(
                "face_anchor_window must be finite and >= 0",
            ));
        }
        if let Some(n) = self.detector_threads
            && n == 0
        {
            return Err(CutplanError::validation(
                "detector_threads must be >= 1 when set",
            ));
        }
        Ok(())
    }

    /// Parse a JSON config and validate it.
    pub fn from_json(s: &str) -> CutplanResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| CutplanError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
