//! Feature detectors and their execution.
//!
//! The engine only sees [`FeatureDetector`] trait objects. The built-in detectors in the
//! submodules are reference plug-ins; callers can supply their own.

use rayon::prelude::*;

use crate::diagnostic::Diagnostic;
use crate::effects::EffectRequest;
use crate::foundation::core::MediaRef;
use crate::foundation::error::{CutplanError, CutplanResult};
use crate::interval::Interval;
use crate::transcript::Transcript;

/// Face samples and zoom crop geometry.
pub mod face;
/// Filler-word detection.
pub mod filler;
/// Word-gap silence detection.
pub mod silence;

use face::{FaceSample, FaceTrack};

/// Output of one detector.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "items", rename_all = "snake_case")]
pub enum Detection {
    /// Silence, filler, or speech spans.
    Intervals(Vec<Interval>),
    /// Suggested effects, e.g. B-roll opportunities.
    Effects(Vec<EffectRequest>),
    /// Face positions over time.
    Faces(Vec<FaceSample>),
}

/// A best-effort analysis pass over the transcript and source media.
///
/// Implementations must be pure with respect to their inputs; they run concurrently against the
/// same borrowed transcript.
pub trait FeatureDetector: Send + Sync {
    /// Name used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Analyse the inputs.
    fn detect(&self, transcript: &Transcript, media: &MediaRef) -> anyhow::Result<Detection>;
}

/// Returns a fixed detection. Useful for precomputed detector output.
#[derive(Clone, Debug)]
pub struct StaticDetector {
    name: String,
    detection: Detection,
}

impl StaticDetector {
    /// Wrap `detection` under `name`.
    pub fn new(name: impl Into<String>, detection: Detection) -> Self {
        Self {
            name: name.into(),
            detection,
        }
    }
}

impl FeatureDetector for StaticDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn detect(&self, _transcript: &Transcript, _media: &MediaRef) -> anyhow::Result<Detection> {
        Ok(self.detection.clone())
    }
}

/// Joined detector output.
#[derive(Clone, Debug, Default)]
pub struct DetectedFeatures {
    /// All intervals, in detector order.
    pub intervals: Vec<Interval>,
    /// All suggested effects, in detector order.
    pub effects: Vec<EffectRequest>,
    /// All face samples.
    pub faces: FaceTrack,
    /// One `DetectorFailed` per failing detector.
    pub diagnostics: Vec<Diagnostic>,
}

impl DetectedFeatures {
    fn absorb(&mut self, name: &str, result: anyhow::Result<Detection>) {
        match result {
            Ok(Detection::Intervals(v)) => self.intervals.extend(v),
            Ok(Detection::Effects(v)) => self.effects.extend(v),
            Ok(Detection::Faces(v)) => self.faces.extend(v),
            Err(err) => {
                let d = Diagnostic::DetectorFailed {
                    detector: name.to_owned(),
                    message: format!("{err:#}"),
                };
                d.log();
                self.diagnostics.push(d);
            }
        }
    }
}

/// Run every detector and join their results in detector order.
///
/// With `parallel` set the detectors run on a dedicated rayon pool of `threads` workers (rayon's
/// default when `None`). A failing detector contributes nothing but a diagnostic.
#[tracing::instrument(skip_all, fields(detectors = detectors.len(), parallel = parallel))]
pub fn run_detectors(
    detectors: &[Box<dyn FeatureDetector>],
    transcript: &Transcript,
    media: &MediaRef,
    parallel: bool,
    threads: Option<usize>,
) -> CutplanResult<DetectedFeatures> {
    let results: Vec<anyhow::Result<Detection>> = if parallel && detectors.len() > 1 {
        let pool = build_thread_pool(threads)?;
        pool.install(|| {
            detectors
                .par_iter()
                .map(|d| d.detect(transcript, media))
                .collect()
        })
    } else {
        detectors
            .iter()
            .map(|d| d.detect(transcript, media))
            .collect()
    };

    let mut out = DetectedFeatures::default();
    for (det, result) in detectors.iter().zip(results) {
        out.absorb(det.name(), result);
    }
    tracing::debug!(
        intervals = out.intervals.len(),
        effects = out.effects.len(),
        faces = out.faces.len(),
        failed = out.diagnostics.len(),
        "detectors finished"
    );
    Ok(out)
}

fn build_thread_pool(threads: Option<usize>) -> CutplanResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CutplanError::validation(
            "detector 'threads' must be >= 1 when set",
        ));
    }
    let mut builder =
        rayon::ThreadPoolBuilder::new().thread_name(|i| format!("cutplan-detect-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CutplanError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/detect.rs"]
mod tests;
