use crate::effects::EffectRequest;
use crate::foundation::core::TimeRange;
use crate::interval::Interval;

/// A recoverable problem: the offending unit of work was dropped and the run continued.
#[derive(thiserror::Error, Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A detector interval reached outside `[0, total_duration)`.
    #[error(
        "dropped {:?} interval {} outside [0, {total_duration:.3}s)",
        .interval.kind,
        .interval.span()
    )]
    OutOfRangeInterval {
        /// The dropped interval.
        interval: Interval,
        /// Media duration it was checked against.
        total_duration: f64,
    },
    /// A detector interval with non-finite or inverted bounds.
    #[error(
        "dropped {:?} interval with bounds {} / {}",
        .interval.kind,
        .interval.start,
        .interval.end
    )]
    DegenerateInterval {
        /// The dropped interval.
        interval: Interval,
    },
    /// An effect anchor fell inside removed time.
    #[error(
        "dropped {} at {:.3}s: anchor lies in cut {cut}",
        .request.kind_name(),
        .request.at()
    )]
    AnchorInCutRegion {
        /// The dropped request.
        request: EffectRequest,
        /// Cut containing the anchor.
        cut: TimeRange,
    },
    /// An effect anchor fell outside `[0, total_duration)`.
    #[error(
        "dropped {} at {:.3}s: anchor outside [0, {total_duration:.3}s)",
        .request.kind_name(),
        .request.at()
    )]
    AnchorOutOfRange {
        /// The dropped request.
        request: EffectRequest,
        /// Media duration it was checked against.
        total_duration: f64,
    },
    /// An effect request with unusable numbers.
    #[error("dropped {} at {}: {reason}", .request.kind_name(), .request.at())]
    InvalidRequest {
        /// The dropped request.
        request: EffectRequest,
        /// What was wrong.
        reason: String,
    },
    /// A detector failed; its output counts as empty.
    #[error("detector '{detector}' failed: {message}")]
    DetectorFailed {
        /// Detector name.
        detector: String,
        /// Rendered error chain.
        message: String,
    },
    /// Transcription failed; the run continues on an empty transcript.
    #[error("transcription unavailable: {message}")]
    TranscriptionUnavailable {
        /// Rendered error chain.
        message: String,
    },
}

impl Diagnostic {
    /// Stable name of the diagnostic.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OutOfRangeInterval { .. } => "OutOfRangeInterval",
            Self::DegenerateInterval { .. } => "DegenerateInterval",
            Self::AnchorInCutRegion { .. } => "AnchorInCutRegion",
            Self::AnchorOutOfRange { .. } => "AnchorOutOfRange",
            Self::InvalidRequest { .. } => "InvalidRequest",
            Self::DetectorFailed { .. } => "DetectorFailed",
            Self::TranscriptionUnavailable { .. } => "TranscriptionUnavailable",
        }
    }

    /// Emit the diagnostic as a `tracing` warning.
    pub(crate) fn log(&self) {
        tracing::warn!(kind = self.kind(), "{self}");
    }
}
