use crate::foundation::core::{MediaRef, TimeRange};

/// Convenience result type used across cutplan.
pub type CutplanResult<T> = Result<T, CutplanError>;

/// Fatal error taxonomy. Any of these aborts the run and no timeline is produced.
///
/// Recoverable problems (dropped intervals, unplaceable effects, failing detectors) are reported
/// as [`Diagnostic`](crate::Diagnostic)s instead.
#[derive(thiserror::Error, Debug)]
pub enum CutplanError {
    /// Invalid user-provided configuration or input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The word sequence still overlaps after clamping the later word's start.
    #[error("malformed transcript: word {index} '{text}' at {range} cannot be clamped after its predecessor")]
    MalformedTranscript {
        /// Position of the offending word after ordering by start.
        index: usize,
        /// Recognized text of the offending word.
        text: String,
        /// Word span as supplied.
        range: TimeRange,
    },

    /// Transcript content extends past the media duration the intervals are measured against.
    #[error("duration mismatch: {range} extends past total duration {total:.3}s")]
    DurationMismatch {
        /// Offending span in original time.
        range: TimeRange,
        /// Declared total duration.
        total: f64,
    },

    /// The final timeline failed validation.
    #[error("timeline invariant violated: {0}")]
    Invariant(#[from] TimelineViolation),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from a collaborator or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CutplanError {
    /// Build a [`CutplanError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CutplanError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Original-time range implicated by the failure, when there is one.
    pub fn original_range(&self) -> Option<TimeRange> {
        match self {
            Self::MalformedTranscript { range, .. } | Self::DurationMismatch { range, .. } => {
                Some(*range)
            }
            Self::Invariant(v) => v.original_range(),
            Self::Validation(_) | Self::Serde(_) | Self::Other(_) => None,
        }
    }
}

/// A timeline invariant checked by the validator.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum TimelineViolation {
    /// `output_order` is not the 0-based position of the segment.
    #[error("NonContiguousOrder: position {position} carries output_order {found} (original {})", show(.range))]
    NonContiguousOrder {
        /// Position in the segment sequence.
        position: usize,
        /// Order value found there.
        found: usize,
        /// Original range of that segment.
        range: Option<TimeRange>,
    },

    /// Two output-contributing segments occupy the same output time.
    #[error("OverlappingOutput: segments {first} and {second} overlap at output {output} (original {})", show(.range))]
    OverlappingOutput {
        /// Order of the earlier segment.
        first: usize,
        /// Order of the later segment.
        second: usize,
        /// Output span covered twice.
        output: TimeRange,
        /// Original range of the later segment.
        range: Option<TimeRange>,
    },

    /// The output axis does not start at zero or skips time.
    #[error("OutputGap: segment {order} starts at output {found_start:.3}s, expected {expected_start:.3}s (original {})", show(.range))]
    OutputGap {
        /// Order of the segment following the gap.
        order: usize,
        /// Where the segment should have started.
        expected_start: f64,
        /// Where it actually starts.
        found_start: f64,
        /// Original range of that segment.
        range: Option<TimeRange>,
    },

    /// A segment's output length disagrees with what its action contributes.
    #[error("OutputDurationMismatch: segment {order} spans {found:.3}s of output, action implies {expected:.3}s (original {})", show(.range))]
    OutputDurationMismatch {
        /// Order of the segment.
        order: usize,
        /// Duration implied by the action.
        expected: f64,
        /// Duration recorded in the output range.
        found: f64,
        /// Original range of that segment.
        range: Option<TimeRange>,
    },

    /// KEEP and CUT ranges do not tile `[0, total_duration)` in order.
    #[error("IncompletePartition: original time {range} is not covered exactly once")]
    IncompletePartition {
        /// Gap, overlap, or out-of-order span.
        range: TimeRange,
    },

    /// An INSERT_BROLL segment references media the resolver does not know.
    #[error("DanglingBrollReference: segment {order} references unresolvable media '{media_ref}' anchored at {at:.3}s")]
    DanglingBrollReference {
        /// Order of the segment.
        order: usize,
        /// The unresolved handle.
        media_ref: MediaRef,
        /// Anchor of the insertion in original time.
        at: f64,
    },
}

impl TimelineViolation {
    /// Stable name of the violated invariant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NonContiguousOrder { .. } => "NonContiguousOrder",
            Self::OverlappingOutput { .. } => "OverlappingOutput",
            Self::OutputGap { .. } => "OutputGap",
            Self::OutputDurationMismatch { .. } => "OutputDurationMismatch",
            Self::IncompletePartition { .. } => "IncompletePartition",
            Self::DanglingBrollReference { .. } => "DanglingBrollReference",
        }
    }

    /// Original-time range implicated by the violation.
    pub fn original_range(&self) -> Option<TimeRange> {
        match self {
            Self::NonContiguousOrder { range, .. }
            | Self::OverlappingOutput { range, .. }
            | Self::OutputGap { range, .. }
            | Self::OutputDurationMismatch { range, .. } => *range,
            Self::IncompletePartition { range } => Some(*range),
            Self::DanglingBrollReference { at, .. } => Some(TimeRange::point(*at)),
        }
    }
}

fn show(range: &Option<TimeRange>) -> String {
    match range {
        Some(r) => r.to_string(),
        None => "none".to_owned(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
