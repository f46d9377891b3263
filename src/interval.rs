use crate::foundation::core::{TIME_EPS, TimeRange};

/// What a detector claims about a span of original time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalKind {
    /// No speech.
    Silence,
    /// Disfluency such as "um" or "you know".
    Filler,
    /// Speech that must be kept.
    Speech,
}

/// Raw detector output over the original time axis.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Interval {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds, exclusive.
    pub end: f64,
    /// Detected feature.
    pub kind: IntervalKind,
    /// Detector confidence in `[0, 1]`.
    #[serde(default = "full_confidence")]
    pub source_confidence: f64,
}

fn full_confidence() -> f64 {
    1.0
}

impl Interval {
    /// Interval with full confidence.
    pub fn new(kind: IntervalKind, start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            kind,
            source_confidence: 1.0,
        }
    }

    /// Shorthand for a silence interval.
    pub fn silence(start: f64, end: f64) -> Self {
        Self::new(IntervalKind::Silence, start, end)
    }

    /// Shorthand for a filler interval.
    pub fn filler(start: f64, end: f64) -> Self {
        Self::new(IntervalKind::Filler, start, end)
    }

    /// Replace the confidence value.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.source_confidence = confidence;
        self
    }

    /// Time span `[start, end)`.
    pub fn span(&self) -> TimeRange {
        TimeRange {
            start: self.start,
            end: self.end,
        }
    }

    /// Return `true` for kinds that propose removal.
    pub fn is_cut_candidate(&self) -> bool {
        matches!(self.kind, IntervalKind::Silence | IntervalKind::Filler)
    }
}

/// Which detectors contributed to a cut.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CutOrigin {
    /// At least one silence interval contributed.
    pub silence: bool,
    /// At least one filler interval contributed.
    pub filler: bool,
}

impl CutOrigin {
    pub(crate) fn of(kind: IntervalKind) -> Self {
        Self {
            silence: kind == IntervalKind::Silence,
            filler: kind == IntervalKind::Filler,
        }
    }

    pub(crate) fn union(self, other: Self) -> Self {
        Self {
            silence: self.silence || other.silence,
            filler: self.filler || other.filler,
        }
    }
}

/// Classification of one partition entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PartitionKind {
    /// Kept as-is.
    Speech,
    /// Removed from the output.
    Cut {
        /// Provenance of the merged cut.
        origin: CutOrigin,
    },
}

/// One entry of a [`Partition`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PartitionEntry {
    /// Covered original time.
    pub range: TimeRange,
    /// Keep or cut.
    #[serde(flatten)]
    pub kind: PartitionKind,
}

impl PartitionEntry {
    /// Return `true` for cut entries.
    pub fn is_cut(&self) -> bool {
        matches!(self.kind, PartitionKind::Cut { .. })
    }
}

/// Gap-free, overlap-free cover of `[0, total_duration)` by speech and cut entries.
///
/// Only [`build_partition`](crate::build_partition) constructs one, so holders can rely on the
/// cover being complete and ordered.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Partition {
    entries: Vec<PartitionEntry>,
    total_duration: f64,
}

impl Partition {
    pub(crate) fn from_entries(entries: Vec<PartitionEntry>, total_duration: f64) -> Self {
        debug_assert!(is_cover(&entries, total_duration));
        Self {
            entries,
            total_duration,
        }
    }

    /// Entries in ascending original time.
    pub fn entries(&self) -> &[PartitionEntry] {
        &self.entries
    }

    /// Covered duration.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Cut entries only.
    pub fn cuts(&self) -> impl Iterator<Item = &PartitionEntry> {
        self.entries.iter().filter(|e| e.is_cut())
    }
}

fn is_cover(entries: &[PartitionEntry], total_duration: f64) -> bool {
    let mut cursor = 0.0f64;
    for e in entries {
        if (e.range.start - cursor).abs() > TIME_EPS || e.range.is_empty() {
            return false;
        }
        cursor = e.range.end;
    }
    (cursor - total_duration).abs() <= TIME_EPS
}
