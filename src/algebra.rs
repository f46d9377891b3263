//! Interval algebra: turns raw detector intervals into a speech/cut partition.
//!
//! Pipeline per run: range check, snap to word boundaries, merge touching candidates, drop
//! silence-only candidates under the minimum duration, then fill the gaps with speech.

use crate::config::{EngineConfig, SnapPolicy};
use crate::diagnostic::Diagnostic;
use crate::foundation::core::{TIME_EPS, TimeRange, same_instant};
use crate::interval::{CutOrigin, Interval, Partition, PartitionEntry, PartitionKind};
use crate::transcript::Transcript;

/// Partition plus everything that was dropped on the way.
#[derive(Clone, Debug)]
pub struct AlgebraOutput {
    /// The complete speech/cut cover of the media.
    pub partition: Partition,
    /// Recoverable problems with the supplied intervals.
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    range: TimeRange,
    origin: CutOrigin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Start,
    End,
}

/// Build the speech/cut partition of `[0, transcript.total_duration())`.
#[tracing::instrument(
    skip_all,
    fields(intervals = intervals.len(), words = transcript.words().len())
)]
pub fn build_partition(
    transcript: &Transcript,
    intervals: &[Interval],
    cfg: &EngineConfig,
) -> AlgebraOutput {
    let total = transcript.total_duration();
    let mut diagnostics = Vec::new();
    let mut candidates = Vec::with_capacity(intervals.len());

    for iv in intervals {
        if !iv.start.is_finite() || !iv.end.is_finite() || iv.start >= iv.end {
            let d = Diagnostic::DegenerateInterval {
                interval: iv.clone(),
            };
            d.log();
            diagnostics.push(d);
            continue;
        }
        if iv.start < -TIME_EPS || iv.end > total + TIME_EPS {
            let d = Diagnostic::OutOfRangeInterval {
                interval: iv.clone(),
                total_duration: total,
            };
            d.log();
            diagnostics.push(d);
            continue;
        }
        if !iv.is_cut_candidate() {
            continue;
        }
        match snap_range(transcript, iv.span(), cfg.snap_policy) {
            Some(range) => candidates.push(Candidate {
                range,
                origin: CutOrigin::of(iv.kind),
            }),
            None => tracing::debug!(span = %iv.span(), "cut candidate vanished after snapping"),
        }
    }

    let merged = merge_candidates(candidates);
    let merged_len = merged.len();
    let cuts: Vec<Candidate> = merged
        .into_iter()
        .filter(|c| c.origin.filler || c.range.len_secs() + TIME_EPS >= cfg.min_silence_duration)
        .collect();
    tracing::debug!(
        merged = merged_len,
        kept = cuts.len(),
        "filtered cut candidates by minimum duration"
    );

    AlgebraOutput {
        partition: Partition::from_entries(fill_partition(&cuts, total), total),
        diagnostics,
    }
}

/// Snap both ends of a cut candidate to word boundaries. `None` when nothing is left.
pub fn snap_range(
    transcript: &Transcript,
    range: TimeRange,
    policy: SnapPolicy,
) -> Option<TimeRange> {
    let start = snap_boundary(transcript, range.start, Side::Start, policy);
    let end = snap_boundary(transcript, range.end, Side::End, policy);
    debug_assert!(transcript.is_word_boundary(start) && transcript.is_word_boundary(end));
    if end - start <= TIME_EPS {
        return None;
    }
    Some(TimeRange { start, end })
}

fn snap_boundary(transcript: &Transcript, at: f64, side: Side, policy: SnapPolicy) -> f64 {
    let words = transcript.words();
    let idx = words.partition_point(|w| w.end < at - TIME_EPS);
    if let Some(w) = words.get(idx) {
        // Near-coincident edges collapse onto the word edge.
        if same_instant(w.start, at) {
            return w.start;
        }
        if same_instant(w.end, at) {
            return w.end;
        }
    }

    let Some(w) = transcript.word_containing_strict(at) else {
        return at;
    };
    match (policy, side) {
        (SnapPolicy::ExtendStartShrinkEnd, _) => w.start,
        (SnapPolicy::PreserveWords, Side::Start) => w.end,
        (SnapPolicy::PreserveWords, Side::End) => w.start,
        (SnapPolicy::CoverWords, Side::Start) => w.start,
        (SnapPolicy::CoverWords, Side::End) => w.end,
    }
}

fn merge_candidates(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        a.range
            .start
            .total_cmp(&b.range.start)
            .then(a.range.end.total_cmp(&b.range.end))
    });

    let mut out: Vec<Candidate> = Vec::with_capacity(candidates.len());
    for c in candidates {
        if let Some(last) = out.last_mut()
            && last.range.touches(c.range)
        {
            last.range = last.range.hull(c.range);
            last.origin = last.origin.union(c.origin);
            continue;
        }
        out.push(c);
    }
    out
}

fn fill_partition(cuts: &[Candidate], total: f64) -> Vec<PartitionEntry> {
    let mut entries = Vec::with_capacity(cuts.len() * 2 + 1);
    let mut cursor = 0.0f64;

    for c in cuts {
        let start = if c.range.start - cursor > TIME_EPS {
            c.range.start
        } else {
            cursor
        };
        let end = if total - c.range.end <= TIME_EPS {
            total
        } else {
            c.range.end
        };
        let range = TimeRange { start, end };
        // Clamping onto the cursor or the media end can leave nothing to cut.
        if range.is_empty() {
            tracing::debug!(span = %c.range, "cut collapsed after clamping");
            continue;
        }
        if start > cursor {
            entries.push(PartitionEntry {
                range: TimeRange {
                    start: cursor,
                    end: start,
                },
                kind: PartitionKind::Speech,
            });
        }
        entries.push(PartitionEntry {
            range,
            kind: PartitionKind::Cut { origin: c.origin },
        });
        cursor = end;
    }

    if total - cursor > TIME_EPS {
        entries.push(PartitionEntry {
            range: TimeRange {
                start: cursor,
                end: total,
            },
            kind: PartitionKind::Speech,
        });
    }
    entries
}

#[cfg(test)]
#[path = "../tests/unit/algebra.rs"]
mod tests;
