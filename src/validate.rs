//! Final timeline checks. A timeline that passes becomes a [`ValidatedTimeline`], the only form
//! renderers accept.

use std::collections::BTreeSet;

use crate::foundation::core::{MediaRef, TIME_EPS, TimeRange};
use crate::foundation::error::{CutplanError, CutplanResult, TimelineViolation};
use crate::timeline::{Segment, SegmentAction, Timeline};

/// Output positions are cumulative sums, so they get a looser tolerance than single timestamps.
const OUTPUT_EPS: f64 = 1e3 * TIME_EPS;

/// Answers whether a B-roll handle points at usable footage.
pub trait MediaResolver {
    /// Return `true` when `media` can be fetched by the renderer.
    fn resolves(&self, media: &MediaRef) -> bool;
}

/// Fixed set of known media handles.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct KnownMedia(BTreeSet<MediaRef>);

impl KnownMedia {
    /// Empty set; every B-roll reference dangles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handle.
    pub fn insert(&mut self, media: MediaRef) -> bool {
        self.0.insert(media)
    }

    /// Number of known handles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` when no handle is known.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<MediaRef> for KnownMedia {
    fn from_iter<I: IntoIterator<Item = MediaRef>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl MediaResolver for KnownMedia {
    fn resolves(&self, media: &MediaRef) -> bool {
        self.0.contains(media)
    }
}

/// A timeline that passed every check in [`validate_timeline`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct ValidatedTimeline(Timeline);

impl ValidatedTimeline {
    /// Borrow the checked timeline.
    pub fn timeline(&self) -> &Timeline {
        &self.0
    }

    /// Segments in output order.
    pub fn segments(&self) -> &[Segment] {
        self.0.segments()
    }

    /// Give up the validation marker.
    pub fn into_inner(self) -> Timeline {
        self.0
    }
}

/// Check every timeline invariant and stop at the first violation.
///
/// The checks run in a fixed order: output ordering, per-segment output length, output
/// contiguity, the KEEP/CUT cover of original time, then B-roll references.
#[tracing::instrument(skip_all, fields(segments = timeline.len()))]
pub fn validate_timeline(
    timeline: Timeline,
    media: &dyn MediaResolver,
) -> CutplanResult<ValidatedTimeline> {
    let segments = timeline.segments();
    check_order(segments)?;
    check_output_durations(segments)?;
    check_output_axis(segments)?;
    check_partition(segments, timeline.total_duration())?;
    check_broll(segments, media)?;

    tracing::debug!(
        output_secs = timeline.output_duration(),
        "timeline validated"
    );
    Ok(ValidatedTimeline(timeline))
}

fn fail(v: TimelineViolation) -> CutplanError {
    tracing::error!(kind = v.kind(), "{v}");
    CutplanError::Invariant(v)
}

fn check_order(segments: &[Segment]) -> CutplanResult<()> {
    for (position, seg) in segments.iter().enumerate() {
        if seg.output_order != position {
            return Err(fail(TimelineViolation::NonContiguousOrder {
                position,
                found: seg.output_order,
                range: seg.original_range,
            }));
        }
    }
    Ok(())
}

fn check_output_durations(segments: &[Segment]) -> CutplanResult<()> {
    for seg in segments {
        let found = seg.output_range.end - seg.output_range.start;
        let expected = seg.output_duration();
        if !found.is_finite() || !expected.is_finite() || (found - expected).abs() > OUTPUT_EPS {
            return Err(fail(TimelineViolation::OutputDurationMismatch {
                order: seg.output_order,
                expected,
                found,
                range: seg.original_range,
            }));
        }
    }
    Ok(())
}

fn check_output_axis(segments: &[Segment]) -> CutplanResult<()> {
    let mut cursor = 0.0f64;
    let mut last_contributor: Option<&Segment> = None;

    for seg in segments {
        let start = seg.output_range.start;
        if start < cursor - OUTPUT_EPS {
            let first = last_contributor.map_or(seg.output_order, |s| s.output_order);
            return Err(fail(TimelineViolation::OverlappingOutput {
                first,
                second: seg.output_order,
                output: TimeRange {
                    start,
                    end: cursor.min(seg.output_range.end.max(start)),
                },
                range: seg.original_range,
            }));
        }
        if !start.is_finite() || !seg.output_range.end.is_finite() || start > cursor + OUTPUT_EPS {
            return Err(fail(TimelineViolation::OutputGap {
                order: seg.output_order,
                expected_start: cursor,
                found_start: start,
                range: seg.original_range,
            }));
        }
        if seg.output_duration() > 0.0 {
            last_contributor = Some(seg);
        }
        cursor = seg.output_range.end;
    }
    Ok(())
}

fn check_partition(segments: &[Segment], total: f64) -> CutplanResult<()> {
    let mut cursor = 0.0f64;
    for seg in segments.iter().filter(|s| s.is_keep() || s.is_cut()) {
        let Some(range) = seg.original_range else {
            return Err(fail(TimelineViolation::IncompletePartition {
                range: TimeRange::point(cursor),
            }));
        };
        if !range.start.is_finite()
            || !range.end.is_finite()
            || (range.start - cursor).abs() > OUTPUT_EPS
            || range.end < range.start
        {
            return Err(fail(TimelineViolation::IncompletePartition {
                range: TimeRange {
                    start: cursor.min(range.start),
                    end: cursor.max(range.start).max(range.end),
                },
            }));
        }
        cursor = range.end;
    }
    if !total.is_finite() || (total - cursor).abs() > OUTPUT_EPS {
        return Err(fail(TimelineViolation::IncompletePartition {
            range: TimeRange {
                start: cursor.min(total),
                end: cursor.max(total),
            },
        }));
    }
    Ok(())
}

fn check_broll(segments: &[Segment], media: &dyn MediaResolver) -> CutplanResult<()> {
    for seg in segments {
        if let SegmentAction::InsertBroll(b) = &seg.action
            && !media.resolves(&b.media_ref)
        {
            return Err(fail(TimelineViolation::DanglingBrollReference {
                order: seg.output_order,
                media_ref: b.media_ref.clone(),
                at: b.at,
            }));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/validate.rs"]
mod tests;
