use crate::effects::TransitionKind;
use crate::foundation::core::{MediaRef, Point, TIME_EPS, TimeRange, same_instant};
use crate::interval::CutOrigin;

/// Zoom applied to the footage that follows the splice point.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ZoomEffect {
    /// Splice point in original time.
    pub at: f64,
    /// Scale factor.
    pub factor: f64,
    /// Zoom centre in frame pixels; frame centre when unset.
    pub anchor: Option<Point>,
    /// Output seconds the zoom holds over the following footage.
    pub span: f64,
}

/// Transition occupying inserted output time between two kept halves.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitionEffect {
    /// Splice point in original time.
    pub at: f64,
    /// Visual treatment.
    pub kind: TransitionKind,
    /// Output seconds.
    pub duration: f64,
}

/// External footage inserted between two kept halves.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BrollInsert {
    /// Splice point in original time.
    pub at: f64,
    /// Output seconds.
    pub duration: f64,
    /// Footage handle.
    pub media_ref: MediaRef,
}

/// Render instruction carried by a [`Segment`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentAction {
    /// Play the original range.
    Keep,
    /// Skip the original range.
    Cut(CutOrigin),
    /// Zoom marker; contributes no output time itself.
    Zoom(ZoomEffect),
    /// Inserted transition.
    Transition(TransitionEffect),
    /// Inserted B-roll.
    InsertBroll(BrollInsert),
}

/// One render instruction.
///
/// `original_range` is the consumed source span for KEEP and CUT, a zero-length range at the
/// splice point for ZOOM and TRANSITION, and `None` for INSERT_BROLL.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    /// 0-based position in output order.
    pub output_order: usize,
    /// Span of source media.
    pub original_range: Option<TimeRange>,
    /// Span of the rendered output.
    pub output_range: TimeRange,
    /// Instruction and its payload.
    #[serde(flatten)]
    pub action: SegmentAction,
}

impl Segment {
    /// Output seconds this segment's action contributes.
    pub fn output_duration(&self) -> f64 {
        match &self.action {
            SegmentAction::Keep => self.original_range.map_or(0.0, TimeRange::len_secs),
            SegmentAction::Cut(_) | SegmentAction::Zoom(_) => 0.0,
            SegmentAction::Transition(t) => t.duration,
            SegmentAction::InsertBroll(b) => b.duration,
        }
    }

    /// Uppercase action name as used in render instructions.
    pub fn action_name(&self) -> &'static str {
        match &self.action {
            SegmentAction::Keep => "KEEP",
            SegmentAction::Cut(_) => "CUT",
            SegmentAction::Zoom(_) => "ZOOM",
            SegmentAction::Transition(_) => "TRANSITION",
            SegmentAction::InsertBroll(_) => "INSERT_BROLL",
        }
    }

    /// Return `true` for KEEP segments.
    pub fn is_keep(&self) -> bool {
        matches!(self.action, SegmentAction::Keep)
    }

    /// Return `true` for CUT segments.
    pub fn is_cut(&self) -> bool {
        matches!(self.action, SegmentAction::Cut(_))
    }
}

/// Ordered render instructions for one editing run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    segments: Vec<Segment>,
    total_duration: f64,
}

impl Timeline {
    /// Wrap segments as given, without renumbering.
    ///
    /// Used for timelines produced outside the engine; they still have to pass validation.
    pub fn from_segments(segments: Vec<Segment>, total_duration: f64) -> Self {
        Self {
            segments,
            total_duration,
        }
    }

    /// Assign `output_order` and `output_range` from sequence position and action durations.
    pub(crate) fn renumbered(mut segments: Vec<Segment>, total_duration: f64) -> Self {
        let mut cursor = 0.0f64;
        for (order, seg) in segments.iter_mut().enumerate() {
            let d = seg.output_duration();
            seg.output_order = order;
            seg.output_range = TimeRange {
                start: cursor,
                end: cursor + d,
            };
            cursor += d;
        }
        Self {
            segments,
            total_duration,
        }
    }

    /// Segments in output order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Source media duration.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Rendered duration.
    pub fn output_duration(&self) -> f64 {
        self.segments
            .iter()
            .map(|s| s.output_range.end)
            .fold(0.0, f64::max)
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Return `true` when the timeline holds no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Position of the KEEP or CUT segment whose original range contains `t`.
    pub fn source_segment_at(&self, t: f64) -> Option<usize> {
        let sources = self.source_positions();
        let i = sources.partition_point(|&p| {
            self.segments[p]
                .original_range
                .is_some_and(|r| r.end <= t)
        });
        let &p = sources.get(i)?;
        self.segments[p]
            .original_range
            .filter(|r| r.contains(t))
            .map(|_| p)
    }

    /// Position of the KEEP segment whose original range ends at `t`.
    pub(crate) fn keep_ending_at(&self, t: f64) -> Option<usize> {
        let sources = self.source_positions();
        let i = sources.partition_point(|&p| {
            self.segments[p]
                .original_range
                .is_some_and(|r| r.end < t - TIME_EPS)
        });
        let &p = sources.get(i)?;
        let seg = &self.segments[p];
        let ends_at = seg
            .original_range
            .is_some_and(|r| same_instant(r.end, t));
        (seg.is_keep() && ends_at).then_some(p)
    }

    /// Map an original-time instant onto the output axis.
    ///
    /// Instants inside a KEEP map linearly; instants inside a CUT collapse onto the cut point.
    pub fn map_to_output(&self, t: f64) -> Option<f64> {
        let p = self.source_segment_at(t)?;
        let seg = &self.segments[p];
        let range = seg.original_range?;
        if seg.is_keep() {
            Some(seg.output_range.start + (t - range.start))
        } else {
            Some(seg.output_range.start)
        }
    }

    /// Positions of KEEP and CUT segments, which are ordered by original time.
    fn source_positions(&self) -> Vec<usize> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_keep() || s.is_cut())
            .map(|(i, _)| i)
            .collect()
    }
}
