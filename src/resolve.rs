//! Effect placement: splices zoom, transition and B-roll requests into a base timeline.

use std::cmp::Ordering;

use crate::config::{EffectTieBreak, EngineConfig};
use crate::diagnostic::Diagnostic;
use crate::effects::EffectRequest;
use crate::foundation::core::{TIME_EPS, TimeRange, same_instant};
use crate::timeline::{
    BrollInsert, Segment, SegmentAction, Timeline, TransitionEffect, ZoomEffect,
};

/// Timeline with effects spliced in, plus the requests that could not be placed.
#[derive(Clone, Debug)]
pub struct Placement {
    /// New timeline; the base is left untouched.
    pub timeline: Timeline,
    /// Dropped requests.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of requests spliced in.
    pub applied: usize,
}

/// Where a resolved request lands relative to its host KEEP.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Anchor {
    /// At or after the KEEP start, before its end.
    Within,
    /// At the KEEP end, where a cut begins.
    KeepEnd,
}

#[derive(Clone, Debug)]
struct Resolved<'a> {
    index: usize,
    request: &'a EffectRequest,
    anchor: Anchor,
    /// Original-time end of the KEEP enclosing the anchor in the base timeline.
    host_end: f64,
}

impl Resolved<'_> {
    fn at(&self) -> f64 {
        self.request.at()
    }

    /// Requested duration with the zoom default applied.
    fn effective_duration(&self) -> f64 {
        match self.request {
            EffectRequest::Zoom(z) => zoom_span(z.duration, self.at(), self.host_end),
            other => other.requested_duration().unwrap_or(0.0),
        }
    }
}

/// Splice every placeable request into `base`.
///
/// Requests anchored inside a CUT or outside the media are dropped with a diagnostic. Requests
/// sharing a split point are ordered by `cfg.effect_tie_break`.
#[tracing::instrument(skip_all, fields(requests = requests.len(), segments = base.len()))]
pub fn place_effects(base: &Timeline, requests: &[EffectRequest], cfg: &EngineConfig) -> Placement {
    let total = base.total_duration();
    let mut diagnostics = Vec::new();
    let mut resolved = Vec::with_capacity(requests.len());

    for (index, request) in requests.iter().enumerate() {
        if let Err(reason) = request.check() {
            push_diag(
                &mut diagnostics,
                Diagnostic::InvalidRequest {
                    request: request.clone(),
                    reason,
                },
            );
            continue;
        }

        let at = request.at();
        let host = base
            .source_segment_at(at)
            .map(|p| &base.segments()[p])
            .filter(|_| (0.0..total).contains(&at));
        let Some(host) = host else {
            push_diag(
                &mut diagnostics,
                Diagnostic::AnchorOutOfRange {
                    request: request.clone(),
                    total_duration: total,
                },
            );
            continue;
        };
        let Some(range) = host.original_range else {
            continue;
        };
        if host.is_cut() {
            // Transitions and B-roll at the instant a cut begins close the KEEP before it.
            let closes_keep = !matches!(request, EffectRequest::Zoom(_))
                && same_instant(at, range.start)
                && base.keep_ending_at(at).is_some();
            if closes_keep {
                resolved.push(Resolved {
                    index,
                    request,
                    anchor: Anchor::KeepEnd,
                    host_end: at,
                });
                continue;
            }
            push_diag(
                &mut diagnostics,
                Diagnostic::AnchorInCutRegion {
                    request: request.clone(),
                    cut: range,
                },
            );
            continue;
        }
        resolved.push(Resolved {
            index,
            request,
            anchor: Anchor::Within,
            host_end: range.end,
        });
    }

    match cfg.effect_tie_break {
        EffectTieBreak::BoundaryEffectsFirst => resolved.sort_by(boundary_effects_first),
        EffectTieBreak::SubmissionOrder => resolved.sort_by(|a, b| {
            a.at().total_cmp(&b.at()).then(a.index.cmp(&b.index))
        }),
    }

    let mut timeline = base.clone();
    let mut applied = 0usize;
    for r in &resolved {
        tracing::debug!(
            kind = r.request.kind_name(),
            at = r.at(),
            base_output_at = ?base.map_to_output(r.at()),
            "splicing effect"
        );
        let effect = effect_segment(r, cfg);
        timeline = splice(&timeline, r.at(), r.anchor, effect);
        applied += 1;
    }

    tracing::debug!(
        applied,
        dropped = diagnostics.len(),
        segments = timeline.len(),
        "placed effects"
    );
    Placement {
        timeline,
        diagnostics,
        applied,
    }
}

fn push_diag(out: &mut Vec<Diagnostic>, d: Diagnostic) {
    d.log();
    out.push(d);
}

fn boundary_effects_first(a: &Resolved<'_>, b: &Resolved<'_>) -> Ordering {
    a.at()
        .total_cmp(&b.at())
        .then(a.request.class().cmp(&b.request.class()))
        .then(a.effective_duration().total_cmp(&b.effective_duration()))
        .then(a.index.cmp(&b.index))
}

fn zoom_span(requested: Option<f64>, at: f64, host_end: f64) -> f64 {
    let remainder = (host_end - at).max(0.0);
    requested.map_or(remainder, |d| d.min(remainder))
}

fn effect_segment(r: &Resolved<'_>, cfg: &EngineConfig) -> Segment {
    let at = r.at();
    let (original_range, action) = match r.request {
        EffectRequest::Zoom(z) => (
            Some(TimeRange::point(at)),
            SegmentAction::Zoom(ZoomEffect {
                at,
                factor: z.factor.unwrap_or(cfg.zoom_factor_default),
                anchor: z.anchor,
                span: zoom_span(z.duration, at, r.host_end),
            }),
        ),
        EffectRequest::Transition(t) => (
            Some(TimeRange::point(at)),
            SegmentAction::Transition(TransitionEffect {
                at,
                kind: t.kind,
                duration: t.duration,
            }),
        ),
        EffectRequest::Broll(b) => (
            None,
            SegmentAction::InsertBroll(BrollInsert {
                at,
                duration: b.duration,
                media_ref: b.media_ref.clone(),
            }),
        ),
    };
    Segment {
        output_order: 0,
        original_range,
        output_range: TimeRange::point(0.0),
        action,
    }
}

/// Insert `effect` at original time `at`, splitting the enclosing KEEP when `at` is interior.
/// [`Anchor::KeepEnd`] effects go right after the KEEP that ends at `at`.
///
/// Effects already spliced at the same instant stay in front of the new one.
fn splice(timeline: &Timeline, at: f64, anchor: Anchor, effect: Segment) -> Timeline {
    let mut segments = timeline.segments().to_vec();
    if anchor == Anchor::KeepEnd {
        let Some(keep) = timeline.keep_ending_at(at) else {
            return timeline.clone();
        };
        let earlier = segments[keep + 1..]
            .iter()
            .take_while(|s| !(s.is_keep() || s.is_cut()))
            .count();
        segments.insert(keep + 1 + earlier, effect);
        return Timeline::renumbered(segments, timeline.total_duration());
    }
    let Some(host) = timeline.source_segment_at(at) else {
        return timeline.clone();
    };
    let Some(range) = segments[host].original_range else {
        return timeline.clone();
    };

    if at - range.start > TIME_EPS {
        let left = Segment {
            original_range: Some(TimeRange {
                start: range.start,
                end: at,
            }),
            ..segments[host].clone()
        };
        let right = Segment {
            original_range: Some(TimeRange {
                start: at,
                end: range.end,
            }),
            ..segments[host].clone()
        };
        segments.splice(host..=host, [left, effect, right]);
    } else {
        segments.insert(host, effect);
    }

    Timeline::renumbered(segments, timeline.total_duration())
}

#[cfg(test)]
#[path = "../tests/unit/resolve.rs"]
mod tests;
