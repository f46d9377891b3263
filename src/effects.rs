use crate::detect::face::FaceTrack;
use crate::foundation::core::{MediaRef, Point};
use crate::foundation::error::{CutplanError, CutplanResult};
use crate::timeline::{SegmentAction, Timeline};

/// Direction for slide transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideDirection {
    /// Outgoing footage leaves to the left.
    Left,
    /// Outgoing footage leaves to the right.
    Right,
    /// Outgoing footage leaves upwards.
    Up,
    /// Outgoing footage leaves downwards.
    Down,
}

/// Visual treatment of a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Crossfade between neighbours.
    Fade,
    /// Fade out to black, then in.
    DipToBlack,
    /// Zoom out of the outgoing footage, into the incoming one.
    Zoom,
    /// Push the outgoing footage off screen.
    Slide {
        /// Exit direction of the outgoing footage.
        direction: SlideDirection,
    },
}

impl TransitionKind {
    /// Parse a loose transition name as used in project files and CLI flags.
    pub fn parse(name: &str) -> CutplanResult<Self> {
        let kind = name.trim().to_ascii_lowercase();
        if kind.is_empty() {
            return Err(CutplanError::validation("transition kind must be non-empty"));
        }

        match kind.as_str() {
            "fade" | "crossfade" => Ok(Self::Fade),
            "dip_to_black" | "diptoblack" | "dip" => Ok(Self::DipToBlack),
            "zoom" => Ok(Self::Zoom),
            "slide" | "slide_right" => Ok(Self::Slide {
                direction: SlideDirection::Right,
            }),
            "slide_left" => Ok(Self::Slide {
                direction: SlideDirection::Left,
            }),
            "slide_up" => Ok(Self::Slide {
                direction: SlideDirection::Up,
            }),
            "slide_down" => Ok(Self::Slide {
                direction: SlideDirection::Down,
            }),
            other => Err(CutplanError::validation(format!(
                "unknown transition kind '{other}'"
            ))),
        }
    }
}

/// Punch-in zoom starting at `at`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ZoomRequest {
    /// Anchor in original time.
    pub at: f64,
    /// Scale factor; the configured default applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factor: Option<f64>,
    /// Zoom centre in frame pixels; the nearest face sample applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Point>,
    /// How long the zoom holds; defaults to the rest of the enclosing segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// Transition inserted at `at`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitionRequest {
    /// Anchor in original time.
    pub at: f64,
    /// Visual treatment.
    pub kind: TransitionKind,
    /// Output seconds the transition occupies.
    pub duration: f64,
}

/// External footage inserted at `at`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BrollRequest {
    /// Anchor in original time.
    pub at: f64,
    /// Output seconds of inserted footage.
    pub duration: f64,
    /// Handle of the footage to insert.
    pub media_ref: MediaRef,
}

/// An effect anchored at one instant of the original time axis.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectRequest {
    /// Punch-in zoom.
    Zoom(ZoomRequest),
    /// Transition between the two halves of a split segment.
    Transition(TransitionRequest),
    /// B-roll insertion.
    Broll(BrollRequest),
}

/// Placement class used by the tie-break at a shared split point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EffectClass {
    /// Zoom and transition: decorate the cut they sit on.
    BoundaryLocal,
    /// B-roll: adds footage.
    Additive,
}

impl EffectRequest {
    /// Anchor in original time.
    pub fn at(&self) -> f64 {
        match self {
            Self::Zoom(z) => z.at,
            Self::Transition(t) => t.at,
            Self::Broll(b) => b.at,
        }
    }

    /// Tie-break class.
    pub fn class(&self) -> EffectClass {
        match self {
            Self::Zoom(_) | Self::Transition(_) => EffectClass::BoundaryLocal,
            Self::Broll(_) => EffectClass::Additive,
        }
    }

    /// Duration as requested, before defaults are applied.
    pub fn requested_duration(&self) -> Option<f64> {
        match self {
            Self::Zoom(z) => z.duration,
            Self::Transition(t) => Some(t.duration),
            Self::Broll(b) => Some(b.duration),
        }
    }

    /// Short lowercase name for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Zoom(_) => "zoom",
            Self::Transition(_) => "transition",
            Self::Broll(_) => "broll",
        }
    }

    /// Reject requests whose numbers cannot be placed. Returns the reason on failure.
    pub(crate) fn check(&self) -> Result<(), String> {
        if !self.at().is_finite() {
            return Err("anchor time must be finite".to_owned());
        }
        if let Some(d) = self.requested_duration()
            && (!d.is_finite() || d <= 0.0)
        {
            return Err(format!("duration must be finite and > 0, got {d}"));
        }
        if let Self::Zoom(z) = self {
            if let Some(f) = z.factor
                && (!f.is_finite() || f <= 0.0)
            {
                return Err(format!("zoom factor must be finite and > 0, got {f}"));
            }
            if let Some(p) = z.anchor
                && (!p.x.is_finite() || !p.y.is_finite())
            {
                return Err("zoom anchor must be finite".to_owned());
            }
        }
        Ok(())
    }
}

/// Punch-in zoom requests for every KEEP that directly follows a CUT.
///
/// The zoom lands exactly on the jump cut, so the viewer sees a reframe instead of a stutter.
pub fn jump_cut_zooms(base: &Timeline, factor: f64) -> Vec<EffectRequest> {
    let mut out = Vec::new();
    let mut after_cut = false;
    for seg in base.segments() {
        match &seg.action {
            SegmentAction::Cut(_) => after_cut = true,
            SegmentAction::Keep => {
                if after_cut && let Some(range) = seg.original_range {
                    out.push(EffectRequest::Zoom(ZoomRequest {
                        at: range.start,
                        factor: Some(factor),
                        anchor: None,
                        duration: None,
                    }));
                }
                after_cut = false;
            }
            _ => after_cut = false,
        }
    }
    out
}

/// Fill missing zoom anchors from the nearest face sample within `window` seconds.
pub fn anchor_zooms_on_faces(
    requests: Vec<EffectRequest>,
    faces: &FaceTrack,
    window: f64,
) -> Vec<EffectRequest> {
    if faces.is_empty() {
        return requests;
    }
    requests
        .into_iter()
        .map(|req| match req {
            EffectRequest::Zoom(mut z) if z.anchor.is_none() => {
                z.anchor = faces.nearest_face(z.at, window).map(|s| s.center);
                EffectRequest::Zoom(z)
            }
            other => other,
        })
        .collect()
}
