use xxhash_rust::xxh3::Xxh3;

use crate::effects::{SlideDirection, TransitionKind};
use crate::foundation::core::{Point, TimeRange};
use crate::timeline::{SegmentAction, Timeline};

const XXH3_SEED: u64 = 0x5c0f_7e1d_a2b4_9c03;

/// Content hash of source audio; the transcript cache key.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct AudioFingerprint {
    /// High 64 bits of the xxh3-128 digest.
    pub hi: u64,
    /// Low 64 bits of the xxh3-128 digest.
    pub lo: u64,
}

impl AudioFingerprint {
    /// Fingerprint raw audio bytes.
    pub fn of(audio: &[u8]) -> Self {
        let mut h = StableHasher::new();
        h.write_u64(audio.len() as u64);
        h.write_bytes(audio);
        let (hi, lo) = h.finish();
        Self { hi, lo }
    }
}

impl std::fmt::Display for AudioFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Stable hash over every field of a timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimelineFingerprint {
    /// High 64 bits of the digest.
    pub hi: u64,
    /// Low 64 bits of the digest.
    pub lo: u64,
}

/// Compute a fingerprint covering every segment field and the total duration.
///
/// Equal fingerprints mean byte-identical timelines for all practical purposes; used to check that
/// repeated runs on the same inputs agree.
pub fn fingerprint_timeline(timeline: &Timeline) -> TimelineFingerprint {
    let mut h = StableHasher::new();
    h.write_f64(timeline.total_duration());
    h.write_u64(timeline.len() as u64);
    for seg in timeline.segments() {
        h.write_u64(seg.output_order as u64);
        h.write_opt_range(seg.original_range);
        h.write_range(seg.output_range);
        write_action(&mut h, &seg.action);
    }
    let (hi, lo) = h.finish();
    TimelineFingerprint { hi, lo }
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    fn write_range(&mut self, r: TimeRange) {
        self.write_f64(r.start);
        self.write_f64(r.end);
    }

    fn write_opt_range(&mut self, r: Option<TimeRange>) {
        match r {
            Some(r) => {
                self.write_u8(1);
                self.write_range(r);
            }
            None => self.write_u8(0),
        }
    }

    fn write_opt_point(&mut self, p: Option<Point>) {
        match p {
            Some(p) => {
                self.write_u8(1);
                self.write_f64(p.x);
                self.write_f64(p.y);
            }
            None => self.write_u8(0),
        }
    }

    fn finish(self) -> (u64, u64) {
        let v = self.inner.digest128();
        ((v >> 64) as u64, v as u64)
    }
}

fn write_action(h: &mut StableHasher, action: &SegmentAction) {
    match action {
        SegmentAction::Keep => h.write_u8(0),
        SegmentAction::Cut(origin) => {
            h.write_u8(1);
            h.write_bool(origin.silence);
            h.write_bool(origin.filler);
        }
        SegmentAction::Zoom(z) => {
            h.write_u8(2);
            h.write_f64(z.at);
            h.write_f64(z.factor);
            h.write_opt_point(z.anchor);
            h.write_f64(z.span);
        }
        SegmentAction::Transition(t) => {
            h.write_u8(3);
            h.write_f64(t.at);
            write_transition_kind(h, t.kind);
            h.write_f64(t.duration);
        }
        SegmentAction::InsertBroll(b) => {
            h.write_u8(4);
            h.write_f64(b.at);
            h.write_f64(b.duration);
            h.write_str(b.media_ref.as_str());
        }
    }
}

fn write_transition_kind(h: &mut StableHasher, kind: TransitionKind) {
    match kind {
        TransitionKind::Fade => h.write_u8(0),
        TransitionKind::DipToBlack => h.write_u8(1),
        TransitionKind::Zoom => h.write_u8(2),
        TransitionKind::Slide { direction } => {
            h.write_u8(3);
            h.write_u8(match direction {
                SlideDirection::Left => 0,
                SlideDirection::Right => 1,
                SlideDirection::Up => 2,
                SlideDirection::Down => 3,
            });
        }
    }
}
