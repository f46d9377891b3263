use crate::detect::{Detection, FeatureDetector};
use crate::foundation::core::{MediaRef, TIME_EPS};
use crate::interval::Interval;
use crate::transcript::Transcript;

/// Reports silence wherever consecutive words are at least `min_gap` seconds apart.
///
/// Leading silence before the first word and trailing silence after the last are included. An
/// empty transcript yields nothing, since the absence of words says nothing about the audio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WordGapSilenceDetector {
    /// Smallest gap reported, in seconds.
    pub min_gap: f64,
}

impl Default for WordGapSilenceDetector {
    fn default() -> Self {
        Self { min_gap: 0.5 }
    }
}

impl WordGapSilenceDetector {
    /// Detector reporting gaps of at least `min_gap` seconds.
    pub fn new(min_gap: f64) -> Self {
        Self { min_gap }
    }

    /// Silence intervals of `transcript`, in time order.
    pub fn gaps(&self, transcript: &Transcript) -> Vec<Interval> {
        let words = transcript.words();
        let (Some(first), Some(last)) = (words.first(), words.last()) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        let mut push = |start: f64, end: f64| {
            if end - start + TIME_EPS >= self.min_gap && end - start > TIME_EPS {
                out.push(Interval::silence(start, end));
            }
        };
        push(0.0, first.start);
        for pair in words.windows(2) {
            push(pair[0].end, pair[1].start);
        }
        push(last.end, transcript.total_duration());
        out
    }
}

impl FeatureDetector for WordGapSilenceDetector {
    fn name(&self) -> &str {
        "word_gap_silence"
    }

    fn detect(&self, transcript: &Transcript, _media: &MediaRef) -> anyhow::Result<Detection> {
        anyhow::ensure!(
            self.min_gap.is_finite() && self.min_gap >= 0.0,
            "min_gap must be finite and >= 0, got {}",
            self.min_gap
        );
        Ok(Detection::Intervals(self.gaps(transcript)))
    }
}
