use crate::detect::{Detection, FeatureDetector};
use crate::foundation::core::MediaRef;
use crate::interval::Interval;
use crate::transcript::{Transcript, Word};

/// Filler words removed by default.
pub const DEFAULT_FILLERS: &[&str] = &["um", "uh", "ah", "er", "like", "you know", "so", "well"];

/// Flags words, or runs of words, matching a filler pattern.
///
/// Matching ignores case and trailing punctuation. Multi-word patterns such as "you know" match
/// consecutive words and produce one interval spanning them.
#[derive(Clone, Debug, PartialEq)]
pub struct FillerWordDetector {
    patterns: Vec<Vec<String>>,
}

impl Default for FillerWordDetector {
    fn default() -> Self {
        Self::new(DEFAULT_FILLERS.iter().copied())
    }
}

impl FillerWordDetector {
    /// Detector for the given patterns. Empty patterns are ignored.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut patterns: Vec<Vec<String>> = patterns
            .into_iter()
            .map(|p| p.as_ref().split_whitespace().map(normalize).collect::<Vec<_>>())
            .filter(|p: &Vec<String>| !p.is_empty() && p.iter().all(|w| !w.is_empty()))
            .collect();
        // Longest first so "you know" wins over a single-word "you".
        patterns.sort_by(|a, b| b.len().cmp(&a.len()));
        Self { patterns }
    }

    /// Filler intervals of `transcript`, in time order.
    pub fn fillers(&self, transcript: &Transcript) -> Vec<Interval> {
        let words = transcript.words();
        let normalized: Vec<String> = words.iter().map(|w| normalize(&w.text)).collect();

        let mut out = Vec::new();
        let mut i = 0usize;
        while i < words.len() {
            match self.match_len(&normalized[i..]) {
                Some(n) => {
                    out.push(span_of(&words[i..i + n]));
                    i += n;
                }
                None => i += 1,
            }
        }
        out
    }

    fn match_len(&self, rest: &[String]) -> Option<usize> {
        self.patterns
            .iter()
            .find(|p| rest.len() >= p.len() && rest.iter().zip(p.iter()).all(|(w, p)| w == p))
            .map(Vec::len)
    }
}

fn normalize(word: &str) -> String {
    word.trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .to_lowercase()
}

fn span_of(run: &[Word]) -> Interval {
    let start = run.first().map_or(0.0, |w| w.start);
    let end = run.last().map_or(start, |w| w.end);
    let confidence = run
        .iter()
        .map(|w| w.confidence)
        .fold(1.0f64, f64::min);
    Interval::filler(start, end).with_confidence(confidence)
}

impl FeatureDetector for FillerWordDetector {
    fn name(&self) -> &str {
        "filler_words"
    }

    fn detect(&self, transcript: &Transcript, _media: &MediaRef) -> anyhow::Result<Detection> {
        Ok(Detection::Intervals(self.fillers(transcript)))
    }
}
