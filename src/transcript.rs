use crate::foundation::core::{TIME_EPS, TimeRange};
use crate::foundation::error::{CutplanError, CutplanResult};

/// One recognized word with timing in original-time seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Word {
    /// Recognized text, as emitted by the recognizer.
    #[serde(alias = "word")]
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds, exclusive.
    pub end: f64,
    /// Recognizer confidence in `[0, 1]`.
    #[serde(default = "full_confidence", alias = "probability")]
    pub confidence: f64,
}

fn full_confidence() -> f64 {
    1.0
}

impl Word {
    /// Word with full confidence.
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            confidence: 1.0,
        }
    }

    /// Replace the confidence value.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Time span `[start, end)`.
    pub fn span(&self) -> TimeRange {
        TimeRange {
            start: self.start,
            end: self.end,
        }
    }
}

/// Normalized word map: words ordered by start, non-overlapping, all inside
/// `[0, total_duration)`.
///
/// This is the primary time axis every later stage snaps against.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Transcript {
    words: Vec<Word>,
    total_duration: f64,
}

impl Transcript {
    /// Normalize a raw word sequence against the media duration.
    ///
    /// Words are stably ordered by start. A word starting before its predecessor ends has its start
    /// clamped to that end; if nothing remains of it the transcript is rejected as malformed.
    /// Confidence values are clamped into `[0, 1]`.
    pub fn new(mut words: Vec<Word>, total_duration: f64) -> CutplanResult<Self> {
        validate_total_duration(total_duration)?;

        for (index, w) in words.iter_mut().enumerate() {
            if !w.start.is_finite() || !w.end.is_finite() || w.start < 0.0 || w.start >= w.end {
                return Err(CutplanError::MalformedTranscript {
                    index,
                    text: w.text.clone(),
                    range: w.span(),
                });
            }
            if !w.confidence.is_finite() {
                return Err(CutplanError::validation(format!(
                    "word {index} '{}' has non-finite confidence",
                    w.text
                )));
            }
            w.confidence = w.confidence.clamp(0.0, 1.0);
        }

        words.sort_by(|a, b| a.start.total_cmp(&b.start));

        let mut clamped = 0usize;
        for index in 1..words.len() {
            let prev_end = words[index - 1].end;
            let w = &mut words[index];
            if w.start < prev_end {
                let supplied = w.span();
                w.start = prev_end;
                if w.end - w.start <= TIME_EPS {
                    return Err(CutplanError::MalformedTranscript {
                        index,
                        text: w.text.clone(),
                        range: supplied,
                    });
                }
                clamped += 1;
            }
        }
        if clamped > 0 {
            tracing::debug!(clamped, "clamped overlapping word starts");
        }

        if let Some(last) = words.last()
            && last.end > total_duration + TIME_EPS
        {
            return Err(CutplanError::DurationMismatch {
                range: last.span(),
                total: total_duration,
            });
        }

        Ok(Self {
            words,
            total_duration,
        })
    }

    /// Transcript with no words, used when transcription is unavailable.
    pub fn empty(total_duration: f64) -> CutplanResult<Self> {
        Self::new(Vec::new(), total_duration)
    }

    /// Ordered, non-overlapping words.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Media duration in seconds.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// `[0, total_duration)`.
    pub fn span(&self) -> TimeRange {
        TimeRange {
            start: 0.0,
            end: self.total_duration,
        }
    }

    /// Return `true` when no words were recognized.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Space-joined transcript text.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for w in &self.words {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(w.text.trim());
        }
        out
    }

    /// The word whose span strictly contains `t`, if any.
    ///
    /// Word edges are boundaries, not interiors: `t == word.start` returns `None`.
    pub fn word_containing_strict(&self, t: f64) -> Option<&Word> {
        let idx = self.words.partition_point(|w| w.end <= t);
        self.words
            .get(idx)
            .filter(|w| w.span().contains_strict(t))
    }

    /// Return `true` when `t` does not fall strictly inside any word.
    pub fn is_word_boundary(&self, t: f64) -> bool {
        self.word_containing_strict(t).is_none()
    }
}

pub(crate) fn validate_total_duration(total_duration: f64) -> CutplanResult<()> {
    if !total_duration.is_finite() || total_duration <= 0.0 {
        return Err(CutplanError::validation(
            "total_duration must be finite and > 0",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/transcript.rs"]
mod tests;
