//! Transcription boundary. Results are cached by audio content so repeated runs over the same
//! recording skip the recognizer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::diagnostic::Diagnostic;
use crate::fingerprint::AudioFingerprint;
use crate::transcript::Word;

/// Speech recognizer producing word-level timestamps.
pub trait TranscriptionProvider: Send + Sync {
    /// Recognize `audio`. Words may come back unsorted; the transcript normalizes them.
    fn transcribe(&self, audio: &[u8]) -> anyhow::Result<Vec<Word>>;
}

/// Word-map cache keyed by audio content.
pub trait TranscriptCache {
    /// Cached words for `key`.
    fn lookup(&self, key: &AudioFingerprint) -> Option<Vec<Word>>;

    /// Remember `words` for `key`, replacing any previous entry.
    fn store(&mut self, key: AudioFingerprint, words: &[Word]);
}

/// Process-local [`TranscriptCache`] with hit and miss counters.
#[derive(Debug, Default)]
pub struct InMemoryTranscriptCache {
    entries: HashMap<AudioFingerprint, Vec<Word>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl InMemoryTranscriptCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookups that found an entry.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that found nothing.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Number of cached recordings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TranscriptCache for InMemoryTranscriptCache {
    fn lookup(&self, key: &AudioFingerprint) -> Option<Vec<Word>> {
        let found = self.entries.get(key).cloned();
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    fn store(&mut self, key: AudioFingerprint, words: &[Word]) {
        self.entries.insert(key, words.to_vec());
    }
}

/// Words for one recording and where they came from.
#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptAcquisition {
    /// Recognized words; empty when transcription failed.
    pub words: Vec<Word>,
    /// Content hash of the audio.
    pub fingerprint: AudioFingerprint,
    /// The words came from the cache.
    pub cache_hit: bool,
    /// Set when the recognizer failed.
    pub diagnostic: Option<Diagnostic>,
}

/// Fetch words for `audio` from `cache`, falling back to `provider`.
///
/// A provider failure yields an empty word list and a `TranscriptionUnavailable` diagnostic.
/// Failures are not cached, so the next run retries the recognizer.
#[tracing::instrument(skip_all, fields(audio_bytes = audio.len()))]
pub fn acquire_transcript(
    provider: &dyn TranscriptionProvider,
    cache: &mut dyn TranscriptCache,
    audio: &[u8],
) -> TranscriptAcquisition {
    let fingerprint = AudioFingerprint::of(audio);

    if let Some(words) = cache.lookup(&fingerprint) {
        tracing::debug!(%fingerprint, words = words.len(), "transcript cache hit");
        return TranscriptAcquisition {
            words,
            fingerprint,
            cache_hit: true,
            diagnostic: None,
        };
    }

    match provider.transcribe(audio) {
        Ok(words) => {
            tracing::debug!(%fingerprint, words = words.len(), "transcribed audio");
            cache.store(fingerprint, &words);
            TranscriptAcquisition {
                words,
                fingerprint,
                cache_hit: false,
                diagnostic: None,
            }
        }
        Err(err) => {
            let d = Diagnostic::TranscriptionUnavailable {
                message: format!("{err:#}"),
            };
            d.log();
            TranscriptAcquisition {
                words: Vec::new(),
                fingerprint,
                cache_hit: false,
                diagnostic: Some(d),
            }
        }
    }
}
