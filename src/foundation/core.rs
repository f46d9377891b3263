use crate::foundation::error::{CutplanError, CutplanResult};

pub use kurbo::{Point, Rect, Size};

/// Tolerance used when comparing two timestamps in seconds.
///
/// Inputs come from speech recognizers and detectors that report times as decimal seconds, so two
/// boundaries closer than this are treated as the same instant.
pub const TIME_EPS: f64 = 1e-9;

/// Return `true` when `a` and `b` denote the same instant.
pub fn same_instant(a: f64, b: f64) -> bool {
    (a - b).abs() <= TIME_EPS
}

/// Half-open time range `[start, end)` in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeRange {
    /// Inclusive range start.
    pub start: f64,
    /// Exclusive range end.
    pub end: f64, // exclusive
}

impl TimeRange {
    /// Create a validated range with finite bounds and `start <= end`.
    pub fn new(start: f64, end: f64) -> CutplanResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(CutplanError::validation("TimeRange bounds must be finite"));
        }
        if start > end {
            return Err(CutplanError::validation("TimeRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Zero-length range positioned at `at`.
    pub fn point(at: f64) -> Self {
        Self { start: at, end: at }
    }

    /// Length of the range in seconds.
    pub fn len_secs(self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Return `true` when the range covers no time.
    pub fn is_empty(self) -> bool {
        self.end - self.start <= TIME_EPS
    }

    /// Return `true` when `t` is inside `[start, end)`.
    pub fn contains(self, t: f64) -> bool {
        self.start <= t && t < self.end
    }

    /// Return `true` when `t` is strictly between the bounds.
    pub fn contains_strict(self, t: f64) -> bool {
        self.start + TIME_EPS < t && t < self.end - TIME_EPS
    }

    /// Return `true` when the two ranges share a non-empty span.
    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end - TIME_EPS && other.start < self.end - TIME_EPS
    }

    /// Return `true` when the two ranges overlap or touch end-to-start.
    pub fn touches(self, other: Self) -> bool {
        self.start <= other.end + TIME_EPS && other.start <= self.end + TIME_EPS
    }

    /// Smallest range covering both inputs.
    pub fn hull(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Shift both bounds by `delta` seconds.
    pub fn shift(self, delta: f64) -> Self {
        Self {
            start: self.start + delta,
            end: self.end + delta,
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.3}s, {:.3}s)", self.start, self.end)
    }
}

/// Opaque handle to a piece of external media (stock clip, upload, file path).
///
/// The engine never dereferences a handle; resolution is delegated to a
/// [`MediaResolver`](crate::MediaResolver).
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct MediaRef(pub String);

impl MediaRef {
    /// Build a handle from anything string-like.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Borrow the raw handle.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MediaRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
