use crate::foundation::core::{Point, Rect, Size};
use crate::foundation::error::{CutplanError, CutplanResult};

/// Face centre observed at one instant of original time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FaceSample {
    /// Original time in seconds.
    pub at: f64,
    /// Face centre in frame pixels.
    pub center: Point,
}

/// Face samples ordered by time.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FaceTrack {
    samples: Vec<FaceSample>,
}

impl FaceTrack {
    /// Build a track, dropping samples with non-finite values.
    pub fn new(samples: impl IntoIterator<Item = FaceSample>) -> Self {
        let mut track = Self::default();
        track.extend(samples);
        track
    }

    /// Add samples, keeping the track ordered.
    pub fn extend(&mut self, samples: impl IntoIterator<Item = FaceSample>) {
        self.samples.extend(
            samples
                .into_iter()
                .filter(|s| s.at.is_finite() && s.center.x.is_finite() && s.center.y.is_finite()),
        );
        self.samples.sort_by(|a, b| a.at.total_cmp(&b.at));
    }

    /// Samples in time order.
    pub fn samples(&self) -> &[FaceSample] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Return `true` when the track holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample closest to `t`, if one lies within `window` seconds. Earlier samples win ties.
    pub fn nearest_face(&self, t: f64, window: f64) -> Option<&FaceSample> {
        let i = self.samples.partition_point(|s| s.at < t);
        let before = i.checked_sub(1).and_then(|j| self.samples.get(j));
        let after = self.samples.get(i);
        let best = match (before, after) {
            (Some(b), Some(a)) => {
                if t - b.at <= a.at - t {
                    b
                } else {
                    a
                }
            }
            (Some(s), None) | (None, Some(s)) => s,
            (None, None) => return None,
        };
        ((best.at - t).abs() <= window).then_some(best)
    }
}

/// Crop rectangle for a `factor` zoom centred on `center`, shifted to stay inside the frame.
///
/// Factors below 1 would need footage outside the frame, so they yield the full frame.
pub fn zoom_crop_region(frame: Size, center: Point, factor: f64) -> CutplanResult<Rect> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(CutplanError::validation(format!(
            "zoom factor must be finite and > 0, got {factor}"
        )));
    }
    if !(frame.width > 0.0 && frame.height > 0.0) {
        return Err(CutplanError::validation("frame size must be positive"));
    }

    let scale = factor.max(1.0);
    let w = frame.width / scale;
    let h = frame.height / scale;
    let x0 = (center.x - w / 2.0).clamp(0.0, frame.width - w);
    let y0 = (center.y - h / 2.0).clamp(0.0, frame.height - h);
    Ok(Rect::new(x0, y0, x0 + w, y0 + h))
}
