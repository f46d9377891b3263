//! Renderer boundary and a CMX-style EDL exporter.

use std::io::Write;

use crate::foundation::error::{CutplanError, CutplanResult};
use crate::timeline::{Segment, SegmentAction};
use crate::validate::ValidatedTimeline;

/// Consumer of finished timelines.
///
/// Renderers take the timeline by value, so nothing can be appended after validation.
pub trait TimelineRenderer: Send {
    /// Render one validated timeline.
    fn render(&mut self, timeline: ValidatedTimeline) -> CutplanResult<()>;
}

/// Writes an edit decision list: a title header, `FCM: NON-DROP FRAME`, then one numbered event
/// per output segment with source and record timecodes.
///
/// KEEP events reference the source reel `AX`, transitions the black reel `BL`, and B-roll
/// inserts carry their media handle in a `FROM CLIP NAME` comment. Zooms have no output time and
/// are written as comments ahead of the footage they apply to.
#[derive(Debug)]
pub struct EdlWriter<W: Write> {
    out: W,
    title: String,
    fps: u32,
}

impl<W: Write> EdlWriter<W> {
    /// Writer with a title and a 30 fps timebase.
    pub fn new(out: W, title: impl Into<String>) -> Self {
        Self {
            out,
            title: title.into(),
            fps: 30,
        }
    }

    /// Replace the timecode frame rate.
    pub fn with_fps(mut self, fps: u32) -> CutplanResult<Self> {
        if fps == 0 {
            return Err(CutplanError::validation("EDL fps must be > 0"));
        }
        self.fps = fps;
        Ok(self)
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn timecode(&self, secs: f64) -> String {
        let fps = u64::from(self.fps);
        let frames = (secs.max(0.0) * self.fps as f64).round() as u64;
        let ff = frames % fps;
        let total_secs = frames / fps;
        format!(
            "{:02}:{:02}:{:02}:{:02}",
            total_secs / 3600,
            (total_secs / 60) % 60,
            total_secs % 60,
            ff
        )
    }

    fn event_line(
        &self,
        event: usize,
        reel: &str,
        edit: &str,
        src: (f64, f64),
        seg: &Segment,
    ) -> String {
        format!(
            "{event:03}  {reel:<8} V     {edit:<8} {} {} {} {}",
            self.timecode(src.0),
            self.timecode(src.1),
            self.timecode(seg.output_range.start),
            self.timecode(seg.output_range.end),
        )
    }

    fn write_edl(&mut self, timeline: &ValidatedTimeline) -> std::io::Result<()> {
        let mut lines = vec![
            format!("TITLE: {}", self.title),
            "FCM: NON-DROP FRAME".to_owned(),
            String::new(),
        ];
        let mut event = 0usize;

        for seg in timeline.segments() {
            match &seg.action {
                SegmentAction::Cut(_) => {}
                SegmentAction::Keep => {
                    let Some(r) = seg.original_range else { continue };
                    event += 1;
                    lines.push(self.event_line(event, "AX", "C", (r.start, r.end), seg));
                }
                SegmentAction::Zoom(z) => {
                    lines.push(format!(
                        "* EFFECT ZOOM {:.2}X FOR {:.3}S AT SOURCE {}",
                        z.factor,
                        z.span,
                        self.timecode(z.at)
                    ));
                    if let Some(p) = z.anchor {
                        lines.push(format!("* ZOOM CENTER {:.1} {:.1}", p.x, p.y));
                    }
                }
                SegmentAction::Transition(t) => {
                    event += 1;
                    let frames = (t.duration * self.fps as f64).round() as u64;
                    let edit = format!("D    {frames:03}");
                    lines.push(self.event_line(event, "BL", &edit, (0.0, t.duration), seg));
                    lines.push(format!("* TRANSITION {:?}", t.kind).to_uppercase());
                }
                SegmentAction::InsertBroll(b) => {
                    event += 1;
                    lines.push(self.event_line(event, "BROLL", "C", (0.0, b.duration), seg));
                    lines.push(format!("* FROM CLIP NAME: {}", b.media_ref));
                }
            }
        }

        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}

impl<W: Write + Send> TimelineRenderer for EdlWriter<W> {
    #[tracing::instrument(skip_all, fields(segments = timeline.segments().len()))]
    fn render(&mut self, timeline: ValidatedTimeline) -> CutplanResult<()> {
        self.write_edl(&timeline)
            .map_err(|e| CutplanError::Other(anyhow::Error::from(e).context("failed to write EDL")))
    }
}
