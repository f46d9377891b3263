use crate::foundation::core::{TIME_EPS, TimeRange};
use crate::interval::{Partition, PartitionKind};
use crate::timeline::{Segment, SegmentAction, Timeline};

/// Walk the partition left to right and emit the base timeline.
///
/// Speech becomes KEEP with output duration equal to its original duration; cuts become CUT with
/// zero output duration. The output cursor always equals the sum of emitted output durations.
#[tracing::instrument(skip_all, fields(entries = partition.entries().len()))]
pub fn build_base_timeline(partition: &Partition) -> Timeline {
    let mut segments = Vec::with_capacity(partition.entries().len());
    let mut cursor = 0.0f64;

    for (order, entry) in partition.entries().iter().enumerate() {
        let seg = match entry.kind {
            PartitionKind::Speech => {
                let out = TimeRange {
                    start: cursor,
                    end: cursor + entry.range.len_secs(),
                };
                Segment {
                    output_order: order,
                    original_range: Some(entry.range),
                    output_range: out,
                    action: SegmentAction::Keep,
                }
            }
            PartitionKind::Cut { origin } => Segment {
                output_order: order,
                original_range: Some(entry.range),
                output_range: TimeRange::point(cursor),
                action: SegmentAction::Cut(origin),
            },
        };
        cursor = seg.output_range.end;
        segments.push(seg);
    }

    let emitted: f64 = segments.iter().map(Segment::output_duration).sum();
    debug_assert!((emitted - cursor).abs() <= 1e3 * TIME_EPS);
    tracing::debug!(
        segments = segments.len(),
        output_secs = cursor,
        "built base timeline"
    );
    Timeline::from_segments(segments, partition.total_duration())
}
