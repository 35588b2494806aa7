use serde::Serialize;

use super::Segment;

/// Half-open interval `[start_secs, end_secs)` a segment occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SegmentBounds {
    pub index: usize,
    pub start_secs: u64,
    pub end_secs: u64,
}

impl SegmentBounds {
    pub fn contains(&self, elapsed_secs: f64) -> bool {
        elapsed_secs >= self.start_secs as f64 && elapsed_secs < self.end_secs as f64
    }
}

/// Lay segments out back to back in declaration order.
pub fn segment_bounds(segments: &[Segment]) -> Vec<SegmentBounds> {
    let mut start = 0u64;
    segments
        .iter()
        .enumerate()
        .map(|(index, segment)| {
            let end = start.saturating_add(segment.duration_secs());
            let bounds = SegmentBounds {
                index,
                start_secs: start,
                end_secs: end,
            };
            start = end;
            bounds
        })
        .collect()
}

/// First segment whose interval contains `elapsed_secs`.
///
/// At or past the end of the last interval the last segment is returned.
/// An empty slice yields `None`.
pub fn resolve_segment(segments: &[Segment], elapsed_secs: f64) -> Option<(usize, &Segment)> {
    let last = segments.len().checked_sub(1)?;
    let index = segment_bounds(segments)
        .into_iter()
        .find(|b| b.contains(elapsed_secs))
        .map_or(last, |b| b.index);
    Some((index, &segments[index]))
}
