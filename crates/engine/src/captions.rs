use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, Result};
use crate::time::MIN_CAPTION_DURATION;

pub type SegmentId = u64;

/// One caption with its timing window. The transcript collaborator owns the
/// backing list; drag resolution only proposes new windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    pub id: SegmentId,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl CaptionSegment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Which part of the caption block the pointer grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    /// Whole block, preserving duration.
    Move,
    /// Left edge only.
    Start,
    /// Right edge only.
    End,
}

/// Clamp bounds taken from the immediate neighbors, `None` at the list ends.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NeighborBounds {
    pub prev_end: Option<f64>,
    pub next_start: Option<f64>,
}

/// Bounds for the segment at `index` in a start-ordered segment list.
pub fn neighbor_bounds(segments: &[CaptionSegment], index: usize) -> NeighborBounds {
    NeighborBounds {
        prev_end: index.checked_sub(1).map(|i| segments[i].end),
        next_start: segments.get(index + 1).map(|s| s.start),
    }
}

/// Resolves a drag delta into a proposed `(start, end)` window that cannot
/// overlap an immediate neighbor.
///
/// A move keeps the span and re-derives the far bound from whichever clamp
/// fired; the span only shrinks when both neighbors constrain it at once.
/// Edge drags move one bound, held at least [`MIN_CAPTION_DURATION`] from
/// the other.
pub fn resolve_drag(
    segment: &CaptionSegment,
    kind: DragKind,
    delta_sec: f64,
    bounds: NeighborBounds,
    timeline_duration: f64,
) -> (f64, f64) {
    if !delta_sec.is_finite() {
        warn!(segment_id = segment.id, delta_sec, "ignoring non-finite drag delta");
        return (segment.start, segment.end);
    }
    let lower = bounds.prev_end.unwrap_or(0.0);
    let upper = bounds.next_start.unwrap_or(timeline_duration);

    match kind {
        DragKind::Move => {
            let span = segment.duration();
            let mut start = segment.start + delta_sec;
            let mut end = start + span;
            if start < lower {
                start = lower;
                end = (start + span).min(upper);
            }
            if end > upper {
                end = upper;
                start = (end - span).max(lower);
            }
            (start, end)
        }
        DragKind::Start => {
            let start = (segment.start + delta_sec)
                .max(lower)
                .min(segment.end - MIN_CAPTION_DURATION);
            (start, segment.end)
        }
        DragKind::End => {
            let end = (segment.end + delta_sec)
                .min(upper)
                .max(segment.start + MIN_CAPTION_DURATION);
            (segment.start, end)
        }
    }
}

/// Convenience wrapper resolving a drag against a start-ordered list.
pub fn drag_segment(
    segments: &[CaptionSegment],
    segment_id: SegmentId,
    kind: DragKind,
    delta_sec: f64,
    timeline_duration: f64,
) -> Result<(f64, f64)> {
    let index = segments
        .iter()
        .position(|s| s.id == segment_id)
        .ok_or(EngineError::SegmentNotFound { segment_id })?;
    let bounds = neighbor_bounds(segments, index);
    Ok(resolve_drag(
        &segments[index],
        kind,
        delta_sec,
        bounds,
        timeline_duration,
    ))
}

/// Rejects windows the transcript collaborator must never be asked to store.
pub fn validate_window(segment_id: SegmentId, start: f64, end: f64) -> Result<()> {
    if !start.is_finite() || !end.is_finite() || start < 0.0 {
        return Err(EngineError::InvalidCaptionWindow { segment_id, start, end });
    }
    if end - start < MIN_CAPTION_DURATION - 1e-9 {
        return Err(EngineError::InvalidCaptionWindow { segment_id, start, end });
    }
    Ok(())
}
