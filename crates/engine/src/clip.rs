use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::media::{MediaId, MediaRef};
use crate::time::{MIN_CLIP_DURATION, SEEK_TOLERANCE, approx_eq, is_valid_duration};

/// Opaque identifier for timeline clips.
pub type ClipId = u64;

/// A trimmed placement of one media resource on the virtual timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: ClipId,
    pub media: MediaRef,
    /// Position on the virtual timeline, seconds.
    pub start: f64,
    /// Full source duration, seconds.
    pub base_duration: f64,
    /// Trim window within the source, seconds.
    pub trim_start: f64,
    pub trim_end: f64,
}

impl Clip {
    /// Trimmed duration on the timeline.
    pub fn duration(&self) -> f64 {
        self.trim_end - self.trim_start
    }

    /// End position on the virtual timeline.
    pub fn end(&self) -> f64 {
        self.start + self.duration()
    }

    /// Maps a virtual-timeline position inside this clip to source seconds.
    pub fn source_offset(&self, timeline_seconds: f64) -> f64 {
        self.trim_start + (timeline_seconds - self.start).max(0.0)
    }
}

/// Sorts and clamps a clip set into the timeline's canonical form.
///
/// Stable sort by start (ties keep insertion order, which matters while a
/// timeline is being assembled and several clips still sit at 0). Each trim
/// window is clamped into the source and held to the minimum clip duration.
pub fn normalize(mut clips: Vec<Clip>) -> Vec<Clip> {
    for clip in &mut clips {
        if !clip.start.is_finite() || clip.start < 0.0 {
            warn!(clip_id = clip.id, start = clip.start, "clamping clip start");
            clip.start = clip.start.max(0.0);
            if !clip.start.is_finite() {
                clip.start = 0.0;
            }
        }
    }
    clips.sort_by(|a, b| a.start.total_cmp(&b.start));

    for clip in &mut clips {
        let mut duration = clip.trim_end - clip.trim_start;
        if !duration.is_finite() {
            duration = MIN_CLIP_DURATION;
        }

        // An unknown base cannot constrain the window; the claimed duration
        // stands in until the real source duration arrives.
        if !is_valid_duration(clip.base_duration) {
            clip.base_duration = duration.max(MIN_CLIP_DURATION);
        }

        let max_trim_start = (clip.base_duration - MIN_CLIP_DURATION).max(0.0);
        if !clip.trim_start.is_finite() {
            clip.trim_start = 0.0;
        }
        clip.trim_start = clip.trim_start.clamp(0.0, max_trim_start);

        let max_duration = (clip.base_duration - clip.trim_start).max(MIN_CLIP_DURATION);
        clip.trim_end = clip.trim_start + duration.clamp(MIN_CLIP_DURATION, max_duration);
    }

    clips
}

/// Applies an asynchronously discovered source duration to every clip that
/// references `media_id`.
///
/// A clip that was still untrimmed snaps to the new full duration; a
/// manually trimmed window is kept and re-clamped against the new base. A
/// non-finite or non-positive duration is ignored.
pub fn apply_duration_update(mut clips: Vec<Clip>, media_id: MediaId, new_base: f64) -> Vec<Clip> {
    if !is_valid_duration(new_base) {
        warn!(media_id, new_base, "ignoring invalid media duration");
        return clips;
    }

    for clip in &mut clips {
        if clip.media.id != media_id {
            continue;
        }

        let untrimmed = approx_eq(clip.trim_start, 0.0, SEEK_TOLERANCE)
            && approx_eq(clip.duration(), clip.base_duration, SEEK_TOLERANCE);

        clip.base_duration = new_base;
        clip.media.duration = Some(new_base);

        if untrimmed {
            clip.trim_start = 0.0;
            clip.trim_end = new_base;
            debug!(clip_id = clip.id, new_base, "clip expanded to known duration");
        } else {
            clip.trim_end = clip.trim_end.min(new_base);
            clip.trim_start = clip
                .trim_start
                .min((new_base - MIN_CLIP_DURATION).max(0.0));
            debug!(
                clip_id = clip.id,
                trim_start = clip.trim_start,
                trim_end = clip.trim_end,
                "trim window re-clamped to known duration"
            );
        }
    }

    clips
}

#[cfg(test)]
mod tests {
    use super::{Clip, apply_duration_update, normalize};
    use crate::media::{MediaKind, MediaRef};
    use crate::time::MIN_CLIP_DURATION;

    fn clip(id: u64, start: f64, base: f64, trim_start: f64, trim_end: f64) -> Clip {
        Clip {
            id,
            media: MediaRef {
                id: 100 + id,
                kind: MediaKind::Video,
                locator: format!("media://{id}"),
                duration: Some(base),
            },
            start,
            base_duration: base,
            trim_start,
            trim_end,
        }
    }

    #[test]
    fn normalize_sorts_by_start_and_keeps_insertion_order_on_ties() {
        let clips = normalize(vec![
            clip(1, 4.0, 10.0, 0.0, 10.0),
            clip(2, 0.0, 10.0, 0.0, 10.0),
            clip(3, 0.0, 10.0, 0.0, 10.0),
        ]);
        let ids: Vec<u64> = clips.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn normalize_enforces_minimum_duration() {
        let clips = normalize(vec![clip(1, 0.0, 10.0, 2.0, 2.1)]);
        assert!(clips[0].duration() >= MIN_CLIP_DURATION);
        assert_eq!(clips[0].trim_start, 2.0);
    }

    #[test]
    fn normalize_clamps_trim_window_into_source() {
        let clips = normalize(vec![clip(1, 0.0, 5.0, 4.9, 9.0)]);
        let c = &clips[0];
        assert!(c.trim_start <= 5.0 - MIN_CLIP_DURATION);
        assert!(c.trim_end <= 5.0 + 1e-9);
        assert!(c.duration() >= MIN_CLIP_DURATION);
    }

    #[test]
    fn normalize_repairs_non_finite_fields() {
        let mut broken = clip(1, f64::NAN, f64::NAN, f64::NAN, f64::NAN);
        broken.media.duration = None;
        let clips = normalize(vec![broken]);
        let c = &clips[0];
        assert_eq!(c.start, 0.0);
        assert!(c.duration() >= MIN_CLIP_DURATION);
        assert!(c.base_duration >= MIN_CLIP_DURATION);
    }

    #[test]
    fn duration_update_snaps_untrimmed_clip_to_new_base() {
        let clips = vec![clip(1, 0.0, 8.0, 0.0, 8.0)];
        let media_id = clips[0].media.id;
        let clips = apply_duration_update(clips, media_id, 12.5);
        assert_eq!(clips[0].trim_start, 0.0);
        assert_eq!(clips[0].trim_end, 12.5);
        assert_eq!(clips[0].base_duration, 12.5);
    }

    #[test]
    fn duration_update_preserves_manual_trim_window() {
        let clips = vec![clip(1, 0.0, 8.0, 2.0, 6.0)];
        let media_id = clips[0].media.id;
        let clips = apply_duration_update(clips, media_id, 12.5);
        assert_eq!(clips[0].trim_start, 2.0);
        assert_eq!(clips[0].trim_end, 6.0);
        assert_eq!(clips[0].base_duration, 12.5);
    }

    #[test]
    fn duration_update_shrinks_trim_window_when_new_base_is_shorter() {
        let clips = vec![clip(1, 0.0, 10.0, 4.0, 9.0)];
        let media_id = clips[0].media.id;
        let clips = normalize(apply_duration_update(clips, media_id, 6.0));
        let c = &clips[0];
        assert!(c.trim_end <= 6.0 + 1e-9);
        assert!(c.duration() >= MIN_CLIP_DURATION);
    }

    #[test]
    fn duration_update_ignores_invalid_values() {
        let clips = vec![clip(1, 0.0, 8.0, 0.0, 8.0)];
        let media_id = clips[0].media.id;
        let updated = apply_duration_update(clips.clone(), media_id, f64::NAN);
        assert_eq!(updated, clips);
        let updated = apply_duration_update(clips.clone(), media_id, -1.0);
        assert_eq!(updated, clips);
    }

    #[test]
    fn duration_update_leaves_other_media_untouched() {
        let clips = vec![clip(1, 0.0, 8.0, 0.0, 8.0), clip(2, 8.0, 4.0, 0.0, 4.0)];
        let first_media = clips[0].media.id;
        let clips = apply_duration_update(clips, first_media, 9.0);
        assert_eq!(clips[1].trim_end, 4.0);
        assert_eq!(clips[1].base_duration, 4.0);
    }
}
