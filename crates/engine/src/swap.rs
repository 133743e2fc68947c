use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clip::Clip;
use crate::media::{MediaHandle, MediaId, ReadyState};
use crate::pool::HandlePool;
use crate::time::{SEEK_TOLERANCE, approx_eq};

/// How a source hand-off was performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SwitchKind {
    /// Pre-buffered second handle swapped in without a visible reload.
    Warm,
    /// Pause/reassign/seek/play on one handle, with a visible reload.
    Cold,
}

/// Preloads the upcoming clip's media into the inactive video slot and
/// performs the hand-off at the clip boundary.
///
/// A warm switch mutes the outgoing handle in the same step that unmutes the
/// incoming one, so no instant ever has two audible video handles. The slot
/// flip itself waits for the incoming handle's first decoded frame, or for
/// the next scheduling tick when that signal never arrives.
#[derive(Debug, Default)]
pub struct BufferSwapper {
    prepared: Option<MediaId>,
    warm_pending: bool,
}

impl BufferSwapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Media currently loaded into the inactive slot on our behalf.
    pub fn prepared(&self) -> Option<MediaId> {
        self.prepared
    }

    /// True while a warm switch waits for its first frame before flipping.
    pub fn warm_pending(&self) -> bool {
        self.warm_pending
    }

    /// Starts loading `next`'s media into the inactive slot.
    pub fn prepare_next<H: MediaHandle>(&mut self, pool: &mut HandlePool<H>, next: &Clip) {
        let inactive = pool.inactive_video_mut();
        inactive.set_muted(true);
        if inactive.source() != Some(next.media.id) {
            debug!(clip_id = next.id, media_id = next.media.id, "preloading next clip");
            inactive.set_source(&next.media);
        }
        self.prepared = Some(next.media.id);
    }

    /// Positions the preloaded handle once its metadata is available.
    pub fn on_inactive_ready<H: MediaHandle>(&mut self, pool: &mut HandlePool<H>, next: &Clip) {
        if self.prepared != Some(next.media.id) {
            return;
        }
        let inactive = pool.inactive_video_mut();
        if inactive.source() != Some(next.media.id) || inactive.ready() < ReadyState::Metadata {
            return;
        }
        let target = next.trim_start.max(0.0);
        if !approx_eq(inactive.position(), target, SEEK_TOLERANCE) {
            debug!(clip_id = next.id, target, "pre-seeking inactive slot");
            inactive.seek(target);
        }
    }

    /// Attempts the glitch-free hand-off as playback crosses into `next`.
    ///
    /// Returns [`SwitchKind::Cold`] without touching any handle when the
    /// inactive slot is not ready or holds the wrong source; the caller then
    /// runs its ordinary cold rebind on the active handle.
    pub fn swap_at_boundary<H: MediaHandle>(
        &mut self,
        pool: &mut HandlePool<H>,
        next: &Clip,
    ) -> SwitchKind {
        let (active, inactive) = pool.video_pair_mut();
        let ready = inactive.source() == Some(next.media.id)
            && inactive.ready() == ReadyState::CanPlay;
        if !ready {
            warn!(
                clip_id = next.id,
                prepared = ?self.prepared,
                "inactive slot not ready at boundary, falling back to cold switch"
            );
            self.prepared = None;
            return SwitchKind::Cold;
        }

        // Mute the outgoing handle in the same step the incoming one becomes
        // audible: never two audible video handles.
        active.set_muted(true);
        inactive.set_muted(false);
        if inactive.play().is_err() {
            warn!(clip_id = next.id, "preloaded slot refused to play");
            inactive.set_muted(true);
            self.prepared = None;
            return SwitchKind::Cold;
        }

        info!(clip_id = next.id, media_id = next.media.id, "warm switch started");
        self.warm_pending = true;
        SwitchKind::Warm
    }

    /// Completes a pending warm switch: pauses the outgoing handle and flips
    /// the active slot. Invoked on the incoming handle's first frame, or on
    /// the next tick as the fallback.
    pub fn finish_warm<H: MediaHandle>(&mut self, pool: &mut HandlePool<H>) {
        if !self.warm_pending {
            return;
        }
        pool.active_video_mut().pause();
        pool.swap_active();
        self.warm_pending = false;
        self.prepared = None;
        debug!(active_slot = pool.active_slot(), "warm switch finished");
    }

    /// Drops preload state; re-mutes and pauses a half-swapped handle.
    ///
    /// Called when the clip set changes or a seek lands somewhere that makes
    /// the prepared media stale.
    pub fn abort<H: MediaHandle>(&mut self, pool: &mut HandlePool<H>) {
        if self.warm_pending {
            let inactive = pool.inactive_video_mut();
            inactive.pause();
            inactive.set_muted(true);
            self.warm_pending = false;
        }
        self.prepared = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{BufferSwapper, SwitchKind};
    use crate::clip::Clip;
    use crate::media::{MediaHandle, MediaKind, MediaRef};
    use crate::pool::HandlePool;
    use crate::sim::SimulatedHandle;

    fn clip(id: u64, media_id: u64, start: f64, duration: f64) -> Clip {
        Clip {
            id,
            media: MediaRef {
                id: media_id,
                kind: MediaKind::Video,
                locator: format!("media://{media_id}"),
                duration: Some(duration + 2.0),
            },
            start,
            base_duration: duration + 2.0,
            trim_start: 1.0,
            trim_end: 1.0 + duration,
        }
    }

    fn pool() -> HandlePool<SimulatedHandle> {
        HandlePool::new(
            SimulatedHandle::new(),
            SimulatedHandle::new(),
            SimulatedHandle::new(),
        )
    }

    #[test]
    fn prepare_loads_and_preseeks_the_inactive_slot() {
        let mut pool = pool();
        let mut swapper = BufferSwapper::new();
        let next = clip(2, 20, 5.0, 3.0);

        swapper.prepare_next(&mut pool, &next);
        assert_eq!(pool.inactive_video().source(), Some(20));
        assert!(pool.inactive_video().muted());

        pool.inactive_video_mut().advance(0.1);
        swapper.on_inactive_ready(&mut pool, &next);
        assert!((pool.inactive_video().position() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn warm_switch_flips_after_first_frame_and_keeps_one_audible_handle() {
        let mut pool = pool();
        let mut swapper = BufferSwapper::new();
        let next = clip(2, 20, 5.0, 3.0);

        let current_media = MediaRef {
            id: 10,
            kind: MediaKind::Video,
            locator: "media://10".into(),
            duration: Some(6.0),
        };
        pool.active_video_mut().set_source(&current_media);
        pool.active_video_mut().advance(0.1);
        pool.active_video_mut().play().expect("play accepted");

        swapper.prepare_next(&mut pool, &next);
        pool.inactive_video_mut().advance(0.1);
        swapper.on_inactive_ready(&mut pool, &next);

        let kind = swapper.swap_at_boundary(&mut pool, &next);
        assert_eq!(kind, SwitchKind::Warm);
        assert!(swapper.warm_pending());

        // Outgoing handle muted the moment the incoming one is audible.
        assert!(pool.active_video().muted());
        assert!(!pool.inactive_video().muted());
        assert!(pool.inactive_video().is_playing());

        swapper.finish_warm(&mut pool);
        assert_eq!(pool.active_slot(), 1);
        assert!(pool.active_video().is_playing());
        assert!(!pool.inactive_video().is_playing());
        let audible = [pool.active_video(), pool.inactive_video()]
            .iter()
            .filter(|h| !h.muted())
            .count();
        assert_eq!(audible, 1);
    }

    #[test]
    fn unready_inactive_slot_forces_cold_switch() {
        let mut pool = pool();
        let mut swapper = BufferSwapper::new();
        let next = clip(2, 20, 5.0, 3.0);

        pool.inactive_video_mut().never_ready = true;
        swapper.prepare_next(&mut pool, &next);
        pool.inactive_video_mut().advance(1.0);

        let kind = swapper.swap_at_boundary(&mut pool, &next);
        assert_eq!(kind, SwitchKind::Cold);
        assert!(!swapper.warm_pending());
        assert_eq!(pool.active_slot(), 0);
    }

    #[test]
    fn wrong_prepared_source_forces_cold_switch() {
        let mut pool = pool();
        let mut swapper = BufferSwapper::new();
        let prepared = clip(2, 20, 5.0, 3.0);
        let actual_next = clip(3, 30, 5.0, 3.0);

        swapper.prepare_next(&mut pool, &prepared);
        pool.inactive_video_mut().advance(0.1);

        let kind = swapper.swap_at_boundary(&mut pool, &actual_next);
        assert_eq!(kind, SwitchKind::Cold);
    }

    #[test]
    fn abort_re_mutes_a_half_swapped_handle() {
        let mut pool = pool();
        let mut swapper = BufferSwapper::new();
        let next = clip(2, 20, 5.0, 3.0);

        swapper.prepare_next(&mut pool, &next);
        pool.inactive_video_mut().advance(0.1);
        swapper.on_inactive_ready(&mut pool, &next);
        assert_eq!(swapper.swap_at_boundary(&mut pool, &next), SwitchKind::Warm);

        swapper.abort(&mut pool);
        assert!(pool.inactive_video().muted());
        assert!(!pool.inactive_video().is_playing());
        assert!(swapper.prepared().is_none());
    }
}
