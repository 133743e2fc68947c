use crate::media::MediaHandle;

/// Physical handle addressed by host-side event forwarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleTarget {
    Audio,
    Video(usize),
}

/// Owns the process-wide playback handles: one audio handle and two
/// interchangeable video handles.
///
/// Two video slots exist because reassigning a single handle's source forces
/// a decode restart and a visible black frame; the upcoming clip is loaded
/// into the idle slot and only then made active. The pool itself never
/// touches playback; the synchronizer and the swapper are the only writers.
#[derive(Debug)]
pub struct HandlePool<H> {
    audio: H,
    video: [H; 2],
    active: usize,
}

impl<H: MediaHandle> HandlePool<H> {
    pub fn new(audio: H, video_a: H, video_b: H) -> Self {
        Self {
            audio,
            video: [video_a, video_b],
            active: 0,
        }
    }

    /// Index of the active video slot.
    pub fn active_slot(&self) -> usize {
        self.active
    }

    pub fn audio(&self) -> &H {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut H {
        &mut self.audio
    }

    pub fn active_video(&self) -> &H {
        &self.video[self.active]
    }

    pub fn active_video_mut(&mut self) -> &mut H {
        &mut self.video[self.active]
    }

    pub fn inactive_video(&self) -> &H {
        &self.video[1 - self.active]
    }

    pub fn inactive_video_mut(&mut self) -> &mut H {
        &mut self.video[1 - self.active]
    }

    /// Borrows `(active, inactive)` video handles at once, as a swap needs
    /// to mutate both in one step.
    pub fn video_pair_mut(&mut self) -> (&mut H, &mut H) {
        let (first, second) = self.video.split_at_mut(1);
        if self.active == 0 {
            (&mut first[0], &mut second[0])
        } else {
            (&mut second[0], &mut first[0])
        }
    }

    /// Flips which video slot is active. Callers must already have prepared
    /// the inactive handle.
    pub fn swap_active(&mut self) {
        self.active = 1 - self.active;
    }

    pub fn handle(&self, target: HandleTarget) -> &H {
        match target {
            HandleTarget::Audio => &self.audio,
            HandleTarget::Video(slot) => &self.video[slot.min(1)],
        }
    }

    pub fn handle_mut(&mut self, target: HandleTarget) -> &mut H {
        match target {
            HandleTarget::Audio => &mut self.audio,
            HandleTarget::Video(slot) => &mut self.video[slot.min(1)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HandlePool, HandleTarget};
    use crate::media::{MediaHandle, MediaKind, MediaRef};
    use crate::sim::SimulatedHandle;

    fn pool() -> HandlePool<SimulatedHandle> {
        HandlePool::new(
            SimulatedHandle::new(),
            SimulatedHandle::new(),
            SimulatedHandle::new(),
        )
    }

    #[test]
    fn swap_active_flips_roles() {
        let mut pool = pool();
        let media = MediaRef {
            id: 7,
            kind: MediaKind::Video,
            locator: "media://7".into(),
            duration: Some(5.0),
        };
        pool.inactive_video_mut().set_source(&media);
        assert_eq!(pool.active_slot(), 0);
        assert!(pool.active_video().source().is_none());

        pool.swap_active();
        assert_eq!(pool.active_slot(), 1);
        assert_eq!(pool.active_video().source(), Some(7));
        assert!(pool.inactive_video().source().is_none());
    }

    #[test]
    fn video_pair_mut_returns_active_then_inactive() {
        let mut pool = pool();
        pool.swap_active();
        let media = MediaRef {
            id: 9,
            kind: MediaKind::Video,
            locator: "media://9".into(),
            duration: None,
        };
        let (active, _inactive) = pool.video_pair_mut();
        active.set_source(&media);
        assert_eq!(pool.handle(HandleTarget::Video(1)).source(), Some(9));
        assert!(pool.handle(HandleTarget::Video(0)).source().is_none());
    }
}
