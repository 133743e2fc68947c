use crate::media::{MediaEvent, MediaHandle, MediaId, MediaRef, ReadyState};

/// Headless [`MediaHandle`] with a deterministic decoder clock.
///
/// The host (a test or the demo driver) advances the handle with
/// [`SimulatedHandle::advance`] and forwards the returned events to the
/// synchronizer, which mirrors how a real host pumps media-element
/// notifications. Faults are scripted: a readiness latency, a source that
/// never becomes ready, and a bounded number of rejected play requests.
#[derive(Debug)]
pub struct SimulatedHandle {
    source: Option<MediaId>,
    source_duration: f64,
    position: f64,
    playing: bool,
    muted: bool,
    ready: ReadyState,
    ready_delay: f64,
    elapsed_since_source: f64,
    first_frame_pending: bool,
    pub never_ready: bool,
    pub reject_plays: u32,
}

impl SimulatedHandle {
    pub fn new() -> Self {
        Self {
            source: None,
            source_duration: f64::INFINITY,
            position: 0.0,
            playing: false,
            muted: false,
            ready: ReadyState::Empty,
            ready_delay: 0.0,
            elapsed_since_source: 0.0,
            first_frame_pending: false,
            never_ready: false,
            reject_plays: 0,
        }
    }

    /// Seconds a newly assigned source buffers before reporting readiness.
    pub fn with_ready_delay(mut self, seconds: f64) -> Self {
        self.ready_delay = seconds;
        self
    }

    /// Moves the simulated decoder forward by `dt` seconds and returns the
    /// notifications a real handle would have fired in that window.
    pub fn advance(&mut self, dt: f64) -> Vec<MediaEvent> {
        let mut events = Vec::new();

        if self.source.is_some() && !self.never_ready && self.ready < ReadyState::CanPlay {
            self.elapsed_since_source += dt;
            if self.elapsed_since_source >= self.ready_delay {
                self.ready = ReadyState::CanPlay;
                events.push(MediaEvent::MetadataLoaded);
                events.push(MediaEvent::CanPlay);
            }
        }

        if self.playing && self.ready == ReadyState::CanPlay {
            self.position = (self.position + dt).min(self.source_duration);
            if self.first_frame_pending {
                self.first_frame_pending = false;
                events.push(MediaEvent::FirstFrame);
            }
            events.push(MediaEvent::PositionChanged {
                seconds: self.position,
            });
            if self.position >= self.source_duration {
                self.playing = false;
                events.push(MediaEvent::Ended);
            }
        }

        events
    }
}

impl Default for SimulatedHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaHandle for SimulatedHandle {
    fn set_source(&mut self, media: &MediaRef) {
        self.source = Some(media.id);
        self.source_duration = media.duration.unwrap_or(f64::INFINITY);
        self.position = 0.0;
        self.playing = false;
        self.ready = ReadyState::Empty;
        self.elapsed_since_source = 0.0;
        self.first_frame_pending = false;
    }

    fn source(&self) -> Option<MediaId> {
        self.source
    }

    fn play(&mut self) -> Result<(), ()> {
        if self.source.is_none() {
            return Err(());
        }
        if self.reject_plays > 0 {
            self.reject_plays -= 1;
            return Err(());
        }
        self.playing = true;
        self.first_frame_pending = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, seconds: f64) {
        // A not-yet-ready element drops the request; the engine latches and
        // re-applies seeks on readiness for exactly this reason.
        if self.ready == ReadyState::Empty {
            return;
        }
        self.position = seconds.max(0.0).min(self.source_duration);
        if self.playing {
            self.first_frame_pending = true;
        }
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn ready(&self) -> ReadyState {
        self.ready
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

#[cfg(test)]
mod tests {
    use super::SimulatedHandle;
    use crate::media::{MediaEvent, MediaHandle, MediaKind, MediaRef, ReadyState};

    fn media(id: u64, duration: f64) -> MediaRef {
        MediaRef {
            id,
            kind: MediaKind::Video,
            locator: format!("media://{id}"),
            duration: Some(duration),
        }
    }

    #[test]
    fn advance_reports_readiness_then_positions() {
        let mut handle = SimulatedHandle::new();
        handle.set_source(&media(1, 10.0));
        assert_eq!(handle.ready(), ReadyState::Empty);

        let events = handle.advance(0.1);
        assert_eq!(
            events,
            vec![MediaEvent::MetadataLoaded, MediaEvent::CanPlay]
        );

        handle.play().expect("play accepted");
        let events = handle.advance(0.5);
        assert!(events.contains(&MediaEvent::FirstFrame));
        assert!((handle.position() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn seek_before_readiness_is_dropped() {
        let mut handle = SimulatedHandle::new().with_ready_delay(1.0);
        handle.set_source(&media(1, 10.0));
        handle.seek(5.0);
        assert_eq!(handle.position(), 0.0);
    }

    #[test]
    fn playback_ends_at_source_duration() {
        let mut handle = SimulatedHandle::new();
        handle.set_source(&media(1, 1.0));
        handle.advance(0.1);
        handle.play().expect("play accepted");

        let events = handle.advance(2.0);
        assert!(events.contains(&MediaEvent::Ended));
        assert!(!handle.is_playing());
        assert_eq!(handle.position(), 1.0);
    }

    #[test]
    fn rejected_play_leaves_handle_paused() {
        let mut handle = SimulatedHandle::new();
        handle.set_source(&media(1, 10.0));
        handle.reject_plays = 1;
        assert!(handle.play().is_err());
        assert!(!handle.is_playing());
        assert!(handle.play().is_ok());
    }
}
