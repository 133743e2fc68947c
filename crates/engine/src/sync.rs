use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clip::{self, Clip, ClipId};
use crate::media::{MediaEvent, MediaHandle, MediaId, MediaKind, ReadyState};
use crate::pool::{HandlePool, HandleTarget};
use crate::ranges::{self, TimelineRange};
use crate::swap::{BufferSwapper, SwitchKind};
use crate::time::{
    ADJACENCY_LOOKAHEAD, BOUNDARY_EPSILON, COLD_SWITCH_FALLBACK, GAP_TOLERANCE, SEEK_TOLERANCE,
    TIME_EMIT_INTERVAL, approx_eq, clamp_time,
};

/// Commands accepted by the synchronizer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play,
    Pause,
    TogglePlayback,
    Seek { seconds: f64 },
    ScrubStart,
    ScrubEnd,
    /// Replaces the full clip placement set.
    SetClips { clips: Vec<Clip> },
    /// A media resource reported its real duration after probing.
    MediaDurationKnown { media_id: MediaId, seconds: f64 },
}

/// Events emitted towards the rendering collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StateChanged(PlaybackState),
    TimeChanged { seconds: f64 },
    RangesChanged { ranges: Vec<TimelineRange>, duration: f64 },
    ClipBound { clip_id: ClipId },
    ClipReleased,
    SwitchCompleted { kind: SwitchKind },
}

/// Externally observable projection of the virtual timeline clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub current_time: f64,
    pub duration: f64,
    pub is_playing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Stopped,
    PlayingClip,
    PlayingGap,
    Scrubbing,
}

#[derive(Debug)]
struct ScrubSession {
    resume: bool,
    /// Latest requested position; many seeks coalesce into one per frame.
    target: Option<f64>,
}

/// Keeps one playback handle positioned and playing in lock-step with the
/// virtual timeline clock.
///
/// Single-threaded and host-driven: user intents arrive through
/// [`Synchronizer::handle_command`], per-frame callbacks through
/// [`Synchronizer::tick`], and playback-handle notifications through
/// [`Synchronizer::media_event`]. The synchronizer never blocks on media
/// readiness: desired seeks and play intents are latched and re-applied
/// when the handle reports readiness, with a bounded fallback if it never
/// does.
#[derive(Debug)]
pub struct Synchronizer<H> {
    pool: HandlePool<H>,
    swapper: BufferSwapper,
    clips: Vec<Clip>,
    ranges: Vec<TimelineRange>,
    duration: f64,
    current_time: f64,
    playing: bool,
    phase: Phase,
    binding: Option<ClipId>,
    pending_seek: Option<f64>,
    pending_play: bool,
    cold_deadline: Option<Instant>,
    retry_done: bool,
    scrub: Option<ScrubSession>,
    last_tick: Option<Instant>,
    last_emit: Option<Instant>,
}

impl<H: MediaHandle> Synchronizer<H> {
    pub fn new(pool: HandlePool<H>) -> Self {
        Self {
            pool,
            swapper: BufferSwapper::new(),
            clips: Vec::new(),
            ranges: Vec::new(),
            duration: 0.0,
            current_time: 0.0,
            playing: false,
            phase: Phase::Stopped,
            binding: None,
            pending_seek: None,
            pending_play: false,
            cold_deadline: None,
            retry_done: false,
            scrub: None,
            last_tick: None,
            last_emit: None,
        }
    }

    /// Applies one command and returns emitted events. Commands never fail:
    /// malformed inputs are clamped or ignored and playback faults are
    /// recovered internally.
    pub fn handle_command(&mut self, command: Command) -> Vec<Event> {
        match command {
            Command::Play => self.play(),
            Command::Pause => self.pause(),
            Command::TogglePlayback => self.toggle(),
            Command::Seek { seconds } => self.seek(seconds),
            Command::ScrubStart => self.scrub_start(),
            Command::ScrubEnd => self.scrub_end(),
            Command::SetClips { clips } => self.set_clips(clips),
            Command::MediaDurationKnown { media_id, seconds } => {
                self.media_duration_known(media_id, seconds)
            }
        }
    }

    /// Read-only projection for the rendering collaborator.
    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            current_time: self.current_time,
            duration: self.duration,
            is_playing: self.playing,
        }
    }

    pub fn ranges(&self) -> &[TimelineRange] {
        &self.ranges
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn bound_clip_id(&self) -> Option<ClipId> {
        self.binding
    }

    /// Host access for wiring and event pumping.
    pub fn pool(&self) -> &HandlePool<H> {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut HandlePool<H> {
        &mut self.pool
    }

    fn set_clips(&mut self, clips: Vec<Clip>) -> Vec<Event> {
        self.clips = clip::normalize(clips);
        self.ranges = ranges::compute_ranges(&self.clips);
        self.duration = ranges::timeline_duration(&self.ranges);
        self.swapper.abort(&mut self.pool);

        let mut events = vec![Event::RangesChanged {
            ranges: self.ranges.clone(),
            duration: self.duration,
        }];

        if let Some(bound) = self.binding
            && !self.clips.iter().any(|c| c.id == bound)
        {
            info!(clip_id = bound, "bound clip removed, releasing");
            self.release_binding(&mut events);
            if self.phase == Phase::PlayingClip {
                self.phase = Phase::PlayingGap;
            }
        }

        let clamped = clamp_time(self.current_time, self.duration);
        if clamped != self.current_time {
            self.current_time = clamped;
            events.push(Event::TimeChanged {
                seconds: self.current_time,
            });
        }
        if self.duration <= 0.0 && self.playing {
            self.playing = false;
            self.phase = Phase::Stopped;
            events.push(Event::StateChanged(self.state()));
        }

        debug!(
            clips = self.clips.len(),
            ranges = self.ranges.len(),
            duration = self.duration,
            "clip set replaced"
        );
        events
    }

    fn media_duration_known(&mut self, media_id: MediaId, seconds: f64) -> Vec<Event> {
        let clips = std::mem::take(&mut self.clips);
        self.clips = clip::normalize(clip::apply_duration_update(clips, media_id, seconds));
        self.ranges = ranges::compute_ranges(&self.clips);
        self.duration = ranges::timeline_duration(&self.ranges);

        let mut events = vec![Event::RangesChanged {
            ranges: self.ranges.clone(),
            duration: self.duration,
        }];
        let clamped = clamp_time(self.current_time, self.duration);
        if clamped != self.current_time {
            self.current_time = clamped;
            events.push(Event::TimeChanged {
                seconds: self.current_time,
            });
        }
        events
    }

    fn play(&mut self) -> Vec<Event> {
        if let Some(scrub) = self.scrub.as_mut() {
            scrub.resume = true;
            return Vec::new();
        }
        if self.duration <= 0.0 {
            debug!("play ignored: empty timeline");
            return Vec::new();
        }

        let mut events = Vec::new();
        if self.current_time >= self.duration - 1e-9 {
            self.current_time = 0.0;
            events.push(Event::TimeChanged { seconds: 0.0 });
        }

        self.playing = true;
        self.retry_done = false;
        match ranges::range_at(&self.ranges, self.current_time).and_then(TimelineRange::clip_id) {
            Some(clip_id) => {
                if let Some(clip) = self.clip_by_id(clip_id).cloned() {
                    self.enter_clip(&clip, self.current_time, &mut events);
                }
            }
            None => {
                self.phase = Phase::PlayingGap;
                debug!(at = self.current_time, "playing through gap");
            }
        }
        events.push(Event::StateChanged(self.state()));
        events
    }

    fn pause(&mut self) -> Vec<Event> {
        if let Some(scrub) = self.scrub.as_mut() {
            scrub.resume = false;
            return Vec::new();
        }

        self.playing = false;
        self.phase = Phase::Stopped;
        self.pending_play = false;
        self.cold_deadline = None;
        // A pending warm switch has the incoming handle audible in the
        // inactive slot; it must stop too, not just the bound handle.
        self.swapper.abort(&mut self.pool);
        self.pause_bound_handle();
        vec![Event::StateChanged(self.state())]
    }

    fn toggle(&mut self) -> Vec<Event> {
        if let Some(scrub) = self.scrub.as_mut() {
            scrub.resume = !scrub.resume;
            return Vec::new();
        }
        if self.playing { self.pause() } else { self.play() }
    }

    fn seek(&mut self, seconds: f64) -> Vec<Event> {
        if !seconds.is_finite() {
            warn!(seconds, "ignoring non-finite seek");
            return Vec::new();
        }
        let target = clamp_time(seconds, self.duration);
        if let Some(scrub) = self.scrub.as_mut() {
            scrub.target = Some(target);
            return Vec::new();
        }

        let mut events = Vec::new();
        self.apply_seek(target, &mut events);
        events.push(Event::TimeChanged {
            seconds: self.current_time,
        });
        events
    }

    fn scrub_start(&mut self) -> Vec<Event> {
        if self.scrub.is_some() {
            return Vec::new();
        }
        debug!(resume = self.playing, "scrub session started");
        self.scrub = Some(ScrubSession {
            resume: self.playing,
            target: None,
        });
        self.playing = false;
        self.phase = Phase::Scrubbing;
        self.pending_play = false;
        self.cold_deadline = None;
        self.swapper.abort(&mut self.pool);
        self.pause_bound_handle();
        vec![Event::StateChanged(self.state())]
    }

    fn scrub_end(&mut self) -> Vec<Event> {
        let Some(session) = self.scrub.take() else {
            return Vec::new();
        };
        debug!(resume = session.resume, "scrub session ended");

        let mut events = Vec::new();
        self.phase = Phase::Stopped;
        if let Some(target) = session.target {
            self.apply_seek(target, &mut events);
            events.push(Event::TimeChanged {
                seconds: self.current_time,
            });
        }
        if session.resume {
            events.extend(self.play());
        } else {
            events.push(Event::StateChanged(self.state()));
        }
        events
    }

    /// Per-frame callback. Drives the synthetic gap clock, high-frequency
    /// time reconciliation, scrub coalescing and bounded fallbacks.
    pub fn tick(&mut self, now: Instant) -> Vec<Event> {
        let mut events = Vec::new();
        let dt = self
            .last_tick
            .map(|last| now.duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        self.last_tick = Some(now);

        // A warm switch that got no first-frame signal between frames flips
        // on the next scheduling tick instead.
        if self.swapper.warm_pending() {
            self.swapper.finish_warm(&mut self.pool);
        }

        if self.pending_seek.is_some() || self.pending_play {
            match self.cold_deadline {
                None => self.cold_deadline = Some(now + COLD_SWITCH_FALLBACK),
                Some(deadline) if now >= deadline => self.force_apply_pending(&mut events),
                Some(_) => {}
            }
        } else {
            self.cold_deadline = None;
        }

        match self.phase {
            Phase::Scrubbing => {
                let target = self.scrub.as_mut().and_then(|s| s.target.take());
                if let Some(target) = target {
                    self.apply_seek(target, &mut events);
                    events.push(Event::TimeChanged {
                        seconds: self.current_time,
                    });
                }
            }
            Phase::PlayingGap => self.tick_gap(dt, now, &mut events),
            Phase::PlayingClip => self.tick_clip(now, &mut events),
            Phase::Stopped => {}
        }
        events
    }

    /// Host-forwarded notification from one physical playback handle.
    pub fn media_event(&mut self, target: HandleTarget, event: MediaEvent) -> Vec<Event> {
        let mut events = Vec::new();
        match target {
            HandleTarget::Audio => {
                if self.bound_kind() == Some(MediaKind::Audio) {
                    self.bound_handle_event(event, &mut events);
                }
            }
            HandleTarget::Video(slot) => {
                if slot == self.pool.active_slot() {
                    // While a warm switch is pending the active slot is the
                    // outgoing handle draining its last frames; its events no
                    // longer speak for the bound clip.
                    if !self.swapper.warm_pending()
                        && self.bound_kind() == Some(MediaKind::Video)
                    {
                        self.bound_handle_event(event, &mut events);
                    }
                } else {
                    self.inactive_video_event(event);
                }
            }
        }
        events
    }

    fn tick_gap(&mut self, dt: f64, now: Instant, events: &mut Vec<Event>) {
        if dt > 0.0 {
            self.current_time += dt;
        }

        let crossed = ranges::range_at(&self.ranges, self.current_time)
            .and_then(TimelineRange::clip_id)
            .and_then(|id| self.clip_by_id(id).cloned());
        if let Some(clip) = crossed {
            info!(
                clip_id = clip.id,
                at = self.current_time,
                "gap clock reached clip"
            );
            self.enter_clip(&clip, self.current_time, events);
            events.push(Event::TimeChanged {
                seconds: self.current_time,
            });
            self.last_emit = Some(now);
        } else if self.current_time >= self.duration {
            self.current_time = self.duration;
            self.playing = false;
            self.phase = Phase::Stopped;
            info!(duration = self.duration, "end of timeline reached in gap");
            events.push(Event::TimeChanged {
                seconds: self.current_time,
            });
            events.push(Event::StateChanged(self.state()));
        } else {
            self.emit_time_throttled(now, events);
        }
    }

    fn tick_clip(&mut self, now: Instant, events: &mut Vec<Event>) {
        let Some(clip) = self.bound_clip().cloned() else {
            // Binding vanished under us; let the gap clock take over.
            self.phase = Phase::PlayingGap;
            return;
        };

        if let Some(next) = self.adjacent_next_clip(&clip).cloned()
            && next.media.id != clip.media.id
            && next.media.kind == MediaKind::Video
        {
            self.swapper.prepare_next(&mut self.pool, &next);
        }

        // While a latched seek is outstanding the handle position is stale;
        // neither reconciliation nor boundary detection may trust it.
        let handle = self.handle_for(clip.media.kind);
        if self.pending_seek.is_some() || handle.ready() == ReadyState::Empty {
            return;
        }

        let position = handle.position();
        let derived = clip.start + (position - clip.trim_start).max(0.0);
        if derived > self.current_time {
            self.current_time = clamp_time(derived, self.duration);
        }

        if position >= clip.trim_end - BOUNDARY_EPSILON {
            self.advance_from_clip(&clip, clip.end(), events);
        }
        self.emit_time_throttled(now, events);
    }

    /// Resolves what happens when the bound handle reaches `clip`'s trimmed
    /// end.
    fn advance_from_clip(&mut self, clip: &Clip, boundary: f64, events: &mut Vec<Event>) {
        match self.adjacent_next_clip(clip).cloned() {
            Some(next) => {
                info!(
                    from = clip.id,
                    to = next.id,
                    boundary,
                    "clip boundary reached"
                );
                if next.media.id == clip.media.id {
                    // Same source; trims are not necessarily contiguous in
                    // source time, so the position may need a correction.
                    let handle = self.handle_for_mut(clip.media.kind);
                    if handle.position() >= next.trim_start {
                        debug!(clip_id = next.id, "position correction at same-source join");
                        handle.seek(next.trim_start);
                    }
                    self.binding = Some(next.id);
                    events.push(Event::ClipBound { clip_id: next.id });
                } else if clip.media.kind == MediaKind::Video
                    && next.media.kind == MediaKind::Video
                {
                    match self.swapper.swap_at_boundary(&mut self.pool, &next) {
                        SwitchKind::Warm => {
                            self.binding = Some(next.id);
                            events.push(Event::ClipBound { clip_id: next.id });
                            events.push(Event::SwitchCompleted {
                                kind: SwitchKind::Warm,
                            });
                        }
                        SwitchKind::Cold => {
                            self.enter_clip(&next, next.start, events);
                            events.push(Event::SwitchCompleted {
                                kind: SwitchKind::Cold,
                            });
                        }
                    }
                } else {
                    // Audio has no dual-buffer pool; always a cold switch.
                    self.enter_clip(&next, next.start, events);
                    events.push(Event::SwitchCompleted {
                        kind: SwitchKind::Cold,
                    });
                }
                self.current_time = self.current_time.max(next.start);
            }
            None => {
                self.release_binding(events);
                let further = self
                    .clips
                    .iter()
                    .any(|c| c.start > boundary + GAP_TOLERANCE);
                if further {
                    debug!(boundary, "entering gap after clip");
                    self.phase = Phase::PlayingGap;
                    self.current_time = self.current_time.max(boundary);
                } else {
                    info!(duration = self.duration, "end of timeline reached");
                    self.playing = false;
                    self.phase = Phase::Stopped;
                    self.current_time = self.duration;
                    events.push(Event::TimeChanged {
                        seconds: self.current_time,
                    });
                    events.push(Event::StateChanged(self.state()));
                }
            }
        }
    }

    /// Binds `clip` at virtual-timeline position `at`, performing a cold
    /// source switch when the active handle holds different media.
    fn enter_clip(&mut self, clip: &Clip, at: f64, events: &mut Vec<Event>) {
        let kind = clip.media.kind;
        let offset = clip.source_offset(at);

        let same_binding = self.binding == Some(clip.id)
            && self.handle_for(kind).source() == Some(clip.media.id);
        if !same_binding {
            // Quiet the other kind's handle before the new one drives.
            match kind {
                MediaKind::Video => self.pool.audio_mut().pause(),
                MediaKind::Audio => self.pool.active_video_mut().pause(),
            }
            let handle = self.handle_for_mut(kind);
            handle.pause();
            if handle.source() != Some(clip.media.id) {
                info!(clip_id = clip.id, media_id = clip.media.id, "cold bind");
                handle.set_source(&clip.media);
            }
            self.binding = Some(clip.id);
            events.push(Event::ClipBound { clip_id: clip.id });
        } else {
            self.binding = Some(clip.id);
        }

        let handle = self.handle_for_mut(kind);
        handle.set_muted(false);
        if handle.ready() >= ReadyState::Metadata {
            if !approx_eq(handle.position(), offset, SEEK_TOLERANCE) {
                handle.seek(offset);
            }
            self.pending_seek = None;
        } else {
            self.pending_seek = Some(offset);
        }

        if self.playing {
            if self.handle_for(kind).ready() == ReadyState::CanPlay {
                self.pending_play = false;
                self.attempt_play(clip, events);
            } else {
                self.pending_play = true;
            }
        } else {
            self.pending_play = false;
        }

        self.phase = if self.scrub.is_some() {
            Phase::Scrubbing
        } else if self.playing {
            Phase::PlayingClip
        } else {
            Phase::Stopped
        };
        if self.pending_seek.is_none() && !self.pending_play {
            self.cold_deadline = None;
        }
    }

    /// Starts the bound handle, recovering once from a rejected play by
    /// reloading the source and latching the intents.
    fn attempt_play(&mut self, clip: &Clip, events: &mut Vec<Event>) {
        let kind = clip.media.kind;
        if self.handle_for_mut(kind).play().is_ok() {
            self.retry_done = false;
            return;
        }

        if !self.retry_done {
            self.retry_done = true;
            warn!(clip_id = clip.id, "play rejected, reloading source once");
            let offset = clip.source_offset(self.current_time);
            let handle = self.handle_for_mut(kind);
            handle.set_source(&clip.media);
            self.pending_seek = Some(offset);
            self.pending_play = true;
            self.cold_deadline = None;
        } else {
            warn!(clip_id = clip.id, "play rejected twice, degrading to paused");
            self.playing = false;
            self.phase = Phase::Stopped;
            self.pending_play = false;
            events.push(Event::StateChanged(self.state()));
        }
    }

    fn apply_seek(&mut self, target: f64, events: &mut Vec<Event>) {
        self.swapper.abort(&mut self.pool);
        match ranges::range_at(&self.ranges, target).and_then(TimelineRange::clip_id) {
            Some(clip_id) => {
                if let Some(clip) = self.clip_by_id(clip_id).cloned() {
                    self.current_time = target;
                    self.enter_clip(&clip, target, events);
                }
            }
            None => {
                if self.binding.is_some() {
                    self.release_binding(events);
                }
                self.current_time = target;
                self.phase = if self.scrub.is_some() {
                    Phase::Scrubbing
                } else if self.playing {
                    Phase::PlayingGap
                } else {
                    Phase::Stopped
                };
                debug!(target, "seek landed in gap");
            }
        }
    }

    fn bound_handle_event(&mut self, event: MediaEvent, events: &mut Vec<Event>) {
        match event {
            MediaEvent::MetadataLoaded | MediaEvent::CanPlay => {
                let Some(clip) = self.bound_clip().cloned() else {
                    return;
                };
                let kind = clip.media.kind;
                if let Some(offset) = self.pending_seek
                    && self.handle_for(kind).ready() >= ReadyState::Metadata
                {
                    self.handle_for_mut(kind).seek(offset);
                    self.pending_seek = None;
                }
                if self.pending_play && self.handle_for(kind).ready() == ReadyState::CanPlay {
                    self.pending_play = false;
                    self.attempt_play(&clip, events);
                }
                if self.pending_seek.is_none() && !self.pending_play {
                    self.cold_deadline = None;
                }
            }
            MediaEvent::PositionChanged { seconds } => {
                // Coarse fallback while the per-frame loop is not driving.
                if self.phase == Phase::Stopped
                    && let Some(clip) = self.bound_clip()
                {
                    let derived = clip.start + (seconds - clip.trim_start).max(0.0);
                    let derived = clamp_time(derived, self.duration);
                    if !approx_eq(derived, self.current_time, 1e-9) {
                        self.current_time = derived;
                        events.push(Event::TimeChanged { seconds: derived });
                    }
                }
            }
            MediaEvent::Ended => {
                if self.phase == Phase::PlayingClip
                    && let Some(clip) = self.bound_clip().cloned()
                {
                    self.advance_from_clip(&clip, clip.end(), events);
                }
            }
            MediaEvent::FirstFrame => {}
            MediaEvent::Stalled => {
                debug!("bound handle reported a stall");
            }
        }
    }

    fn inactive_video_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::MetadataLoaded | MediaEvent::CanPlay => {
                let next = self
                    .bound_clip()
                    .and_then(|clip| self.adjacent_next_clip(clip))
                    .cloned();
                if let Some(next) = next
                    && self.swapper.prepared() == Some(next.media.id)
                {
                    self.swapper.on_inactive_ready(&mut self.pool, &next);
                }
            }
            MediaEvent::FirstFrame => {
                if self.swapper.warm_pending() {
                    self.swapper.finish_warm(&mut self.pool);
                }
            }
            _ => {}
        }
    }

    /// Applies latched intents after the readiness notification never came.
    fn force_apply_pending(&mut self, events: &mut Vec<Event>) {
        warn!("readiness notification never arrived, applying latched intents");
        self.cold_deadline = None;
        let Some(clip) = self.bound_clip().cloned() else {
            self.pending_seek = None;
            self.pending_play = false;
            return;
        };
        let kind = clip.media.kind;
        if let Some(offset) = self.pending_seek.take() {
            self.handle_for_mut(kind).seek(offset);
        }
        if self.pending_play {
            self.pending_play = false;
            self.attempt_play(&clip, events);
        }
    }

    fn release_binding(&mut self, events: &mut Vec<Event>) {
        self.pool.audio_mut().pause();
        self.pool.active_video_mut().pause();
        self.binding = None;
        self.pending_seek = None;
        self.pending_play = false;
        self.cold_deadline = None;
        events.push(Event::ClipReleased);
    }

    fn pause_bound_handle(&mut self) {
        if let Some(kind) = self.bound_kind() {
            self.handle_for_mut(kind).pause();
        }
    }

    fn emit_time_throttled(&mut self, now: Instant, events: &mut Vec<Event>) {
        let due = self
            .last_emit
            .is_none_or(|last| now.duration_since(last) >= TIME_EMIT_INTERVAL);
        if due {
            self.last_emit = Some(now);
            events.push(Event::TimeChanged {
                seconds: self.current_time,
            });
        }
    }

    fn adjacent_next_clip(&self, clip: &Clip) -> Option<&Clip> {
        let boundary = clip.end();
        self.clips.iter().find(|c| {
            c.id != clip.id
                && c.start >= boundary - GAP_TOLERANCE
                && c.start <= boundary + ADJACENCY_LOOKAHEAD
        })
    }

    fn clip_by_id(&self, clip_id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == clip_id)
    }

    fn bound_clip(&self) -> Option<&Clip> {
        self.binding.and_then(|id| self.clip_by_id(id))
    }

    fn bound_kind(&self) -> Option<MediaKind> {
        self.bound_clip().map(|clip| clip.media.kind)
    }

    fn handle_for(&self, kind: MediaKind) -> &H {
        match kind {
            MediaKind::Audio => self.pool.audio(),
            MediaKind::Video => self.pool.active_video(),
        }
    }

    fn handle_for_mut(&mut self, kind: MediaKind) -> &mut H {
        match kind {
            MediaKind::Audio => self.pool.audio_mut(),
            MediaKind::Video => self.pool.active_video_mut(),
        }
    }
}
