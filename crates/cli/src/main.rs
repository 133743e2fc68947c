//! Headless demo driving the engine with simulated playback handles.
//!
//! Plays a two-clip timeline through a source switch and a gap, scrubs,
//! and drags a caption, logging every emitted event. Useful for eyeballing
//! engine behavior without a rendering layer.

use std::time::{Duration, Instant};

use engine::{
    CaptionSegment, Clip, Command, DragKind, Event, HandleTarget, HandlePool, MediaKind, MediaRef,
    SimulatedHandle, Synchronizer, drag_segment,
};
use tracing::info;

const STEP: Duration = Duration::from_millis(33);

fn main() {
    let _ = tracing_subscriber::fmt::try_init();

    let clips = vec![
        clip(1, media(1, "demo://intro.mp4", 4.0), 0.0, 0.0, 4.0),
        clip(2, media(2, "demo://main.mp4", 10.0), 4.0, 2.0, 5.0),
        clip(3, media(2, "demo://main.mp4", 10.0), 12.0, 7.0, 3.0),
    ];

    let pool = HandlePool::new(
        SimulatedHandle::new(),
        SimulatedHandle::new(),
        SimulatedHandle::new(),
    );
    let mut sync = Synchronizer::new(pool);
    let mut now = Instant::now();

    send(&mut sync, Command::SetClips { clips });
    send(&mut sync, Command::Play);

    // Crosses the warm switch at 4s, then the gap from 9s to 12s.
    run(&mut sync, &mut now, 320);

    send(&mut sync, Command::ScrubStart);
    for target in [10.0, 6.0, 2.5] {
        send(&mut sync, Command::Seek { seconds: target });
        run(&mut sync, &mut now, 1);
    }
    send(&mut sync, Command::ScrubEnd);
    run(&mut sync, &mut now, 60);
    send(&mut sync, Command::Pause);

    let captions = vec![
        caption(1, 0.5, 3.0, "welcome"),
        caption(2, 4.0, 6.0, "the middle part"),
        caption(3, 7.5, 9.0, "wrapping up"),
    ];
    match drag_segment(&captions, 2, DragKind::Move, -1.5, 15.0) {
        Ok((start, end)) => info!(start, end, "caption drag resolved"),
        Err(error) => info!(%error, "caption drag rejected"),
    }

    let state = sync.state();
    info!(
        current_time = state.current_time,
        duration = state.duration,
        is_playing = state.is_playing,
        "demo finished"
    );
}

fn run(sync: &mut Synchronizer<SimulatedHandle>, now: &mut Instant, steps: usize) {
    for _ in 0..steps {
        for target in [
            HandleTarget::Audio,
            HandleTarget::Video(0),
            HandleTarget::Video(1),
        ] {
            let media_events = sync.pool_mut().handle_mut(target).advance(STEP.as_secs_f64());
            for event in media_events {
                for emitted in sync.media_event(target, event) {
                    log_event(&emitted);
                }
            }
        }
        *now += STEP;
        for emitted in sync.tick(*now) {
            log_event(&emitted);
        }
    }
}

fn send(sync: &mut Synchronizer<SimulatedHandle>, command: Command) {
    info!(?command, "sending");
    for event in sync.handle_command(command) {
        log_event(&event);
    }
}

fn log_event(event: &Event) {
    match event {
        Event::TimeChanged { .. } => {}
        other => info!(event = ?other, "engine event"),
    }
}

fn media(id: u64, locator: &str, duration: f64) -> MediaRef {
    MediaRef {
        id,
        kind: MediaKind::Video,
        locator: locator.to_owned(),
        duration: Some(duration),
    }
}

fn clip(id: u64, media: MediaRef, start: f64, trim_start: f64, duration: f64) -> Clip {
    let base = media.duration.unwrap_or(duration);
    Clip {
        id,
        media,
        start,
        base_duration: base,
        trim_start,
        trim_end: trim_start + duration,
    }
}

fn caption(id: u64, start: f64, end: f64, text: &str) -> CaptionSegment {
    CaptionSegment {
        id,
        start,
        end,
        text: text.to_owned(),
    }
}
