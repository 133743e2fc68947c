use serde::{Deserialize, Serialize};

/// Opaque identifier for media resources.
pub type MediaId = u64;

/// Stream kind of a media resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Audio,
    Video,
}

/// Handle to one decodable media resource owned by the import collaborator.
///
/// The engine only reads these; `duration` may arrive asynchronously after
/// the resource has been probed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRef {
    pub id: MediaId,
    pub kind: MediaKind,
    pub locator: String,
    pub duration: Option<f64>,
}

/// Buffering state reported by a playback handle.
///
/// Ordered: `CanPlay` implies metadata is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    Empty,
    Metadata,
    CanPlay,
}

/// Asynchronous notifications a host forwards from its playback handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    MetadataLoaded,
    CanPlay,
    /// First decoded frame after a play or seek became visible.
    FirstFrame,
    /// Coarse position notification from the handle's own clock.
    PositionChanged { seconds: f64 },
    Ended,
    Stalled,
}

/// Contract the engine requires from a platform playback handle.
///
/// Implementations wrap whatever the host exposes (a media element, a decode
/// pipeline). All calls are synchronous requests; completion is reported
/// through [`MediaEvent`]s. `play` returns `Err(())` when the host refuses
/// to start (autoplay policy); every other failure surfaces as a lack of
/// progress, never a panic.
pub trait MediaHandle {
    /// Assigns a new source. Resets position and readiness.
    fn set_source(&mut self, media: &MediaRef);

    /// Id of the currently assigned source, if any.
    fn source(&self) -> Option<MediaId>;

    /// Requests playback. `Err` means the host rejected the request.
    fn play(&mut self) -> std::result::Result<(), ()>;

    fn pause(&mut self);

    /// Requests a position change. May be deferred by the host until the
    /// handle is ready; the engine re-applies latched seeks on readiness.
    fn seek(&mut self, seconds: f64);

    /// Current position in source seconds.
    fn position(&self) -> f64;

    fn ready(&self) -> ReadyState;

    fn set_muted(&mut self, muted: bool);

    fn muted(&self) -> bool;

    fn is_playing(&self) -> bool;
}
