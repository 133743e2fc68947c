//! UI-agnostic clip timeline and playback synchronization engine.
//!
//! Hosts wire in a [`media::MediaHandle`] implementation and pump commands,
//! frame ticks and media notifications through [`sync::Synchronizer`].

pub mod captions;
pub mod clip;
pub mod commit;
pub mod error;
pub mod media;
pub mod pool;
pub mod ranges;
pub mod sim;
pub mod swap;
pub mod sync;
pub mod time;

pub use captions::{CaptionSegment, DragKind, NeighborBounds, SegmentId, drag_segment, resolve_drag};
pub use clip::{Clip, ClipId};
pub use commit::{CommitSink, DebouncedCommitter, JobId, SubtitleLayout};
pub use error::{EngineError, Result};
pub use media::{MediaEvent, MediaHandle, MediaId, MediaKind, MediaRef, ReadyState};
pub use pool::{HandlePool, HandleTarget};
pub use ranges::{TimelineRange, compute_ranges, range_at, timeline_duration};
pub use sim::SimulatedHandle;
pub use swap::{BufferSwapper, SwitchKind};
pub use sync::{Command, Event, PlaybackState, Synchronizer};
