use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::captions::{self, SegmentId};
use crate::error::Result;
use crate::time::COMMIT_DEBOUNCE;

pub type JobId = u64;

/// Position and size of the subtitle box over the video, in normalized
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubtitleLayout {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

/// Write path of the transcript/job collaborator.
///
/// Implementations talk to the remote store; they report failures through
/// [`crate::EngineError`] but the committer swallows them, since local state
/// stays authoritative either way.
pub trait CommitSink {
    fn commit_window(
        &mut self,
        job_id: JobId,
        segment_id: SegmentId,
        start: f64,
        end: f64,
    ) -> Result<()>;

    fn commit_layout(&mut self, job_id: JobId, layout: &serde_json::Value) -> Result<()>;
}

/// Trailing-edge debounce over the commit sink.
///
/// Mid-drag updates coalesce so only the latest window per edit burst is
/// written, roughly half a second after the last change; releasing the drag
/// flushes immediately through [`DebouncedCommitter::flush_now`]. Sink
/// failures are logged and dropped.
#[derive(Debug)]
pub struct DebouncedCommitter<S> {
    sink: S,
    job_id: JobId,
    pending_window: Option<(SegmentId, f64, f64)>,
    pending_layout: Option<SubtitleLayout>,
    deadline: Option<Instant>,
}

impl<S: CommitSink> DebouncedCommitter<S> {
    pub fn new(sink: S, job_id: JobId) -> Self {
        Self {
            sink,
            job_id,
            pending_window: None,
            pending_layout: None,
            deadline: None,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending_window.is_some() || self.pending_layout.is_some()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Queues a caption window write. Invalid windows are dropped here so
    /// the store is never asked to persist them.
    pub fn queue_window(&mut self, now: Instant, segment_id: SegmentId, start: f64, end: f64) {
        if let Err(error) = captions::validate_window(segment_id, start, end) {
            warn!(%error, "dropping caption commit");
            return;
        }
        // A burst only ever edits one segment; a different id means a new
        // burst, so the previous one flushes first.
        if let Some((pending_id, _, _)) = self.pending_window
            && pending_id != segment_id
        {
            self.flush_now();
        }
        self.pending_window = Some((segment_id, start, end));
        self.deadline = Some(now + COMMIT_DEBOUNCE);
    }

    pub fn queue_layout(&mut self, now: Instant, layout: SubtitleLayout) {
        self.pending_layout = Some(layout);
        self.deadline = Some(now + COMMIT_DEBOUNCE);
    }

    /// Flushes when the debounce window has elapsed. Called from the host's
    /// frame tick.
    pub fn flush_due(&mut self, now: Instant) {
        if let Some(deadline) = self.deadline
            && now >= deadline
        {
            self.flush_now();
        }
    }

    /// Flushes immediately, e.g. on drag release. Failures are swallowed;
    /// the local edit already happened.
    pub fn flush_now(&mut self) {
        self.deadline = None;

        if let Some((segment_id, start, end)) = self.pending_window.take() {
            debug!(job_id = self.job_id, segment_id, start, end, "committing caption window");
            if let Err(error) = self.sink.commit_window(self.job_id, segment_id, start, end) {
                warn!(%error, segment_id, "caption commit failed, keeping local state");
            }
        }

        if let Some(layout) = self.pending_layout.take() {
            match serde_json::to_value(layout) {
                Ok(value) => {
                    debug!(job_id = self.job_id, "committing subtitle layout");
                    if let Err(error) = self.sink.commit_layout(self.job_id, &value) {
                        warn!(%error, "layout commit failed, keeping local state");
                    }
                }
                Err(source) => {
                    warn!(job_id = self.job_id, %source, "subtitle layout failed to serialize");
                }
            }
        }
    }
}
