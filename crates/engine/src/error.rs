use std::fmt::{Display, Formatter};

/// Result type used by the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors produced by caption edits and commit sinks.
#[derive(Debug)]
pub enum EngineError {
    SegmentNotFound {
        segment_id: u64,
    },
    InvalidCaptionWindow {
        segment_id: u64,
        start: f64,
        end: f64,
    },
    CommitRejected {
        segment_id: u64,
        reason: String,
    },
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SegmentNotFound { segment_id } => {
                write!(f, "caption segment not found: {segment_id}")
            }
            Self::InvalidCaptionWindow {
                segment_id,
                start,
                end,
            } => write!(
                f,
                "caption {segment_id} has an invalid window: {start}..{end}"
            ),
            Self::CommitRejected { segment_id, reason } => {
                write!(f, "commit rejected for caption {segment_id}: {reason}")
            }
        }
    }
}

impl std::error::Error for EngineError {}
