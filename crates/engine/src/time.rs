use std::time::Duration;

/// Shortest clip the timeline will keep after normalization, in seconds.
pub const MIN_CLIP_DURATION: f64 = 0.5;

/// Shortest caption window a drag may produce, in seconds.
pub const MIN_CAPTION_DURATION: f64 = 0.05;

/// Distance between clip end and next clip start below which no gap range
/// is emitted.
pub const GAP_TOLERANCE: f64 = 0.01;

/// Slack when matching a handle position against a clip's trimmed end.
pub const BOUNDARY_EPSILON: f64 = 0.02;

/// Positions closer than this are treated as already seeked.
pub const SEEK_TOLERANCE: f64 = 0.05;

/// Window ahead of a boundary time in which a clip counts as adjacent.
pub const ADJACENCY_LOOKAHEAD: f64 = 0.05;

/// Bound on how long a cold switch waits for a readiness notification.
pub const COLD_SWITCH_FALLBACK: Duration = Duration::from_millis(300);

/// Minimum spacing between emitted time updates (~30 per second).
pub const TIME_EMIT_INTERVAL: Duration = Duration::from_millis(33);

/// Quiet period after the last caption-timing change before a commit fires.
pub const COMMIT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Returns true when `a` and `b` are within `tolerance` of each other.
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// Clamps `value` into `[0, max]`, mapping non-finite input to 0.
pub fn clamp_time(value: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, max.max(0.0))
}

/// Returns true for finite, strictly positive durations.
pub fn is_valid_duration(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
