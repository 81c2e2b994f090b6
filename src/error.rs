use thiserror::Error;

/// Errors produced while preparing or drawing a wheel frame.
///
/// None of these are fatal: a failed frame is skipped and the next data or
/// rotation change tries again.
#[derive(Debug, Error)]
pub enum WheelError {
    #[error("segment {name:?} has invalid percentage {percentage}")]
    InvalidSegmentData { name: String, percentage: f64 },

    #[error("segment {name:?} spans zero degrees")]
    DegenerateSegment { name: String },

    #[error("drawing surface unavailable: {width}x{height} with {len} bytes")]
    SurfaceUnavailable {
        width: usize,
        height: usize,
        len: usize,
    },

    #[error("invalid wheel configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid color {0:?}")]
    InvalidColor(String),

    #[error("window error: {0}")]
    Window(String),
}
