use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a landmark detector for a single frame.
///
/// The overlay never propagates these; a failed detection is drawn the same
/// way as a frame with no face.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectError {
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error("Detector unavailable: {0}")]
    Unavailable(String),
}
