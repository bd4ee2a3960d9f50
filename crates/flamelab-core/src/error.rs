//! Domain error types.

use thiserror::Error;

/// Errors raised by the lab domain model.
#[derive(Debug, Error)]
pub enum LabError {
    /// Unknown chemical symbol.
    #[error("Unknown chemical symbol '{0}'")]
    UnknownElement(String),

    /// Unknown hand label.
    #[error("Unknown hand '{0}' (expected Left or Right)")]
    UnknownHand(String),

    /// Unknown finger name or malformed finger id.
    #[error("Unknown finger '{0}'")]
    UnknownFinger(String),

    /// A detector reported an incomplete hand skeleton.
    #[error("Hand skeleton has {actual} landmarks, expected at least {expected}")]
    TooFewLandmarks { expected: usize, actual: usize },
}

/// Errors raised by frame sources and hand detectors.
#[derive(Debug, Error)]
pub enum PortError {
    /// The frame source failed to produce a frame.
    #[error("Frame source failed: {0}")]
    Source(String),

    /// The hand detector failed on a frame.
    #[error("Hand detection failed: {0}")]
    Detection(String),

    /// A frame file exists but could not be decoded.
    #[error("Failed to decode frame {path}: {source}")]
    Decode {
        path: std::path::PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Domain validation failed on detector output.
    #[error(transparent)]
    Lab(#[from] LabError),

    /// IO error (frame files, traces).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
