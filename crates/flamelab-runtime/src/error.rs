//! Runtime error types.

use std::io;
use std::path::PathBuf;

use flamelab_core::{LabError, PortError, SettingsError};
use flamelab_render::RenderError;

/// Errors raised while wiring sources, traces and sinks together.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// A frame directory had no decodable images.
    #[error("No png or jpg frames found in {0}")]
    EmptySequence(PathBuf),

    /// Listing a frame directory failed.
    #[error("Failed to read frame directory {path}: {source}")]
    ReadDir { path: PathBuf, source: io::Error },

    /// A frame file could not be decoded.
    #[error("Failed to decode frame {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    /// A composited frame could not be written.
    #[error("Failed to write frame {path}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    /// A trace file could not be read.
    #[error("Failed to read trace {path}: {source}")]
    TraceRead { path: PathBuf, source: io::Error },

    /// A trace line is not valid JSON for a trace record.
    #[error("Trace {path}, line {line}: {source}")]
    TraceParse {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    /// A trace line parsed but describes an impossible hand.
    #[error("Trace {path}, line {line}: {source}")]
    TraceHand {
        path: PathBuf,
        line: usize,
        source: LabError,
    },

    /// Frame numbers in a trace must increase.
    #[error("Trace {path}, line {line}: frame {frame} is not after frame {previous}")]
    TraceOrder {
        path: PathBuf,
        line: usize,
        frame: u64,
        previous: u64,
    },

    /// A record without a frame number follows the largest one.
    #[error("Trace {path}, line {line}: frame number after {previous} overflows")]
    TraceFrameOverflow {
        path: PathBuf,
        line: usize,
        previous: u64,
    },

    /// The capture thread could not be started.
    #[error("Failed to spawn capture thread: {0}")]
    Spawn(io::Error),

    /// The capture thread exited without reporting the end of its source.
    #[error("Capture thread stopped unexpectedly")]
    CaptureThreadDied,

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Port(#[from] PortError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// IO error (output directories).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<RuntimeError> for PortError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::Port(inner) => inner,
            RuntimeError::Decode { path, source } => Self::Decode { path, source },
            other => Self::Source(other.to_string()),
        }
    }
}
