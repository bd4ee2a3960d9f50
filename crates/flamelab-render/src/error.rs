//! Render error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while setting up renderers.
///
/// Drawing itself cannot fail: everything is clipped to the frame.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The font file could not be read.
    #[error("Failed to read font {path}: {source}")]
    FontRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The font file is not a usable TrueType/OpenType font.
    #[error("Invalid font {path}: {reason}")]
    FontParse { path: PathBuf, reason: String },
}
