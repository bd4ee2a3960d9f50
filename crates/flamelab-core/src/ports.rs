//! Port traits for everything outside the lab model.
//!
//! Frame capture, hand detection and keyboard input are pluggable so the
//! simulator can run against a camera, a directory of stills or a recorded
//! trace without changes.

use image::RgbImage;

use crate::error::PortError;
use crate::hands::HandObservation;

/// Produces frames, one at a time.
pub trait FrameSource: Send {
    /// Next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<RgbImage>, PortError>;

    /// Nominal frame size as `(width, height)`.
    fn frame_size(&self) -> (u32, u32);

    /// Short description for logs.
    fn name(&self) -> &str;
}

/// Finds hands in a frame.
///
/// Detectors receive the frame index and size rather than pixels so that
/// replay detectors can stay frame-accurate; model-backed detectors keep the
/// frame they were handed by the source.
pub trait HandDetector: Send {
    fn detect(
        &mut self,
        frame_index: u64,
        width: u32,
        height: u32,
    ) -> Result<Vec<HandObservation>, PortError>;
}

/// Keyboard input, polled once per frame.
pub trait KeySource: Send {
    /// Keys pressed since the previous frame.
    fn keys_for(&mut self, frame_index: u64) -> Vec<char>;
}

/// A key source that never reports anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoKeys;

impl KeySource for NoKeys {
    fn keys_for(&mut self, _frame_index: u64) -> Vec<char> {
        Vec::new()
    }
}

/// A detector that never finds hands.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHands;

impl HandDetector for NoHands {
    fn detect(
        &mut self,
        _frame_index: u64,
        _width: u32,
        _height: u32,
    ) -> Result<Vec<HandObservation>, PortError> {
        Ok(Vec::new())
    }
}
