//! Where composited frames go.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use crate::error::RuntimeError;

/// Consumes composited frames.
pub trait FrameSink: Send {
    fn write(&mut self, frame: &RgbImage) -> Result<(), RuntimeError>;

    /// Frames accepted so far.
    fn written(&self) -> u64;

    /// Flush anything buffered. Called once after the last frame.
    fn finish(&mut self) -> Result<(), RuntimeError> {
        Ok(())
    }
}

/// Writes `frame_000001.png`, `frame_000002.png`, ... into a directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    written: u64,
}

impl PngSequenceSink {
    /// Create `dir` (and parents) if needed.
    pub fn create(dir: &Path) -> Result<Self, RuntimeError> {
        fs::create_dir_all(dir)?;
        tracing::info!(dir = %dir.display(), "Writing frames as PNG");
        Ok(Self {
            dir: dir.to_path_buf(),
            written: 0,
        })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the `n`th frame (1-based) is written to.
    #[must_use]
    pub fn frame_path(&self, n: u64) -> PathBuf {
        self.dir.join(format!("frame_{n:06}.png"))
    }
}

impl FrameSink for PngSequenceSink {
    fn write(&mut self, frame: &RgbImage) -> Result<(), RuntimeError> {
        let path = self.frame_path(self.written + 1);
        frame
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|source| RuntimeError::Encode { path, source })?;
        self.written += 1;
        Ok(())
    }

    fn written(&self) -> u64 {
        self.written
    }

    fn finish(&mut self) -> Result<(), RuntimeError> {
        tracing::info!(dir = %self.dir.display(), frames = self.written, "Frame sequence complete");
        Ok(())
    }
}

/// Discards frames, counting them. Used for dry runs and benchmarks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink {
    written: u64,
}

impl FrameSink for NullSink {
    fn write(&mut self, _frame: &RgbImage) -> Result<(), RuntimeError> {
        self.written += 1;
        Ok(())
    }

    fn written(&self) -> u64 {
        self.written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_frames_are_numbered_from_one() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/out");
        let mut sink = PngSequenceSink::create(&out).unwrap();
        let frame = RgbImage::from_pixel(3, 2, image::Rgb([1, 2, 3]));
        sink.write(&frame).unwrap();
        sink.write(&frame).unwrap();
        sink.finish().unwrap();

        assert_eq!(sink.written(), 2);
        assert!(out.join("frame_000001.png").is_file());
        let second = image::open(out.join("frame_000002.png")).unwrap().to_rgb8();
        assert_eq!(second.get_pixel(2, 1).0, [1, 2, 3]);
        assert!(!out.join("frame_000003.png").exists());
    }

    #[test]
    fn null_sink_counts() {
        let mut sink = NullSink::default();
        sink.write(&RgbImage::new(1, 1)).unwrap();
        assert_eq!(sink.written(), 1);
    }
}
