//! Frame sources that need no camera.
//!
//! [`ImageSequenceSource`] replays a directory of stills, [`BackdropSource`]
//! synthesises plain frames. Live camera adapters implement
//! [`FrameSource`] the same way.

use std::fs;
use std::path::{Path, PathBuf};

use flamelab_core::{FrameSource, PortError, Rgb};
use image::RgbImage;
use image::imageops::flip_horizontal_in_place;

use crate::error::RuntimeError;

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FRAME_EXTENSIONS.iter().any(|f| ext.eq_ignore_ascii_case(f)))
}

/// Frames read from a directory in file-name order.
#[derive(Debug)]
pub struct ImageSequenceSource {
    name: String,
    frames: Vec<PathBuf>,
    cursor: usize,
    looping: bool,
    mirror: bool,
    size: (u32, u32),
}

impl ImageSequenceSource {
    /// Index `dir`. The frame size is taken from the first image.
    pub fn open(dir: &Path, looping: bool, mirror: bool) -> Result<Self, RuntimeError> {
        let read_dir = |source| RuntimeError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut frames = Vec::new();
        for entry in fs::read_dir(dir).map_err(read_dir)? {
            let path = entry.map_err(read_dir)?.path();
            if path.is_file() && is_frame_file(&path) {
                frames.push(path);
            }
        }
        frames.sort();

        let Some(first) = frames.first() else {
            return Err(RuntimeError::EmptySequence(dir.to_path_buf()));
        };
        let size = image::image_dimensions(first).map_err(|source| RuntimeError::Decode {
            path: first.clone(),
            source,
        })?;

        tracing::info!(
            dir = %dir.display(),
            frames = frames.len(),
            width = size.0,
            height = size.1,
            looping,
            "Opened image sequence"
        );

        Ok(Self {
            name: format!("images:{}", dir.display()),
            frames,
            cursor: 0,
            looping,
            mirror,
            size,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, PortError> {
        if self.cursor >= self.frames.len() {
            if !self.looping {
                return Ok(None);
            }
            self.cursor = 0;
        }

        let path = &self.frames[self.cursor];
        let mut frame = image::open(path)
            .map_err(|source| RuntimeError::Decode {
                path: path.clone(),
                source,
            })?
            .to_rgb8();
        self.cursor += 1;

        if frame.dimensions() != self.size {
            tracing::warn!(
                path = %path.display(),
                expected = ?self.size,
                actual = ?frame.dimensions(),
                "Frame size differs from the first frame"
            );
        }
        if self.mirror {
            flip_horizontal_in_place(&mut frame);
        }
        Ok(Some(frame))
    }

    fn frame_size(&self) -> (u32, u32) {
        self.size
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// What a [`BackdropSource`] paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backdrop {
    Solid(Rgb),
    /// Vertical gradient from `top` to `bottom`.
    Gradient { top: Rgb, bottom: Rgb },
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::Gradient {
            top: Rgb::gray(60),
            bottom: Rgb::gray(20),
        }
    }
}

impl Backdrop {
    fn paint(self, width: u32, height: u32) -> RgbImage {
        match self {
            Self::Solid(c) => RgbImage::from_pixel(width, height, image::Rgb(c.to_array())),
            Self::Gradient { top, bottom } => {
                let span = height.saturating_sub(1).max(1) as f32;
                RgbImage::from_fn(width, height, |_, y| {
                    let c = flamelab_core::color::blend(top, bottom, y as f32 / span);
                    image::Rgb(c.to_array())
                })
            }
        }
    }
}

/// Synthetic frames of a fixed backdrop, for runs driven purely by a trace.
#[derive(Debug, Clone)]
pub struct BackdropSource {
    frame: RgbImage,
    remaining: Option<u64>,
    mirror: bool,
}

impl BackdropSource {
    /// `frames` limits the run; `None` produces frames forever.
    #[must_use]
    pub fn new(width: u32, height: u32, backdrop: Backdrop, frames: Option<u64>, mirror: bool) -> Self {
        let mut frame = backdrop.paint(width, height);
        if mirror {
            flip_horizontal_in_place(&mut frame);
        }
        Self {
            frame,
            remaining: frames,
            mirror,
        }
    }

    #[must_use]
    pub const fn mirrored(&self) -> bool {
        self.mirror
    }
}

impl FrameSource for BackdropSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, PortError> {
        match &mut self.remaining {
            Some(0) => Ok(None),
            Some(n) => {
                *n -= 1;
                Ok(Some(self.frame.clone()))
            }
            None => Ok(Some(self.frame.clone())),
        }
    }

    fn frame_size(&self) -> (u32, u32) {
        self.frame.dimensions()
    }

    fn name(&self) -> &str {
        "backdrop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_frame(dir: &Path, name: &str, color: [u8; 3]) {
        let mut img = RgbImage::from_pixel(4, 2, image::Rgb(color));
        img.put_pixel(0, 0, image::Rgb([255, 255, 255]));
        img.save(dir.join(name)).unwrap();
    }

    #[test]
    fn sequence_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), "b.png", [0, 0, 200]);
        write_frame(dir.path(), "a.png", [200, 0, 0]);
        fs::write(dir.path().join("notes.txt"), "skip me").unwrap();

        let mut src = ImageSequenceSource::open(dir.path(), false, false).unwrap();
        assert_eq!(src.len(), 2);
        assert_eq!(src.frame_size(), (4, 2));

        let first = src.next_frame().unwrap().unwrap();
        assert_eq!(first.get_pixel(1, 1).0, [200, 0, 0]);
        let second = src.next_frame().unwrap().unwrap();
        assert_eq!(second.get_pixel(1, 1).0, [0, 0, 200]);
        assert!(src.next_frame().unwrap().is_none());
    }

    #[test]
    fn looping_sequence_restarts() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), "only.png", [10, 20, 30]);
        let mut src = ImageSequenceSource::open(dir.path(), true, false).unwrap();
        for _ in 0..3 {
            assert!(src.next_frame().unwrap().is_some());
        }
    }

    #[test]
    fn mirrored_sequence_flips_horizontally() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), "f.png", [0, 0, 0]);
        let mut src = ImageSequenceSource::open(dir.path(), false, true).unwrap();
        let frame = src.next_frame().unwrap().unwrap();
        assert_eq!(frame.get_pixel(3, 0).0, [255, 255, 255]);
        assert_eq!(frame.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn corrupt_later_frame_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), "a.png", [1, 2, 3]);
        fs::write(dir.path().join("b.png"), b"not a png").unwrap();

        let mut src = ImageSequenceSource::open(dir.path(), false, false).unwrap();
        assert!(src.next_frame().unwrap().is_some());
        match src.next_frame() {
            Err(PortError::Decode { path, .. }) => assert!(path.ends_with("b.png")),
            other => panic!("expected a decode error, got {other:?}"),
        }
    }

    #[test]
    fn empty_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ImageSequenceSource::open(dir.path(), false, false),
            Err(RuntimeError::EmptySequence(_))
        ));
    }

    #[test]
    fn missing_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            ImageSequenceSource::open(&missing, false, false),
            Err(RuntimeError::ReadDir { .. })
        ));
    }

    #[test]
    fn backdrop_counts_down() {
        let mut src = BackdropSource::new(8, 4, Backdrop::Solid(Rgb::gray(5)), Some(2), false);
        assert_eq!(src.frame_size(), (8, 4));
        assert_eq!(src.next_frame().unwrap().unwrap().get_pixel(7, 3).0, [5, 5, 5]);
        assert!(src.next_frame().unwrap().is_some());
        assert!(src.next_frame().unwrap().is_none());
    }

    #[test]
    fn gradient_runs_top_to_bottom() {
        let backdrop = Backdrop::Gradient {
            top: Rgb::WHITE,
            bottom: Rgb::BLACK,
        };
        let mut src = BackdropSource::new(2, 11, backdrop, None, true);
        let frame = src.next_frame().unwrap().unwrap();
        assert_eq!(frame.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(frame.get_pixel(1, 10).0, [0, 0, 0]);
        assert!(src.mirrored());
    }
}
