//! Overlay text.
//!
//! Text is drawn with a user-supplied TrueType font. Without one every text
//! call is a no-op, so shapes still render on machines with no font
//! configured.

use std::fmt;
use std::fs;
use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use flamelab_core::{Rgb, UiSettings};
use image::RgbImage;
use imageproc::drawing::{draw_text_mut, text_size};

use crate::draw::px;
use crate::error::RenderError;

/// Ascent as a fraction of the pixel size, used to place text by baseline.
const ASCENT: f32 = 0.8;

/// Draws text with an optional font.
#[derive(Clone, Default)]
pub struct TextRenderer {
    font: Option<FontArc>,
}

impl fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextRenderer")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl TextRenderer {
    /// A renderer that draws nothing.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { font: None }
    }

    /// Load a TrueType or OpenType font file.
    pub fn from_file(path: &Path) -> Result<Self, RenderError> {
        let bytes = fs::read(path).map_err(|source| RenderError::FontRead {
            path: path.to_path_buf(),
            source,
        })?;
        let font = FontArc::try_from_vec(bytes).map_err(|e| RenderError::FontParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "Loaded overlay font");
        Ok(Self { font: Some(font) })
    }

    /// Font from `ui.font_path`, or a disabled renderer when none is set.
    pub fn from_settings(ui: &UiSettings) -> Result<Self, RenderError> {
        match &ui.font_path {
            Some(path) => Self::from_file(path),
            None => {
                tracing::info!("No overlay font configured; text will not be drawn");
                Ok(Self::disabled())
            }
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.font.is_some()
    }

    /// Draw `text` with its baseline at `baseline`, starting at `x`.
    pub fn draw(&self, img: &mut RgbImage, text: &str, x: i32, baseline: i32, size: f32, color: Rgb) {
        let Some(font) = &self.font else {
            return;
        };
        if text.is_empty() {
            return;
        }
        let top = baseline - (size * ASCENT) as i32;
        draw_text_mut(img, px(color), x, top, PxScale::from(size), font, text);
    }

    /// Draw text twice, a wider `outline` pass under the main colour.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_outlined(
        &self,
        img: &mut RgbImage,
        text: &str,
        x: i32,
        baseline: i32,
        size: f32,
        color: Rgb,
        outline: Rgb,
    ) {
        for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            self.draw(img, text, x + dx, baseline + dy, size, outline);
        }
        self.draw(img, text, x, baseline, size, color);
    }

    /// Rendered width in pixels. Without a font, a fixed-pitch estimate.
    #[must_use]
    pub fn width(&self, text: &str, size: f32) -> u32 {
        match &self.font {
            Some(font) => text_size(PxScale::from(size), font, text).0,
            None => (text.chars().count() as f32 * size * 0.5) as u32,
        }
    }
}

/// Greedy word wrap at `width` columns.
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    textwrap::wrap(text, width)
        .into_iter()
        .map(std::borrow::Cow::into_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_renderer_draws_nothing() {
        let text = TextRenderer::disabled();
        let mut img = RgbImage::new(100, 40);
        text.draw(&mut img, "IGNITION", 5, 25, 18.0, Rgb::WHITE);
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0]));
        assert!(!text.is_enabled());
        assert_eq!(text.width("abcd", 10.0), 20);
    }

    #[test]
    fn missing_font_file_is_an_error() {
        let err = TextRenderer::from_file(Path::new("/nonexistent/font.ttf")).unwrap_err();
        assert!(matches!(err, RenderError::FontRead { .. }));
    }

    #[test]
    fn garbage_font_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ttf");
        fs::write(&path, b"not a font").unwrap();
        assert!(matches!(
            TextRenderer::from_file(&path),
            Err(RenderError::FontParse { .. })
        ));
    }

    #[test]
    fn no_font_path_means_disabled() {
        let text = TextRenderer::from_settings(&UiSettings::default()).unwrap();
        assert!(!text.is_enabled());
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("Dip finger in chemical then touch flame area", 12);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 12));
    }
}
