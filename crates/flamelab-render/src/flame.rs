//! Procedural flames drawn on burning fingertips.
//!
//! A flame is a noisy teardrop outline filled with a vertical heat gradient,
//! a soft glow around its base and a bright core at the fingertip.

use std::f32::consts::TAU;

use flamelab_core::geometry::hash_noise;
use flamelab_core::{Chemical, Point, Rgb};
use image::RgbImage;

use crate::draw::{PolygonMask, blend_glow, blend_pixel, fill_circle};

/// Points in a flame outline.
pub const FLAME_POINTS: usize = 16;

const NOISE_TIME_SCALE: f32 = 0.08;

/// Outline of a flame rising from `pos`.
///
/// Height and width scale with `intensity`; the outline wobbles with
/// `frame_count` so consecutive frames animate.
#[must_use]
pub fn generate_shape(pos: Point, frame_count: u64, intensity: f32) -> Vec<Point> {
    let height = (100.0 * intensity).trunc();
    let width = (50.0 * intensity).trunc();
    let time = frame_count as f32 * NOISE_TIME_SCALE;

    (0..FLAME_POINTS)
        .map(|k| {
            let height_factor = k as f32 / FLAME_POINTS as f32;
            let angle = height_factor * TAU;
            let base_radius = width * 0.6f32.mul_add(-height_factor, 1.0);

            let noise_x = hash_noise(angle * 3.0, time) * 15.0 * intensity;
            let noise_y = hash_noise(angle.mul_add(3.0, 100.0), time) * 8.0 * intensity;

            let radius = base_radius + noise_x;
            let x = radius.mul_add(angle.cos(), pos.x as f32);
            let y = height_factor.mul_add(-height, pos.y as f32) + noise_y;
            Point::new(x as i32, y as i32)
        })
        .collect()
}

/// Flame colour at a point of the gradient.
///
/// `gradient` is 0 at the base (the fingertip) and 1 at the tip of the flame;
/// the top 30% is pushed towards white-yellow. The result is scaled by
/// `intensity`.
#[must_use]
pub fn flame_color(base: Rgb, intensity: f32, gradient: f32) -> Rgb {
    let (mut r, mut g, mut b) = (f32::from(base.r), f32::from(base.g), f32::from(base.b));

    if gradient > 0.7 {
        let heat = (gradient - 0.7) / 0.3;
        r = (heat * (255.0 - r)).mul_add(0.8, r).min(255.0);
        g = (heat * (255.0 - g)).mul_add(0.6, g).min(255.0);
        b = heat.mul_add(50.0, b).min(255.0);
    }

    Rgb::new(
        (r * intensity) as u8,
        (g * intensity) as u8,
        (b * intensity) as u8,
    )
}

/// Draws flames.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlameRenderer;

impl FlameRenderer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Draw a flame for `chemical` at `pos`.
    ///
    /// `flame_intensity` is the finger's current flicker level; the drawn
    /// size is the chemical's own intensity scaled by it.
    pub fn render(
        &self,
        img: &mut RgbImage,
        pos: Point,
        chemical: &Chemical,
        flame_intensity: f32,
        frame_count: u64,
    ) {
        let intensity = chemical.intensity * flame_intensity.clamp(0.0, 1.0);
        if intensity <= 0.0 {
            return;
        }

        let shape = generate_shape(pos, frame_count, intensity);
        Self::fill_gradient(img, &shape, chemical.color, intensity, frame_count);
        Self::glow(img, pos, chemical.color, intensity);
        Self::core(img, pos, chemical.color, intensity);
    }

    fn fill_gradient(img: &mut RgbImage, shape: &[Point], color: Rgb, intensity: f32, frame_count: u64) {
        let Some(mask) = PolygonMask::new(shape) else {
            return;
        };
        let Some((min_y, max_y)) = mask.row_span() else {
            return;
        };
        let span = (max_y - min_y).max(1) as f32;
        let frame = frame_count as f32;

        for y in min_y..=max_y {
            let gradient = (max_y - y) as f32 / span;
            let flicker = 0.2f32.mul_add((frame * 0.3 + y as f32 * 0.1).sin(), 0.8);
            let row_intensity = intensity * 0.7f32.mul_add(gradient, 0.3) * flicker;
            let row_color = flame_color(color, row_intensity, gradient);
            let alpha = 0.7 * row_intensity;
            for x in mask.row(y) {
                blend_pixel(img, x, y, row_color, alpha);
            }
        }
    }

    fn glow(img: &mut RgbImage, pos: Point, color: Rgb, intensity: f32) {
        let radius = (60.0 * intensity) as i32;
        blend_glow(img, pos, radius, color, 0.4 * intensity);
    }

    fn core(img: &mut RgbImage, pos: Point, color: Rgb, intensity: f32) {
        let radius = (15.0 * intensity) as i32;
        fill_circle(img, pos, radius, color.scale(1.5));
        fill_circle(img, pos, radius / 2, Rgb::WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flamelab_core::Element;

    #[test]
    fn shape_has_sixteen_points_within_bounds() {
        let pos = Point::new(200, 300);
        for frame in [0, 7, 1234] {
            let shape = generate_shape(pos, frame, 0.9);
            assert_eq!(shape.len(), FLAME_POINTS);
            for p in &shape {
                // Height 90 plus vertical noise up to 8 * 0.9.
                assert!(p.y <= pos.y + 8 && p.y >= pos.y - 90 - 8, "{p:?}");
                assert!((p.x - pos.x).abs() <= 45 + 7, "{p:?}");
            }
        }
    }

    #[test]
    fn shape_animates_between_frames() {
        let pos = Point::new(50, 50);
        assert_ne!(generate_shape(pos, 1, 1.0), generate_shape(pos, 40, 1.0));
    }

    #[test]
    fn top_of_flame_is_whitest() {
        let base = Rgb::new(255, 0, 0);
        let fingertip = flame_color(base, 1.0, 0.0);
        let top = flame_color(base, 1.0, 1.0);
        assert_eq!(fingertip, base);
        assert_eq!(top.r, 255);
        assert!((152..=153).contains(&top.g));
        assert!((49..=50).contains(&top.b));
        assert_eq!(flame_color(base, 1.0, 0.7), base);
        assert_eq!(flame_color(base, 0.5, 0.0), Rgb::new(127, 0, 0));
    }

    #[test]
    fn render_draws_white_core_at_fingertip() {
        let mut img = RgbImage::new(200, 200);
        let chem = Element::Li.chemical();
        FlameRenderer::new().render(&mut img, Point::new(100, 150), chem, 1.0, 3);
        assert_eq!(img.get_pixel(100, 150).0, [255, 255, 255]);
        // The flame body above the fingertip is tinted red.
        let above = img.get_pixel(100, 120).0;
        assert!(above[0] > above[2]);
        // Far corners are untouched.
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn zero_intensity_draws_nothing() {
        let mut img = RgbImage::new(64, 64);
        FlameRenderer::new().render(&mut img, Point::new(32, 32), Element::Na.chemical(), 0.0, 0);
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0]));
    }
}
