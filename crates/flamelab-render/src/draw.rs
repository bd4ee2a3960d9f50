//! Pixel-level helpers shared by the renderers.
//!
//! Shape outlines and fills go through `imageproc`; translucent effects
//! (glows, overlays, smoke) are blended here directly because `RgbImage`
//! has no alpha channel.

use flamelab_core::geometry::{Rect, gaussian_falloff};
use flamelab_core::{Point, Rgb};
use image::{GrayImage, Luma, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_ellipse_mut, draw_filled_rect_mut, draw_hollow_circle_mut,
    draw_hollow_ellipse_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_polygon_mut,
};

#[inline]
pub(crate) const fn px(c: Rgb) -> image::Rgb<u8> {
    image::Rgb(c.to_array())
}

fn in_bounds(img: &RgbImage, x: i32, y: i32) -> bool {
    x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height()
}

/// Blend `color` over one pixel. Out-of-frame coordinates are ignored.
pub fn blend_pixel(img: &mut RgbImage, x: i32, y: i32, color: Rgb, alpha: f32) {
    if !in_bounds(img, x, y) {
        return;
    }
    let a = alpha.clamp(0.0, 1.0);
    let p = img.get_pixel_mut(x as u32, y as u32);
    for (dst, src) in p.0.iter_mut().zip(color.to_array()) {
        *dst = f32::from(*dst).mul_add(1.0 - a, f32::from(src) * a) as u8;
    }
}

/// Blend a solid colour over a rectangle, clipped to the frame.
pub fn blend_rect(img: &mut RgbImage, rect: Rect, color: Rgb, alpha: f32) {
    let x0 = rect.x.max(0);
    let y0 = rect.y.max(0);
    let x1 = (rect.x + rect.width).min(img.width() as i32);
    let y1 = (rect.y + rect.height).min(img.height() as i32);
    for y in y0..y1 {
        for x in x0..x1 {
            blend_pixel(img, x, y, color, alpha);
        }
    }
}

/// Radial glow: alpha falls off as a gaussian from `peak_alpha` at the
/// centre to zero at `radius`. Nothing outside the disc is touched.
pub fn blend_glow(img: &mut RgbImage, center: Point, radius: i32, color: Rgb, peak_alpha: f32) {
    if radius <= 0 || peak_alpha <= 0.0 {
        return;
    }
    let r = radius as f32;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let d = ((dx * dx + dy * dy) as f32).sqrt();
            let falloff = gaussian_falloff(d, r);
            if falloff > 0.0 {
                blend_pixel(img, center.x + dx, center.y + dy, color, peak_alpha * falloff);
            }
        }
    }
}

/// Blend a uniformly translucent disc.
pub fn blend_disc(img: &mut RgbImage, center: Point, radius: i32, color: Rgb, alpha: f32) {
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                blend_pixel(img, center.x + dx, center.y + dy, color, alpha);
            }
        }
    }
}

pub fn fill_circle(img: &mut RgbImage, center: Point, radius: i32, color: Rgb) {
    if radius > 0 {
        draw_filled_circle_mut(img, (center.x, center.y), radius, px(color));
    }
}

/// Circle outline `thickness` pixels wide, growing inwards from `radius`.
pub fn ring(img: &mut RgbImage, center: Point, radius: i32, thickness: i32, color: Rgb) {
    for t in 0..thickness.max(1) {
        let r = radius - t;
        if r > 0 {
            draw_hollow_circle_mut(img, (center.x, center.y), r, px(color));
        }
    }
}

pub fn fill_ellipse(img: &mut RgbImage, center: Point, rx: i32, ry: i32, color: Rgb) {
    if rx > 0 && ry > 0 {
        draw_filled_ellipse_mut(img, (center.x, center.y), rx, ry, px(color));
    }
}

pub fn ellipse_outline(img: &mut RgbImage, center: Point, rx: i32, ry: i32, thickness: i32, color: Rgb) {
    for t in 0..thickness.max(1) {
        if rx - t > 0 && ry - t > 0 {
            draw_hollow_ellipse_mut(img, (center.x, center.y), rx - t, ry - t, px(color));
        }
    }
}

fn imageproc_rect(rect: Rect) -> Option<imageproc::rect::Rect> {
    (rect.width > 0 && rect.height > 0).then(|| {
        imageproc::rect::Rect::at(rect.x, rect.y).of_size(rect.width as u32, rect.height as u32)
    })
}

pub fn fill_rect(img: &mut RgbImage, rect: Rect, color: Rgb) {
    if let Some(r) = imageproc_rect(rect) {
        draw_filled_rect_mut(img, r, px(color));
    }
}

/// Rectangle outline `thickness` pixels wide, growing inwards.
pub fn rect_outline(img: &mut RgbImage, rect: Rect, thickness: i32, color: Rgb) {
    for t in 0..thickness.max(1) {
        let inner = Rect::new(
            rect.x + t,
            rect.y + t,
            rect.width - 2 * t,
            rect.height - 2 * t,
        );
        if let Some(r) = imageproc_rect(inner) {
            draw_hollow_rect_mut(img, r, px(color));
        }
    }
}

pub fn line(img: &mut RgbImage, from: Point, to: Point, color: Rgb) {
    draw_line_segment_mut(
        img,
        (from.x as f32, from.y as f32),
        (to.x as f32, to.y as f32),
        px(color),
    );
}

/// A line `thickness` pixels wide, thickened perpendicular to its dominant axis.
pub fn thick_line(img: &mut RgbImage, from: Point, to: Point, thickness: i32, color: Rgb) {
    let horizontal = (to.x - from.x).abs() >= (to.y - from.y).abs();
    for t in 0..thickness.max(1) {
        let (dx, dy) = if horizontal { (0, t) } else { (t, 0) };
        line(img, from.offset(dx, dy), to.offset(dx, dy), color);
    }
}

/// Connected line segments through `points`.
pub fn polyline(img: &mut RgbImage, points: &[Point], color: Rgb) {
    for pair in points.windows(2) {
        line(img, pair[0], pair[1], color);
    }
}

fn clean_polygon(points: &[Point]) -> Vec<imageproc::point::Point<i32>> {
    let mut poly: Vec<_> = points
        .iter()
        .map(|p| imageproc::point::Point::new(p.x, p.y))
        .collect();
    poly.dedup();
    // imageproc closes the polygon itself and rejects an explicit closing point.
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }
    poly
}

pub fn fill_polygon(img: &mut RgbImage, points: &[Point], color: Rgb) {
    let poly = clean_polygon(points);
    if poly.len() >= 3 {
        draw_polygon_mut(img, &poly, px(color));
    }
}

/// Rasterised polygon coverage over its bounding box.
#[derive(Debug, Clone)]
pub struct PolygonMask {
    /// Frame position of the mask's top-left pixel.
    pub origin: Point,
    pub mask: GrayImage,
}

impl PolygonMask {
    /// Rasterise `points`. `None` for degenerate polygons.
    pub fn new(points: &[Point]) -> Option<Self> {
        let poly = clean_polygon(points);
        if poly.len() < 3 {
            return None;
        }
        let min_x = poly.iter().map(|p| p.x).min()?;
        let max_x = poly.iter().map(|p| p.x).max()?;
        let min_y = poly.iter().map(|p| p.y).min()?;
        let max_y = poly.iter().map(|p| p.y).max()?;

        let shifted: Vec<_> = poly
            .iter()
            .map(|p| imageproc::point::Point::new(p.x - min_x, p.y - min_y))
            .collect();
        let mut mask = GrayImage::new((max_x - min_x + 1) as u32, (max_y - min_y + 1) as u32);
        draw_polygon_mut(&mut mask, &shifted, Luma([255]));

        Some(Self {
            origin: Point::new(min_x, min_y),
            mask,
        })
    }

    /// Covered frame pixels in row `y`.
    pub fn row(&self, y: i32) -> impl Iterator<Item = i32> + '_ {
        let local = y - self.origin.y;
        let valid = local >= 0 && (local as u32) < self.mask.height();
        let width = if valid { self.mask.width() } else { 0 };
        (0..width)
            .filter(move |&x| self.mask.get_pixel(x, local as u32).0[0] > 0)
            .map(move |x| self.origin.x + x as i32)
    }

    /// First and last frame rows with any coverage.
    pub fn row_span(&self) -> Option<(i32, i32)> {
        let covered = |y: u32| (0..self.mask.width()).any(|x| self.mask.get_pixel(x, y).0[0] > 0);
        let first = (0..self.mask.height()).find(|&y| covered(y))?;
        let last = (0..self.mask.height()).rev().find(|&y| covered(y))?;
        Some((self.origin.y + first as i32, self.origin.y + last as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_pixel_mixes_and_clips() {
        let mut img = RgbImage::new(4, 4);
        blend_pixel(&mut img, 1, 1, Rgb::new(200, 100, 0), 0.5);
        assert_eq!(img.get_pixel(1, 1).0, [100, 50, 0]);
        blend_pixel(&mut img, -1, 9, Rgb::WHITE, 1.0);
        blend_pixel(&mut img, 2, 2, Rgb::WHITE, 3.0);
        assert_eq!(img.get_pixel(2, 2).0, [255, 255, 255]);
    }

    #[test]
    fn glow_is_bounded_to_its_disc() {
        let mut img = RgbImage::new(50, 50);
        blend_glow(&mut img, Point::new(25, 25), 10, Rgb::WHITE, 0.8);
        assert!(img.get_pixel(25, 25).0[0] > 150);
        assert_eq!(img.get_pixel(25, 36).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn blend_rect_clips_to_frame() {
        let mut img = RgbImage::new(10, 10);
        blend_rect(&mut img, Rect::new(5, 5, 20, 20), Rgb::WHITE, 1.0);
        assert_eq!(img.get_pixel(9, 9).0, [255, 255, 255]);
        assert_eq!(img.get_pixel(4, 4).0, [0, 0, 0]);
    }

    #[test]
    fn polygon_mask_covers_triangle() {
        let tri = [Point::new(10, 10), Point::new(20, 30), Point::new(0, 30), Point::new(10, 10)];
        let mask = PolygonMask::new(&tri).unwrap();
        assert_eq!(mask.origin, Point::new(0, 10));
        assert_eq!(mask.row_span(), Some((10, 30)));
        let row: Vec<_> = mask.row(29).collect();
        assert!(row.contains(&10));
        assert!(!row.contains(&25));
        assert_eq!(mask.row(5).count(), 0);
    }

    #[test]
    fn degenerate_polygon_has_no_mask() {
        assert!(PolygonMask::new(&[Point::new(1, 1), Point::new(1, 1), Point::new(2, 2)]).is_none());
    }
}
