//! Bench beakers, the water beaker and the ignition area.

use flamelab_core::geometry::Rect;
use flamelab_core::{BenchBeaker, Chemical, LabSettings, Point, Rgb};
use image::RgbImage;

use crate::draw::{
    blend_glow, blend_rect, ellipse_outline, fill_circle, fill_ellipse, fill_polygon, fill_rect,
    polyline, rect_outline, ring,
};
use crate::text::TextRenderer;

const GLASS: Rgb = Rgb::gray(80);
const REFLECTION: Rgb = Rgb::gray(200);

/// Draws the lab furniture. Animations advance once per [`render`](Self::render).
#[derive(Debug, Clone, Default)]
pub struct BeakerRenderer {
    animation_frame: u64,
    text: TextRenderer,
}

impl BeakerRenderer {
    #[must_use]
    pub const fn new(text: TextRenderer) -> Self {
        Self {
            animation_frame: 0,
            text,
        }
    }

    #[must_use]
    pub const fn animation_frame(&self) -> u64 {
        self.animation_frame
    }

    fn phase(&self, rate: f32) -> f32 {
        (self.animation_frame as f32 * rate).sin()
    }

    /// Draw the ignition area, every bench beaker and the water beaker.
    pub fn render(&mut self, img: &mut RgbImage, lab: &LabSettings) {
        self.animation_frame += 1;
        let (w, h) = img.dimensions();

        self.render_ignition_area(img, lab.ignition_area(w, h));
        for beaker in lab.bench_beakers(w, h) {
            self.render_chemical_beaker(img, beaker, lab.beaker_size);
        }
        self.render_water_beaker(img, lab.water_center(w, h), lab.beaker_size);
    }

    fn render_chemical_beaker(&self, img: &mut RgbImage, beaker: BenchBeaker, size: i32) {
        let chem = beaker.element.chemical();
        let c = beaker.center;

        draw_glass(img, c, size, 8, 2);
        // Spout on the right rim.
        let spout = arc(Point::new(c.x + size / 2 - 5, c.y + size / 4), 8, 4, 0.0, 180.0);
        polyline(img, &spout, GLASS);

        self.draw_liquid(img, c, size, chem.color);
        self.draw_label(img, c, size, chem);

        let pulse = 0.2f32.mul_add(self.phase(0.1), 0.3);
        blend_glow(img, c.offset(0, size / 2), size, chem.color, 0.1 * pulse);
    }

    fn draw_liquid(&self, img: &mut RgbImage, c: Point, size: i32, color: Rgb) {
        let liquid = color.scale(0.8);
        let liquid_height = size - 20;
        let half = size / 2 - 5;
        let wave = (self.phase(0.1) * 2.0) as i32;

        fill_ellipse(img, c.offset(0, liquid_height - 5), half, 6, liquid);
        fill_rect(
            img,
            Rect::new(c.x - half, c.y + 15, 2 * half + 1, liquid_height - 20),
            liquid,
        );
        fill_ellipse(img, c.offset(0, 15 + wave), half, 6, liquid);
        ellipse_outline(img, c.offset(0, 15 + wave), half, 6, 1, Rgb::WHITE);
    }

    fn draw_label(&self, img: &mut RgbImage, c: Point, size: i32, chem: &Chemical) {
        let symbol = chem.element.symbol();
        self.text.draw(img, symbol, c.x - 15, c.y + size + 20, 24.0, Rgb::WHITE);

        let name_x = c.x - chem.name.len() as i32 * 4;
        self.text.draw(img, chem.name, name_x, c.y + size + 40, 15.0, Rgb::gray(200));

        let formula_x = c.x - chem.formula.chars().count() as i32 * 4;
        self.text.draw(img, chem.formula, formula_x, c.y + size + 55, 12.0, Rgb::gray(150));
    }

    fn render_water_beaker(&self, img: &mut RgbImage, c: Point, beaker_size: i32) {
        let size = (beaker_size as f32 * 0.7) as i32;
        draw_glass(img, c, size, 6, 1);

        let liquid_height = size - 15;
        let half = size / 2 - 4;
        fill_ellipse(img, c.offset(0, liquid_height - 4), half, 4, Rgb::WATER);
        fill_rect(
            img,
            Rect::new(c.x - half, c.y + 12, 2 * half + 1, liquid_height - 16),
            Rgb::WATER,
        );

        let phase = self.phase(0.1);
        if phase > 0.0 {
            let radius = 10.0f32.mul_add(phase, 8.0) as i32;
            let thickness = ((2.0 * phase) as i32).max(1);
            ring(img, c.offset(0, liquid_height - 8), radius, thickness, Rgb::WHITE);
        }

        self.text.draw(img, "H2O", c.x - 20, c.y + size + 15, 18.0, Rgb::WHITE);
        self.text
            .draw(img, "CLEAN", c.x - 25, c.y + size + 30, 15.0, Rgb::new(255, 255, 100));
    }

    fn render_ignition_area(&self, img: &mut RgbImage, area: Rect) {
        let pulse = 0.3f32.mul_add(self.phase(0.2), 0.5);
        let border = Rgb::new((255.0 * pulse) as u8, (100.0 * pulse) as u8, 0);

        blend_rect(img, area, Rgb::new(0, 25, 50), 0.2 * pulse);
        rect_outline(img, area, 3, border);
        self.text.draw_outlined(
            img,
            "IGNITION",
            area.x + 5,
            area.y + 25,
            18.0,
            border,
            Rgb::WHITE,
        );

        let center = area.center();
        self.draw_bunsen_burner(img, center.offset(0, 10));
    }

    fn draw_bunsen_burner(&self, img: &mut RgbImage, p: Point) {
        // Base and tube, each with a lighter inset.
        fill_rect(img, Rect::new(p.x - 15, p.y + 10, 31, 16), Rgb::gray(100));
        fill_rect(img, Rect::new(p.x - 12, p.y + 12, 25, 12), Rgb::gray(150));
        fill_rect(img, Rect::new(p.x - 6, p.y - 15, 13, 26), Rgb::gray(120));
        fill_rect(img, Rect::new(p.x - 4, p.y - 13, 9, 22), Rgb::gray(180));

        let flame_height = 3.0f32.mul_add(self.phase(0.3), 8.0);
        let flame_green = 50.0f32.mul_add(self.phase(0.4), 100.0) as u8;
        let pilot = [
            Point::new(p.x, p.y - 15 - flame_height as i32),
            Point::new(p.x - 4, p.y - 15),
            Point::new(p.x + 4, p.y - 15),
        ];
        fill_polygon(img, &pilot, Rgb::new(255, flame_green, 0));

        fill_circle(img, p.offset(-10, 5), 3, GLASS);
        fill_circle(img, p.offset(10, 5), 3, GLASS);
    }
}

/// Beaker outline: bottom and rim ellipses joined by straight sides, plus a
/// reflection streak.
fn draw_glass(img: &mut RgbImage, c: Point, size: i32, rim: i32, thickness: i32) {
    let half = size / 2;
    ellipse_outline(img, c.offset(0, size - rim - 2), half, rim, thickness, GLASS);
    rect_outline(
        img,
        Rect::new(c.x - half, c.y, size + 1, size - rim - 1),
        thickness,
        GLASS,
    );
    ellipse_outline(img, c, half, rim, thickness, GLASS);

    let streak = arc(Point::new(c.x - size / 4, c.y + size / 4), size / 8, size / 4, 45.0, 135.0);
    polyline(img, &streak, REFLECTION);
}

/// Points along an axis-aligned elliptical arc, angles in degrees.
fn arc(center: Point, rx: i32, ry: i32, from_deg: f32, to_deg: f32) -> Vec<Point> {
    const STEPS: usize = 12;
    (0..=STEPS)
        .map(|i| {
            let t = i as f32 / STEPS as f32;
            let (sin, cos) = (to_deg - from_deg).mul_add(t, from_deg).to_radians().sin_cos();
            Point::new(
                center.x + (rx as f32 * cos).round() as i32,
                center.y + (ry as f32 * sin).round() as i32,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flamelab_core::Element;

    fn frame() -> RgbImage {
        RgbImage::new(1280, 720)
    }

    #[test]
    fn animation_advances_per_render() {
        let mut renderer = BeakerRenderer::default();
        let lab = LabSettings::default();
        let mut img = frame();
        renderer.render(&mut img, &lab);
        renderer.render(&mut img, &lab);
        assert_eq!(renderer.animation_frame(), 2);
    }

    #[test]
    fn liquid_is_darkened_chemical_colour() {
        let mut renderer = BeakerRenderer::default();
        let lab = LabSettings::default();
        let mut img = frame();
        renderer.render(&mut img, &lab);

        // Copper beaker at (640, 580); sample the liquid body below the surface.
        let liquid = img.get_pixel(640, 580 + 45).0;
        let expected = Element::Cu.chemical().color.scale(0.8);
        // The pulsing glow tints the liquid slightly.
        assert!(liquid[1].abs_diff(expected.g) < 40, "{liquid:?}");
        assert!(liquid[0] < 60, "{liquid:?}");
    }

    #[test]
    fn water_is_drawn_at_top_centre() {
        let mut renderer = BeakerRenderer::default();
        let mut img = frame();
        renderer.render(&mut img, &LabSettings::default());
        // Water beaker at (640, 86), size 63: the body spans y 98..=130.
        let water = img.get_pixel(640, 86 + 20).0;
        assert_eq!(water, Rgb::WATER.to_array());
    }

    #[test]
    fn ignition_area_gets_a_border() {
        let mut renderer = BeakerRenderer::default();
        let mut img = frame();
        renderer.render(&mut img, &LabSettings::default());
        // Ignition rect at (64, 216); its top-left corner is on the border.
        let corner = img.get_pixel(64, 216).0;
        assert!(corner[0] > 100 && corner[2] == 0, "{corner:?}");
    }

    #[test]
    fn arc_spans_requested_sweep() {
        let pts = arc(Point::new(0, 0), 100, 100, 0.0, 180.0);
        assert_eq!(pts.len(), 13);
        assert_eq!(pts[0], Point::new(100, 0));
        assert!(pts.last().unwrap().x <= -99);
        assert!(pts.iter().all(|p| p.y >= 0));
    }
}
