//! Colour math for flame and liquid rendering.
//!
//! All colours are 8-bit RGB. Conversions truncate towards zero, matching
//! how the compositor quantises blended pixels.

use serde::{Deserialize, Serialize};

/// An 8-bit RGB colour, serialised as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Water tint used for the cleaning beaker and droplets.
    pub const WATER: Self = Self::new(150, 200, 255);
    /// Neutral grey used for smoke.
    pub const SMOKE: Self = Self::new(80, 80, 80);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v)
    }

    /// Largest channel value.
    #[must_use]
    pub fn max_channel(self) -> u8 {
        self.r.max(self.g).max(self.b)
    }

    #[must_use]
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Multiply every channel by `factor`, clamped.
    #[must_use]
    pub fn scale(self, factor: f32) -> Self {
        adjust_brightness(self, factor)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        c.to_array()
    }
}

fn channel(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

/// Convert to HSV: hue in degrees `[0, 360)`, saturation and value in `[0, 1]`.
#[must_use]
pub fn rgb_to_hsv(c: Rgb) -> (f32, f32, f32) {
    let r = f32::from(c.r) / 255.0;
    let g = f32::from(c.g) / 255.0;
    let b = f32::from(c.b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = max - min;

    let s = if max == 0.0 { 0.0 } else { diff / max };
    let h = if diff == 0.0 {
        0.0
    } else if max == r {
        (60.0 * ((g - b) / diff) + 360.0) % 360.0
    } else if max == g {
        (60.0 * ((b - r) / diff) + 120.0) % 360.0
    } else {
        (60.0 * ((r - g) / diff) + 240.0) % 360.0
    };
    (h, s, max)
}

/// Inverse of [`rgb_to_hsv`].
#[must_use]
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb {
    let h = h.rem_euclid(360.0);
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    Rgb::new(
        channel((r + m) * 255.0),
        channel((g + m) * 255.0),
        channel((b + m) * 255.0),
    )
}

/// Linear blend: `t = 0` gives `a`, `t = 1` gives `b`.
#[must_use]
pub fn blend(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let mix = |x: u8, y: u8| channel(f32::from(x).mul_add(1.0 - t, f32::from(y) * t));
    Rgb::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
}

/// Multiply every channel by `factor`, clamped to `[0, 255]`.
#[must_use]
pub fn adjust_brightness(c: Rgb, factor: f32) -> Rgb {
    Rgb::new(
        channel(f32::from(c.r) * factor),
        channel(f32::from(c.g) * factor),
        channel(f32::from(c.b) * factor),
    )
}

/// Scale saturation in HSV space.
#[must_use]
pub fn adjust_saturation(c: Rgb, factor: f32) -> Rgb {
    let (h, s, v) = rgb_to_hsv(c);
    hsv_to_rgb(h, (s * factor).clamp(0.0, 1.0), v)
}

/// Approximate black-body colour for a temperature in Kelvin.
#[must_use]
pub fn color_temperature_to_rgb(kelvin: f32) -> Rgb {
    let temp = kelvin / 100.0;

    let (red, green) = if temp <= 66.0 {
        (255.0, 99.470_8f32.mul_add(temp.ln(), -161.119_57))
    } else {
        (
            329.698_73 * (temp - 60.0).powf(-0.133_204_76),
            288.122_17 * (temp - 60.0).powf(-0.075_514_85),
        )
    };

    let blue = if temp >= 66.0 {
        255.0
    } else if temp <= 19.0 {
        0.0
    } else {
        138.517_73f32.mul_add((temp - 10.0).ln(), -305.044_8)
    };

    Rgb::new(channel(red), channel(green), channel(blue))
}

/// Approximate visible colour of a spectral line. Input is clamped to 380–750 nm.
#[must_use]
pub fn wavelength_to_rgb(nm: f32) -> Rgb {
    let w = nm.clamp(380.0, 750.0);

    let (r, g, b) = if w < 440.0 {
        (-(w - 440.0) / 60.0, 0.0, 1.0)
    } else if w < 490.0 {
        (0.0, (w - 440.0) / 50.0, 1.0)
    } else if w < 510.0 {
        (0.0, 1.0, -(w - 510.0) / 20.0)
    } else if w < 580.0 {
        ((w - 510.0) / 70.0, 1.0, 0.0)
    } else if w < 645.0 {
        (1.0, -(w - 645.0) / 65.0, 0.0)
    } else {
        (1.0, 0.0, 0.0)
    };

    // eye sensitivity falls off at both ends of the spectrum
    let factor = if w < 420.0 {
        0.7f32.mul_add((w - 380.0) / 40.0, 0.3)
    } else if w < 700.0 {
        1.0
    } else {
        0.7f32.mul_add((750.0 - w) / 50.0, 0.3)
    };

    Rgb::new(
        channel(255.0 * r * factor),
        channel(255.0 * g * factor),
        channel(255.0 * b * factor),
    )
}

/// Gradient from the base colour (cool) towards yellow-white (hot).
#[must_use]
pub fn flame_gradient(base: Rgb, steps: usize) -> Vec<Rgb> {
    let denom = steps.saturating_sub(1).max(1) as f32;
    (0..steps)
        .map(|i| {
            let heat = (i as f32 / denom) * 0.7;
            let r = f32::from(base.r);
            let g = f32::from(base.g);
            let b = f32::from(base.b);
            Rgb::new(
                channel(heat.mul_add(255.0 - r, r)),
                channel((heat * (255.0 - g)).mul_add(0.8, g)),
                channel(heat.mul_add(50.0, b)),
            )
        })
        .collect()
}

/// How two flame colours combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MixMode {
    #[default]
    Average,
    Additive,
    Subtractive,
    /// The brighter emitter dominates.
    Realistic,
}

#[must_use]
pub fn mix(a: Rgb, b: Rgb, mode: MixMode) -> Rgb {
    match mode {
        MixMode::Average => blend(a, b, 0.5),
        MixMode::Additive => Rgb::new(
            a.r.saturating_add(b.r),
            a.g.saturating_add(b.g),
            a.b.saturating_add(b.b),
        ),
        MixMode::Subtractive => {
            let m = |x: u8, y: u8| (u16::from(x) * u16::from(y) / 255) as u8;
            Rgb::new(m(a.r, b.r), m(a.g, b.g), m(a.b, b.b))
        }
        MixMode::Realistic => {
            if a.max_channel() > b.max_channel() {
                blend(a, b, 0.3)
            } else {
                blend(b, a, 0.3)
            }
        }
    }
}

/// Time-varying brightness wobble around `base`.
#[must_use]
pub fn flicker(base: Rgb, time: f32, intensity: f32) -> Rgb {
    let variation = intensity * (time * 10.0).sin() * 50.0;
    Rgb::new(
        channel(f32::from(base.r) + variation),
        channel(variation.mul_add(0.8, f32::from(base.g))),
        channel(variation.mul_add(0.5, f32::from(base.b))),
    )
}

#[must_use]
pub const fn complementary(c: Rgb) -> Rgb {
    Rgb::new(255 - c.r, 255 - c.g, 255 - c.b)
}

/// `count` colours stepping 30° around the hue wheel, starting at `c`.
#[must_use]
pub fn analogous(c: Rgb, count: usize) -> Vec<Rgb> {
    let (h, s, v) = rgb_to_hsv(c);
    (0..count)
        .map(|i| hsv_to_rgb((h + i as f32 * 30.0) % 360.0, s, v))
        .collect()
}

/// Euclidean distance in RGB space.
#[must_use]
pub fn distance(a: Rgb, b: Rgb) -> f32 {
    let d = |x: u8, y: u8| f32::from(x) - f32::from(y);
    let (dr, dg, db) = (d(a.r, b.r), d(a.g, b.g), d(a.b, b.b));
    db.mul_add(db, dr.mul_add(dr, dg * dg)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsv_roundtrip_primaries() {
        for c in [
            Rgb::new(255, 0, 0),
            Rgb::new(0, 255, 0),
            Rgb::new(0, 0, 255),
            Rgb::new(255, 255, 0),
        ] {
            let (h, s, v) = rgb_to_hsv(c);
            assert_eq!(hsv_to_rgb(h, s, v), c);
        }
    }

    #[test]
    fn grey_has_no_hue_or_saturation() {
        let (h, s, v) = rgb_to_hsv(Rgb::gray(128));
        assert_eq!(h, 0.0);
        assert_eq!(s, 0.0);
        assert!((v - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn blend_endpoints() {
        let a = Rgb::new(10, 20, 30);
        let b = Rgb::new(200, 100, 0);
        assert_eq!(blend(a, b, 0.0), a);
        assert_eq!(blend(a, b, 1.0), b);
    }

    #[test]
    fn brightness_clamps() {
        assert_eq!(adjust_brightness(Rgb::new(200, 100, 0), 1.5), Rgb::new(255, 150, 0));
        assert_eq!(adjust_brightness(Rgb::new(200, 100, 0), -1.0), Rgb::BLACK);
    }

    #[test]
    fn sodium_d_line_is_yellow_orange() {
        let c = wavelength_to_rgb(589.0);
        assert_eq!(c.r, 255);
        assert!(c.g > 200);
        assert_eq!(c.b, 0);
    }

    #[test]
    fn wavelength_clamps_out_of_range() {
        assert_eq!(wavelength_to_rgb(100.0), wavelength_to_rgb(380.0));
        assert_eq!(wavelength_to_rgb(900.0), wavelength_to_rgb(750.0));
    }

    #[test]
    fn hot_black_body_is_blue_white() {
        let c = color_temperature_to_rgb(10_000.0);
        assert_eq!(c.b, 255);
        assert!(c.r < 255);
    }

    #[test]
    fn gradient_gets_hotter() {
        let steps = flame_gradient(Rgb::new(255, 0, 0), 10);
        assert_eq!(steps.len(), 10);
        assert_eq!(steps[0], Rgb::new(255, 0, 0));
        assert!(steps[9].g > steps[0].g);
        assert_eq!(flame_gradient(Rgb::new(1, 2, 3), 1), vec![Rgb::new(1, 2, 3)]);
    }

    #[test]
    fn mix_modes() {
        let yellow = Rgb::new(255, 255, 0);
        let purple = Rgb::new(128, 0, 255);
        assert_eq!(mix(yellow, purple, MixMode::Additive), Rgb::new(255, 255, 255));
        assert_eq!(mix(yellow, purple, MixMode::Subtractive), Rgb::new(128, 0, 0));
        assert_eq!(mix(yellow, purple, MixMode::Average), Rgb::new(191, 127, 127));
        // equal peak channels: the second colour dominates
        assert_eq!(mix(yellow, purple, MixMode::Realistic), blend(purple, yellow, 0.3));
    }

    #[test]
    fn complementary_inverts() {
        assert_eq!(complementary(Rgb::new(0, 128, 255)), Rgb::new(255, 127, 0));
    }

    #[test]
    fn analogous_starts_at_input() {
        let colors = analogous(Rgb::new(255, 0, 0), 3);
        assert_eq!(colors[0], Rgb::new(255, 0, 0));
        assert_eq!(colors.len(), 3);
    }

    #[test]
    fn serialises_as_array() {
        let json = serde_json::to_string(&Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(json, "[1,2,3]");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(1, 2, 3));
    }

    #[test]
    fn adjust_saturation_clamps_factor() {
        let pink = Rgb::new(255, 128, 128);
        assert_eq!(adjust_saturation(pink, 10.0), Rgb::new(255, 0, 0));
        assert_eq!(adjust_saturation(Rgb::new(255, 0, 0), 0.0), Rgb::WHITE);
        assert_eq!(adjust_saturation(Rgb::new(255, 0, 0), -3.0), Rgb::WHITE);
        assert_eq!(adjust_saturation(Rgb::new(0, 0, 255), 1.0), Rgb::new(0, 0, 255));
    }
}

