//! Screen-space geometry and small numeric helpers.
//!
//! Positions are integer pixels (top-left origin, y grows downwards), the
//! same convention the compositor and the hand detector use.

use serde::{Deserialize, Serialize};

/// An integer pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Integer midpoint (truncating towards zero).
    #[must_use]
    pub const fn midpoint(self, other: Self) -> Self {
        Self {
            x: (self.x + other.x) / 2,
            y: (self.y + other.y) / 2,
        }
    }

    /// Offset by `(dx, dy)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Inclusive containment test: points on every edge count as inside.
    #[must_use]
    pub const fn contains(&self, p: Point) -> bool {
        self.x <= p.x && p.x <= self.x + self.width && self.y <= p.y && p.y <= self.y + self.height
    }

    #[must_use]
    pub const fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    #[must_use]
    pub const fn bottom_right(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point, b: Point) -> f32 {
    let dx = (a.x - b.x) as f32;
    let dy = (a.y - b.y) as f32;
    dx.hypot(dy)
}

/// Whether `p` lies inside (or on) the circle.
#[must_use]
pub fn point_in_circle(p: Point, center: Point, radius: f32) -> bool {
    distance(p, center) <= radius
}

/// Inclusive rectangle test given two corners.
#[must_use]
pub const fn point_in_rect(p: Point, top_left: Point, bottom_right: Point) -> bool {
    top_left.x <= p.x && p.x <= bottom_right.x && top_left.y <= p.y && p.y <= bottom_right.y
}

/// Normalise a 2D vector. The zero vector stays zero.
#[must_use]
pub fn normalize_vector(v: (f32, f32)) -> (f32, f32) {
    let len = v.0.hypot(v.1);
    if len == 0.0 {
        return (0.0, 0.0);
    }
    (v.0 / len, v.1 / len)
}

#[must_use]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    (end - start).mul_add(t, start)
}

#[must_use]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Hermite smooth step between two edges.
#[must_use]
pub fn smooth_step(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = clamp((x - edge0) / (edge1 - edge0), 0.0, 1.0);
    t * t * 2.0f32.mul_add(-t, 3.0)
}

/// Cheap hash noise in `[-0.5, 0.5)`.
///
/// Deterministic for a given input; used for flame wobble where coherent
/// noise is not needed.
#[must_use]
pub fn hash_noise(x: f32, y: f32) -> f32 {
    let v = x.mul_add(12.9898, y * 78.233).sin() * 43_758.547;
    (v.rem_euclid(1.0) - 0.5).min(0.499_99)
}

/// Multi-octave variant of [`hash_noise`].
#[must_use]
pub fn value_noise_2d(x: f32, y: f32, scale: f32, octaves: u32) -> f32 {
    let (x, y) = (x * scale, y * scale);
    let mut value = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    for _ in 0..octaves {
        value += amplitude * hash_noise(x * frequency, y * frequency);
        amplitude *= 0.5;
        frequency *= 2.0;
    }
    value
}

/// Rotate `p` around `center` by `angle` radians.
#[must_use]
pub fn rotate_point(p: (f32, f32), center: (f32, f32), angle: f32) -> (f32, f32) {
    let (sin, cos) = angle.sin_cos();
    let x = p.0 - center.0;
    let y = p.1 - center.1;
    (
        x.mul_add(cos, -(y * sin)) + center.0,
        x.mul_add(sin, y * cos) + center.1,
    )
}

/// `count` evenly spaced points on a circle, starting at angle 0.
#[must_use]
pub fn circle_points(center: Point, radius: f32, count: usize) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let angle = (i as f32 / count as f32) * std::f32::consts::TAU;
            Point::new(
                (center.x as f32 + radius * angle.cos()) as i32,
                (center.y as f32 + radius * angle.sin()) as i32,
            )
        })
        .collect()
}

/// Point on the Bézier curve defined by `control` at parameter `t`.
#[must_use]
pub fn bezier_point(control: &[Point], t: f32) -> Point {
    if control.is_empty() {
        return Point::default();
    }
    let n = control.len() - 1;
    let mut x = 0.0f32;
    let mut y = 0.0f32;
    for (i, p) in control.iter().enumerate() {
        let bernstein =
            binomial(n, i) as f32 * t.powi(i as i32) * (1.0 - t).powi((n - i) as i32);
        x += bernstein * p.x as f32;
        y += bernstein * p.y as f32;
    }
    Point::new(x as i32, y as i32)
}

fn binomial(n: usize, k: usize) -> u64 {
    let k = k.min(n - k);
    (0..k).fold(1u64, |acc, i| acc * (n - i) as u64 / (i + 1) as u64)
}

/// Sine wave sample.
#[must_use]
pub fn wave(time: f32, frequency: f32, amplitude: f32, phase: f32) -> f32 {
    amplitude * (std::f32::consts::TAU * frequency).mul_add(time, phase).sin()
}

#[must_use]
pub fn ease_in_out(t: f32) -> f32 {
    t * t * 2.0f32.mul_add(-t, 3.0)
}

/// Map `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
#[must_use]
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Gaussian-shaped falloff, zero at and beyond `max_distance`.
#[must_use]
pub fn gaussian_falloff(distance: f32, max_distance: f32) -> f32 {
    if distance >= max_distance {
        return 0.0;
    }
    let n = distance / max_distance;
    (-n * n * 5.0).exp()
}

/// Frames per second over a history of frame timestamps (seconds).
#[must_use]
pub fn calculate_fps(frame_times: &[f64]) -> f64 {
    let (Some(first), Some(last)) = (frame_times.first(), frame_times.last()) else {
        return 0.0;
    };
    if frame_times.len() < 2 {
        return 0.0;
    }
    let span = last - first;
    if span <= 0.0 {
        return 0.0;
    }
    (frame_times.len() - 1) as f64 / span
}
