//! Bench layout: where the beakers, water and ignition area sit on screen.
//!
//! Positions are stored as ratios of the frame size so the same layout works
//! for any camera resolution. Interaction checks and rendering both resolve
//! positions through this module, so what the user sees is what they touch.

use serde::{Deserialize, Serialize};

use crate::chemicals::Element;
use crate::geometry::{Point, Rect};

/// One beaker on the bench row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchSlot {
    pub element: Element,
    /// Horizontal centre as a fraction of the frame width.
    pub x_ratio: f32,
}

/// A point expressed as fractions of the frame size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioPoint {
    pub x_ratio: f32,
    pub y_ratio: f32,
}

/// A rectangle expressed as fractions of the frame size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A bench beaker resolved to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchBeaker {
    pub element: Element,
    /// Top-centre of the beaker opening, also the dip target.
    pub center: Point,
}

/// Lab bench geometry and interaction thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabSettings {
    pub bench: Vec<BenchSlot>,
    pub water: RatioPoint,
    pub ignition: RatioRect,
    /// Distance of the bench row above the bottom edge, in pixels.
    pub bench_offset: i32,
    /// Beaker height and width, in pixels.
    pub beaker_size: i32,
    /// Reach of a beaker, in pixels.
    pub interaction_radius: f32,
    /// Two flames closer than this mix.
    pub mix_distance: f32,
    /// A flame closer than this to a dipped finger ignites it.
    pub transfer_distance: f32,
    /// Activity log entries kept.
    pub message_capacity: usize,
}

impl Default for LabSettings {
    fn default() -> Self {
        Self {
            bench: vec![
                BenchSlot {
                    element: Element::Na,
                    x_ratio: 0.08,
                },
                BenchSlot {
                    element: Element::K,
                    x_ratio: 0.22,
                },
                BenchSlot {
                    element: Element::Li,
                    x_ratio: 0.36,
                },
                BenchSlot {
                    element: Element::Cu,
                    x_ratio: 0.50,
                },
                BenchSlot {
                    element: Element::Ca,
                    x_ratio: 0.64,
                },
            ],
            water: RatioPoint {
                x_ratio: 0.5,
                y_ratio: 0.12,
            },
            ignition: RatioRect {
                x: 0.05,
                y: 0.3,
                width: 0.1,
                height: 0.2,
            },
            bench_offset: 140,
            beaker_size: 90,
            interaction_radius: 45.0,
            mix_distance: 60.0,
            transfer_distance: 50.0,
            message_capacity: 10,
        }
    }
}

fn scale(ratio: f32, extent: u32) -> i32 {
    (ratio * extent as f32) as i32
}

impl LabSettings {
    /// Bench beakers for a frame of the given size.
    #[must_use]
    pub fn bench_beakers(&self, width: u32, height: u32) -> Vec<BenchBeaker> {
        let y = height as i32 - self.bench_offset;
        self.bench
            .iter()
            .map(|slot| BenchBeaker {
                element: slot.element,
                center: Point::new(scale(slot.x_ratio, width), y),
            })
            .collect()
    }

    /// Centre of the water (cleaning) beaker.
    #[must_use]
    pub fn water_center(&self, width: u32, height: u32) -> Point {
        Point::new(
            scale(self.water.x_ratio, width),
            scale(self.water.y_ratio, height),
        )
    }

    /// The Bunsen-burner area that ignites dipped fingers.
    #[must_use]
    pub fn ignition_area(&self, width: u32, height: u32) -> Rect {
        Rect::new(
            scale(self.ignition.x, width),
            scale(self.ignition.y, height),
            scale(self.ignition.width, width),
            scale(self.ignition.height, height),
        )
    }
}
