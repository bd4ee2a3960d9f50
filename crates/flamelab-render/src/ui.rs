//! Educational sidebar and on-frame overlays.
//!
//! The sidebar is laid out as data first ([`SidebarLayout`]) and drawn
//! afterwards, so its content can be inspected without a font or a frame.

use std::time::Duration;

use flamelab_core::geometry::{Rect, point_in_circle};
use flamelab_core::{HandObservation, LabSettings, LabState, Point, Rgb, UiSettings};
use image::RgbImage;

use crate::draw::{blend_rect, fill_rect, line, rect_outline, ring, thick_line};
use crate::text::{TextRenderer, wrap};

const SIDEBAR_BG: Rgb = Rgb::gray(30);
const SIDEBAR_ALPHA: f32 = 0.85;
const RULE: Rgb = Rgb::gray(100);

const EXPLANATION_COLUMNS: usize = 40;
const EXPLANATION_LINES: usize = 8;
const ACTIVITY_COLUMNS: usize = 35;
const ACTIVITY_ENTRIES: usize = 5;
const ACTIVITY_LINES_PER_ENTRY: usize = 2;
/// Activity entries fade to half brightness over this many seconds.
const ACTIVITY_FADE_SECS: f32 = 30.0;

const CONTROLS: [&str; 6] = [
    "- Hover over beakers to dip",
    "- Touch flame area to ignite",
    "- Touch water to clean",
    "- Bring flames together to mix",
    "- Press 'r' to reset",
    "- Press 'q' to quit",
];

const BENCH_HIGHLIGHT: Rgb = Rgb::new(0, 255, 0);
const WATER_HIGHLIGHT: Rgb = Rgb::new(255, 255, 100);

/// One line of sidebar text, positioned by its baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: i32,
    pub baseline: i32,
    pub size: f32,
    pub color: Rgb,
}

/// Sidebar content resolved to positions.
#[derive(Debug, Clone, PartialEq)]
pub struct SidebarLayout {
    /// Left edge of the sidebar.
    pub x: i32,
    pub width: u32,
    pub height: u32,
    pub lines: Vec<TextLine>,
    /// Y positions of horizontal rules.
    pub rules: Vec<i32>,
}

impl SidebarLayout {
    /// Lay out the sidebar for `lab` on a `frame_width` x `frame_height` frame.
    #[must_use]
    pub fn compute(
        lab: &LabState,
        frame_width: u32,
        frame_height: u32,
        sidebar_width: u32,
        now: Duration,
    ) -> Self {
        let x = frame_width.saturating_sub(sidebar_width) as i32;
        let mut layout = Self {
            x,
            width: sidebar_width,
            height: frame_height,
            lines: Vec::new(),
            rules: Vec::new(),
        };

        layout.push("AR CHEMISTRY LAB", 10, 30, 21.0, Rgb::WHITE);
        layout.push("Flame Test Simulator", 10, 55, 15.0, Rgb::gray(200));
        layout.rules.push(65);

        let y = layout.active_chemicals(lab, 80);
        let y = layout.explanation(lab, y);
        let controls_y = frame_height as i32 - 120;
        layout.recent_activity(lab, y, now, controls_y - 20);
        layout.controls(controls_y);
        layout
    }

    fn push(&mut self, text: impl Into<String>, dx: i32, baseline: i32, size: f32, color: Rgb) {
        self.lines.push(TextLine {
            text: text.into(),
            x: self.x + dx,
            baseline,
            size,
            color,
        });
    }

    fn rule(&mut self, y: i32) -> i32 {
        let y = y + 10;
        self.rules.push(y);
        y + 15
    }

    fn active_chemicals(&mut self, lab: &LabState, mut y: i32) -> i32 {
        self.push("ACTIVE CHEMICALS", 10, y, 15.0, Rgb::new(100, 255, 100));
        y += 25;

        let mut any = false;
        for (id, state) in lab.fingers() {
            let Some(element) = state.chemical else {
                continue;
            };
            any = true;
            let marker = if state.has_flame { "[lit]" } else { "[wet]" };
            self.push(
                format!("{marker} {}: {element}", id.label()),
                15,
                y,
                12.0,
                Rgb::WHITE,
            );
            y += 18;
            self.push(
                format!("   {}", element.chemical().formula),
                15,
                y,
                10.5,
                Rgb::gray(150),
            );
            y += 20;
        }

        if !any {
            self.push("No chemicals active", 15, y, 12.0, Rgb::gray(150));
            y += 20;
        }
        self.rule(y)
    }

    fn explanation(&mut self, lab: &LabState, mut y: i32) -> i32 {
        self.push("EXPLANATION", 10, y, 15.0, Rgb::new(255, 150, 100));
        y += 25;

        if lab.explanation().is_empty() {
            for hint in ["Dip finger in chemical", "then touch flame area"] {
                self.push(hint, 15, y, 10.5, Rgb::gray(150));
                y += 15;
            }
        } else {
            for text in wrap(lab.explanation(), EXPLANATION_COLUMNS)
                .into_iter()
                .take(EXPLANATION_LINES)
            {
                self.push(text, 15, y, 10.5, Rgb::gray(200));
                y += 15;
            }
        }
        self.rule(y)
    }

    fn recent_activity(&mut self, lab: &LabState, mut y: i32, now: Duration, limit: i32) {
        self.push("RECENT ACTIVITY", 10, y, 15.0, Rgb::new(100, 255, 255));
        y += 25;

        for entry in lab.messages().iter().rev().take(ACTIVITY_ENTRIES) {
            if y > limit {
                break;
            }
            let age = now.saturating_sub(entry.at).as_secs_f32();
            let fade = (age / ACTIVITY_FADE_SECS).min(1.0);
            let color = Rgb::gray((255.0 * 0.5f32.mul_add(-fade, 1.0)) as u8);

            let age_label = format_age(age);
            let age_x = self.width as i32 - 10 - 5 * age_label.len() as i32;
            self.push(age_label, age_x, y, 9.0, Rgb::gray(120));

            for text in wrap(&entry.message, ACTIVITY_COLUMNS)
                .into_iter()
                .take(ACTIVITY_LINES_PER_ENTRY)
            {
                self.push(text, 15, y, 9.0, color);
                y += 12;
            }
            y += 5;
        }
    }

    fn controls(&mut self, y: i32) {
        self.push("CONTROLS", 10, y, 15.0, Rgb::new(100, 200, 255));
        for (i, text) in CONTROLS.iter().enumerate() {
            self.push(*text, 15, y + 20 + 15 * i as i32, 9.0, Rgb::gray(200));
        }
    }

    /// Text of every line, top to bottom, for inspection.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.text.as_str())
    }
}

/// `42s` under a minute, `3m` after.
#[must_use]
pub fn format_age(secs: f32) -> String {
    if secs < 60.0 {
        format!("{}s", secs as u32)
    } else {
        format!("{}m", (secs / 60.0) as u32)
    }
}

/// Draws the sidebar and the overlays that sit on the camera image.
#[derive(Debug, Clone)]
pub struct UiRenderer {
    text: TextRenderer,
    sidebar_width: u32,
    show_fps: bool,
    safety_popup: Duration,
}

impl UiRenderer {
    #[must_use]
    pub fn new(settings: &UiSettings, text: TextRenderer) -> Self {
        Self {
            text,
            sidebar_width: settings.sidebar_width,
            show_fps: settings.show_fps,
            safety_popup: Duration::try_from_secs_f32(settings.safety_popup_secs)
                .unwrap_or(Duration::ZERO),
        }
    }

    #[must_use]
    pub const fn sidebar_width(&self) -> u32 {
        self.sidebar_width
    }

    pub fn render_sidebar(&self, img: &mut RgbImage, lab: &LabState, now: Duration) -> SidebarLayout {
        let (w, h) = img.dimensions();
        let layout = SidebarLayout::compute(lab, w, h, self.sidebar_width, now);
        self.draw_layout(img, &layout);
        layout
    }

    /// Draw a precomputed layout.
    pub fn draw_layout(&self, img: &mut RgbImage, layout: &SidebarLayout) {
        let right = layout.x + layout.width as i32;
        blend_rect(
            img,
            Rect::new(layout.x, 0, layout.width as i32, layout.height as i32),
            SIDEBAR_BG,
            SIDEBAR_ALPHA,
        );
        thick_line(
            img,
            Point::new(layout.x, 0),
            Point::new(layout.x, layout.height as i32),
            2,
            RULE,
        );
        for &y in &layout.rules {
            line(img, Point::new(layout.x + 10, y), Point::new(right - 10, y), RULE);
        }
        for l in &layout.lines {
            self.text.draw(img, &l.text, l.x, l.baseline, l.size, l.color);
        }
    }

    /// Chemical symbol tags next to every coated fingertip.
    pub fn render_finger_labels(&self, img: &mut RgbImage, lab: &LabState, hands: &[HandObservation]) {
        for hand in hands {
            for (id, pos) in hand.tips() {
                let state = lab.finger(id);
                let Some(element) = state.chemical else {
                    continue;
                };
                let symbol = element.symbol();
                let at = pos.offset(20, -20);
                let tag_width = symbol.len() as i32 * 8;

                fill_rect(img, Rect::new(at.x - 5, at.y - 15, tag_width + 5, 20), Rgb::BLACK);
                self.text.draw(img, symbol, at.x, at.y, 15.0, Rgb::WHITE);
                if state.has_flame {
                    self.text
                        .draw(img, "*", at.x + tag_width + 5, at.y, 12.0, Rgb::new(255, 150, 0));
                }
            }
        }
    }

    /// Reach rings and connector lines while a fingertip is over a beaker.
    pub fn render_interactions(&self, img: &mut RgbImage, lab: &LabSettings, hands: &[HandObservation]) {
        let (w, h) = img.dimensions();
        let beakers = lab.bench_beakers(w, h);
        let water = lab.water_center(w, h);
        let radius = lab.interaction_radius;
        let ring_radius = radius as i32;

        for hand in hands {
            for (_, pos) in hand.tips() {
                for beaker in &beakers {
                    if point_in_circle(pos, beaker.center, radius) {
                        ring(img, beaker.center, ring_radius, 2, BENCH_HIGHLIGHT);
                        line(img, pos, beaker.center, BENCH_HIGHLIGHT);
                    }
                }
                if point_in_circle(pos, water, radius) {
                    ring(img, water, ring_radius, 2, WATER_HIGHLIGHT);
                    line(img, pos, water, WATER_HIGHLIGHT);
                }
            }
        }
    }

    /// Whether a safety popup is due at `now`.
    #[must_use]
    pub fn safety_popup_active(&self, lab: &LabState, now: Duration) -> bool {
        !self.safety_popup.is_zero()
            && lab
                .last_dip()
                .is_some_and(|dip| now.saturating_sub(dip.at) < self.safety_popup)
    }

    /// Centred warning box for the most recently dipped chemical.
    pub fn render_safety_popup(&self, img: &mut RgbImage, lab: &LabState, now: Duration) {
        if !self.safety_popup_active(lab, now) {
            return;
        }
        let Some(dip) = lab.last_dip() else {
            return;
        };

        let (w, h) = img.dimensions();
        let box_width = 400.min(w as i32 - 100).max(1);
        let box_height = 100;
        let area = Rect::new(
            (w as i32 - box_width) / 2,
            (h as i32 - box_height) / 2,
            box_width,
            box_height,
        );

        fill_rect(img, area, Rgb::new(200, 0, 0));
        rect_outline(img, area, 2, Rgb::WHITE);
        self.text
            .draw(img, "SAFETY WARNING", area.x + 10, area.y + 25, 18.0, Rgb::WHITE);

        let warning = dip.element.chemical().safety_warning;
        for (i, text) in wrap(warning, 50).iter().take(3).enumerate() {
            self.text.draw(
                img,
                text,
                area.x + 10,
                area.y + 50 + 15 * i as i32,
                12.0,
                Rgb::WHITE,
            );
        }
    }

    /// FPS counter in the top-left corner, with an optional stats line.
    pub fn render_fps(&self, img: &mut RgbImage, fps: u32, stats: Option<&str>) {
        if !self.show_fps {
            return;
        }
        self.text
            .draw(img, &format!("FPS: {fps}"), 10, 30, 21.0, Rgb::new(0, 255, 0));
        if let Some(stats) = stats {
            self.text.draw(img, stats, 10, 55, 12.0, Rgb::new(0, 200, 0));
        }
    }
}
