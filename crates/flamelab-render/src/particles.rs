//! Spark, ember and smoke particles.
//!
//! Particles are simple point masses stepped once per frame. The system owns
//! a seedable RNG so runs with a fixed seed render identically.

use std::f32::consts::TAU;

use flamelab_core::{Chemical, ParticleSettings, Point, Rgb};
use image::RgbImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::draw::{blend_disc, fill_circle, ring};

/// Particle behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Small, fast, falls back under gravity.
    Spark,
    /// Larger and slower than a spark.
    Ember,
    /// Grey puff that rises and expands.
    Smoke,
}

/// A single particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub ax: f32,
    pub ay: f32,
    pub size: f32,
    pub alpha: f32,
    pub base_color: Rgb,
    pub color: Rgb,
    pub lifetime: u32,
    pub max_lifetime: u32,
}

impl Particle {
    /// A particle with kind-specific randomised motion.
    pub fn new<R: Rng>(
        kind: ParticleKind,
        x: f32,
        y: f32,
        color: Rgb,
        lifetime: u32,
        rng: &mut R,
    ) -> Self {
        let mut vx = rng.gen_range(-2.0..=2.0);
        let (vy, size, ay, color) = match kind {
            ParticleKind::Spark => (rng.gen_range(-5.0..=-2.0), rng.gen_range(0.5..=2.0), 0.2, color),
            ParticleKind::Ember => (rng.gen_range(-3.0..=-1.0), rng.gen_range(2.0..=4.0), 0.1, color),
            ParticleKind::Smoke => {
                vx = rng.gen_range(-1.0..=1.0);
                (
                    rng.gen_range(-2.0..=-0.5),
                    rng.gen_range(3.0..=6.0),
                    -0.05,
                    Rgb::SMOKE,
                )
            }
        };

        Self {
            kind,
            x,
            y,
            vx,
            vy,
            ax: 0.0,
            ay,
            size,
            alpha: 1.0,
            base_color: color,
            color,
            lifetime,
            max_lifetime: lifetime.max(1),
        }
    }

    /// Advance one frame. Returns `false` once the particle has died.
    pub fn step(&mut self) -> bool {
        self.vx += self.ax;
        self.vy += self.ay;
        self.x += self.vx;
        self.y += self.vy;
        self.lifetime = self.lifetime.saturating_sub(1);

        let life_ratio = self.lifetime as f32 / self.max_lifetime as f32;
        self.alpha = life_ratio;

        match self.kind {
            ParticleKind::Spark | ParticleKind::Ember => {
                self.color = self.base_color.scale(life_ratio.mul_add(0.8, 0.2));
                self.size *= 0.98;
            }
            ParticleKind::Smoke => self.size += 0.1,
        }

        self.lifetime > 0
    }

    pub fn render(&self, img: &mut RgbImage) {
        if self.alpha <= 0.0 {
            return;
        }
        let (x, y) = (self.x as i32, self.y as i32);
        if x < 0 || y < 0 || x >= img.width() as i32 || y >= img.height() as i32 {
            return;
        }
        let size = (self.size as i32).max(1);
        let at = Point::new(x, y);

        match self.kind {
            ParticleKind::Smoke => blend_disc(img, at, size, self.color, self.alpha * 0.3),
            ParticleKind::Spark | ParticleKind::Ember => {
                fill_circle(img, at, (size / 2).max(1), self.color);
                if size > 1 {
                    ring(img, at, size, 1, self.color.scale(1.2));
                }
            }
        }
    }
}

/// All live particles.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    max_particles: usize,
    lifetime: u32,
    rng: StdRng,
}

impl ParticleSystem {
    #[must_use]
    pub fn new(settings: &ParticleSettings) -> Self {
        let rng = settings
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            particles: Vec::with_capacity(settings.max_particles),
            max_particles: settings.max_particles,
            lifetime: settings.lifetime,
            rng,
        }
    }

    fn spawn(&mut self, kind: ParticleKind, x: f32, y: f32, color: Rgb) -> &mut Particle {
        let p = Particle::new(kind, x, y, color, self.lifetime, &mut self.rng);
        self.particles.push(p);
        let last = self.particles.len() - 1;
        &mut self.particles[last]
    }

    /// Sparks with occasional embers and smoke rising from a flame.
    pub fn add_flame_particles(&mut self, pos: Point, chemical: &Chemical) {
        let (x, y) = (pos.x as f32, pos.y as f32);
        let color = chemical.particle_color;

        for _ in 0..self.rng.gen_range(1..=2) {
            let dx = self.rng.gen_range(-8.0..=8.0);
            let dy = self.rng.gen_range(-15.0..=8.0);
            self.spawn(ParticleKind::Spark, x + dx, y + dy, color);
        }
        if self.rng.gen_bool(0.2) {
            let dx = self.rng.gen_range(-12.0..=12.0);
            let dy = self.rng.gen_range(-8.0..=15.0);
            self.spawn(ParticleKind::Ember, x + dx, y + dy, color);
        }
        if self.rng.gen_bool(0.15) {
            let dx = self.rng.gen_range(-15.0..=15.0);
            let dy = self.rng.gen_range(-20.0..=-8.0);
            self.spawn(ParticleKind::Smoke, x + dx, y + dy, Rgb::SMOKE);
        }
    }

    /// A small burst of sparks where a finger touched a beaker.
    pub fn add_interaction_particles(&mut self, pos: Point, color: Rgb) {
        for _ in 0..self.rng.gen_range(3..=6) {
            let dx = self.rng.gen_range(-15.0..=15.0);
            let dy = self.rng.gen_range(-10.0..=10.0);
            self.spawn(ParticleKind::Spark, pos.x as f32 + dx, pos.y as f32 + dy, color);
        }
    }

    /// A ring of embers around the point where two flames met.
    pub fn add_mixing_particles(&mut self, midpoint: Point, color: Rgb) {
        for _ in 0..self.rng.gen_range(8..=12) {
            let angle: f32 = self.rng.gen_range(0.0..TAU);
            let radius: f32 = self.rng.gen_range(5.0..=20.0);
            let x = radius.mul_add(angle.cos(), midpoint.x as f32);
            let y = radius.mul_add(angle.sin(), midpoint.y as f32);
            self.spawn(ParticleKind::Ember, x, y, color);
        }
    }

    /// Short-lived water droplets.
    pub fn add_cleaning_particles(&mut self, pos: Point) {
        for _ in 0..self.rng.gen_range(2..=4) {
            let dx = self.rng.gen_range(-10.0..=10.0);
            let dy = self.rng.gen_range(-5.0..=5.0);
            let vy = self.rng.gen_range(-2.0..=2.0);
            let droplet =
                self.spawn(ParticleKind::Spark, pos.x as f32 + dx, pos.y as f32 + dy, Rgb::WATER);
            droplet.vy = vy;
            droplet.lifetime = 30;
        }
    }

    /// Embers flung outwards in every direction.
    pub fn add_explosion(&mut self, pos: Point, color: Rgb, intensity: f32) {
        let count = (15.0 * intensity) as usize;
        let lifetime = self.lifetime * 3 / 2;
        for _ in 0..count {
            let angle: f32 = self.rng.gen_range(0.0..TAU);
            let speed = self.rng.gen_range(3.0f32..=8.0) * intensity;
            let dx = self.rng.gen_range(-5.0..=5.0);
            let dy = self.rng.gen_range(-5.0..=5.0);
            let size = self.rng.gen_range(2.0f32..=5.0) * intensity;

            let p = self.spawn(ParticleKind::Ember, pos.x as f32 + dx, pos.y as f32 + dy, color);
            p.vx = speed * angle.cos();
            p.vy = speed * angle.sin();
            p.size = size;
            p.lifetime = lifetime;
            p.max_lifetime = lifetime.max(1);
        }
    }

    /// Step every particle, drop the dead ones and enforce the budget,
    /// keeping the newest.
    pub fn update(&mut self) {
        self.particles.retain_mut(Particle::step);
        if self.particles.len() > self.max_particles {
            let excess = self.particles.len() - self.max_particles;
            self.particles.drain(..excess);
        }
    }

    pub fn render(&self, img: &mut RgbImage) {
        for p in &self.particles {
            p.render(img);
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}
