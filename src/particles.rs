//! The particle field that paints the kaleidoscope's content texture.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::DVec2;
use rand::Rng;

use crate::surface::{Sprite, Surface};
use crate::{Error, Result};

/// Velocity damping per frame.
pub const DAMPING: f64 = 0.99;
/// Opacity of the previous frame when it is copied under the new one.
pub const TRAIL_ALPHA: f64 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Index into the field's sprite list.
    pub sprite: usize,
    pub pos: DVec2,
    pub rot: f64,
    pub scale: f64,
    pub vel: DVec2,
    pub vrot: f64,
    pub acc: DVec2,
    pub arot: f64,
}

impl Particle {
    /// Random particle inside a square of side `area`.
    pub fn random<R: Rng>(rng: &mut R, sprites: usize, area: f64) -> Self {
        let sprite = rng.gen_range(0..sprites);
        let x = rng.gen::<f64>() * area;
        let y = rng.gen::<f64>() * area;
        let rot = rng.gen::<f64>() * PI;
        let scale = rng.gen::<f64>() * 0.7 + 0.3;
        Self {
            sprite,
            pos: DVec2::new(x, y),
            rot,
            scale,
            vel: DVec2::ZERO,
            vrot: 0.0,
            acc: DVec2::ZERO,
            arot: 0.0,
        }
    }

    /// One kinematic step: integrate, bounce off the area edges, then pick up
    /// a tangential pull around `pivot` proportional to `delta_angle` and the
    /// distance from it.
    pub fn advance(&mut self, pivot: DVec2, delta_angle: f64, area: f64) {
        self.vel += self.acc;
        self.vrot += self.arot;
        self.pos += self.vel;
        self.rot = (self.rot + self.vrot) % TAU;

        if self.pos.x > area || self.pos.x < 0.0 {
            self.vel.x = -self.vel.x;
        }
        if self.pos.y > area || self.pos.y < 0.0 {
            self.vel.y = -self.vel.y;
        }

        let d = self.pos - pivot;
        let t = d.y.atan2(d.x) + FRAC_PI_2;
        let mag = delta_angle * d.length() / area;
        self.acc = DVec2::from_angle(t) * mag;
        self.arot = mag * 0.1;

        self.vel *= DAMPING;
        self.vrot *= DAMPING;
    }

    /// Stamps `image` centred on the particle.
    fn draw<S: Surface>(&self, surface: &mut S, image: &S::Image) -> Result<()> {
        surface.save();
        surface.translate(self.pos.x, self.pos.y)?;
        surface.rotate(self.rot)?;
        surface.translate(
            -image.width() / 2.0 * self.scale,
            -image.height() / 2.0 * self.scale,
        )?;
        surface.transform(self.scale, 0.0, 0.0, self.scale, 0.0, 0.0)?;
        surface.draw_image(image, 0.0, 0.0)?;
        surface.restore();
        Ok(())
    }
}

/// Particles drifting over a square working canvas with a fading trail.
pub struct ParticleField<S: Surface> {
    area: f64,
    pivot: DVec2,
    canvas: S,
    buffer: S,
    sprites: Vec<S::Image>,
    particles: Vec<Particle>,
    delta_angle: f64,
    composite_operation: Option<String>,
}

impl<S: Surface> ParticleField<S> {
    /// Builds the field on two offscreen surfaces created from `host`.
    pub fn new<R: Rng>(
        host: &S,
        area: f64,
        pivot: DVec2,
        sprites: Vec<S::Image>,
        count: usize,
        composite_operation: Option<String>,
        rng: &mut R,
    ) -> Result<Self> {
        if sprites.is_empty() {
            return Err(Error::NoImages);
        }
        let side = area.ceil() as u32;
        let canvas = host.create_offscreen(side, side)?;
        let buffer = host.create_offscreen(side, side)?;
        let particles = (0..count)
            .map(|_| Particle::random(rng, sprites.len(), area))
            .collect();

        Ok(Self {
            area,
            pivot,
            canvas,
            buffer,
            sprites,
            particles,
            delta_angle: 0.0,
            composite_operation,
        })
    }

    /// The working canvas, ready to be stamped by a tiling.
    pub fn texture(&self) -> &S {
        &self.canvas
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn pivot(&self) -> DVec2 {
        self.pivot
    }

    pub fn set_delta_angle(&mut self, delta_angle: f64) {
        self.delta_angle = delta_angle;
    }

    /// Fades the previous frame, imprints every particle and moves it.
    pub fn step(&mut self) -> Result<()> {
        self.buffer.clear();
        self.buffer.draw_surface(&self.canvas, 0.0, 0.0)?;
        self.canvas.clear();
        self.canvas.save();
        self.canvas.set_global_alpha(TRAIL_ALPHA);
        self.canvas.draw_surface(&self.buffer, 0.0, 0.0)?;
        self.canvas.restore();
        if let Some(op) = &self.composite_operation {
            self.canvas.set_composite_operation(op)?;
        }

        for p in &mut self.particles {
            p.draw(&mut self.canvas, &self.sprites[p.sprite])?;
            p.advance(self.pivot, self.delta_angle, self.area);
        }
        Ok(())
    }
}
