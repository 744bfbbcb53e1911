//! Frame orchestration: clock, resize, particle step, tiling, momentum.

use glam::DVec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::clock::FrameClock;
use crate::motion::Momentum;
use crate::options::{Hooks, Options};
use crate::particles::ParticleField;
use crate::surface::Surface;
use crate::tiling::{Frame, Tiling};
use crate::Result;

/// Side of the square content texture, in pixels.
pub const AREA_SIZE: f64 = 160.0;

/// Logical viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn as_vec(self) -> DVec2 {
        DVec2::new(self.width as f64, self.height as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Running,
    Destroyed,
}

pub struct Kaleidoscope<S: Surface> {
    options: Options,
    hooks: Hooks,
    tiling: Tiling,
    display: S,
    field: Option<ParticleField<S>>,
    momentum: Momentum,
    clock: FrameClock,
    lifecycle: Lifecycle,
}

impl<S: Surface> Kaleidoscope<S> {
    /// Wraps the visible `display`. Nothing is drawn until
    /// [`install_sprites`](Self::install_sprites) provides the particle images.
    pub fn new(display: S, options: Options, hooks: Hooks) -> Self {
        let tiling = Tiling::new(options.shape, AREA_SIZE);
        Self {
            options,
            hooks,
            tiling,
            display,
            field: None,
            momentum: Momentum::new(),
            clock: FrameClock::new(),
            lifecycle: Lifecycle::Running,
        }
    }

    /// Builds the particle field from the loaded images.
    pub fn install_sprites(&mut self, sprites: Vec<S::Image>) -> Result<()> {
        let seed = self.options.seed.unwrap_or_else(entropy_seed);
        let mut rng = SmallRng::seed_from_u64(seed);
        let field = ParticleField::new(
            &self.display,
            AREA_SIZE,
            self.tiling.pivot(),
            sprites,
            self.options.num_particles,
            self.options.composite_operation.clone(),
            &mut rng,
        )?;
        log::info!(
            "kaleidoscope ready: {} particles, {} tiling, seed {seed}",
            self.options.num_particles,
            self.options.shape
        );
        self.field = Some(field);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.field.is_some()
    }

    pub fn display(&self) -> &S {
        &self.display
    }

    pub fn field(&self) -> Option<&ParticleField<S>> {
        self.field.as_ref()
    }

    pub fn momentum(&self) -> &Momentum {
        &self.momentum
    }

    pub fn momentum_mut(&mut self) -> &mut Momentum {
        &mut self.momentum
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn destroy(&mut self) {
        self.lifecycle = Lifecycle::Destroyed;
    }

    /// Takes the post-init hook; it is handed out at most once.
    pub fn take_post_init(&mut self) -> Option<Box<dyn FnOnce()>> {
        self.hooks.post_init.take()
    }

    /// Renders one animation frame at `timestamp` (ms).
    pub fn frame(&mut self, timestamp: f64, viewport: Viewport) -> Result<()> {
        if self.lifecycle == Lifecycle::Destroyed {
            return Ok(());
        }
        let span = self.clock.tick(timestamp);
        self.fit(viewport);

        if let Some(field) = self.field.as_mut() {
            field.step()?;
            let frame = Frame {
                viewport: viewport.as_vec(),
                angle: self.momentum.angle(),
                rot_screen: self.options.rot_screen,
                background: self.options.bg_color.as_deref(),
            };
            self.tiling.paint(&mut self.display, field.texture(), &frame)?;
        }

        let dist = self.momentum.advance(span);
        if let Some(field) = self.field.as_mut() {
            field.set_delta_angle(dist);
        }

        if let Some(hook) = self.hooks.on_render.as_mut() {
            hook(timestamp);
        }
        Ok(())
    }

    fn fit(&mut self, viewport: Viewport) {
        if self.display.width() != viewport.width || self.display.height() != viewport.height {
            log::debug!("resizing display to {}x{}", viewport.width, viewport.height);
            self.display.resize(viewport.width, viewport.height);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn entropy_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn entropy_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{IDLE_DECAY, INITIAL_DELTA_ANGLE};
    use crate::options::Shape;
    use crate::testing::{RecordingSurface, TestSprite};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn square_options() -> Options {
        Options {
            shape: Shape::Square,
            seed: Some(11),
            ..Options::default()
        }
    }

    fn ready(options: Options, hooks: Hooks) -> Kaleidoscope<RecordingSurface> {
        let mut k = Kaleidoscope::new(RecordingSurface::new(300, 150), options, hooks);
        k.install_sprites(vec![TestSprite::new(32.0, 32.0), TestSprite::new(16.0, 24.0)])
            .unwrap();
        k
    }

    #[test]
    fn one_frame_paints_texture_and_sizes_display() {
        let mut k = ready(square_options(), Hooks::default());
        k.frame(16.0, Viewport::new(800, 600)).unwrap();

        assert!(k.field().unwrap().texture().painted());
        assert_eq!(k.display().width(), 800);
        assert_eq!(k.display().height(), 600);
        assert!(k.display().painted());
        assert_eq!(k.display().fills(), ["#000000"]);
    }

    #[test]
    fn pivot_follows_shape() {
        let sq = ready(square_options(), Hooks::default());
        assert_eq!(sq.field().unwrap().pivot(), DVec2::splat(80.0));

        let tri = ready(Options { seed: Some(1), ..Options::default() }, Hooks::default());
        let side = AREA_SIZE * 3f64.sqrt() / 2.0;
        assert!((tri.field().unwrap().pivot() - DVec2::new(side / 2.0, side / 3f64.sqrt() / 2.0)).length() < 1e-9);
    }

    #[test]
    fn nothing_drawn_before_sprites_arrive() {
        let mut k = Kaleidoscope::new(RecordingSurface::new(10, 10), square_options(), Hooks::default());
        k.frame(16.0, Viewport::new(64, 48)).unwrap();
        assert!(!k.is_ready());
        assert!(!k.display().painted());
        assert_eq!(k.display().width(), 64);
    }

    #[test]
    fn idle_frames_spin_down() {
        let mut k = ready(square_options(), Hooks::default());
        k.frame(0.0, Viewport::new(100, 100)).unwrap();
        let mut t = 0.0;
        for _ in 0..5 {
            t += 1000.0 / 60.0;
            let before = k.momentum().delta_angle();
            k.frame(t, Viewport::new(100, 100)).unwrap();
            assert!((k.momentum().delta_angle() - before * IDLE_DECAY).abs() < 1e-15);
        }
        assert!(k.momentum().angle() > 0.0);
    }

    #[test]
    fn backgrounded_tab_does_not_advance_angle() {
        let mut k = ready(square_options(), Hooks::default());
        k.frame(10.0, Viewport::new(100, 100)).unwrap();
        let angle = k.momentum().angle();
        k.frame(5000.0, Viewport::new(100, 100)).unwrap();
        assert_eq!(k.momentum().angle(), angle);
        assert_eq!(k.momentum().delta_angle(), INITIAL_DELTA_ANGLE * IDLE_DECAY);
    }

    #[test]
    fn held_pointer_suppresses_decay() {
        let mut k = ready(square_options(), Hooks::default());
        k.momentum_mut().press(0.0, 0.0);
        k.momentum_mut().drag(0.1, 1.0);
        k.frame(16.0, Viewport::new(100, 100)).unwrap();
        k.frame(32.0, Viewport::new(100, 100)).unwrap();
        assert!((k.momentum().delta_angle() - 0.1).abs() < 1e-12);
        assert!((k.momentum().angle() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn render_hook_sees_every_frame_until_destroyed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let hooks = Hooks {
            post_init: None,
            on_render: Some(Box::new(move |ts| sink.borrow_mut().push(ts))),
        };
        let mut k = ready(square_options(), hooks);
        k.frame(16.0, Viewport::new(100, 100)).unwrap();
        k.frame(32.0, Viewport::new(100, 100)).unwrap();
        k.destroy();
        k.frame(48.0, Viewport::new(100, 100)).unwrap();

        assert_eq!(*seen.borrow(), [16.0, 32.0]);
        assert_eq!(k.lifecycle(), Lifecycle::Destroyed);
    }

    #[test]
    fn post_init_is_handed_out_once() {
        let hooks = Hooks {
            post_init: Some(Box::new(|| {})),
            on_render: None,
        };
        let mut k = ready(square_options(), hooks);
        assert!(k.take_post_init().is_some());
        assert!(k.take_post_init().is_none());
    }

    #[test]
    fn composite_operation_reaches_the_texture() {
        let opts = Options {
            composite_operation: Some("lighter".to_owned()),
            ..square_options()
        };
        let mut k = ready(opts, Hooks::default());
        k.frame(16.0, Viewport::new(100, 100)).unwrap();
        assert_eq!(k.field().unwrap().texture().composite(), Some("lighter"));
    }

    #[test]
    fn no_background_means_no_fill() {
        let opts = Options {
            bg_color: None,
            ..square_options()
        };
        let mut k = ready(opts, Hooks::default());
        k.frame(16.0, Viewport::new(100, 100)).unwrap();
        assert!(k.display().fills().is_empty());
    }
}
