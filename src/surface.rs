//! The slice of the 2D canvas API the renderer draws through.
//!
//! The browser backend lives in `wasm::canvas`; tests use a recording
//! implementation that tracks the transform stack instead of pixels.

use glam::DVec2;

use crate::Result;

/// Something that can be stamped onto a [`Surface`].
pub trait Sprite {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
}

/// A 2D drawing target with a canvas-style transform/clip state stack.
///
/// Transform calls compose onto the current matrix exactly like
/// `CanvasRenderingContext2d`; `save`/`restore` push and pop the whole state
/// (transform, clip, alpha).
pub trait Surface: Sized {
    type Image: Sprite;

    /// Creates a blank surface of the same backend.
    fn create_offscreen(&self, width: u32, height: u32) -> Result<Self>;

    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Resizes the backing store. Resizing clears it and resets state.
    fn resize(&mut self, width: u32, height: u32);

    fn save(&mut self);
    fn restore(&mut self);

    fn translate(&mut self, x: f64, y: f64) -> Result<()>;
    fn rotate(&mut self, angle: f64) -> Result<()>;
    fn scale(&mut self, x: f64, y: f64) -> Result<()>;
    /// Multiplies the current matrix by `[a c e; b d f; 0 0 1]`.
    fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<()>;

    /// Intersects the clip region with the closed polygon.
    fn clip_polygon(&mut self, points: &[DVec2]);

    /// Clears the whole backing store to transparent, ignoring the transform.
    fn clear(&mut self);
    /// Fills the whole backing store with a CSS colour, ignoring the transform.
    fn fill(&mut self, color: &str);

    fn set_global_alpha(&mut self, alpha: f64);
    fn set_composite_operation(&mut self, op: &str) -> Result<()>;

    fn draw_image(&mut self, image: &Self::Image, x: f64, y: f64) -> Result<()>;
    fn draw_surface(&mut self, source: &Self, x: f64, y: f64) -> Result<()>;
}
