use glam::DVec2;
use wasm_bindgen::JsCast;
use web_sys::{window, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::surface::{Sprite, Surface};
use crate::{Error, Result};

/// Anything `drawImage` accepts that the kaleidoscope uses as a particle.
#[derive(Debug, Clone)]
pub enum CanvasSprite {
    Image(HtmlImageElement),
    Canvas(HtmlCanvasElement),
}

impl Sprite for CanvasSprite {
    fn width(&self) -> f64 {
        match self {
            CanvasSprite::Image(img) => img.natural_width() as f64,
            CanvasSprite::Canvas(c) => c.width() as f64,
        }
    }

    fn height(&self) -> f64 {
        match self {
            CanvasSprite::Image(img) => img.natural_height() as f64,
            CanvasSprite::Canvas(c) => c.height() as f64,
        }
    }
}

/// A `<canvas>` and its 2D context.
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(Error::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| Error::NoContext)?;
        Ok(Self { canvas, ctx })
    }

    /// A detached canvas of the given size.
    pub fn detached(width: u32, height: u32) -> Result<Self> {
        let document = window()
            .ok_or(Error::NoWindow)?
            .document()
            .ok_or(Error::NoDocument)?;
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| Error::NoContext)?;
        canvas.set_width(width);
        canvas.set_height(height);
        Self::new(canvas)
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }
}

impl Surface for CanvasSurface {
    type Image = CanvasSprite;

    fn create_offscreen(&self, width: u32, height: u32) -> Result<Self> {
        Self::detached(width, height)
    }

    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<()> {
        self.ctx.translate(x, y).map_err(Error::canvas)
    }

    fn rotate(&mut self, angle: f64) -> Result<()> {
        self.ctx.rotate(angle).map_err(Error::canvas)
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<()> {
        self.ctx.scale(x, y).map_err(Error::canvas)
    }

    fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<()> {
        self.ctx.transform(a, b, c, d, e, f).map_err(Error::canvas)
    }

    fn clip_polygon(&mut self, points: &[DVec2]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.close_path();
        self.ctx.clip();
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
    }

    fn fill(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn set_composite_operation(&mut self, op: &str) -> Result<()> {
        self.ctx.set_global_composite_operation(op).map_err(Error::canvas)
    }

    fn draw_image(&mut self, image: &CanvasSprite, x: f64, y: f64) -> Result<()> {
        match image {
            CanvasSprite::Image(img) => self.ctx.draw_image_with_html_image_element(img, x, y).map_err(Error::canvas)?,
            CanvasSprite::Canvas(c) => self.ctx.draw_image_with_html_canvas_element(c, x, y).map_err(Error::canvas)?,
        }
        Ok(())
    }

    fn draw_surface(&mut self, source: &Self, x: f64, y: f64) -> Result<()> {
        self.ctx
            .draw_image_with_html_canvas_element(&source.canvas, x, y)
            .map_err(Error::canvas)
    }
}
