//! A `Surface` that records draws and tracks the transform stack, for tests.

use glam::{DAffine2, DMat2, DVec2};

use crate::surface::{Sprite, Surface};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestSprite {
    width: f64,
    height: f64,
}

impl TestSprite {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Sprite for TestSprite {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct State {
    transform: DAffine2,
    alpha: f64,
    clips: usize,
}

impl Default for State {
    fn default() -> Self {
        Self {
            transform: DAffine2::IDENTITY,
            alpha: 1.0,
            clips: 0,
        }
    }
}

/// One `draw_image`/`draw_surface` call as seen by the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Draw {
    pub transform: DAffine2,
    pub alpha: f64,
    pub clips: usize,
    /// Last clip polygon in device coordinates, if any.
    pub clip: Option<Vec<DVec2>>,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    state: State,
    stack: Vec<State>,
    clip: Option<Vec<DVec2>>,
    clip_stack: Vec<Option<Vec<DVec2>>>,
    draws: Vec<Draw>,
    fills: Vec<String>,
    composite: Option<String>,
    painted: bool,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn fills(&self) -> &[String] {
        &self.fills
    }

    pub fn composite(&self) -> Option<&str> {
        self.composite.as_deref()
    }

    /// Whether anything non-blank landed since the last clear.
    pub fn painted(&self) -> bool {
        self.painted
    }

    /// Depth of the save stack; zero when every `save` was matched.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn push(&mut self, m: DAffine2) {
        self.state.transform = self.state.transform * m;
    }

    fn record(&mut self) {
        self.draws.push(Draw {
            transform: self.state.transform,
            alpha: self.state.alpha,
            clips: self.state.clips,
            clip: self.clip.clone(),
        });
    }
}

impl Surface for RecordingSurface {
    type Image = TestSprite;

    fn create_offscreen(&self, width: u32, height: u32) -> Result<Self> {
        Ok(Self::new(width, height))
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    fn save(&mut self) {
        self.stack.push(self.state);
        self.clip_stack.push(self.clip.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
        if let Some(clip) = self.clip_stack.pop() {
            self.clip = clip;
        }
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<()> {
        self.push(DAffine2::from_translation(DVec2::new(x, y)));
        Ok(())
    }

    fn rotate(&mut self, angle: f64) -> Result<()> {
        self.push(DAffine2::from_angle(angle));
        Ok(())
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<()> {
        self.push(DAffine2::from_scale(DVec2::new(x, y)));
        Ok(())
    }

    fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<()> {
        self.push(DAffine2::from_mat2_translation(
            DMat2::from_cols(DVec2::new(a, b), DVec2::new(c, d)),
            DVec2::new(e, f),
        ));
        Ok(())
    }

    fn clip_polygon(&mut self, points: &[DVec2]) {
        let t = self.state.transform;
        self.clip = Some(points.iter().map(|p| t.transform_point2(*p)).collect());
        self.state.clips += 1;
    }

    fn clear(&mut self) {
        self.draws.clear();
        self.fills.clear();
        self.painted = false;
    }

    fn fill(&mut self, color: &str) {
        self.fills.push(color.to_owned());
        self.painted = true;
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha;
    }

    fn set_composite_operation(&mut self, op: &str) -> Result<()> {
        self.composite = Some(op.to_owned());
        Ok(())
    }

    fn draw_image(&mut self, _image: &TestSprite, _x: f64, _y: f64) -> Result<()> {
        self.record();
        self.painted = true;
        Ok(())
    }

    fn draw_surface(&mut self, source: &Self, _x: f64, _y: f64) -> Result<()> {
        self.record();
        self.painted |= source.painted;
        Ok(())
    }
}
