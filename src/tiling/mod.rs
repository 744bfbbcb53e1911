//! Mapping the square content texture onto the whole viewport.

mod square;
mod triangle;

pub use square::SquareTiling;
pub use triangle::TriangleTiling;

use glam::DVec2;

use crate::options::Shape;
use crate::surface::Surface;
use crate::Result;

/// Modulo with the sign of the divisor (`floorMod(-1, 3) == 2`).
pub fn floor_mod(m: i64, n: i64) -> i64 {
    m.rem_euclid(n)
}

/// Which of the three triangle orientations lattice cell (x, y) uses.
pub fn rotation_index(x: i64, y: i64) -> usize {
    ((floor_mod(x, 3) + 2 * floor_mod(y, 2)) % 3) as usize
}

/// Per-frame inputs shared by both tilings.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub viewport: DVec2,
    pub angle: f64,
    pub rot_screen: bool,
    pub background: Option<&'a str>,
}

impl Frame<'_> {
    pub fn diagonal(&self) -> f64 {
        self.viewport.length()
    }
}

/// The tiling selected by [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tiling {
    Square(SquareTiling),
    Triangle(TriangleTiling),
}

impl Tiling {
    pub fn new(shape: Shape, area: f64) -> Self {
        match shape {
            Shape::Square => Tiling::Square(SquareTiling::new(area)),
            Shape::Triangle => Tiling::Triangle(TriangleTiling::new(area)),
        }
    }

    /// Point of the content area the particles revolve around.
    pub fn pivot(&self) -> DVec2 {
        match self {
            Tiling::Square(t) => t.pivot,
            Tiling::Triangle(t) => t.pivot,
        }
    }

    pub fn side(&self) -> f64 {
        match self {
            Tiling::Square(t) => t.side,
            Tiling::Triangle(t) => t.side,
        }
    }

    pub fn paint<S: Surface>(&self, surface: &mut S, texture: &S, frame: &Frame<'_>) -> Result<()> {
        surface.clear();
        if let Some(color) = frame.background {
            surface.fill(color);
        }
        match self {
            Tiling::Square(t) => t.paint(surface, texture, frame),
            Tiling::Triangle(t) => t.paint(surface, texture, frame),
        }
    }
}
